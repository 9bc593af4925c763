//! Camera and camera-relative drawing.
//!
//! Simulation runs in world space.  The shift into screen space happens
//! only inside `CameraSpaceRenderGroup::draw`, on a copy of each rect.

use glam::Vec2;

use crate::entities::{Character, Projectile};
use crate::geometry::Rect;
use crate::platform::{Sprite, Surface};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// World point shown at the middle of the viewport.
    pub center: Vec2,
    viewport_size: Vec2,
}

impl Camera {
    pub fn new(center: Vec2, viewport_size: Vec2) -> Self {
        Self {
            center,
            viewport_size,
        }
    }

    /// Offset added to a world position to land in viewport space.
    pub fn offset(&self) -> Vec2 {
        self.viewport_size / 2.0 - self.center
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world + self.offset()
    }

    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        screen - self.offset()
    }
}

/// Anything with a world rect and an image to put there.
pub trait Renderable {
    fn sprite(&self) -> Option<&Sprite>;
    fn world_rect(&self) -> Rect;
}

impl Renderable for Character {
    fn sprite(&self) -> Option<&Sprite> {
        Character::sprite(self)
    }

    fn world_rect(&self) -> Rect {
        self.rect()
    }
}

impl Renderable for Projectile {
    fn sprite(&self) -> Option<&Sprite> {
        Some(&self.sprite)
    }

    fn world_rect(&self) -> Rect {
        self.rect()
    }
}

pub struct CameraSpaceRenderGroup<'a> {
    camera: &'a Camera,
}

impl<'a> CameraSpaceRenderGroup<'a> {
    pub fn new(camera: &'a Camera) -> Self {
        Self { camera }
    }

    pub fn draw<'m, T, I>(&self, members: I, surface: &mut impl Surface)
    where
        T: Renderable + 'm,
        I: IntoIterator<Item = &'m T>,
    {
        let offset = self.camera.offset();
        for member in members {
            if let Some(sprite) = member.sprite() {
                surface.blit(sprite, member.world_rect().translated(offset));
            }
        }
    }
}

// ── Background ────────────────────────────────────────────────────────────────

/// One tile of the scrolling floor.  Tiles form a fixed grid around the
/// camera and hop a whole tile at a time as the camera crosses tile lines.
#[derive(Clone, Debug)]
pub struct BackgroundTile {
    pub sprite: Sprite,
    /// Grid offset of this tile relative to the camera's tile.
    pub offset: (i32, i32),
    pub top_left: Vec2,
}

impl BackgroundTile {
    pub fn grid(sprite: Sprite) -> Vec<BackgroundTile> {
        let mut tiles = Vec::with_capacity(15);
        for i in -2..=2 {
            for j in -1..=1 {
                tiles.push(BackgroundTile {
                    sprite,
                    offset: (i, j),
                    top_left: Vec2::new(i as f32, j as f32) * sprite.size,
                });
            }
        }
        tiles
    }

    pub fn follow(&mut self, camera: &Camera) {
        let size = self.sprite.size;
        let cell = (camera.center / size).floor();
        let grid = Vec2::new(self.offset.0 as f32, self.offset.1 as f32) + cell;
        self.top_left = grid * size;
    }
}

impl Renderable for BackgroundTile {
    fn sprite(&self) -> Option<&Sprite> {
        Some(&self.sprite)
    }

    fn world_rect(&self) -> Rect {
        Rect::from_top_left(self.top_left, self.sprite.size)
    }
}
