//! Contracts for the I/O collaborators the simulation depends on.
//!
//! Image loading, drawing, input polling and sound all live outside the
//! core.  The core only sees these traits and the small value types that
//! cross them.

use std::collections::HashSet;

use glam::Vec2;

use crate::geometry::{rotated_bounds, Direction8, Rect};

// ── Images ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Player(Direction8),
    PlayerHurt,
    PlayerDown,
    PlayerCleared,
    Zombie(u8),
    Boss,
    Bullet,
    Flame,
    Background,
}

/// A loaded image handle: what to draw and how big it is in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub id: SpriteId,
    pub size: Vec2,
    /// Counter-clockwise rotation in degrees, screen-up positive.
    pub angle: f32,
}

impl Sprite {
    pub fn new(id: SpriteId, size: Vec2) -> Self {
        Self {
            id,
            size,
            angle: 0.0,
        }
    }

    pub fn scaled_to(self, size: Vec2) -> Self {
        Self { size, ..self }
    }

    /// Rotate the image; the bounding box grows to enclose the result.
    pub fn rotated(self, degrees: f32) -> Self {
        Self {
            size: rotated_bounds(self.size, degrees),
            angle: self.angle + degrees,
            ..self
        }
    }
}

pub trait Assets {
    fn load_image(&self, id: SpriteId) -> Sprite;

    fn measure(&self, sprite: &Sprite) -> Vec2 {
        sprite.size
    }
}

// ── Output surface ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Red,
    Green,
    Blue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextSize {
    Normal,
    Banner,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    pub tint: Tint,
    pub size: TextSize,
}

/// A 2D drawable surface in viewport coordinates (origin top-left).
pub trait Surface {
    fn blit(&mut self, sprite: &Sprite, rect: Rect);
    fn draw_text(&mut self, text: &str, center: Vec2, style: TextStyle);
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKey {
    W,
    A,
    S,
    D,
}

impl MoveKey {
    pub fn step(self) -> (i32, i32) {
        match self {
            MoveKey::W => (0, -1),
            MoveKey::S => (0, 1),
            MoveKey::A => (-1, 0),
            MoveKey::D => (1, 0),
        }
    }
}

pub trait InputSource {
    fn pressed_keys(&self) -> HashSet<MoveKey>;
    /// Pointer position in viewport space.
    fn pointer_position(&self) -> Vec2;
}

/// One frame's worth of input, captured up front.
#[derive(Clone, Debug, Default)]
pub struct InputSnapshot {
    pub pressed: HashSet<MoveKey>,
    pub pointer: Vec2,
}

impl InputSnapshot {
    pub fn capture(source: &impl InputSource) -> Self {
        Self {
            pressed: source.pressed_keys(),
            pointer: source.pointer_position(),
        }
    }
}

impl InputSource for InputSnapshot {
    fn pressed_keys(&self) -> HashSet<MoveKey> {
        self.pressed.clone()
    }

    fn pointer_position(&self) -> Vec2 {
        self.pointer
    }
}

// ── Audio ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sound {
    Shot,
    PlayerHurt,
    EnemyDown,
    GameOver,
    GameClear,
}

/// Fire-and-forget sound output.
pub trait AudioSink {
    fn play(&mut self, sound: Sound);
}

/// Discards every sound.
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _sound: Sound) {}
}
