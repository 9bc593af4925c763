#![allow(dead_code)]

use std::collections::HashSet;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use survival_shooter::compute::{init_state, GameState};
use survival_shooter::config::GameConfig;
use survival_shooter::geometry::Rect;
use survival_shooter::platform::{
    Assets, AudioSink, InputSnapshot, MoveKey, Sound, Sprite, SpriteId, Surface, TextStyle,
};

pub const VIEWPORT: Vec2 = Vec2::new(1600.0, 900.0);

/// Images with fixed, easy-to-reason-about sizes.
pub struct FixedAssets;

impl Assets for FixedAssets {
    fn load_image(&self, id: SpriteId) -> Sprite {
        let size = match id {
            SpriteId::Bullet => Vec2::new(20.0, 10.0),
            SpriteId::Flame => Vec2::new(40.0, 40.0),
            SpriteId::Boss => Vec2::new(40.0, 40.0),
            SpriteId::Zombie(_) => Vec2::new(100.0, 100.0),
            SpriteId::Background => Vec2::new(800.0, 450.0),
            _ => Vec2::new(50.0, 50.0),
        };
        Sprite::new(id, size)
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    pub blits: Vec<(SpriteId, Rect)>,
    pub texts: Vec<(String, TextStyle)>,
}

impl RecordingSurface {
    pub fn blits_of(&self, id: SpriteId) -> Vec<Rect> {
        self.blits
            .iter()
            .filter(|(blitted, _)| *blitted == id)
            .map(|(_, rect)| *rect)
            .collect()
    }

    pub fn has_text(&self, text: &str) -> bool {
        self.texts.iter().any(|(t, _)| t == text)
    }
}

impl Surface for RecordingSurface {
    fn blit(&mut self, sprite: &Sprite, rect: Rect) {
        self.blits.push((sprite.id, rect));
    }

    fn draw_text(&mut self, text: &str, _center: Vec2, style: TextStyle) {
        self.texts.push((text.to_string(), style));
    }

    fn width(&self) -> f32 {
        VIEWPORT.x
    }

    fn height(&self) -> f32 {
        VIEWPORT.y
    }
}

#[derive(Default)]
pub struct RecordingAudio {
    pub played: Vec<Sound>,
}

impl RecordingAudio {
    pub fn count(&self, sound: Sound) -> usize {
        self.played.iter().filter(|s| **s == sound).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, sound: Sound) {
        self.played.push(sound);
    }
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub fn make_state() -> GameState {
    init_state(GameConfig::default(), &FixedAssets, VIEWPORT)
}

/// No keys held; pointer 200 units right of the viewport centre.
pub fn idle_input() -> InputSnapshot {
    InputSnapshot {
        pressed: HashSet::new(),
        pointer: VIEWPORT / 2.0 + Vec2::new(200.0, 0.0),
    }
}

pub fn holding(keys: &[MoveKey]) -> InputSnapshot {
    InputSnapshot {
        pressed: keys.iter().copied().collect(),
        ..idle_input()
    }
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}
