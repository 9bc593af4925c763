//! Game entity types and the state rules intrinsic to them.
//!
//! Player, enemies and bosses share one `Character` record; what sets them
//! apart is their `MovementPolicy`, their optional `score_value` and the
//! optional overlay shown when they take damage.

use glam::Vec2;

use crate::config::GameConfig;
use crate::geometry::{Direction8, Rect};
use crate::platform::{Assets, Sprite, SpriteId};

// ── Image layers ──────────────────────────────────────────────────────────────

/// A priority-ranked image, optionally limited to `ttl` seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub priority: i32,
    pub sprite: Sprite,
    /// Seconds left on screen; `None` never expires.
    pub ttl: Option<f32>,
}

/// The highest-priority layer is the one on display.
pub fn select_active(layers: &[Layer]) -> Option<&Layer> {
    layers.iter().max_by_key(|layer| layer.priority)
}

#[derive(Clone, Debug)]
pub struct ImageLayers {
    layers: Vec<Layer>,
}

impl ImageLayers {
    pub fn new(base: Sprite) -> Self {
        Self {
            layers: vec![Layer {
                priority: 0,
                sprite: base,
                ttl: None,
            }],
        }
    }

    /// Insert a layer, replacing whatever held `priority` before.
    pub fn set(&mut self, sprite: Sprite, priority: i32, ttl: Option<f32>) {
        let layer = Layer {
            priority,
            sprite,
            ttl,
        };
        match self.layers.iter_mut().find(|l| l.priority == priority) {
            Some(slot) => *slot = layer,
            None => self.layers.push(layer),
        }
    }

    pub fn active(&self) -> Option<&Sprite> {
        select_active(&self.layers).map(|layer| &layer.sprite)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Age every timed layer by `dt`.
    ///
    /// A layer whose time has already run out (ttl <= 0) is dropped first,
    /// so it is always shown for at least the frame in which it expired.
    pub fn tick(&mut self, dt: f32) {
        self.layers
            .retain(|layer| !matches!(layer.ttl, Some(ttl) if ttl <= 0.0));
        for layer in &mut self.layers {
            if let Some(ttl) = layer.ttl.as_mut() {
                *ttl -= dt;
            }
        }
    }
}

// ── Characters ────────────────────────────────────────────────────────────────

/// Layer swapped in when a character takes an effective hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageOverlay {
    pub sprite: Sprite,
    pub priority: i32,
    pub secs: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Still invincible from an earlier hit.
    Ignored,
    Hurt,
    /// Health crossed from above zero to zero or below on this hit.
    Killed,
}

/// Player steering state: current heading and one sprite per heading.
#[derive(Clone, Debug)]
pub struct Steering {
    pub facing: Direction8,
    pub sprites: [Sprite; 8],
}

/// Boss weapon state.
#[derive(Clone, Debug)]
pub struct Gunner {
    pub attack_timer: f32,
    pub attack_interval: f32,
}

#[derive(Clone, Debug)]
pub enum MovementPolicy {
    PlayerControlled(Steering),
    PursueTarget,
    PursueAndShoot(Gunner),
}

/// Sentinel for a fully recovered invincibility timer.
pub const RECOVERED: f32 = -1.0;

#[derive(Clone, Debug)]
pub struct Character {
    /// World-space centre.
    pub position: Vec2,
    pub health: i32,
    pub invincible_timer: f32,
    pub max_invincible: f32,
    pub speed: f32,
    pub layers: ImageLayers,
    /// Points awarded when a projectile finishes this character off.
    pub score_value: Option<u32>,
    pub on_damaged: Option<DamageOverlay>,
    pub policy: MovementPolicy,
    removed: bool,
}

impl Character {
    pub fn new(
        base: Sprite,
        position: Vec2,
        health: i32,
        max_invincible: f32,
        speed: f32,
        policy: MovementPolicy,
    ) -> Self {
        Self {
            position,
            health,
            invincible_timer: RECOVERED,
            max_invincible,
            speed,
            layers: ImageLayers::new(base),
            score_value: None,
            on_damaged: None,
            policy,
            removed: false,
        }
    }

    pub fn with_score(mut self, value: u32) -> Self {
        self.score_value = Some(value);
        self
    }

    pub fn with_damage_overlay(mut self, overlay: DamageOverlay) -> Self {
        self.on_damaged = Some(overlay);
        self
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        self.layers.active()
    }

    /// Bounding box of the image currently on display.
    pub fn rect(&self) -> Rect {
        let size = self.sprite().map(|s| s.size).unwrap_or(Vec2::ZERO);
        Rect::from_center(self.position, size)
    }

    pub fn set_image(&mut self, sprite: Sprite, priority: i32, ttl: Option<f32>) {
        self.layers.set(sprite, priority, ttl);
    }

    pub fn is_alive(&self) -> bool {
        !self.removed
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0.0
    }

    pub fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.is_invincible() {
            return DamageOutcome::Ignored;
        }
        let was_standing = self.health > 0;
        self.health -= amount;
        self.invincible_timer = self.max_invincible;
        if let Some(overlay) = self.on_damaged {
            self.layers
                .set(overlay.sprite, overlay.priority, Some(overlay.secs));
        }
        if self.health <= 0 {
            self.removed = true;
            if was_standing {
                return DamageOutcome::Killed;
            }
        }
        DamageOutcome::Hurt
    }

    /// Count down invincibility and image layers.
    pub fn tick(&mut self, dt: f32) {
        if self.invincible_timer > RECOVERED {
            self.invincible_timer = (self.invincible_timer - dt).max(RECOVERED);
        }
        self.layers.tick(dt);
    }
}

/// The avatar.  Attack cadence is adjusted from outside as the score grows.
#[derive(Clone, Debug)]
pub struct Player {
    pub body: Character,
    pub attack_interval: f32,
    pub attack_count: u32,
}

impl Player {
    pub fn facing(&self) -> Direction8 {
        match &self.body.policy {
            MovementPolicy::PlayerControlled(steering) => steering.facing,
            _ => Direction8::Right,
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Which characters a projectile can hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetGroup {
    /// Enemies and bosses.
    Hostiles,
    Player,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: i32,
    pub age: f32,
    pub max_lifespan: f32,
    pub sprite: Sprite,
    pub target: TargetGroup,
    pub(crate) spent: bool,
}

// ── Score & phase ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    value: u32,
}

impl Score {
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn add(&mut self, points: u32) {
        self.value = self.value.saturating_add(points);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    GameOver,
    GameClear,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        self != GamePhase::Playing
    }
}

// ── Preloaded images ──────────────────────────────────────────────────────────

/// Every image the simulation needs, loaded once at start-up.
#[derive(Clone, Debug)]
pub struct SpriteBook {
    pub player: [Sprite; 8],
    pub player_hurt: Sprite,
    pub player_down: Sprite,
    pub player_cleared: Sprite,
    pub zombies: [Sprite; 3],
    pub boss: Sprite,
    pub bullet: Sprite,
    pub flame: Sprite,
    pub background: Sprite,
}

impl SpriteBook {
    pub fn load(assets: &impl Assets, config: &GameConfig) -> Self {
        let scaled = |id: SpriteId, scale: f32| {
            let sprite = assets.load_image(id);
            sprite.scaled_to(assets.measure(&sprite) * scale)
        };
        let player_scale = config.player.image_scale;
        Self {
            player: Direction8::ALL.map(|dir| scaled(SpriteId::Player(dir), player_scale)),
            player_hurt: scaled(SpriteId::PlayerHurt, player_scale),
            player_down: scaled(SpriteId::PlayerDown, player_scale),
            player_cleared: scaled(SpriteId::PlayerCleared, player_scale),
            zombies: [1, 2, 3].map(|i| assets.load_image(SpriteId::Zombie(i))),
            boss: scaled(SpriteId::Boss, config.boss.image_scale),
            bullet: assets.load_image(SpriteId::Bullet),
            flame: assets.load_image(SpriteId::Flame),
            background: assets.load_image(SpriteId::Background),
        }
    }
}
