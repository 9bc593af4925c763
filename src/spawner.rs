//! Entity factories, spawn timers and difficulty tiers.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::config::{DifficultyTuning, GameConfig};
use crate::entities::{
    Character, DamageOverlay, Gunner, MovementPolicy, Player, SpriteBook, Steering,
};
use crate::geometry::Direction8;

// ── Factories ─────────────────────────────────────────────────────────────────

pub fn spawn_player(book: &SpriteBook, config: &GameConfig, position: Vec2) -> Player {
    let tuning = &config.player;
    let facing = Direction8::Right;
    let body = Character::new(
        book.player[facing.index()],
        position,
        tuning.health,
        tuning.invincible_secs,
        tuning.speed,
        MovementPolicy::PlayerControlled(Steering {
            facing,
            sprites: book.player,
        }),
    )
    .with_damage_overlay(DamageOverlay {
        sprite: book.player_hurt,
        priority: tuning.hurt_priority,
        secs: tuning.hurt_secs,
    });
    Player {
        body,
        attack_interval: tuning.attack_interval,
        attack_count: tuning.attack_count,
    }
}

/// A zombie with a randomly picked look, stretched to a random size.
pub fn spawn_enemy(
    book: &SpriteBook,
    config: &GameConfig,
    position: Vec2,
    rng: &mut impl Rng,
) -> Character {
    let tuning = &config.enemy;
    let base = book.zombies[rng.gen_range(0..book.zombies.len())];
    let size = Vec2::new(
        rng.gen_range(tuning.min_size..=tuning.max_size),
        rng.gen_range(tuning.min_size..=tuning.max_size),
    );
    Character::new(
        base.scaled_to(size),
        position,
        tuning.health,
        0.0,
        tuning.speed,
        MovementPolicy::PursueTarget,
    )
    .with_score(tuning.score)
}

pub fn spawn_boss(book: &SpriteBook, config: &GameConfig, position: Vec2) -> Character {
    let tuning = &config.boss;
    Character::new(
        book.boss,
        position,
        tuning.health,
        0.0,
        tuning.speed,
        MovementPolicy::PursueAndShoot(Gunner {
            attack_timer: 0.0,
            attack_interval: tuning.attack_interval,
        }),
    )
    .with_score(tuning.score)
}

/// A point `radius` away from `center` in a uniformly random direction.
pub fn ring_point(center: Vec2, radius: f32, rng: &mut impl Rng) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    center + Vec2::new(angle.cos(), -angle.sin()) * radius
}

// ── Timers ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SpawnTimer {
    elapsed: f32,
    interval: f32,
}

impl SpawnTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            elapsed: 0.0,
            interval,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Accumulate `dt`; true (and reset) once the interval is exceeded.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed > self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}

/// New arrivals from one spawner tick.
#[derive(Debug, Default)]
pub struct Arrivals {
    pub enemies: Vec<Character>,
    pub bosses: Vec<Character>,
}

#[derive(Clone, Debug)]
pub struct Spawner {
    pub enemy: SpawnTimer,
    pub boss: SpawnTimer,
    radius: f32,
}

impl Spawner {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            enemy: SpawnTimer::new(config.spawn.enemy_interval),
            boss: SpawnTimer::new(config.spawn.boss_interval),
            radius: config.spawn.ring_radius,
        }
    }

    /// Advance both timers and place whatever is due on the ring around
    /// the camera centre.
    pub fn tick(
        &mut self,
        dt: f32,
        camera_center: Vec2,
        book: &SpriteBook,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Arrivals {
        let mut arrivals = Arrivals::default();
        if self.enemy.tick(dt) {
            let at = ring_point(camera_center, self.radius, rng);
            log::debug!("enemy spawned at {at:?}");
            arrivals.enemies.push(spawn_enemy(book, config, at, rng));
        }
        if self.boss.tick(dt) {
            let at = ring_point(camera_center, self.radius, rng);
            log::debug!("boss spawned at {at:?}");
            arrivals.bosses.push(spawn_boss(book, config, at));
        }
        arrivals
    }
}

// ── Difficulty ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DifficultyTier {
    Opening,
    /// Faster fire.
    Rapid,
    /// Faster fire, spread shot.
    Spread,
}

impl DifficultyTier {
    pub fn for_score(score: u32, tuning: &DifficultyTuning) -> Self {
        if score >= tuning.spread_score {
            DifficultyTier::Spread
        } else if score >= tuning.rapid_score {
            DifficultyTier::Rapid
        } else {
            DifficultyTier::Opening
        }
    }

    /// Opening leaves the player's starting cadence untouched.
    pub fn apply(self, player: &mut Player, tuning: &DifficultyTuning) {
        match self {
            DifficultyTier::Opening => {}
            DifficultyTier::Rapid => {
                player.attack_interval = tuning.rapid_interval;
            }
            DifficultyTier::Spread => {
                player.attack_interval = tuning.rapid_interval;
                player.attack_count = tuning.spread_count;
            }
        }
    }
}
