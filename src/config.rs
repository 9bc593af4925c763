//! Tuning tables.
//!
//! Every value has a default matching the shipped game; a RON file can
//! override any subset of them.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Deserializer};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub health: i32,
    pub invincible_secs: f32,
    pub speed: f32,
    pub attack_interval: f32,
    pub attack_count: u32,
    pub image_scale: f32,
    pub hurt_priority: i32,
    pub hurt_secs: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            health: 50,
            invincible_secs: 2.0,
            speed: 500.0,
            attack_interval: 0.2,
            attack_count: 1,
            image_scale: 1.2,
            hurt_priority: 5,
            hurt_secs: 2.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub health: i32,
    pub score: u32,
    pub speed: f32,
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            health: 20,
            score: 30,
            speed: 100.0,
            min_size: 90.0,
            max_size: 150.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub health: i32,
    pub score: u32,
    pub speed: f32,
    pub image_scale: f32,
    pub attack_interval: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            health: 50,
            score: 40,
            speed: 100.0,
            image_scale: 3.0,
            attack_interval: 1.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub speed: f32,
    pub damage: i32,
    pub lifespan: f32,
}

impl ProjectileTuning {
    fn bullet() -> Self {
        Self {
            speed: 1000.0,
            damage: 10,
            lifespan: 5.0,
        }
    }

    fn flame() -> Self {
        Self {
            speed: 500.0,
            damage: 10,
            lifespan: 4.0,
        }
    }
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self::bullet()
    }
}

/// The flame table as written in a config file: absent fields keep the
/// flame values, not the bullet ones.
#[derive(Deserialize)]
#[serde(default)]
struct FlameTable {
    speed: f32,
    damage: i32,
    lifespan: f32,
}

impl Default for FlameTable {
    fn default() -> Self {
        let ProjectileTuning {
            speed,
            damage,
            lifespan,
        } = ProjectileTuning::flame();
        Self {
            speed,
            damage,
            lifespan,
        }
    }
}

fn flame_table<'de, D>(deserializer: D) -> Result<ProjectileTuning, D::Error>
where
    D: Deserializer<'de>,
{
    let FlameTable {
        speed,
        damage,
        lifespan,
    } = FlameTable::deserialize(deserializer)?;
    Ok(ProjectileTuning {
        speed,
        damage,
        lifespan,
    })
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub enemy_interval: f32,
    pub boss_interval: f32,
    pub ring_radius: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            enemy_interval: 0.5,
            boss_interval: 3.0,
            ring_radius: 1000.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    pub rapid_score: u32,
    pub rapid_interval: f32,
    pub spread_score: u32,
    pub spread_count: u32,
    pub spread_arc_degrees: f32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            rapid_score: 500,
            rapid_interval: 0.1,
            spread_score: 1500,
            spread_count: 3,
            spread_arc_degrees: 30.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    pub survival_secs: f32,
    pub end_hold_secs: f32,
    pub frame_rate: u32,
    pub overlay_priority: i32,
    pub overlay_secs: f32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            survival_secs: 60.0,
            end_hold_secs: 2.0,
            frame_rate: 50,
            overlay_priority: 10,
            overlay_secs: 250.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub boss: BossTuning,
    pub bullet: ProjectileTuning,
    #[serde(deserialize_with = "flame_table")]
    pub flame: ProjectileTuning,
    pub spawn: SpawnTuning,
    pub difficulty: DifficultyTuning,
    pub session: SessionTuning,
    pub contact_damage: i32,
    /// Pursuers stop closing in (and bosses hold fire) inside this range.
    pub pursuit_stop_distance: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            boss: BossTuning::default(),
            bullet: ProjectileTuning::bullet(),
            flame: ProjectileTuning::flame(),
            spawn: SpawnTuning::default(),
            difficulty: DifficultyTuning::default(),
            session: SessionTuning::default(),
            contact_damage: 10,
            pursuit_stop_distance: 50.0,
        }
    }
}

impl GameConfig {
    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        ron::from_str(text).context("invalid game config")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_ron(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
