//! Frame orchestration.
//!
//! `GameState` owns every group, the camera, the score and the timers.
//! `step` advances it by one frame of `dt` seconds in a fixed order and
//! reports the phase the session is in afterwards.  Once a terminal phase
//! is returned the caller stops stepping.

use std::iter;

use glam::Vec2;
use rand::Rng;

use crate::camera::{BackgroundTile, Camera, CameraSpaceRenderGroup};
use crate::config::GameConfig;
use crate::entities::{
    Character, DamageOutcome, GamePhase, Player, Projectile, Score, SpriteBook, TargetGroup,
};
use crate::geometry::{distance, orientation};
use crate::movement::{advance, MoveContext};
use crate::platform::{
    Assets, AudioSink, InputSnapshot, InputSource, Sound, Surface, TextSize, TextStyle, Tint,
};
use crate::projectile::{annihilate, spread_attack};
use crate::spawner::{spawn_player, DifficultyTier, Spawner};

/// Below this separation the pointer gives no usable heading and the
/// player fires along its facing instead.
pub const MIN_AIM_DISTANCE: f32 = 1.0;

pub struct GameState {
    pub config: GameConfig,
    pub book: SpriteBook,
    pub camera: Camera,
    pub background: Vec<BackgroundTile>,
    pub player: Player,
    pub enemies: Vec<Character>,
    pub bosses: Vec<Character>,
    /// Player projectiles.
    pub bullets: Vec<Projectile>,
    /// Boss attacks.
    pub flames: Vec<Projectile>,
    pub score: Score,
    pub spawner: Spawner,
    pub tier: DifficultyTier,
    pub phase: GamePhase,
    /// Seconds survived so far.
    pub survival_time: f32,
    /// Seconds since the player last fired.
    pub attack_clock: f32,
    pub frame: u64,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the opening state: player at the world origin, camera on the
/// player, nothing else alive yet.
pub fn init_state(config: GameConfig, assets: &impl Assets, viewport: Vec2) -> GameState {
    let book = SpriteBook::load(assets, &config);
    let player = spawn_player(&book, &config, Vec2::ZERO);
    let camera = Camera::new(player.body.position, viewport);
    GameState {
        background: BackgroundTile::grid(book.background),
        spawner: Spawner::new(&config),
        camera,
        player,
        enemies: Vec::new(),
        bosses: Vec::new(),
        bullets: Vec::new(),
        flames: Vec::new(),
        score: Score::default(),
        tier: DifficultyTier::Opening,
        phase: GamePhase::Playing,
        survival_time: 0.0,
        attack_clock: 0.0,
        frame: 0,
        book,
        config,
    }
}

// ── Per-frame step ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame and draw it.
///
/// All randomness comes through `rng` so tests can seed it.  Must not be
/// called once a terminal phase has been returned.
pub fn step(
    state: &mut GameState,
    input: &impl InputSource,
    dt: f32,
    rng: &mut impl Rng,
    surface: &mut impl Surface,
    audio: &mut impl AudioSink,
) -> GamePhase {
    debug_assert!(!state.phase.is_terminal(), "stepped a finished session");
    if state.phase.is_terminal() {
        return state.phase;
    }
    state.frame += 1;
    log::trace!("step: dt={:.4}s frame={}", dt, state.frame);
    let input = InputSnapshot::capture(input);

    update_difficulty(state);
    spawn(state, dt, rng);
    resolve_collisions(state, audio);
    for tile in &mut state.background {
        tile.follow(&state.camera);
    }

    state.survival_time += dt;
    if let Some(phase) = outcome(state) {
        finish(state, phase, dt, surface, audio);
        return phase;
    }

    move_player(state, &input, dt);
    state.camera.center = state.player.body.position;
    fire(state, &input, audio);
    tick_groups(state, &input, dt, audio);
    draw(state, surface);

    state.attack_clock += dt;
    state.phase
}

fn update_difficulty(state: &mut GameState) {
    let tier = DifficultyTier::for_score(state.score.value(), &state.config.difficulty);
    if tier != state.tier {
        log::info!("difficulty {:?} -> {:?} at score {}", state.tier, tier, state.score.value());
        state.tier = tier;
    }
    tier.apply(&mut state.player, &state.config.difficulty);
}

fn spawn(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    let arrivals = state
        .spawner
        .tick(dt, state.camera.center, &state.book, &state.config, rng);
    state.enemies.extend(arrivals.enemies);
    state.bosses.extend(arrivals.bosses);
}

/// Collision passes run before anything moves this frame.
fn resolve_collisions(state: &mut GameState, audio: &mut impl AudioSink) {
    // boss attacks and player projectiles cancel each other out
    annihilate(&mut state.flames, &mut state.bullets);

    // touching an enemy hurts; invincibility absorbs repeats
    let player_rect = state.player.body.rect();
    let touching = state
        .enemies
        .iter()
        .filter(|e| e.is_alive() && e.rect().overlaps(&player_rect))
        .count();
    for _ in 0..touching {
        let outcome = state.player.body.apply_damage(state.config.contact_damage);
        if outcome != DamageOutcome::Ignored {
            log::debug!("player hit by contact, health {}", state.player.body.health);
            audio.play(Sound::PlayerHurt);
        }
    }

    for bullet in &mut state.bullets {
        if let Some(hit) = bullet.strike(state.bosses.iter_mut(), &mut state.score) {
            if hit.awarded.is_some() {
                audio.play(Sound::EnemyDown);
            }
        }
    }
    purge(state);
}

fn outcome(state: &GameState) -> Option<GamePhase> {
    if state.player.body.health <= 0 {
        Some(GamePhase::GameOver)
    } else if state.survival_time >= state.config.session.survival_secs {
        Some(GamePhase::GameClear)
    } else {
        None
    }
}

/// Enter a terminal phase: overlay, one last player frame, no more ticks.
/// The player stays in place; losing is a phase change, not a removal.
fn finish(
    state: &mut GameState,
    phase: GamePhase,
    dt: f32,
    surface: &mut impl Surface,
    audio: &mut impl AudioSink,
) {
    state.phase = phase;
    log::info!(
        "session ended: {:?} after {:.1}s with score {}",
        phase,
        state.survival_time,
        state.score.value()
    );
    let (banner, tint, sprite, sound) = match phase {
        GamePhase::GameOver => ("Game Over", Tint::Red, state.book.player_down, Sound::GameOver),
        _ => ("Game Clear", Tint::Green, state.book.player_cleared, Sound::GameClear),
    };

    let session = &state.config.session;
    state
        .player
        .body
        .set_image(sprite, session.overlay_priority, Some(session.overlay_secs));
    state.player.body.tick(dt);

    let group = CameraSpaceRenderGroup::new(&state.camera);
    group.draw(&state.background, surface);
    let center = surface.size() / 2.0;
    surface.draw_text(
        banner,
        center,
        TextStyle {
            tint,
            size: TextSize::Banner,
        },
    );
    group.draw(iter::once(&state.player.body), surface);
    audio.play(sound);
}

fn move_player(state: &mut GameState, input: &InputSnapshot, dt: f32) {
    let ctx = MoveContext {
        dt,
        target: state.player.body.position,
        pressed: &input.pressed,
        stop_distance: state.config.pursuit_stop_distance,
        flame: &state.config.flame,
        flame_sprite: state.book.flame,
    };
    advance(&mut state.player.body, &ctx);
}

/// Fire at the pointer once the attack interval has passed.
fn fire(state: &mut GameState, input: &InputSnapshot, audio: &mut impl AudioSink) {
    if state.attack_clock <= state.player.attack_interval {
        return;
    }
    state.attack_clock = 0.0;

    let origin = state.player.body.position;
    let aim = state.camera.to_world(input.pointer);
    let heading = if distance(origin, aim) < MIN_AIM_DISTANCE {
        state.player.facing().unit()
    } else {
        orientation(origin, aim)
    };

    let tuning = &state.config.bullet;
    let sprite = state.book.bullet;
    if state.player.attack_count > 1 {
        state.bullets.extend(spread_attack(
            origin,
            heading.y.atan2(heading.x),
            state.config.difficulty.spread_arc_degrees,
            state.player.attack_count,
            tuning,
            sprite,
        ));
    } else {
        state.bullets.push(Projectile::bullet(origin, heading, tuning, sprite));
    }
    audio.play(Sound::Shot);
}

fn tick_groups(state: &mut GameState, input: &InputSnapshot, dt: f32, audio: &mut impl AudioSink) {
    let ctx = MoveContext {
        dt,
        target: state.player.body.position,
        pressed: &input.pressed,
        stop_distance: state.config.pursuit_stop_distance,
        flame: &state.config.flame,
        flame_sprite: state.book.flame,
    };
    for enemy in &mut state.enemies {
        advance(enemy, &ctx);
    }
    for boss in &mut state.bosses {
        if let Some(flame) = advance(boss, &ctx) {
            state.flames.push(flame);
        }
    }

    for group in [&mut state.bullets, &mut state.flames] {
        fly_group(
            group,
            dt,
            &mut state.enemies,
            &mut state.bosses,
            &mut state.player.body,
            &mut state.score,
            audio,
        );
    }
    purge(state);
}

/// Fly every projectile in `group` and resolve hits against its target group.
fn fly_group(
    group: &mut [Projectile],
    dt: f32,
    enemies: &mut [Character],
    bosses: &mut [Character],
    player: &mut Character,
    score: &mut Score,
    audio: &mut impl AudioSink,
) {
    for projectile in group {
        match projectile.target {
            TargetGroup::Hostiles => {
                let targets = enemies.iter_mut().chain(bosses.iter_mut());
                let hit = projectile.tick(dt, targets, score);
                if matches!(hit, Some(h) if h.awarded.is_some()) {
                    audio.play(Sound::EnemyDown);
                }
            }
            TargetGroup::Player => {
                let hit = projectile.tick(dt, iter::once(&mut *player), score);
                if matches!(hit, Some(h) if h.outcome != DamageOutcome::Ignored) {
                    log::debug!("player hit by projectile, health {}", player.health);
                    audio.play(Sound::PlayerHurt);
                }
            }
        }
    }
}

fn purge(state: &mut GameState) {
    state.enemies.retain(Character::is_alive);
    state.bosses.retain(Character::is_alive);
    state.bullets.retain(|p| !p.is_spent());
    state.flames.retain(|p| !p.is_spent());
}

// ── Drawing ───────────────────────────────────────────────────────────────────

/// Back to front: floor, player, bullets, enemies, bosses, flames, HUD.
pub fn draw(state: &GameState, surface: &mut impl Surface) {
    let group = CameraSpaceRenderGroup::new(&state.camera);
    group.draw(&state.background, surface);
    group.draw(iter::once(&state.player.body), surface);
    group.draw(&state.bullets, surface);
    group.draw(&state.enemies, surface);
    group.draw(&state.bosses, surface);
    group.draw(&state.flames, surface);

    let remaining = (state.config.session.survival_secs - state.survival_time).max(0.0);
    surface.draw_text(
        &format!("{}", remaining as u32),
        Vec2::new(surface.width() / 2.0, 100.0),
        TextStyle {
            tint: Tint::Green,
            size: TextSize::Banner,
        },
    );
    surface.draw_text(
        &format!("Score: {}", state.score.value()),
        Vec2::new(100.0, surface.height() - 50.0),
        TextStyle {
            tint: Tint::Blue,
            size: TextSize::Normal,
        },
    );
}
