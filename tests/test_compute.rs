mod common;

use glam::Vec2;

use survival_shooter::compute::*;
use survival_shooter::entities::*;
use survival_shooter::geometry::Direction8;
use survival_shooter::platform::{MoveKey, Silent, Sound, SpriteId};
use survival_shooter::spawner::{spawn_boss, spawn_enemy, DifficultyTier};

use common::*;

/// Step once with no keys held and the pointer right of centre.
fn step_idle(state: &mut GameState, dt: f32) -> (GamePhase, RecordingSurface, RecordingAudio) {
    let mut surface = RecordingSurface::default();
    let mut audio = RecordingAudio::default();
    let phase = step(state, &idle_input(), dt, &mut seeded_rng(), &mut surface, &mut audio);
    (phase, surface, audio)
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_starts_player_at_origin_under_camera() {
    let s = make_state();
    assert_eq!(s.player.body.position, Vec2::ZERO);
    assert_eq!(s.camera.center, Vec2::ZERO);
    assert_eq!(s.player.body.health, 50);
    assert_eq!(s.phase, GamePhase::Playing);
    assert_eq!(s.tier, DifficultyTier::Opening);
}

#[test]
fn init_state_empty_groups() {
    let s = make_state();
    assert!(s.enemies.is_empty());
    assert!(s.bosses.is_empty());
    assert!(s.bullets.is_empty());
    assert!(s.flames.is_empty());
    assert_eq!(s.score.value(), 0);
    assert_eq!(s.frame, 0);
}

// ── Phase transitions ─────────────────────────────────────────────────────────

#[test]
fn surviving_the_clock_clears_the_game_on_that_frame() {
    let mut s = make_state();
    s.survival_time = 60.0;
    let (phase, surface, audio) = step_idle(&mut s, 0.02);
    assert_eq!(phase, GamePhase::GameClear);
    assert_eq!(s.phase, GamePhase::GameClear);
    assert!(surface.has_text("Game Clear"));
    assert_eq!(s.player.body.sprite().map(|sp| sp.id), Some(SpriteId::PlayerCleared));
    assert_eq!(audio.count(Sound::GameClear), 1);
}

#[test]
fn crossing_the_clock_inside_a_step_clears_the_game() {
    let mut s = make_state();
    s.survival_time = 59.99;
    let (phase, surface, _) = step_idle(&mut s, 0.02);
    assert_eq!(phase, GamePhase::GameClear);
    assert!(approx(s.survival_time, 60.01));
    assert!(surface.has_text("Game Clear"));
}

#[test]
fn just_short_of_the_clock_keeps_playing() {
    let mut s = make_state();
    s.survival_time = 59.97;
    let (phase, _, _) = step_idle(&mut s, 0.02);
    assert_eq!(phase, GamePhase::Playing);
    assert!(approx(s.survival_time, 59.99));
}

#[test]
fn surviving_player_is_not_hurt_on_the_winning_frame() {
    let mut s = make_state();
    s.survival_time = 59.99;
    s.player.body.health = 10;
    s.player.body.invincible_timer = 0.01;
    s.enemies
        .push(spawn_enemy(&s.book, &s.config, Vec2::new(10.0, 0.0), &mut seeded_rng()));

    let (phase, _, _) = step_idle(&mut s, 0.02);
    assert_eq!(phase, GamePhase::GameClear);
    assert_eq!(s.player.body.health, 10);
}

#[test]
fn zero_health_ends_the_game_but_keeps_the_player() {
    let mut s = make_state();
    s.player.body.health = 0;
    let (phase, surface, audio) = step_idle(&mut s, 0.02);
    assert_eq!(phase, GamePhase::GameOver);
    assert!(surface.has_text("Game Over"));
    assert_eq!(surface.blits_of(SpriteId::PlayerDown).len(), 1);
    assert_eq!(audio.count(Sound::GameOver), 1);
}

#[test]
fn losing_beats_winning_on_the_same_frame() {
    let mut s = make_state();
    s.player.body.health = -10;
    s.survival_time = 61.0;
    let (phase, _, _) = step_idle(&mut s, 0.02);
    assert_eq!(phase, GamePhase::GameOver);
}

#[test]
fn terminal_frame_runs_no_simulation() {
    let mut s = make_state();
    s.survival_time = 60.0;
    let before = s.player.body.position;
    let mut surface = RecordingSurface::default();
    let phase = step(
        &mut s,
        &holding(&[MoveKey::D]),
        0.5,
        &mut seeded_rng(),
        &mut surface,
        &mut RecordingAudio::default(),
    );
    assert_eq!(phase, GamePhase::GameClear);
    assert_eq!(s.player.body.position, before);
    assert!(s.bullets.is_empty());
    assert!(s.enemies.is_empty());
    assert_eq!(s.attack_clock, 0.0);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "stepped a finished session")]
fn stepping_after_the_end_is_a_bug() {
    let mut s = make_state();
    s.player.body.health = 0;
    step_idle(&mut s, 0.02);
    step_idle(&mut s, 0.02);
}

// ── Player movement & camera ──────────────────────────────────────────────────

#[test]
fn diagonal_movement_is_not_normalised() {
    let mut s = make_state();
    let mut surface = RecordingSurface::default();
    step(
        &mut s,
        &holding(&[MoveKey::W, MoveKey::D]),
        0.1,
        &mut seeded_rng(),
        &mut surface,
        &mut RecordingAudio::default(),
    );
    assert!(approx(s.player.body.position.x, 50.0));
    assert!(approx(s.player.body.position.y, -50.0));
    assert_eq!(s.player.facing(), Direction8::UpRight);
    assert_eq!(
        s.player.body.sprite().map(|sp| sp.id),
        Some(SpriteId::Player(Direction8::UpRight))
    );
}

#[test]
fn opposite_keys_cancel_and_keep_facing() {
    let mut s = make_state();
    step(
        &mut s,
        &holding(&[MoveKey::A, MoveKey::D]),
        0.1,
        &mut seeded_rng(),
        &mut RecordingSurface::default(),
        &mut Silent,
    );
    assert_eq!(s.player.body.position, Vec2::ZERO);
    assert_eq!(s.player.facing(), Direction8::Right);
}

#[test]
fn camera_follows_player_after_moving() {
    let mut s = make_state();
    for _ in 0..5 {
        step(
            &mut s,
            &holding(&[MoveKey::S]),
            0.02,
            &mut seeded_rng(),
            &mut RecordingSurface::default(),
            &mut RecordingAudio::default(),
        );
        assert_eq!(s.camera.center, s.player.body.position);
    }
    assert!(approx(s.player.body.position.y, 50.0));
}

#[test]
fn player_is_drawn_at_viewport_centre() {
    let mut s = make_state();
    let (_, surface, _) = step_idle(&mut s, 0.02);
    let rects = surface.blits_of(SpriteId::Player(Direction8::Right));
    assert_eq!(rects.len(), 1);
    assert_eq!(rects[0].center, VIEWPORT / 2.0);
}

// ── Attacks ───────────────────────────────────────────────────────────────────

#[test]
fn player_fires_at_pointer_once_interval_passes() {
    let mut s = make_state();
    s.attack_clock = 0.25;
    let (_, _, audio) = step_idle(&mut s, 0.01);
    assert_eq!(s.bullets.len(), 1);
    let bullet = &s.bullets[0];
    assert!(approx(bullet.velocity.x, 1000.0));
    assert!(approx(bullet.velocity.y, 0.0));
    assert!(approx(bullet.position.x, 10.0)); // already flew one tick
    assert_eq!(audio.count(Sound::Shot), 1);
    assert!(approx(s.attack_clock, 0.01));
}

#[test]
fn no_fire_before_interval() {
    let mut s = make_state();
    let (_, _, audio) = step_idle(&mut s, 0.01);
    assert!(s.bullets.is_empty());
    assert_eq!(audio.count(Sound::Shot), 0);
}

#[test]
fn pointer_on_player_fires_along_facing() {
    let mut s = make_state();
    s.attack_clock = 1.0;
    let mut input = idle_input();
    input.pointer = VIEWPORT / 2.0;
    step(
        &mut s,
        &input,
        0.01,
        &mut seeded_rng(),
        &mut RecordingSurface::default(),
        &mut RecordingAudio::default(),
    );
    assert_eq!(s.bullets.len(), 1);
    assert!(s.bullets[0].velocity.x > 0.0);
}

#[test]
fn spread_tier_fires_three_bullets() {
    let mut s = make_state();
    s.score.add(1500);
    s.attack_clock = 1.0;
    step_idle(&mut s, 0.01);
    assert_eq!(s.tier, DifficultyTier::Spread);
    assert_eq!(s.player.attack_count, 3);
    assert!(approx(s.player.attack_interval, 0.1));
    assert_eq!(s.bullets.len(), 3);
}

#[test]
fn boss_fires_flame_at_player_when_ready() {
    let mut s = make_state();
    let mut boss = spawn_boss(&s.book, &s.config, Vec2::new(500.0, 0.0));
    if let MovementPolicy::PursueAndShoot(gunner) = &mut boss.policy {
        gunner.attack_timer = 0.99;
    }
    s.bosses.push(boss);
    step_idle(&mut s, 0.02);
    assert_eq!(s.flames.len(), 1);
    let flame = &s.flames[0];
    assert!(flame.velocity.x < 0.0);
    assert_eq!(flame.target, TargetGroup::Player);
    // launched from the bottom edge of the 120-unit boss
    assert!(flame.position.y > 50.0);
}

// ── Collisions & score ────────────────────────────────────────────────────────

#[test]
fn bullet_kill_scores_enemy_value() {
    let mut s = make_state();
    let mut enemy = spawn_enemy(&s.book, &s.config, Vec2::new(400.0, 0.0), &mut seeded_rng());
    enemy.health = 10;
    s.enemies.push(enemy);
    let tuning = s.config.bullet.clone();
    s.bullets
        .push(Projectile::bullet(Vec2::new(390.0, 0.0), Vec2::X, &tuning, s.book.bullet));

    let (_, _, audio) = step_idle(&mut s, 0.01);
    assert_eq!(s.score.value(), 30);
    assert!(s.enemies.is_empty());
    assert!(s.bullets.is_empty());
    assert_eq!(audio.count(Sound::EnemyDown), 1);
}

#[test]
fn wounding_hit_scores_nothing() {
    let mut s = make_state();
    s.enemies
        .push(spawn_enemy(&s.book, &s.config, Vec2::new(400.0, 0.0), &mut seeded_rng()));
    let tuning = s.config.bullet.clone();
    s.bullets
        .push(Projectile::bullet(Vec2::new(390.0, 0.0), Vec2::X, &tuning, s.book.bullet));

    step_idle(&mut s, 0.01);
    assert_eq!(s.score.value(), 0);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.enemies[0].health, 10);
}

#[test]
fn boss_kill_scores_boss_value() {
    let mut s = make_state();
    let mut boss = spawn_boss(&s.book, &s.config, Vec2::new(-400.0, 0.0));
    boss.health = 10;
    s.bosses.push(boss);
    let tuning = s.config.bullet.clone();
    s.bullets
        .push(Projectile::bullet(Vec2::new(-400.0, 0.0), Vec2::X, &tuning, s.book.bullet));

    step_idle(&mut s, 0.01);
    assert_eq!(s.score.value(), 40);
    assert!(s.bosses.is_empty());
}

#[test]
fn enemy_contact_hurts_once_per_invincibility_window() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.enemies.push(spawn_enemy(&s.book, &s.config, Vec2::new(10.0, 0.0), &mut rng));
    s.enemies.push(spawn_enemy(&s.book, &s.config, Vec2::new(-10.0, 0.0), &mut rng));

    let (_, _, audio) = step_idle(&mut s, 0.02);
    assert_eq!(s.player.body.health, 40);
    assert_eq!(audio.count(Sound::PlayerHurt), 1);

    step_idle(&mut s, 0.02);
    assert_eq!(s.player.body.health, 40);
}

#[test]
fn flame_hit_hurts_player() {
    let mut s = make_state();
    let tuning = s.config.flame.clone();
    s.flames
        .push(Projectile::flame(Vec2::new(30.0, 0.0), -Vec2::X, &tuning, s.book.flame));
    let (_, _, audio) = step_idle(&mut s, 0.02);
    assert_eq!(s.player.body.health, 40);
    assert!(s.flames.is_empty());
    assert_eq!(audio.count(Sound::PlayerHurt), 1);
}

#[test]
fn flame_and_bullet_cancel_out() {
    let mut s = make_state();
    let bullet = s.config.bullet.clone();
    let flame = s.config.flame.clone();
    s.flames
        .push(Projectile::flame(Vec2::new(600.0, 0.0), -Vec2::X, &flame, s.book.flame));
    s.bullets
        .push(Projectile::bullet(Vec2::new(600.0, 0.0), Vec2::X, &bullet, s.book.bullet));
    step_idle(&mut s, 0.01);
    assert!(s.flames.is_empty());
    assert!(s.bullets.is_empty());
    assert_eq!(s.player.body.health, 50);
}

#[test]
fn bullets_pass_over_the_player() {
    let mut s = make_state();
    let tuning = s.config.bullet.clone();
    s.bullets
        .push(Projectile::bullet(Vec2::ZERO, Vec2::X, &tuning, s.book.bullet));
    let (_, _, audio) = step_idle(&mut s, 0.01);
    assert_eq!(s.player.body.health, 50);
    assert_eq!(s.bullets.len(), 1);
    assert_eq!(audio.count(Sound::PlayerHurt), 0);
}

#[test]
fn flames_pass_over_enemies() {
    let mut s = make_state();
    s.enemies
        .push(spawn_enemy(&s.book, &s.config, Vec2::new(400.0, 0.0), &mut seeded_rng()));
    let tuning = s.config.flame.clone();
    s.flames
        .push(Projectile::flame(Vec2::new(400.0, 0.0), -Vec2::X, &tuning, s.book.flame));
    step_idle(&mut s, 0.01);
    assert_eq!(s.enemies[0].health, 20);
    assert_eq!(s.flames.len(), 1);
    assert_eq!(s.score.value(), 0);
}

// ── Spawning through the loop ─────────────────────────────────────────────────

#[test]
fn enemies_arrive_on_the_ring_and_close_in() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let mut surface = RecordingSurface::default();
    let mut audio = RecordingAudio::default();
    for _ in 0..30 {
        step(&mut s, &idle_input(), 0.02, &mut rng, &mut surface, &mut audio);
    }
    // 0.6 s in: one enemy, spawned half a second in, a few steps closer
    assert_eq!(s.enemies.len(), 1);
    let d = s.enemies[0].position.distance(s.player.body.position);
    assert!(d < 1000.0 && d > 980.0, "enemy {d} away");
}

#[test]
fn same_seed_same_session() {
    let run = || {
        let mut s = make_state();
        let mut rng = seeded_rng();
        for i in 0..400 {
            let input = if i % 50 < 25 {
                holding(&[MoveKey::W])
            } else {
                holding(&[MoveKey::A, MoveKey::S])
            };
            let phase = step(
                &mut s,
                &input,
                0.02,
                &mut rng,
                &mut RecordingSurface::default(),
                &mut RecordingAudio::default(),
            );
            if phase.is_terminal() {
                break;
            }
        }
        let positions: Vec<Vec2> = s.enemies.iter().map(|e| e.position).collect();
        (s.score.value(), s.player.body.health, positions)
    };
    assert_eq!(run(), run());
}

// ── Drawing ───────────────────────────────────────────────────────────────────

fn first_blit(surface: &RecordingSurface, pred: impl Fn(SpriteId) -> bool) -> usize {
    surface
        .blits
        .iter()
        .position(|(id, _)| pred(*id))
        .expect("drawn")
}

#[test]
fn hud_shows_countdown_and_score() {
    let mut s = make_state();
    s.survival_time = 12.5;
    s.score.add(90);
    let (_, surface, _) = step_idle(&mut s, 0.02);
    assert!(surface.has_text("47"));
    assert!(surface.has_text("Score: 90"));
}

#[test]
fn draw_order_is_back_to_front() {
    let mut s = make_state();
    s.enemies
        .push(spawn_enemy(&s.book, &s.config, Vec2::new(400.0, 300.0), &mut seeded_rng()));
    s.bosses.push(spawn_boss(&s.book, &s.config, Vec2::new(-400.0, 300.0)));
    let (_, surface, _) = step_idle(&mut s, 0.02);

    let floor = first_blit(&surface, |id| id == SpriteId::Background);
    let player = first_blit(&surface, |id| matches!(id, SpriteId::Player(_)));
    let enemy = first_blit(&surface, |id| matches!(id, SpriteId::Zombie(_)));
    let boss = first_blit(&surface, |id| id == SpriteId::Boss);
    assert!(floor < player && player < enemy && enemy < boss);
}
