//! The one movement system, applied to every character by policy.

use std::collections::HashSet;

use glam::Vec2;

use crate::config::ProjectileTuning;
use crate::entities::{Character, MovementPolicy, Projectile};
use crate::geometry::{distance, orientation, Direction8};
use crate::platform::{MoveKey, Sprite};

/// Everything a character may react to while moving this frame.
pub struct MoveContext<'a> {
    pub dt: f32,
    /// World position pursuers home in on.
    pub target: Vec2,
    pub pressed: &'a HashSet<MoveKey>,
    /// Pursuers hold position (and hold fire) this close to the target.
    pub stop_distance: f32,
    pub flame: &'a ProjectileTuning,
    pub flame_sprite: Sprite,
}

/// Sum of the pressed keys' steps; diagonals are not normalised.
pub fn steer(pressed: &HashSet<MoveKey>) -> (i32, i32) {
    pressed.iter().fold((0, 0), |(x, y), key| {
        let (dx, dy) = key.step();
        (x + dx, y + dy)
    })
}

/// Tick the character's timers, then move it according to its policy.
/// Returns a projectile when a shooting policy fires this frame.
pub fn advance(body: &mut Character, ctx: &MoveContext) -> Option<Projectile> {
    body.tick(ctx.dt);
    match &mut body.policy {
        MovementPolicy::PlayerControlled(steering) => {
            let (dx, dy) = steer(ctx.pressed);
            body.position += Vec2::new(dx as f32, dy as f32) * body.speed * ctx.dt;
            if let Some(dir) = Direction8::from_steps(dx, dy) {
                steering.facing = dir;
                let sprite = steering.sprites[dir.index()];
                body.layers.set(sprite, 0, None);
            }
            None
        }
        MovementPolicy::PursueTarget => {
            pursue(body, ctx);
            None
        }
        MovementPolicy::PursueAndShoot(gunner) => {
            gunner.attack_timer += ctx.dt;
            let ready = gunner.attack_timer > gunner.attack_interval;
            if ready {
                gunner.attack_timer = 0.0;
            }
            let shot = if ready && distance(body.position, ctx.target) >= ctx.stop_distance {
                let height = body.rect().height();
                let muzzle = body.position + Vec2::new(0.0, height / 2.0);
                let heading = orientation(body.position, ctx.target);
                Some(Projectile::flame(muzzle, heading, ctx.flame, ctx.flame_sprite))
            } else {
                None
            };
            pursue(body, ctx);
            shot
        }
    }
}

fn pursue(body: &mut Character, ctx: &MoveContext) {
    if distance(body.position, ctx.target) < ctx.stop_distance {
        return;
    }
    body.position += orientation(body.position, ctx.target) * body.speed * ctx.dt;
}
