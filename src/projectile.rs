//! Projectile lifecycle and hit resolution.

use glam::Vec2;

use crate::config::ProjectileTuning;
use crate::entities::{Character, DamageOutcome, Projectile, Score, TargetGroup};
use crate::geometry::Rect;
use crate::platform::Sprite;

/// Result of a projectile landing on a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub outcome: DamageOutcome,
    /// Points credited to the score, if the hit finished off a score-bearer.
    pub awarded: Option<u32>,
}

impl Projectile {
    /// `direction` must be a unit vector.  Unless `fixed_orientation` is
    /// set the image is turned to face along the direction of travel.
    pub fn new(
        position: Vec2,
        direction: Vec2,
        tuning: &ProjectileTuning,
        sprite: Sprite,
        target: TargetGroup,
        fixed_orientation: bool,
    ) -> Self {
        let sprite = if fixed_orientation {
            sprite
        } else {
            // screen y grows downward, image angles grow counter-clockwise
            sprite.rotated((-direction.y).atan2(direction.x).to_degrees())
        };
        Self {
            position,
            velocity: direction * tuning.speed,
            damage: tuning.damage,
            age: 0.0,
            max_lifespan: tuning.lifespan,
            sprite,
            target,
            spent: false,
        }
    }

    pub fn bullet(origin: Vec2, direction: Vec2, tuning: &ProjectileTuning, sprite: Sprite) -> Self {
        Self::new(origin, direction, tuning, sprite, TargetGroup::Hostiles, false)
    }

    pub fn flame(origin: Vec2, direction: Vec2, tuning: &ProjectileTuning, sprite: Sprite) -> Self {
        Self::new(origin, direction, tuning, sprite, TargetGroup::Player, true)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.position, self.sprite.size)
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Move and age.  Expires once `age` passes `max_lifespan`.
    pub fn fly(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.age += dt;
        if self.age > self.max_lifespan {
            log::debug!("projectile expired at {:?} after {:.2}s", self.position, self.age);
            self.spent = true;
        }
    }

    /// Damage the first live target overlapping this projectile, then
    /// destroy the projectile.  At most one target is touched per call.
    pub fn strike<'a, I>(&mut self, targets: I, score: &mut Score) -> Option<Hit>
    where
        I: IntoIterator<Item = &'a mut Character>,
    {
        if self.spent {
            return None;
        }
        let rect = self.rect();
        let target = targets
            .into_iter()
            .find(|t| t.is_alive() && t.rect().overlaps(&rect))?;
        self.spent = true;
        let outcome = target.apply_damage(self.damage);
        let awarded = match (outcome, target.score_value) {
            (DamageOutcome::Killed, Some(points)) => {
                score.add(points);
                Some(points)
            }
            _ => None,
        };
        log::debug!("projectile hit {:?} at {:?}: {:?}", self.target, target.position, outcome);
        Some(Hit { outcome, awarded })
    }

    pub fn tick<'a, I>(&mut self, dt: f32, targets: I, score: &mut Score) -> Option<Hit>
    where
        I: IntoIterator<Item = &'a mut Character>,
    {
        self.fly(dt);
        self.strike(targets, score)
    }
}

/// Headings (radians) for `count` shots spread evenly over `arc_degrees`
/// centred on `target_angle`.  A single shot goes straight at the target.
pub fn spread_angles(target_angle: f32, arc_degrees: f32, count: u32) -> Vec<f32> {
    if count <= 1 {
        return vec![target_angle; count as usize];
    }
    let arc = arc_degrees.to_radians();
    let step = arc / (count - 1) as f32;
    (0..count)
        .map(|i| target_angle - arc / 2.0 + step * i as f32)
        .collect()
}

pub fn spread_attack(
    origin: Vec2,
    target_angle: f32,
    arc_degrees: f32,
    count: u32,
    tuning: &ProjectileTuning,
    sprite: Sprite,
) -> Vec<Projectile> {
    spread_angles(target_angle, arc_degrees, count)
        .into_iter()
        .map(|angle| Projectile::bullet(origin, Vec2::new(angle.cos(), angle.sin()), tuning, sprite))
        .collect()
}

/// Destroy every pair of overlapping projectiles across the two groups.
/// Returns how many members of `a` were destroyed.
pub fn annihilate(a: &mut [Projectile], b: &mut [Projectile]) -> usize {
    let mut destroyed = 0;
    for pa in a.iter_mut().filter(|p| !p.spent) {
        let rect = pa.rect();
        let mut touched = false;
        for pb in b.iter_mut().filter(|p| !p.spent) {
            if pb.rect().overlaps(&rect) {
                pb.spent = true;
                touched = true;
            }
        }
        if touched {
            pa.spent = true;
            destroyed += 1;
        }
    }
    destroyed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spread_is_symmetric_around_target() {
        let angles = spread_angles(0.0, 30.0, 3);
        assert_eq!(angles.len(), 3);
        assert!((angles[0] + 15f32.to_radians()).abs() < 1e-6);
        assert!(angles[1].abs() < 1e-6);
        assert!((angles[2] - 15f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn even_spread_skips_centre() {
        let angles = spread_angles(1.0, 30.0, 2);
        assert!((angles[0] - (1.0 - 15f32.to_radians())).abs() < 1e-6);
        assert!((angles[1] - (1.0 + 15f32.to_radians())).abs() < 1e-6);
    }

    #[test]
    fn zero_count_spread_is_empty() {
        assert!(spread_angles(0.0, 30.0, 0).is_empty());
    }
}
