//! Burst particles for hit feedback: short-lived squares thrown out in a
//! circle, pulled down by gravity and pruned when their life runs out.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::{GRAVITY, PARTICLE_SHRINK, Z_PARTICLES};

#[derive(Component)]
pub struct Spark {
    vel: Vec2,
    life: i32,
    size: f32,
}

impl Spark {
    /// One physics frame: integrate velocity, apply gravity, age, shrink.
    fn step(&mut self, pos: &mut Vec2) {
        *pos += self.vel;
        self.vel.y -= GRAVITY;
        self.life -= 1;
        self.size *= PARTICLE_SHRINK;
    }

    fn expired(&self) -> bool {
        self.life <= 0
    }
}

pub fn spawn_burst(cmd: &mut Commands, at: Vec2, color: Color, count: usize) {
    let mut rng = rand::rng();
    for _ in 0..count {
        let angle = rng.random_range(0.0..TAU);
        let speed = rng.random_range(3.0..10.0);
        let size = rng.random_range(2..=6) as f32;
        cmd.spawn((
            Sprite::from_color(color, Vec2::splat(size)),
            Transform::from_xyz(at.x, at.y, Z_PARTICLES),
            Spark {
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: rng.random_range(30..=60),
                size,
            },
        ));
    }
}

pub fn update_sparks(
    mut cmd: Commands,
    mut sparks: Query<(Entity, &mut Spark, &mut Transform, &mut Sprite)>,
) {
    for (entity, mut spark, mut transform, mut sprite) in &mut sparks {
        let mut pos = transform.translation.truncate();
        spark.step(&mut pos);
        transform.translation.x = pos.x;
        transform.translation.y = pos.y;
        sprite.custom_size = Some(Vec2::splat(spark.size.floor()));

        if spark.expired() {
            cmd.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_integrates_position_and_gravity() {
        let mut spark = Spark {
            vel: Vec2::new(2.0, 5.0),
            life: 40,
            size: 4.0,
        };
        let mut pos = Vec2::ZERO;
        spark.step(&mut pos);

        assert_eq!(pos, Vec2::new(2.0, 5.0));
        assert_eq!(spark.vel, Vec2::new(2.0, 5.0 - GRAVITY));
        assert_eq!(spark.life, 39);
        assert!((spark.size - 4.0 * PARTICLE_SHRINK).abs() < 1e-6);
    }

    #[test]
    fn spark_expires_after_life_frames() {
        let mut spark = Spark {
            vel: Vec2::ZERO,
            life: 30,
            size: 2.0,
        };
        let mut pos = Vec2::ZERO;
        for _ in 0..29 {
            spark.step(&mut pos);
            assert!(!spark.expired());
        }
        spark.step(&mut pos);
        assert!(spark.expired());
    }

    #[test]
    fn size_shrinks_exponentially() {
        let mut spark = Spark {
            vel: Vec2::ZERO,
            life: 60,
            size: 6.0,
        };
        let mut pos = Vec2::ZERO;
        for _ in 0..60 {
            spark.step(&mut pos);
        }
        assert!((spark.size - 6.0 * PARTICLE_SHRINK.powi(60)).abs() < 1e-4);
    }
}
