//! Particle entity: spawn, move, wall bounce

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A decorative point with position and per-step velocity (CSS px)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Particle {
    /// Random particle inside `bounds`
    pub fn spawn<R: Rng>(rng: &mut R, bounds: Vec2, speed_scale: f32) -> Self {
        let pos = Vec2::new(
            rng.random::<f32>() * bounds.x,
            rng.random::<f32>() * bounds.y,
        );
        let vel = Vec2::new(
            rng.random_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
            rng.random_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
        ) * speed_scale;
        Self {
            pos,
            vel,
            radius: rng.random_range(PARTICLE_MIN_RADIUS..PARTICLE_MAX_RADIUS),
        }
    }

    /// Advance one step and bounce off the walls
    pub fn step(&mut self, bounds: Vec2) {
        self.pos += self.vel;
        self.reflect(bounds);
    }

    /// Elastic wall bounce: mirror back inside, velocity points away from the wall
    pub fn reflect(&mut self, bounds: Vec2) {
        if self.pos.x < 0.0 {
            self.pos.x = -self.pos.x;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x > bounds.x {
            self.pos.x = 2.0 * bounds.x - self.pos.x;
            self.vel.x = -self.vel.x.abs();
        }
        if self.pos.y < 0.0 {
            self.pos.y = -self.pos.y;
            self.vel.y = self.vel.y.abs();
        } else if self.pos.y > bounds.y {
            self.pos.y = 2.0 * bounds.y - self.pos.y;
            self.vel.y = -self.vel.y.abs();
        }
        // A mirror can still overshoot on a tiny canvas or after a large nudge
        self.clamp_to(bounds);
    }

    pub fn clamp_to(&mut self, bounds: Vec2) {
        self.pos = self.pos.clamp(Vec2::ZERO, bounds.max(Vec2::ZERO));
    }

    pub fn in_bounds(&self, bounds: Vec2) -> bool {
        self.pos.x >= 0.0 && self.pos.y >= 0.0 && self.pos.x <= bounds.x && self.pos.y <= bounds.y
    }
}
