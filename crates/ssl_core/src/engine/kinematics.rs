//! Kinematic body contract
//!
//! Shared state access for robots and the ball plus the integration helpers both
//! use: exponential friction decay, direction-preserving speed clamps and elastic
//! wall reflection.
//!
//! Decay is dt-invariant: a rate `k` (1/s) becomes the per-step multiplier
//! `exp(-k * dt)`, so two half steps decay exactly as much as one full step.

use serde::{Deserialize, Serialize};

use super::geometry::Vec2;

/// Linear state every simulated body exposes.
pub trait Body {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
    fn mass(&self) -> f32;
    fn max_speed(&self) -> f32;

    fn speed(&self) -> f32 {
        self.velocity().norm()
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        let dv = impulse / self.mass();
        self.set_velocity(self.velocity() + dv);
    }
}

/// Per-step velocity multiplier for a decay rate (1/s).
#[inline]
pub fn decay_factor(rate: f32, dt: f32) -> f32 {
    (-rate * dt).exp()
}

/// Rescale `velocity` to `max_speed` along its current direction of travel.
pub fn clamp_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    if velocity.norm() > max_speed {
        let travel = velocity.y.atan2(velocity.x);
        Vec2::new(max_speed * travel.cos(), max_speed * travel.sin())
    } else {
        velocity
    }
}

/// Explicit Euler position step followed by friction decay.
///
/// Returns `(position, velocity)` after `dt`.
pub fn integrate_linear(position: Vec2, velocity: Vec2, decay_rate: f32, dt: f32) -> (Vec2, Vec2) {
    let new_position = position + velocity * dt;
    let new_velocity = velocity * decay_factor(decay_rate, dt);
    (new_position, new_velocity)
}

/// Axis-aligned box the walls enclose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WallBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Clamp a body back inside the walls, negating the velocity component of every
/// axis it crossed.
pub fn reflect_off_walls<B: Body + ?Sized>(body: &mut B, bounds: &WallBounds) {
    let mut position = body.position();
    let mut velocity = body.velocity();

    for axis in 0..2 {
        if position[axis] < bounds.min[axis] {
            position[axis] = bounds.min[axis];
            velocity[axis] = -velocity[axis];
        } else if position[axis] > bounds.max[axis] {
            position[axis] = bounds.max[axis];
            velocity[axis] = -velocity[axis];
        }
    }

    body.set_position(position);
    body.set_velocity(velocity);
}
