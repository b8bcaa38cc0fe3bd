//! Robot dynamics
//!
//! 2D rigid body with heading and angular velocity. Contact handling happens in
//! the collision pass before [`Robot::update`]; the update itself does the rest
//! of the per-tick motion in a fixed order:
//!
//! 1. wall reflection (x and y independently)
//! 2. linear speed clamp (direction-preserving rescale)
//! 3. angular speed clamp (hard clamp)
//! 4. integrate position and heading
//! 5. friction decay of vx, vy and ω

use serde::{Deserialize, Serialize};

use super::geometry::{direction, normalize_angle, Vec2};
use super::kinematics::{clamp_speed, decay_factor, integrate_linear, reflect_off_walls, Body, WallBounds};
use crate::config::RobotParams;

/// Stable robot identifier, unique within a roster.
pub type RobotId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    Yellow,
    Blue,
}

impl Team {
    pub fn index(self) -> usize {
        match self {
            Team::Yellow => 0,
            Team::Blue => 1,
        }
    }

    pub fn opponent(self) -> Team {
        match self {
            Team::Yellow => Team::Blue,
            Team::Blue => Team::Yellow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    pub id: RobotId,
    pub team: Team,
    /// Goalkeepers may touch the ball inside their own penalty area
    pub goalkeeper: bool,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Heading (rad), kept in (-π, π]
    pub angle: f32,
    pub angular_velocity: f32,
    pub params: RobotParams,
}

impl Robot {
    pub fn new(id: RobotId, team: Team, position: Vec2, angle: f32, params: RobotParams) -> Self {
        Self {
            id,
            team,
            goalkeeper: false,
            position,
            velocity: Vec2::zeros(),
            angle: normalize_angle(angle),
            angular_velocity: 0.0,
            params,
        }
    }

    pub fn with_goalkeeper(mut self, goalkeeper: bool) -> Self {
        self.goalkeeper = goalkeeper;
        self
    }

    /// Body radius
    pub fn size(&self) -> f32 {
        self.params.size
    }

    pub fn height(&self) -> f32 {
        self.params.height
    }

    /// Unit vector the robot faces.
    pub fn heading(&self) -> Vec2 {
        direction(self.angle)
    }

    /// Advance by `dt` after contacts have been resolved.
    pub fn update(&mut self, dt: f32, walls: &WallBounds) {
        reflect_off_walls(self, walls);

        self.velocity = clamp_speed(self.velocity, self.max_speed());
        self.angular_velocity = self
            .angular_velocity
            .clamp(-self.params.max_angular_speed, self.params.max_angular_speed);

        let (position, velocity) = integrate_linear(self.position, self.velocity, self.params.friction, dt);
        self.position = position;
        self.velocity = velocity;
        self.angle = normalize_angle(self.angle + self.angular_velocity * dt);
        self.angular_velocity *= decay_factor(self.params.friction, dt);
    }

    /// Zero linear and angular velocity.
    pub fn freeze(&mut self) {
        self.velocity = Vec2::zeros();
        self.angular_velocity = 0.0;
    }
}

impl Body for Robot {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn mass(&self) -> f32 {
        self.params.mass
    }

    fn max_speed(&self) -> f32 {
        self.params.max_speed
    }
}
