//! Ball dynamics
//!
//! A 3D-lite projectile: planar position/velocity plus height `z` and vertical
//! velocity under constant gravity.
//!
//! - `Grounded` (z = 0): horizontal velocity decays at `ground_friction`
//! - `Airborne` (z > 0): all components decay at `air_resistance`
//!
//! Landing (z reaching 0 during integration) snaps the ball to the ground with
//! `velocity_z = 0`, so `z >= 0` holds after every update.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::field::Field;
use super::geometry::{direction, Vec2};
use super::kinematics::{clamp_speed, decay_factor, reflect_off_walls, Body};
use super::robot::RobotId;
use crate::config::BallParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    Grounded,
    Airborne,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vec2,
    /// Height above the ground (mm)
    pub z: f32,
    pub velocity: Vec2,
    pub velocity_z: f32,
    /// Set by a kick; cleared when the ball settles or is placed
    pub kicked: bool,
    /// Last robot that kicked the ball
    pub kicked_by: Option<RobotId>,
    pub params: BallParams,
}

impl Ball {
    pub fn new(position: Vec2, params: BallParams) -> Self {
        Self {
            position,
            z: 0.0,
            velocity: Vec2::zeros(),
            velocity_z: 0.0,
            kicked: false,
            kicked_by: None,
            params,
        }
    }

    pub fn radius(&self) -> f32 {
        self.params.radius
    }

    pub fn state(&self) -> BallState {
        if self.z > 0.0 {
            BallState::Airborne
        } else {
            BallState::Grounded
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.state() == BallState::Grounded
    }

    /// Advance the ball by `dt` seconds.
    pub fn update(&mut self, dt: f32, field: &Field) {
        // Back-net: a ball inside a goal box turns around instead of tunnelling out
        if field.goal_containing(self.position).is_some() {
            self.velocity = -self.velocity;
        }

        let rate = match self.state() {
            BallState::Grounded => self.params.ground_friction,
            BallState::Airborne => self.params.air_resistance,
        };
        let decay = decay_factor(rate, dt);
        self.velocity *= decay;
        self.velocity_z *= decay;

        self.velocity_z -= self.params.gravity * dt;

        let previous = self.position;
        self.position += self.velocity * dt;
        self.z += self.velocity_z * dt;

        // A fast ball can step over the 180 mm goal box in one tick; sweep the
        // mouth so it still lands in the net.
        if let Some((goal, crossing)) = field.goal_entry(previous, self.position) {
            self.position = Vec2::new(goal.area.center().x, crossing.y);
        }

        if self.z <= 0.0 {
            self.z = 0.0;
            self.velocity_z = 0.0;
        }

        self.velocity = clamp_speed(self.velocity, self.max_speed());
        reflect_off_walls(self, &field.walls);

        if self.kicked && self.velocity.norm() < self.params.kick_settle_speed {
            self.kicked = false;
        }
    }

    /// Flat kick along `angle` with the kicker's own velocity added.
    pub fn kick(&mut self, angle: f32, power: f32, kicker: RobotId, kicker_velocity: Vec2) {
        self.velocity = direction(angle) * power + kicker_velocity;
        self.velocity_z = 0.0;
        self.kicked = true;
        self.kicked_by = Some(kicker);
        debug!(kicker, angle, power, "ball kicked");
    }

    /// Chip kick: `power` split into a horizontal part along `angle` and a vertical
    /// part by `lift_angle`.
    pub fn kick_up(
        &mut self,
        angle: f32,
        lift_angle: f32,
        power: f32,
        kicker: RobotId,
        kicker_velocity: Vec2,
    ) {
        let horizontal = power * lift_angle.cos();
        let vertical = power * lift_angle.sin();
        self.velocity = direction(angle) * horizontal + kicker_velocity;
        self.velocity_z = vertical;
        self.kicked = true;
        self.kicked_by = Some(kicker);
        debug!(kicker, angle, lift_angle, power, "ball chipped");
    }

    /// Teleport to `point` at rest on the ground.
    pub fn place_at(&mut self, point: Vec2) {
        self.position = point;
        self.z = 0.0;
        self.velocity = Vec2::zeros();
        self.velocity_z = 0.0;
        self.kicked = false;
        self.kicked_by = None;
    }
}

impl Body for Ball {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::robot::Team;

    const DT: f32 = 1.0 / 60.0;

    fn ball_at(x: f32, y: f32) -> Ball {
        Ball::new(Vec2::new(x, y), BallParams::default())
    }

    #[test]
    fn test_kick_sets_velocity_and_flags() {
        let mut ball = ball_at(4800.0, 3300.0);
        ball.kick(0.0, 1000.0, 3, Vec2::new(0.0, 200.0));
        assert_eq!(ball.velocity, Vec2::new(1000.0, 200.0));
        assert_eq!(ball.velocity_z, 0.0);
        assert!(ball.kicked);
        assert_eq!(ball.kicked_by, Some(3));
    }

    #[test]
    fn test_kick_up_splits_power() {
        let mut ball = ball_at(4800.0, 3300.0);
        let lift = std::f32::consts::FRAC_PI_4;
        ball.kick_up(std::f32::consts::FRAC_PI_2, lift, 2000.0, 1, Vec2::new(100.0, 0.0));
        let expected = 2000.0 * lift.cos();
        assert!((ball.velocity.x - 100.0).abs() < 1e-2);
        assert!((ball.velocity.y - expected).abs() < 1e-2);
        assert!((ball.velocity_z - 2000.0 * lift.sin()).abs() < 1e-2);
    }

    #[test]
    fn test_chipped_ball_flies_and_lands() {
        let field = Field::default();
        let mut ball = ball_at(2000.0, 3300.0);
        ball.kick_up(0.0, std::f32::consts::FRAC_PI_4, 5000.0, 0, Vec2::zeros());

        let mut was_airborne = false;
        for _ in 0..240 {
            ball.update(DT, &field);
            assert!(ball.z >= 0.0);
            if ball.state() == BallState::Airborne {
                was_airborne = true;
            }
        }
        assert!(was_airborne, "chip must leave the ground");
        assert_eq!(ball.state(), BallState::Grounded);
        assert_eq!(ball.velocity_z, 0.0);
    }

    #[test]
    fn test_resting_ball_stays_on_ground() {
        let field = Field::default();
        let mut ball = ball_at(4800.0, 3300.0);
        ball.update(DT, &field);
        assert_eq!(ball.z, 0.0);
        assert_eq!(ball.velocity_z, 0.0);
        assert_eq!(ball.position, Vec2::new(4800.0, 3300.0));
    }

    #[test]
    fn test_ground_friction_slows_ball() {
        let field = Field::default();
        let mut ball = ball_at(4800.0, 3300.0);
        ball.kick(0.0, 3000.0, 0, Vec2::zeros());
        ball.update(DT, &field);
        assert!(ball.velocity.x < 3000.0);
        assert!(ball.position.x > 4800.0);
    }

    #[test]
    fn test_goal_box_reverses_ball() {
        let field = Field::default();
        let mut ball = ball_at(200.0, 3300.0);
        ball.velocity = Vec2::new(-500.0, 100.0);
        ball.update(DT, &field);
        assert!(ball.velocity.x > 0.0);
        assert!(ball.velocity.y < 0.0);
    }

    #[test]
    fn test_full_power_ball_lands_in_goal_box() {
        let field = Field::default();
        // One tick at 25 m/s covers ~416 mm, more than the 180 mm box depth
        let mut ball = ball_at(400.0, 3300.0);
        ball.kick(std::f32::consts::PI, 25_000.0, 1, Vec2::zeros());
        ball.update(DT, &field);
        assert_eq!(field.goal_containing(ball.position).map(|g| g.owner), Some(Team::Yellow));
        assert!((ball.position.y - 3300.0).abs() < 1e-2);

        // Next tick the back-net turns it around
        ball.update(DT, &field);
        assert!(ball.velocity.x > 0.0);
    }

    #[test]
    fn test_fast_ball_wide_of_posts_is_not_pulled_in() {
        let field = Field::default();
        let mut ball = ball_at(400.0, 2500.0);
        ball.kick(std::f32::consts::PI, 25_000.0, 1, Vec2::zeros());
        ball.update(DT, &field);
        assert!(field.goal_containing(ball.position).is_none());
    }

    #[test]
    fn test_wall_reflection() {
        let field = Field::default();
        let mut ball = ball_at(9590.0, 3300.0);
        ball.velocity = Vec2::new(3000.0, 0.0);
        ball.update(DT, &field);
        assert_eq!(ball.position.x, field.walls.max.x);
        assert!(ball.velocity.x < 0.0);
    }

    #[test]
    fn test_kicked_flag_settles() {
        let field = Field::default();
        let mut ball = ball_at(4800.0, 3300.0);
        ball.kick(0.0, 150.0, 2, Vec2::zeros());
        assert!(ball.kicked);
        for _ in 0..60 {
            ball.update(DT, &field);
        }
        assert!(!ball.kicked);
        assert_eq!(ball.kicked_by, Some(2));
    }

    #[test]
    fn test_speed_clamped() {
        let field = Field::default();
        let mut ball = ball_at(4800.0, 3300.0);
        ball.velocity = Vec2::new(1.0e6, 0.0);
        ball.update(1.0e-4, &field);
        assert!(ball.velocity.norm() <= ball.params.max_speed + 1e-2);
    }

    #[test]
    fn test_place_at_resets() {
        let mut ball = ball_at(100.0, 100.0);
        ball.kick_up(0.3, 0.5, 4000.0, 5, Vec2::zeros());
        ball.z = 120.0;
        ball.place_at(Vec2::new(4800.0, 3300.0));
        assert_eq!(ball.position, Vec2::new(4800.0, 3300.0));
        assert_eq!(ball.velocity, Vec2::zeros());
        assert_eq!(ball.velocity_z, 0.0);
        assert_eq!(ball.z, 0.0);
        assert!(!ball.kicked);
        assert_eq!(ball.kicked_by, None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Height never goes negative, and landing zeroes vertical velocity
            #[test]
            fn prop_height_never_negative(
                power in 0.0f32..30000.0,
                lift in 0.0f32..1.5,
                angle in -3.1f32..3.1,
                steps in 1usize..200,
            ) {
                let field = Field::default();
                let mut ball = ball_at(4800.0, 3300.0);
                ball.kick_up(angle, lift, power, 0, Vec2::zeros());
                for _ in 0..steps {
                    ball.update(DT, &field);
                    prop_assert!(ball.z >= 0.0);
                    if ball.z == 0.0 {
                        prop_assert_eq!(ball.velocity_z, 0.0);
                    }
                }
            }
        }
    }
}
