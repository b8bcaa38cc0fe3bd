//! Navigation / behaviour controller
//!
//! Turns a robot's [`Intent`] into velocity and heading setpoints for the coming
//! tick. The controller only reads robot and ball state; what it wants to change
//! comes back as a [`Steering`] value that the simulation applies afterwards,
//! kicks included.
//!
//! ## States
//! - `Seek`: rotate toward the ball/target and drive at it, speed ∝ distance
//! - `DetourSeek`: seek blended with a repulsion from close teammates
//! - `Kick`: in reach, facing the ball and the ball is grounded → kick
//!
//! ## Usage
//! ```ignore
//! let steering = steer(&robot, &intent, &ball, &teammates, &config.navigation);
//! steering.apply_to(&mut robot);
//! ```

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::geometry::{bearing, direction, distance, normalize_angle, signed_angle_between, Vec2};
use super::robot::{Robot, RobotId};
use crate::config::NavigationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KickStyle {
    #[default]
    Flat,
    /// Kick-up at the robot's `kick_up_angle`
    Chip,
}

/// What a robot is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    /// Drive to a point, heading untouched
    GoTo { target: Vec2 },
    /// Drive to a point while steering around close teammates
    DetourTo { target: Vec2 },
    /// Chase the ball and kick it straight ahead
    DriveToBall {
        #[serde(default)]
        kick: KickStyle,
    },
    /// Get behind the ball and kick it toward `target`
    DriveToBallAndKickTo {
        target: Vec2,
        #[serde(default)]
        kick: KickStyle,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NavState {
    #[default]
    Idle,
    Seek,
    DetourSeek,
    Kick,
}

/// Kick request produced by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KickCommand {
    pub kicker: RobotId,
    pub angle: f32,
    pub power: f32,
    /// `Some(lift)` for a chip kick
    pub lift_angle: Option<f32>,
    pub kicker_velocity: Vec2,
}

impl KickCommand {
    pub fn apply_to(&self, ball: &mut Ball) {
        match self.lift_angle {
            Some(lift) => ball.kick_up(self.angle, lift, self.power, self.kicker, self.kicker_velocity),
            None => ball.kick(self.angle, self.power, self.kicker, self.kicker_velocity),
        }
    }
}

/// Setpoints for one robot and one tick. `None` leaves the current value alone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Steering {
    pub state: NavState,
    pub velocity: Option<Vec2>,
    pub angular_velocity: Option<f32>,
    pub kick: Option<KickCommand>,
}

impl Steering {
    pub fn apply_to(&self, robot: &mut Robot) {
        if let Some(velocity) = self.velocity {
            robot.velocity = velocity;
        }
        if let Some(angular_velocity) = self.angular_velocity {
            robot.angular_velocity = angular_velocity;
        }
    }
}

/// Velocity toward `point`, proportional to the remaining distance.
pub fn go_to_point(robot: &Robot, point: Vec2, cfg: &NavigationConfig) -> Vec2 {
    let angle_to_point = bearing(robot.position, point);
    let distance_to_point = distance(robot.position, point);
    direction(angle_to_point) * (distance_to_point * cfg.seek_gain)
}

/// Angular velocity that turns the robot toward `point`; zero inside the dead-band.
pub fn rotate_to_point(robot: &Robot, point: Vec2, cfg: &NavigationConfig) -> f32 {
    let diff = signed_angle_between(robot.angle, point - robot.position);
    if diff.abs() > cfg.rotate_dead_band {
        diff * cfg.rotate_gain
    } else {
        0.0
    }
}

/// Seek velocity bent away from teammates inside `detour_range_k * size`.
///
/// Returns the combined vector and whether any teammate contributed.
pub fn detour_seek(
    robot: &Robot,
    point: Vec2,
    teammates: &[Vec2],
    cfg: &NavigationConfig,
) -> (Vec2, bool) {
    let seek = go_to_point(robot, point, cfg);
    let range = cfg.detour_range_k * robot.size();

    let mut repulsion = Vec2::zeros();
    for &mate in teammates {
        let away = robot.position - mate;
        let d = away.norm();
        if d > 0.0 && d < range {
            let strength = (1.0 - d / range) * robot.params.max_speed;
            repulsion += away / d * strength;
        }
    }

    let engaged = repulsion != Vec2::zeros();
    (seek + repulsion, engaged)
}

fn heading_error_to(robot: &Robot, point: Vec2) -> f32 {
    normalize_angle(bearing(robot.position, point) - robot.angle)
}

/// Kick if the robot faces the ball, reaches it, and the ball is on the ground.
pub fn kick_ball(robot: &Robot, ball: &Ball, style: KickStyle, cfg: &NavigationConfig) -> Option<KickCommand> {
    let facing = heading_error_to(robot, ball.position).abs() < cfg.kick_heading_tolerance;
    let reach = (robot.size() + ball.radius()) * cfg.kick_reach_factor;
    let in_reach = distance(robot.position, ball.position) < reach;

    if !(facing && in_reach && ball.is_grounded()) {
        return None;
    }

    let lift_angle = match style {
        KickStyle::Flat => None,
        KickStyle::Chip => Some(robot.params.kick_up_angle),
    };
    Some(KickCommand {
        kicker: robot.id,
        angle: robot.angle,
        power: robot.params.kick_power,
        lift_angle,
        kicker_velocity: robot.velocity,
    })
}

/// Chase the ball: Seek while out of contact range, Kick once there.
pub fn drive_to_ball(robot: &Robot, ball: &Ball, style: KickStyle, cfg: &NavigationConfig) -> Steering {
    let angular_velocity = Some(rotate_to_point(robot, ball.position, cfg));
    let distance_to_ball = distance(robot.position, ball.position);

    if distance_to_ball > robot.size() + ball.radius() {
        Steering {
            state: NavState::Seek,
            velocity: Some(go_to_point(robot, ball.position, cfg)),
            angular_velocity,
            kick: None,
        }
    } else {
        Steering {
            state: NavState::Kick,
            velocity: None,
            angular_velocity,
            kick: kick_ball(robot, ball, style, cfg),
        }
    }
}

/// Line up behind the ball on the `target` side and kick toward it.
pub fn drive_to_ball_and_kick_to_point(
    robot: &Robot,
    ball: &Ball,
    target: Vec2,
    style: KickStyle,
    cfg: &NavigationConfig,
) -> Steering {
    let angular_velocity = Some(rotate_to_point(robot, target, cfg));
    let contact_range = robot.size() + ball.radius();

    if distance(robot.position, ball.position) <= contact_range {
        return Steering {
            state: NavState::Kick,
            velocity: None,
            angular_velocity,
            kick: kick_ball(robot, ball, style, cfg),
        };
    }

    if heading_error_to(robot, ball.position).abs() < cfg.approach_facing_tolerance {
        return drive_to_ball(robot, ball, style, cfg);
    }

    let behind_ball = bearing(target, ball.position);
    let approach = ball.position + direction(behind_ball) * (contact_range * cfg.approach_offset_factor);
    Steering {
        state: NavState::Seek,
        velocity: Some(go_to_point(robot, approach, cfg)),
        angular_velocity,
        kick: None,
    }
}

/// Steering for `intent` this tick.
///
/// `teammates` holds the positions of the robot's teammates, excluding itself.
pub fn steer(
    robot: &Robot,
    intent: &Intent,
    ball: &Ball,
    teammates: &[Vec2],
    cfg: &NavigationConfig,
) -> Steering {
    match *intent {
        Intent::GoTo { target } => Steering {
            state: NavState::Seek,
            velocity: Some(go_to_point(robot, target, cfg)),
            ..Steering::default()
        },
        Intent::DetourTo { target } => {
            let (velocity, engaged) = detour_seek(robot, target, teammates, cfg);
            let state = if engaged { NavState::DetourSeek } else { NavState::Seek };
            let angular_velocity = if velocity == Vec2::zeros() {
                0.0
            } else {
                rotate_to_point(robot, robot.position + velocity, cfg)
            };
            Steering { state, velocity: Some(velocity), angular_velocity: Some(angular_velocity), kick: None }
        }
        Intent::DriveToBall { kick } => drive_to_ball(robot, ball, kick, cfg),
        Intent::DriveToBallAndKickTo { target, kick } => {
            drive_to_ball_and_kick_to_point(robot, ball, target, kick, cfg)
        }
    }
}
