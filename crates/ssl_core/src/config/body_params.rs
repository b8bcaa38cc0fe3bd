use serde::{Deserialize, Serialize};

/// Physical parameters shared by every robot in a match.
///
/// Units: mm, mm/s, rad, rad/s, kg. `friction` is a per-second decay rate
/// applied as `exp(-friction * dt)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotParams {
    /// Body radius
    pub size: f32,
    /// Height below which the ball collides with the body
    pub height: f32,
    pub max_speed: f32,
    pub max_angular_speed: f32,
    pub kick_power: f32,
    /// Launch angle of a chip kick
    pub kick_up_angle: f32,
    pub mass: f32,
    pub friction: f32,
}

impl Default for RobotParams {
    fn default() -> Self {
        Self {
            size: 180.0,
            height: 150.0,
            max_speed: 6000.0,
            max_angular_speed: 10.0,
            kick_power: 25000.0,
            kick_up_angle: std::f32::consts::FRAC_PI_4,
            mass: 5.0,
            friction: 15.1,
        }
    }
}

/// Ball parameters.
///
/// `ground_friction` applies while the ball rolls, `air_resistance` while it is airborne.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallParams {
    pub radius: f32,
    pub mass: f32,
    pub ground_friction: f32,
    pub air_resistance: f32,
    /// mm/s²
    pub gravity: f32,
    pub max_speed: f32,
    /// Below this horizontal speed a kicked ball counts as settled.
    pub kick_settle_speed: f32,
}

impl Default for BallParams {
    fn default() -> Self {
        Self {
            radius: 21.5,
            mass: 0.046,
            ground_friction: 2.0,
            air_resistance: 0.3,
            gravity: 9810.0,
            max_speed: 32000.0,
            kick_settle_speed: 100.0,
        }
    }
}

/// Robot–ball contact response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Multiplier on `robot.size + ball.radius` for ball contact
    pub contact_tolerance: f32,
    /// Facing window (rad) inside which a contacting robot traps a kicked ball
    pub trap_angle: f32,
    /// Fraction of incoming speed kept when trapping
    pub trap_fraction: f32,
    /// Fraction of incoming speed kept when the ball glances off
    pub bounce_fraction: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            contact_tolerance: 1.1,
            trap_angle: 10f32.to_radians(),
            trap_fraction: 0.5,
            bounce_fraction: 0.9,
        }
    }
}

fn check_positive(scope: &str, fields: &[(&str, f32)]) -> Result<(), String> {
    for (name, value) in fields {
        if !(value.is_finite() && *value > 0.0) {
            return Err(format!("{scope}.{name} must be positive, got {value}"));
        }
    }
    Ok(())
}

impl RobotParams {
    pub(crate) fn validate(&self) -> Result<(), String> {
        check_positive(
            "robot",
            &[
                ("size", self.size),
                ("height", self.height),
                ("max_speed", self.max_speed),
                ("max_angular_speed", self.max_angular_speed),
                ("mass", self.mass),
            ],
        )?;
        if self.friction < 0.0 || self.kick_power < 0.0 {
            return Err("robot.friction and robot.kick_power must not be negative".into());
        }
        Ok(())
    }
}

impl BallParams {
    pub(crate) fn validate(&self) -> Result<(), String> {
        check_positive(
            "ball",
            &[("radius", self.radius), ("mass", self.mass), ("max_speed", self.max_speed)],
        )?;
        if self.ground_friction < 0.0 || self.air_resistance < 0.0 || self.gravity < 0.0 {
            return Err("ball decay rates and gravity must not be negative".into());
        }
        Ok(())
    }
}

impl CollisionConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        check_positive("collision", &[("contact_tolerance", self.contact_tolerance)])?;
        for (name, value) in [("trap_fraction", self.trap_fraction), ("bounce_fraction", self.bounce_fraction)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("collision.{name} must be within 0..=1, got {value}"));
            }
        }
        Ok(())
    }
}
