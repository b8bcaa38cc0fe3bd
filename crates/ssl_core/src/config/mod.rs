//! # Simulation configuration
//!
//! Every tuning constant of the engine lives in one serde table so scenarios can
//! override any of them from JSON.
//!
//! ## Usage
//! ```rust
//! use ssl_core::config::SimConfig;
//!
//! let config = SimConfig::default();
//! let arcade = SimConfig::arcade();
//! assert!(arcade.ball.ground_friction < config.ball.ground_friction);
//! ```

mod body_params;
mod field_config;
mod navigation_config;

pub use body_params::{BallParams, CollisionConfig, RobotParams};
pub use field_config::FieldConfig;
pub use navigation_config::{NavigationConfig, RuleConfig};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Full engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SimConfig {
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub robot: RobotParams,
    #[serde(default)]
    pub ball: BallParams,
    #[serde(default)]
    pub collision: CollisionConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub rules: RuleConfig,
}

impl SimConfig {
    /// Division B field with the reference robot and ball (default)
    pub fn realistic() -> Self {
        Self::default()
    }

    /// Livelier ball and stronger kicks
    pub fn arcade() -> Self {
        let mut cfg = Self::default();
        cfg.ball.ground_friction = 0.8;
        cfg.ball.air_resistance = 0.1;
        cfg.robot.kick_power = 30000.0;
        cfg.collision.bounce_fraction = 1.0;
        cfg
    }

    /// Division A field, everything else default
    pub fn division_a() -> Self {
        Self { field: FieldConfig::division_a(), ..Self::default() }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: SimConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.field
            .validate()
            .and_then(|_| self.robot.validate())
            .and_then(|_| self.ball.validate())
            .and_then(|_| self.collision.validate())
            .and_then(|_| self.navigation.validate())
            .map_err(SimError::InvalidConfig)?;
        if self.rules.touch_tolerance <= 0.0 {
            return Err(SimError::InvalidConfig("rules.touch_tolerance must be positive".into()));
        }
        Ok(())
    }
}

// ========== Tests ==========
