use serde::{Deserialize, Serialize};

/// Behaviour tuning for the navigation controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Seek velocity per mm of remaining distance (1/s)
    pub seek_gain: f32,
    /// Angular velocity per rad of heading error (1/s)
    pub rotate_gain: f32,
    /// Heading errors below this are not corrected (rad)
    pub rotate_dead_band: f32,
    /// Heading window for releasing a kick (rad)
    pub kick_heading_tolerance: f32,
    /// Multiplier on `size + ball radius` for kick reach
    pub kick_reach_factor: f32,
    /// Teammates closer than `detour_range_k * size` repel a detouring robot
    pub detour_range_k: f32,
    /// Approach point behind the ball, in multiples of `size + ball radius`
    pub approach_offset_factor: f32,
    /// Facing window (rad) inside which an aiming robot drives straight at the ball
    pub approach_facing_tolerance: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            seek_gain: 10.0,
            rotate_gain: 7.0,
            rotate_dead_band: 0.1,
            kick_heading_tolerance: 10f32.to_radians(),
            kick_reach_factor: 1.15,
            detour_range_k: 4.0,
            approach_offset_factor: 5.0,
            approach_facing_tolerance: 20f32.to_radians(),
        }
    }
}

/// Penalty-area touch detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Multiplier on `ball radius + robot size` for counting a touch
    pub touch_tolerance: f32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self { touch_tolerance: 1.1 }
    }
}

impl NavigationConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        let fields = [
            ("seek_gain", self.seek_gain),
            ("rotate_gain", self.rotate_gain),
            ("kick_reach_factor", self.kick_reach_factor),
            ("detour_range_k", self.detour_range_k),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("navigation.{name} must be positive, got {value}"));
            }
        }
        if self.rotate_dead_band < 0.0 {
            return Err("navigation.rotate_dead_band must not be negative".into());
        }
        Ok(())
    }
}
