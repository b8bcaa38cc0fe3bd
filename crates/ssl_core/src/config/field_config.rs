use serde::{Deserialize, Serialize};

/// Static field dimensions (mm).
///
/// The walls sit `boundary_width` outside the touch and goal lines, so the outer
/// wall box is `length + 2 * boundary_width` by `width + 2 * boundary_width` with
/// its corner at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Goal line to goal line
    pub length: f32,
    /// Touch line to touch line
    pub width: f32,
    /// Run-off between the field lines and the walls
    pub boundary_width: f32,
    /// Goal mouth width
    pub goal_width: f32,
    /// Goal depth behind the goal line
    pub goal_depth: f32,
    /// Penalty area depth from the goal line
    pub penalty_depth: f32,
    /// Penalty area width along the goal line
    pub penalty_width: f32,
    pub center_circle_radius: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        // SSL division B
        Self {
            length: 9000.0,
            width: 6000.0,
            boundary_width: 300.0,
            goal_width: 1000.0,
            goal_depth: 180.0,
            penalty_depth: 1000.0,
            penalty_width: 2000.0,
            center_circle_radius: 500.0,
        }
    }
}

impl FieldConfig {
    /// SSL division A dimensions.
    pub fn division_a() -> Self {
        Self {
            length: 12000.0,
            width: 9000.0,
            boundary_width: 300.0,
            goal_width: 1200.0,
            goal_depth: 180.0,
            penalty_depth: 1200.0,
            penalty_width: 2400.0,
            center_circle_radius: 500.0,
        }
    }

    pub fn wall_width(&self) -> f32 {
        self.length + 2.0 * self.boundary_width
    }

    pub fn wall_height(&self) -> f32 {
        self.width + 2.0 * self.boundary_width
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let positive = [
            ("length", self.length),
            ("width", self.width),
            ("goal_width", self.goal_width),
            ("goal_depth", self.goal_depth),
            ("penalty_depth", self.penalty_depth),
            ("penalty_width", self.penalty_width),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("field.{name} must be positive, got {value}"));
            }
        }
        if self.goal_depth > self.boundary_width {
            return Err("field.goal_depth must fit inside the boundary run-off".into());
        }
        if self.penalty_width > self.width || self.goal_width > self.width {
            return Err("field goal/penalty width exceeds field width".into());
        }
        Ok(())
    }
}
