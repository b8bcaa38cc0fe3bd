use thiserror::Error;

use crate::engine::RobotId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Duplicate robot id in roster: {0}")]
    DuplicateRobotId(RobotId),

    #[error("Malformed spawn for robot {id}: {reason}")]
    MalformedSpawn { id: RobotId, reason: String },

    #[error("Unknown robot id: {0}")]
    UnknownRobot(RobotId),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Invalid timestep: {0}")]
    InvalidTimestep(f32),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Scenario error: {0}")]
    Scenario(String),
}

impl SimError {
    /// Setup-time errors make match creation fail; everything else is a per-call error.
    pub fn is_fatal(&self) -> bool {
        match self {
            SimError::DuplicateRobotId(_) => true,
            SimError::MalformedSpawn { .. } => true,
            SimError::InvalidConfig(_) => true,
            SimError::UnknownRobot(_) => false,
            SimError::DegenerateGeometry(_) => false,
            SimError::InvalidTimestep(_) => false,
            SimError::Scenario(_) => false,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Scenario(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_errors_are_fatal() {
        assert!(SimError::DuplicateRobotId(3).is_fatal());
        assert!(SimError::MalformedSpawn { id: 1, reason: "nan".into() }.is_fatal());
        assert!(!SimError::UnknownRobot(9).is_fatal());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(SimError::UnknownRobot(7).to_string(), "Unknown robot id: 7");
        let err = SimError::MalformedSpawn { id: 2, reason: "outside walls".into() };
        assert_eq!(err.to_string(), "Malformed spawn for robot 2: outside walls");
    }

    #[test]
    fn test_json_error_maps_to_scenario() {
        let err: SimError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, SimError::Scenario(_)));
    }
}
