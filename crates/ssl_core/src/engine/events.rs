//! Per-tick events
//!
//! Everything the rule checker observed during one tick is returned from
//! `Simulation::tick` as a [`TickReport`]; nothing is queued across ticks.

use serde::{Deserialize, Serialize};

use super::collision::BallContact;
use super::navigation::KickStyle;
use super::robot::{RobotId, Team};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    /// Ball entered the goal defended by `goal_of`
    Goal { goal_of: Team },
    OutOfBounds,
    /// Non-goalkeepers touching the ball inside their own penalty area, ascending ids
    Violation { robots: Vec<RobotId> },
}

impl MatchEvent {
    /// Team credited with the goal, if this is one.
    pub fn scoring_team(&self) -> Option<Team> {
        match self {
            MatchEvent::Goal { goal_of } => Some(goal_of.opponent()),
            _ => None,
        }
    }
}

/// A kick released by the navigation controller this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KickEvent {
    pub kicker: RobotId,
    pub style: KickStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick counter after this tick (first tick reports 1)
    pub tick: u64,
    pub events: Vec<MatchEvent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kicks: Vec<KickEvent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ball_contacts: Vec<BallContact>,
    /// Robot–robot contacts resolved this tick
    #[serde(default)]
    pub robot_contacts: usize,
}

impl TickReport {
    pub fn has_goal(&self) -> bool {
        self.events.iter().any(|e| matches!(e, MatchEvent::Goal { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_team_is_opponent_of_goal_owner() {
        let event = MatchEvent::Goal { goal_of: Team::Yellow };
        assert_eq!(event.scoring_team(), Some(Team::Blue));
        assert_eq!(MatchEvent::OutOfBounds.scoring_team(), None);
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_string(&MatchEvent::Violation { robots: vec![1, 4] }).unwrap();
        assert_eq!(json, r#"{"type":"violation","robots":[1,4]}"#);
        let json = serde_json::to_string(&MatchEvent::Goal { goal_of: Team::Blue }).unwrap();
        assert_eq!(json, r#"{"type":"goal","goal_of":"Blue"}"#);
    }
}
