//! Rule / zone checker
//!
//! Evaluated on the post-integration state of every tick. The checker is
//! stateless: a ball resting inside a goal box reports a goal on every tick it
//! stays there, and callers decide what to do about it (usually `place_ball`).
//!
//! ## Checks
//! - Goal: ball centre strictly inside a goal box
//! - Out of bounds: ball centre outside the playing area, unless it is a goal
//! - Penalty violation: non-goalkeepers touching the ball in their own penalty area

use tracing::info;

use super::ball::Ball;
use super::events::MatchEvent;
use super::field::Field;
use super::geometry::distance;
use super::robot::{Robot, RobotId};
use crate::config::RuleConfig;

pub fn check_goal(field: &Field, ball: &Ball) -> Option<MatchEvent> {
    field
        .goal_containing(ball.position)
        .map(|goal| MatchEvent::Goal { goal_of: goal.owner })
}

pub fn is_out_of_bounds(field: &Field, ball: &Ball) -> bool {
    !field.playing_area.contains(ball.position)
}

/// Robot touching the ball: within `(ball radius + size) * tolerance` and the
/// ball no higher than the robot.
pub fn is_touching_ball(robot: &Robot, ball: &Ball, cfg: &RuleConfig) -> bool {
    let reach = (ball.radius() + robot.size()) * cfg.touch_tolerance;
    distance(robot.position, ball.position) < reach && ball.z <= robot.height()
}

/// Ids of non-goalkeepers touching the ball inside their own penalty area, ascending.
pub fn penalty_violations(field: &Field, robots: &[Robot], ball: &Ball, cfg: &RuleConfig) -> Vec<RobotId> {
    let mut offenders: Vec<RobotId> = robots
        .iter()
        .filter(|robot| !robot.goalkeeper)
        .filter(|robot| field.penalty_area_of(robot.team).contains(robot.position))
        .filter(|robot| is_touching_ball(robot, ball, cfg))
        .map(|robot| robot.id)
        .collect();
    offenders.sort_unstable();
    offenders
}

/// All events for the current state, in order goal / out-of-bounds / violation.
pub fn evaluate(field: &Field, robots: &[Robot], ball: &Ball, cfg: &RuleConfig) -> Vec<MatchEvent> {
    let mut events = Vec::new();

    match check_goal(field, ball) {
        Some(goal) => {
            info!(?goal, "goal");
            events.push(goal);
        }
        None if is_out_of_bounds(field, ball) => events.push(MatchEvent::OutOfBounds),
        None => {}
    }

    let offenders = penalty_violations(field, robots, ball, cfg);
    if !offenders.is_empty() {
        info!(robots = ?offenders, "penalty area violation");
        events.push(MatchEvent::Violation { robots: offenders });
    }

    events
}
