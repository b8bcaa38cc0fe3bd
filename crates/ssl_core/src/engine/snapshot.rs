//! Read-only world view handed to callers after a tick.

use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::robot::{Robot, RobotId, Team};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotView {
    pub id: RobotId,
    pub team: Team,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

impl From<&Robot> for RobotView {
    fn from(robot: &Robot) -> Self {
        Self {
            id: robot.id,
            team: robot.team,
            x: robot.position.x,
            y: robot.position.y,
            angle: robot.angle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<&Ball> for BallView {
    fn from(ball: &Ball) -> Self {
        Self { x: ball.position.x, y: ball.position.y, z: ball.z }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    /// Simulated seconds since the match was created
    pub time: f64,
    /// Roster order
    pub robots: Vec<RobotView>,
    pub ball: BallView,
}

impl WorldSnapshot {
    pub fn robot(&self, id: RobotId) -> Option<&RobotView> {
        self.robots.iter().find(|r| r.id == id)
    }
}
