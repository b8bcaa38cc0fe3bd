//! Simulation session
//!
//! Owns the field, the fixed robot roster and the ball, and advances them with
//! [`Simulation::tick`]. Robots live in a `Vec` in roster order with an id →
//! index map next to it; intents and navigation states are kept in parallel
//! vectors.
//!
//! ## Tick pipeline
//! 1. navigation (`Running`) or freeze (`Halted`); kicks are applied to the ball
//! 2. robot–robot collisions
//! 3. robot–ball contacts, against robot positions from before integration
//! 4. robot update (walls, clamps, integration, friction)
//! 5. ball update
//! 6. rule evaluation
//!
//! ## Usage
//! ```rust
//! use ssl_core::config::SimConfig;
//! use ssl_core::engine::{Intent, RosterEntry, Simulation, Team, DEFAULT_DT};
//!
//! let roster = vec![RosterEntry::new(1, Team::Yellow, 2000.0, 3300.0, 0.0)];
//! let mut sim = Simulation::new(SimConfig::default(), roster).unwrap();
//! sim.set_robot_intent(1, Some(Intent::DriveToBall { kick: Default::default() })).unwrap();
//! let report = sim.tick(DEFAULT_DT).unwrap();
//! assert_eq!(report.tick, 1);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use super::ball::Ball;
use super::collision::{resolve_ball_contacts, resolve_robot_collisions};
use super::events::{KickEvent, TickReport};
use super::field::Field;
use super::geometry::Vec2;
use super::navigation::{steer, Intent, KickStyle, NavState, Steering};
use super::robot::{Robot, RobotId, Team};
use super::rules;
use super::snapshot::{BallView, RobotView, WorldSnapshot};
use crate::config::SimConfig;
use crate::error::{Result, SimError};

/// 60 Hz
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// One robot at match setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: RobotId,
    pub team: Team,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub angle: f32,
    #[serde(default)]
    pub goalkeeper: bool,
}

impl RosterEntry {
    pub fn new(id: RobotId, team: Team, x: f32, y: f32, angle: f32) -> Self {
        Self { id, team, x, y, angle, goalkeeper: false }
    }

    pub fn goalkeeper(mut self) -> Self {
        self.goalkeeper = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Running,
    /// Robots are held still; the ball keeps moving
    Halted,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    field: Field,
    robots: Vec<Robot>,
    index: BTreeMap<RobotId, usize>,
    intents: Vec<Option<Intent>>,
    nav_states: Vec<NavState>,
    ball: Ball,
    state: SessionState,
    tick: u64,
    time: f64,
}

impl Simulation {
    /// Validate the config and roster and place the ball on the centre spot.
    pub fn new(config: SimConfig, roster: Vec<RosterEntry>) -> Result<Self> {
        config.validate()?;
        let field = Field::from_config(&config.field);

        let mut robots = Vec::with_capacity(roster.len());
        let mut index = BTreeMap::new();
        for entry in roster {
            if !(entry.x.is_finite() && entry.y.is_finite() && entry.angle.is_finite()) {
                return Err(SimError::MalformedSpawn {
                    id: entry.id,
                    reason: format!("non-finite pose ({}, {}, {})", entry.x, entry.y, entry.angle),
                });
            }
            let position = Vec2::new(entry.x, entry.y);
            if !field.walls.contains(position) {
                return Err(SimError::MalformedSpawn {
                    id: entry.id,
                    reason: format!("({}, {}) is outside the walls", entry.x, entry.y),
                });
            }
            if index.insert(entry.id, robots.len()).is_some() {
                return Err(SimError::DuplicateRobotId(entry.id));
            }
            robots.push(
                Robot::new(entry.id, entry.team, position, entry.angle, config.robot)
                    .with_goalkeeper(entry.goalkeeper),
            );
        }

        let ball = Ball::new(field.center, config.ball);
        info!(robots = robots.len(), "match created");

        Ok(Self {
            intents: vec![None; robots.len()],
            nav_states: vec![NavState::Idle; robots.len()],
            config,
            field,
            robots,
            index,
            ball,
            state: SessionState::Running,
            tick: 0,
            time: 0.0,
        })
    }

    /// Advance the world by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> Result<TickReport> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SimError::InvalidTimestep(dt));
        }

        let kicks = match self.state {
            SessionState::Running => self.run_navigation(),
            SessionState::Halted => {
                self.robots.iter_mut().for_each(Robot::freeze);
                Vec::new()
            }
        };

        let robot_contacts = resolve_robot_collisions(&mut self.robots);
        let ball_contacts = resolve_ball_contacts(&self.robots, &mut self.ball, &self.config.collision);

        for robot in &mut self.robots {
            robot.update(dt, &self.field.walls);
        }
        self.ball.update(dt, &self.field);

        let events = rules::evaluate(&self.field, &self.robots, &self.ball, &self.config.rules);

        self.tick += 1;
        self.time += f64::from(dt);
        trace!(tick = self.tick, events = events.len(), robot_contacts, "tick");

        Ok(TickReport { tick: self.tick, events, kicks, ball_contacts, robot_contacts })
    }

    /// Steer every robot with an intent, reading the pre-navigation world.
    fn run_navigation(&mut self) -> Vec<KickEvent> {
        let mut steerings: Vec<(usize, Steering, KickStyle)> = Vec::new();
        for (i, robot) in self.robots.iter().enumerate() {
            let Some(intent) = self.intents[i] else {
                self.nav_states[i] = NavState::Idle;
                continue;
            };
            let teammates: Vec<Vec2> = self
                .robots
                .iter()
                .filter(|other| other.team == robot.team && other.id != robot.id)
                .map(|other| other.position)
                .collect();
            let style = match intent {
                Intent::DriveToBall { kick } | Intent::DriveToBallAndKickTo { kick, .. } => kick,
                _ => KickStyle::Flat,
            };
            steerings.push((i, steer(robot, &intent, &self.ball, &teammates, &self.config.navigation), style));
        }

        let mut kicks = Vec::new();
        for (i, steering, style) in steerings {
            steering.apply_to(&mut self.robots[i]);
            self.nav_states[i] = steering.state;
            if let Some(kick) = steering.kick {
                kick.apply_to(&mut self.ball);
                kicks.push(KickEvent { kicker: kick.kicker, style });
            }
        }
        kicks
    }

    /// Teleport the ball to `point`, at rest on the ground.
    pub fn place_ball(&mut self, point: Vec2) {
        debug!(x = point.x, y = point.y, "ball placed");
        self.ball.place_at(point);
    }

    /// Zero every robot's velocity. Intents are kept.
    pub fn freeze_all_robots(&mut self) {
        self.robots.iter_mut().for_each(Robot::freeze);
    }

    /// Shorthand for a `GoTo` intent; `None` clears the robot's intent.
    pub fn set_robot_target(&mut self, id: RobotId, target: Option<Vec2>) -> Result<()> {
        self.set_robot_intent(id, target.map(|target| Intent::GoTo { target }))
    }

    pub fn set_robot_intent(&mut self, id: RobotId, intent: Option<Intent>) -> Result<()> {
        let i = self.index_of(id)?;
        self.intents[i] = intent;
        debug!(robot = id, ?intent, "intent set");
        Ok(())
    }

    pub fn halt(&mut self) {
        if self.state != SessionState::Halted {
            info!(tick = self.tick, "session halted");
            self.state = SessionState::Halted;
        }
    }

    pub fn resume(&mut self) {
        if self.state != SessionState::Running {
            info!(tick = self.tick, "session resumed");
            self.state = SessionState::Running;
        }
    }

    pub fn session_state(&self) -> SessionState {
        self.state
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            time: self.time,
            robots: self.robots.iter().map(RobotView::from).collect(),
            ball: BallView::from(&self.ball),
        }
    }

    pub fn robot(&self, id: RobotId) -> Result<&Robot> {
        Ok(&self.robots[self.index_of(id)?])
    }

    pub fn nav_state(&self, id: RobotId) -> Result<NavState> {
        Ok(self.nav_states[self.index_of(id)?])
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    fn index_of(&self, id: RobotId) -> Result<usize> {
        self.index.get(&id).copied().ok_or_else(|| {
            warn!(robot = id, "unknown robot id");
            SimError::UnknownRobot(id)
        })
    }
}
