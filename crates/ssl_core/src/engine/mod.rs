//! Physics and rules engine
//!
//! Leaf-first: `geometry` → `kinematics` → `ball` / `robot` → `collision` →
//! `navigation` → `rules` → `simulation`.

pub mod ball;
pub mod collision;
pub mod events;
pub mod field;
pub mod geometry;
pub mod kinematics;
pub mod navigation;
pub mod robot;
pub mod rules;
pub mod simulation;
pub mod snapshot;

pub use ball::{Ball, BallState};
pub use collision::BallContact;
pub use events::{KickEvent, MatchEvent, TickReport};
pub use field::{Field, Goal, PenaltyArea, Rect};
pub use geometry::{construct_tangents, path_length_avoiding, segment_intersection, Line, Vec2};
pub use kinematics::{Body, WallBounds};
pub use navigation::{Intent, KickStyle, NavState};
pub use robot::{Robot, RobotId, Team};
pub use simulation::{RosterEntry, SessionState, Simulation, DEFAULT_DT};
pub use snapshot::{BallView, RobotView, WorldSnapshot};
