//! # ssl_core - SSL Robot Soccer Physics Core
//!
//! Deterministic 2D physics, collision and rule engine for small-size league
//! robot soccer, with a JSON scenario API for tooling.
//!
//! ## Features
//! - Ball with height and gravity (flat kicks and chip kicks)
//! - Robot rigid bodies with speed/turn-rate caps and friction
//! - Order-independent collision resolution
//! - Intent-driven navigation (seek, detour, drive-and-kick)
//! - Goal, out-of-bounds and penalty-area checks per tick
//!
//! Units are millimetres, seconds and radians throughout.

#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;

pub use api::{run_scenario, run_scenario_json, ScenarioRequest, ScenarioResponse};
pub use config::SimConfig;
pub use engine::{Intent, MatchEvent, RosterEntry, Simulation, Team, TickReport, WorldSnapshot};
pub use error::{Result, SimError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
