//! JSON scenario API
//!
//! Build a match from a JSON request, run it for a fixed number of ticks and
//! return the recorded frames and events as JSON.
//!
//! ```rust
//! let request = r#"{
//!     "roster": [{"id": 1, "team": "Blue", "x": 4000.0, "y": 3300.0}],
//!     "intents": [{"robot": 1, "intent": {"kind": "drive_to_ball"}}],
//!     "ticks": 30
//! }"#;
//! let response = ssl_core::run_scenario_json(request).unwrap();
//! assert!(response.contains("\"frames\""));
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SimConfig;
use crate::engine::{
    Intent, MatchEvent, RobotId, RosterEntry, Simulation, Vec2, WorldSnapshot, DEFAULT_DT,
};
use crate::error::{Result, SimError};

pub const SCHEMA_VERSION: u32 = 1;

/// Upper bound on `ticks` for one request (one hour at 60 Hz).
pub const MAX_SCENARIO_TICKS: u32 = 216_000;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

fn default_dt() -> f32 {
    DEFAULT_DT
}

fn default_frame_every() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentAssignment {
    pub robot: RobotId,
    pub intent: Intent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Defaults to `SimConfig::default()`
    #[serde(default)]
    pub config: Option<SimConfig>,
    pub roster: Vec<RosterEntry>,
    #[serde(default)]
    pub intents: Vec<IntentAssignment>,
    /// Ball start position; centre spot when absent
    #[serde(default)]
    pub ball: Option<Vec2>,
    pub ticks: u32,
    #[serde(default = "default_dt")]
    pub dt: f32,
    /// Record a frame every N ticks (the first and last frame are always kept)
    #[serde(default = "default_frame_every")]
    pub frame_every: u32,
    /// End the run on the first goal
    #[serde(default)]
    pub stop_on_goal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub tick: u64,
    pub event: MatchEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResponse {
    pub schema_version: u32,
    pub ticks_run: u64,
    pub frames: Vec<WorldSnapshot>,
    pub events: Vec<TimedEvent>,
}

/// Run a parsed scenario.
pub fn run_scenario(request: ScenarioRequest) -> Result<ScenarioResponse> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(SimError::Scenario(format!(
            "Unsupported schema version: {}",
            request.schema_version
        )));
    }
    if request.ticks > MAX_SCENARIO_TICKS {
        return Err(SimError::Scenario(format!(
            "ticks {} exceeds the limit of {}",
            request.ticks, MAX_SCENARIO_TICKS
        )));
    }
    if request.frame_every == 0 {
        return Err(SimError::Scenario("frame_every must be at least 1".into()));
    }

    let config = request.config.unwrap_or_default();
    let mut sim = Simulation::new(config, request.roster)?;
    for assignment in &request.intents {
        sim.set_robot_intent(assignment.robot, Some(assignment.intent))?;
    }
    if let Some(point) = request.ball {
        sim.place_ball(point);
    }

    let mut frames = vec![sim.snapshot()];
    let mut events = Vec::new();
    let mut ticks_run = 0;

    for _ in 0..request.ticks {
        let report = sim.tick(request.dt)?;
        ticks_run = report.tick;

        let scored = report.has_goal();
        events.extend(report.events.into_iter().map(|event| TimedEvent { tick: report.tick, event }));

        let last = (scored && request.stop_on_goal) || report.tick == u64::from(request.ticks);
        if report.tick % u64::from(request.frame_every) == 0 || last {
            frames.push(sim.snapshot());
        }
        if scored && request.stop_on_goal {
            break;
        }
    }

    info!(ticks = ticks_run, frames = frames.len(), events = events.len(), "scenario finished");
    Ok(ScenarioResponse { schema_version: SCHEMA_VERSION, ticks_run, frames, events })
}

/// JSON in, JSON out.
pub fn run_scenario_json(request_json: &str) -> Result<String> {
    let request: ScenarioRequest = serde_json::from_str(request_json)?;
    let response = run_scenario(request)?;
    Ok(serde_json::to_string(&response)?)
}
