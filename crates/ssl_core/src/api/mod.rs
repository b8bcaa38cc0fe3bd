pub mod scenario_json;

pub use scenario_json::{
    run_scenario, run_scenario_json, IntentAssignment, ScenarioRequest, ScenarioResponse,
    TimedEvent, MAX_SCENARIO_TICKS,
};
