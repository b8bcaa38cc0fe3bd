//! SSL simulation CLI
//!
//! Run JSON scenarios through `ssl_core`, play a built-in demo, or dump a config
//! preset to start a scenario from. Logging goes to stderr and is controlled by
//! `RUST_LOG`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ssl_core::api::run_scenario;
use ssl_core::engine::{Intent, KickStyle, MatchEvent, RosterEntry, Simulation, Team, Vec2, DEFAULT_DT};
use ssl_core::{ScenarioRequest, SimConfig};

#[derive(Parser)]
#[command(name = "ssl_sim")]
#[command(about = "Run SSL robot soccer physics scenarios", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file and print the response JSON
    Run {
        /// Scenario request JSON file
        #[arg(long)]
        scenario: PathBuf,

        /// Override the tick count from the file
        #[arg(long)]
        ticks: Option<u32>,

        /// Override the timestep (seconds)
        #[arg(long)]
        dt: Option<f32>,

        /// Write the response here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Two attackers play a ball into the blue goal
    Demo {
        #[arg(long, default_value = "600")]
        ticks: u32,

        /// Chip the ball instead of kicking it flat
        #[arg(long, default_value = "false")]
        chip: bool,
    },

    /// Print a config preset as JSON
    Config {
        #[arg(long, value_enum, default_value = "realistic")]
        preset: Preset,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Realistic,
    Arcade,
    DivisionA,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { scenario, ticks, dt, out, pretty } => {
            run_file(scenario, ticks, dt, out, pretty)?;
        }
        Commands::Demo { ticks, chip } => {
            demo(ticks, chip)?;
        }
        Commands::Config { preset } => {
            let config = match preset {
                Preset::Realistic => SimConfig::realistic(),
                Preset::Arcade => SimConfig::arcade(),
                Preset::DivisionA => SimConfig::division_a(),
            };
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn run_file(
    scenario: PathBuf,
    ticks: Option<u32>,
    dt: Option<f32>,
    out: Option<PathBuf>,
    pretty: bool,
) -> Result<()> {
    let text = fs::read_to_string(&scenario)
        .with_context(|| format!("Failed to read scenario {}", scenario.display()))?;
    let mut request: ScenarioRequest = serde_json::from_str(&text)
        .with_context(|| format!("Invalid scenario JSON in {}", scenario.display()))?;
    if let Some(ticks) = ticks {
        request.ticks = ticks;
    }
    if let Some(dt) = dt {
        request.dt = dt;
    }

    let response = run_scenario(request)?;
    info!(ticks = response.ticks_run, events = response.events.len(), "scenario complete");

    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    match out {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ Response written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn demo(ticks: u32, chip: bool) -> Result<()> {
    let roster = vec![
        RosterEntry::new(1, Team::Yellow, 3500.0, 3000.0, 0.0),
        RosterEntry::new(2, Team::Yellow, 3500.0, 3700.0, 0.0),
        RosterEntry::new(10, Team::Blue, 8900.0, 3300.0, std::f32::consts::PI).goalkeeper(),
    ];
    let mut sim = Simulation::new(SimConfig::default(), roster)?;

    let kick = if chip { KickStyle::Chip } else { KickStyle::Flat };
    let goal_mouth = sim.field().goal_of(Team::Blue).mouth_center(&sim.field().playing_area);
    sim.set_robot_intent(1, Some(Intent::DriveToBallAndKickTo { target: goal_mouth, kick }))?;
    sim.set_robot_intent(2, Some(Intent::DetourTo { target: Vec2::new(6500.0, 3300.0) }))?;
    sim.set_robot_intent(10, Some(Intent::GoTo { target: Vec2::new(9100.0, 3300.0) }))?;

    println!("SSL demo: {} ticks at {:.0} Hz", ticks, 1.0 / DEFAULT_DT);
    for _ in 0..ticks {
        let report = sim.tick(DEFAULT_DT)?;
        for event in &report.events {
            println!("  tick {:>4}: {}", report.tick, describe(event));
        }
        if report.has_goal() {
            let kickoff = sim.field().center;
            sim.place_ball(kickoff);
        }
    }

    let snapshot = sim.snapshot();
    println!("\nFinal state after {:.2}s:", snapshot.time);
    for robot in &snapshot.robots {
        println!(
            "  robot {:>2} ({:?}) at ({:.0}, {:.0}) heading {:.2}",
            robot.id, robot.team, robot.x, robot.y, robot.angle
        );
    }
    println!("  ball at ({:.0}, {:.0}, z={:.0})", snapshot.ball.x, snapshot.ball.y, snapshot.ball.z);
    Ok(())
}

fn describe(event: &MatchEvent) -> String {
    match event {
        MatchEvent::Goal { goal_of } => {
            format!("GOAL for {:?} (into the {:?} goal)", goal_of.opponent(), goal_of)
        }
        MatchEvent::OutOfBounds => "ball out of bounds".to_string(),
        MatchEvent::Violation { robots } => format!("penalty area violation by {robots:?}"),
    }
}
