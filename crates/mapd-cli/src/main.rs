mod config;

use std::path::Path;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use mapd_agent::{Totp, Tptr};
use mapd_core::WallClock;
use mapd_sim::{RunReport, RunState};

use crate::config::{Algorithm, Config};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let default_level = if config.debug {
        "debug"
    } else if config.verbose {
        "info"
    } else {
        "warn"
    };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
    tracing::info!(config = ?config, "starting");

    let mut sim = mapd_sim::load_files(&config.map, &config.task)?;

    let mut clock = WallClock::new();
    let report: RunReport = match config.algorithm {
        Algorithm::Totp => sim.run(&Totp, &mut clock, config.deadline_ms)?,
        Algorithm::Tptr => sim.run(&Tptr, &mut clock, config.deadline_ms)?,
    };

    mapd_output::write_paths_until(&config.output_path, &sim, report.end_timestep)?;
    mapd_output::write_tasks_until(&config.output_task, &sim, report.end_timestep)?;
    if let Some(throughput) = &config.output_throughput {
        mapd_output::write_throughput(throughput, &sim)?;
    }
    if config.debug {
        mapd_output::write_debug_snapshot(Path::new("."), &config.map, &config.task, &sim)?;
    }

    let outcome = match report.state {
        RunState::Complete => "complete",
        RunState::DeadlineTruncated => "deadline-truncated",
        RunState::Running => "running",
    };
    println!(
        "{outcome}: end timestep {}, {} decisions in {:.2} ms",
        report.end_timestep, report.computations, report.computation_ms
    );
    Ok(())
}
