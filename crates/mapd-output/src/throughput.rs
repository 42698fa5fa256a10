//! Throughput histogram exporter.

use std::path::Path;

use tracing::info;

use mapd_sim::Simulation;
use mapd_token::TaskState;

use crate::OutputResult;

/// Number of histogram slots (ticks) emitted.
const HISTOGRAM_LEN: usize = 5_000;
/// Each event is smeared over this many consecutive ticks, turning the
/// per-tick impulse counts into a sliding-window rate.
const WINDOW: usize = 100;

/// Write the delivery-rate and release-rate histograms, one line per tick:
///
/// ```text
/// deliveries_in_window releases_in_window
/// ```
///
/// A committed task contributes 1 to the delivery column for the `WINDOW`
/// ticks starting at its `arrive_goal`; every task contributes 1 to the
/// release column for the `WINDOW` ticks starting at its release tick.
pub fn write_throughput(path: &Path, sim: &Simulation) -> OutputResult<()> {
    let mut deliveries = vec![0u32; HISTOGRAM_LEN];
    let mut releases = vec![0u32; HISTOGRAM_LEN];

    for task in sim.tasks() {
        if task.state() != TaskState::Waiting {
            smear(&mut deliveries, task.arrive_goal().index());
        }
        smear(&mut releases, task.release_tick.index());
    }

    let mut out = crate::open_writer(path)?;
    for (d, r) in deliveries.iter().zip(&releases) {
        out.write_record([d.to_string(), r.to_string()])?;
    }
    out.flush()?;
    info!(path = %path.display(), "throughput histogram written");
    Ok(())
}

fn smear(histogram: &mut [u32], from: usize) {
    for slot in histogram.iter_mut().skip(from).take(WINDOW) {
        *slot += 1;
    }
}
