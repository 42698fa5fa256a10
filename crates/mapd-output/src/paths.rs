//! Committed-path exporter.

use std::path::Path;

use tracing::info;

use mapd_core::Tick;
use mapd_sim::Simulation;

use crate::OutputResult;

/// Write every agent's traversed path up to and including `end`.
///
/// Per agent: one count line (`end + 1`, the number of coordinate lines
/// that follow), then one `x y` line per tick from 0 to `end`.  Agents
/// appear in id order.
pub fn write_paths_until(path: &Path, sim: &Simulation, end: Tick) -> OutputResult<()> {
    let mut out = crate::open_writer(path)?;
    let grid = sim.token().grid();

    for agent in sim.agents() {
        out.write_record([(end.index() + 1).to_string()])?;
        for t in 0..=end.index() {
            let cell = sim.token().cell_of(agent.id, Tick(t as u64));
            let (x, y) = grid.interior_xy(cell);
            out.write_record([x.to_string(), y.to_string()])?;
        }
    }
    out.flush()?;
    info!(path = %path.display(), agents = sim.agents().len(), end = %end, "paths written");
    Ok(())
}
