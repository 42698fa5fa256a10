//! Completed-delivery exporter.

use std::path::Path;

use tracing::info;

use mapd_core::Tick;
use mapd_sim::Simulation;
use mapd_token::TaskState;

use crate::OutputResult;

/// Write one record per delivery completed by `end`:
///
/// ```text
/// task_id agent_id start_x start_y goal_x goal_y arrive_start arrive_goal
/// ```
///
/// Tasks still waiting (or committed to a delivery tick past `end`) are
/// omitted, so a truncated run reports exactly the deliveries that fit
/// inside its truncation point.
pub fn write_tasks_until(path: &Path, sim: &Simulation, end: Tick) -> OutputResult<()> {
    let mut out = crate::open_writer(path)?;
    let grid = sim.token().grid();
    let mut written = 0usize;

    for task in sim.tasks() {
        if task.state() == TaskState::Waiting || task.arrive_goal() > end {
            continue;
        }
        let Some(agent) = task.assigned_agent() else {
            continue;
        };
        let (sx, sy) = grid.interior_xy(sim.endpoints()[task.start.index()].cell);
        let (gx, gy) = grid.interior_xy(sim.endpoints()[task.goal.index()].cell);
        out.write_record([
            task.id.index().to_string(),
            agent.index().to_string(),
            sx.to_string(),
            sy.to_string(),
            gx.to_string(),
            gy.to_string(),
            task.arrive_start().0.to_string(),
            task.arrive_goal().0.to_string(),
        ])?;
        written += 1;
    }
    out.flush()?;
    info!(path = %path.display(), tasks = written, end = %end, "task records written");
    Ok(())
}
