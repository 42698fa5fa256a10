//! Debug snapshot: input backups and initial agent positions.

use std::path::{Path, PathBuf};

use tracing::info;

use mapd_core::Tick;
use mapd_sim::Simulation;

use crate::{OutputError, OutputResult};

/// Preserve everything needed to replay a run: copy the map and task
/// input files into `dir` with a `.bak` suffix, and write `debug.txt`
/// listing each agent's id on one line and its initial interior `x y` on
/// the next.
pub fn write_debug_snapshot(
    dir: &Path,
    map_path: &Path,
    task_path: &Path,
    sim: &Simulation,
) -> OutputResult<()> {
    std::fs::create_dir_all(dir)?;
    std::fs::copy(map_path, backup_name(dir, map_path)?)?;
    std::fs::copy(task_path, backup_name(dir, task_path)?)?;

    let mut out = crate::open_writer(&dir.join("debug.txt"))?;
    let grid = sim.token().grid();
    for agent in sim.agents() {
        let (x, y) = grid.interior_xy(sim.token().cell_of(agent.id, Tick::ZERO));
        out.write_record([agent.id.index().to_string()])?;
        out.write_record([x.to_string(), y.to_string()])?;
    }
    out.flush()?;
    info!(dir = %dir.display(), "debug snapshot written");
    Ok(())
}

fn backup_name(dir: &Path, input: &Path) -> OutputResult<PathBuf> {
    let name = input.file_name().ok_or_else(|| {
        OutputError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("input path {} has no file name", input.display()),
        ))
    })?;
    let mut backup = name.to_owned();
    backup.push(".bak");
    Ok(dir.join(backup))
}
