//! Text-format instance loaders.
//!
//! # Map format
//!
//! ```text
//! rows,cols          interior dimensions, border excluded
//! <endpoint count>   cells marked 'e' (task endpoints)
//! <agent count>      cells marked 'r' (homes + spawns)
//! <horizon>          path buffer length in ticks
//! <rows grid lines>  '@' blocked, 'e' endpoint, 'r' robot home, '.' free
//! ```
//!
//! # Task format
//!
//! ```text
//! <task count>
//! <release_tick> <start_ep> <goal_ep> <desired_start> <desired_goal>  ×N
//! ```
//!
//! Endpoint indices refer to the combined arena: task endpoints first in
//! map declaration order, then one home endpoint per agent.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::info;

use mapd_core::{AgentId, EndpointId, TaskId, Tick};
use mapd_grid::{Endpoint, GridMap};
use mapd_token::{Task, Token};
use mapd_agent::Agent;

use crate::sim::Simulation;
use crate::{SimError, SimResult};

/// Load a simulation instance from the two input files.
pub fn load_files(map_path: &Path, task_path: &Path) -> SimResult<Simulation> {
    let map = std::fs::File::open(map_path)?;
    let task = std::fs::File::open(task_path)?;
    load_readers(map, task)
}

/// Like [`load_files`] but accepts any `Read` sources.  Useful for testing
/// (pass `std::io::Cursor`s).
pub fn load_readers<M: Read, T: Read>(map: M, task: T) -> SimResult<Simulation> {
    let (token, endpoints, agents, horizon) = parse_map(map)?;
    let mut sim = Simulation::new(token, endpoints, agents, horizon);
    parse_tasks(task, &mut sim)?;
    sim.release_initial_batch();
    info!(
        agents = sim.agents().len(),
        endpoints = sim.endpoints().len(),
        tasks = sim.tasks().len(),
        horizon = sim.horizon(),
        "instance loaded"
    );
    Ok(sim)
}

// ── Map parsing ───────────────────────────────────────────────────────────────

fn parse_map<M: Read>(map: M) -> SimResult<(Token, Vec<Endpoint>, Vec<Agent>, usize)> {
    let mut lines = BufReader::new(map).lines();
    let mut next_line = |what: &str| -> SimResult<String> {
        lines
            .next()
            .ok_or_else(|| SimError::MapFormat(format!("missing {what} line")))?
            .map_err(SimError::Io)
    };

    let header = next_line("rows,cols")?;
    let (rows, cols) = parse_dimensions(&header)?;
    let endpoint_count = parse_count(&next_line("endpoint count")?, "endpoint count")?;
    let agent_count = parse_count(&next_line("agent count")?, "agent count")?;
    let horizon = parse_count(&next_line("horizon")?, "horizon")?;
    if horizon == 0 {
        return Err(SimError::MapFormat("horizon must be positive".into()));
    }

    let mut grid_lines = Vec::with_capacity(rows);
    for i in 0..rows {
        grid_lines.push(next_line(&format!("grid row {i}"))?);
    }
    let refs: Vec<&str> = grid_lines.iter().map(String::as_str).collect();
    let layout = GridMap::build(rows, cols, &refs)?;

    if layout.task_endpoints.len() != endpoint_count {
        return Err(SimError::MapFormat(format!(
            "declared {endpoint_count} endpoints, map has {}",
            layout.task_endpoints.len()
        )));
    }
    if layout.spawns.len() != agent_count {
        return Err(SimError::MapFormat(format!(
            "declared {agent_count} agents, map has {}",
            layout.spawns.len()
        )));
    }

    // Endpoint arena: task endpoints first (task files index these), then
    // one home endpoint per agent.
    let mut endpoints = Vec::with_capacity(endpoint_count + agent_count);
    for &cell in layout.task_endpoints.iter().chain(&layout.spawns) {
        let id = EndpointId(endpoints.len() as u32);
        endpoints.push(Endpoint::new(id, cell, &layout.grid));
    }

    let agents: Vec<Agent> = layout
        .spawns
        .iter()
        .enumerate()
        .map(|(i, &cell)| Agent::new(AgentId(i as u32), cell))
        .collect();

    let token = Token::new(layout.grid, &layout.spawns, horizon);
    Ok((token, endpoints, agents, horizon))
}

fn parse_dimensions(line: &str) -> SimResult<(usize, usize)> {
    let mut parts = line.trim().split(',');
    let rows = parts
        .next()
        .and_then(|p| p.trim().parse::<usize>().ok())
        .ok_or_else(|| SimError::MapFormat(format!("bad dimension line {line:?}")))?;
    let cols = parts
        .next()
        .and_then(|p| p.trim().parse::<usize>().ok())
        .ok_or_else(|| SimError::MapFormat(format!("bad dimension line {line:?}")))?;
    if rows == 0 || cols == 0 {
        return Err(SimError::MapFormat("grid dimensions must be positive".into()));
    }
    Ok((rows, cols))
}

fn parse_count(line: &str, what: &str) -> SimResult<usize> {
    line.trim()
        .parse::<usize>()
        .map_err(|_| SimError::MapFormat(format!("bad {what}: {line:?}")))
}

// ── Task parsing ──────────────────────────────────────────────────────────────

fn parse_tasks<T: Read>(task: T, sim: &mut Simulation) -> SimResult<()> {
    let mut lines = BufReader::new(task).lines();
    let count_line = lines
        .next()
        .ok_or_else(|| SimError::TaskFormat("missing task count line".into()))?
        .map_err(SimError::Io)?;
    let count: usize = count_line
        .trim()
        .parse()
        .map_err(|_| SimError::TaskFormat(format!("bad task count: {count_line:?}")))?;

    for i in 0..count {
        let line = lines
            .next()
            .ok_or_else(|| SimError::TaskFormat(format!("missing task record {i}")))?
            .map_err(SimError::Io)?;
        let fields: Vec<u64> = line
            .split_whitespace()
            .map(|f| {
                f.parse::<u64>()
                    .map_err(|_| SimError::TaskFormat(format!("task {i}: bad field {f:?}")))
            })
            .collect::<SimResult<_>>()?;
        let [release, start, goal, desired_start, desired_goal] = fields[..] else {
            return Err(SimError::TaskFormat(format!(
                "task {i}: expected 5 fields, got {}",
                fields.len()
            )));
        };

        let endpoint_count = sim.endpoints().len() as u64;
        if start >= endpoint_count || goal >= endpoint_count {
            return Err(SimError::TaskFormat(format!(
                "task {i}: endpoint index out of range (have {endpoint_count})"
            )));
        }
        if release >= sim.horizon() as u64 {
            return Err(SimError::TaskFormat(format!(
                "task {i}: release tick {release} beyond horizon {}",
                sim.horizon()
            )));
        }

        sim.add_task(Task::new(
            TaskId(i as u32),
            EndpointId(start as u32),
            EndpointId(goal as u32),
            Tick(release),
            Tick(desired_start),
            Tick(desired_goal),
        ));
    }
    Ok(())
}
