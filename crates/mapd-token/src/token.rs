//! The Token: the shared blackboard of the coordination protocol.
//!
//! # Invariants
//!
//! - At any tick `t`, no two agents' reservation rows hold the same cell
//!   (vertex-safety), and no two rows swap cells between `t-1` and `t`
//!   (edge-safety).  [`Token::reserve_path`] is the single write path and
//!   the single point of truth for both rules: a conflicting segment is
//!   rejected whole, never partially applied.
//! - `timestep` is monotonically non-decreasing.
//! - Reservation rows are monotone extensions of the past: a committed
//!   cell-time slot is never retracted.

use std::collections::VecDeque;

use mapd_core::{AgentId, Cell, TaskId, Tick};
use mapd_grid::GridMap;

use crate::{ConflictKind, ReleaseQueue, TokenError, TokenResult};

/// Shared coordination state: map, reservations, timestep, pending tasks.
///
/// The Token owns the read-only [`GridMap`] (everything that needs the map
/// reads it through the token) and one reservation row per agent, each
/// pre-filled out to the horizon with the agent's home cell.
#[derive(Debug)]
pub struct Token {
    grid: GridMap,
    timestep: Tick,
    horizon: usize,
    /// `paths[agent][tick]` — the committed space-time reservation of every
    /// agent, horizon length, agent-indexed.
    paths: Vec<Vec<Cell>>,
    /// Unclaimed (or, under deferred release, claimed-but-not-picked-up)
    /// tasks in FIFO claim order.
    pending: VecDeque<TaskId>,
    /// Tasks not yet released.
    schedule: ReleaseQueue,
}

impl Token {
    /// Build the token at load time: one reservation row per spawn cell,
    /// pre-filled with that home location for the entire horizon.
    pub fn new(grid: GridMap, spawns: &[Cell], horizon: usize) -> Self {
        let paths = spawns.iter().map(|&home| vec![home; horizon]).collect();
        Self {
            grid,
            timestep: Tick::ZERO,
            horizon,
            paths,
            pending: VecDeque::new(),
            schedule: ReleaseQueue::new(),
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    #[inline]
    pub fn timestep(&self) -> Tick {
        self.timestep
    }

    #[inline]
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    #[inline]
    pub fn agent_count(&self) -> usize {
        self.paths.len()
    }

    /// The full reservation row of `agent`.
    #[inline]
    pub fn path(&self, agent: AgentId) -> &[Cell] {
        &self.paths[agent.index()]
    }

    /// Where `agent`'s reservation puts it at `tick`.
    #[inline]
    pub fn cell_of(&self, agent: AgentId, tick: Tick) -> Cell {
        self.paths[agent.index()][tick.index()]
    }

    /// The cell `agent`'s reservation ends on — where it parks until its
    /// next decision.
    #[inline]
    pub fn parked_cell(&self, agent: AgentId) -> Cell {
        self.paths[agent.index()][self.horizon - 1]
    }

    /// Whether any agent other than `me` parks on `cell`.
    pub fn parked_by_other(&self, cell: Cell, me: AgentId) -> bool {
        (0..self.paths.len())
            .map(|i| AgentId(i as u32))
            .any(|other| other != me && self.parked_cell(other) == cell)
    }

    // ── Conflict queries (consulted by the path search) ───────────────────

    /// Vertex rule: is `cell` reserved by any agent other than `me` at `tick`?
    pub fn vertex_reserved(&self, cell: Cell, tick: Tick, me: AgentId) -> bool {
        let t = tick.index();
        self.paths
            .iter()
            .enumerate()
            .any(|(i, path)| AgentId(i as u32) != me && path[t] == cell)
    }

    /// Edge rule: would moving `from → to`, arriving at `tick`, swap cells
    /// with any other agent's reserved move over the same tick boundary?
    pub fn edge_reserved(&self, from: Cell, to: Cell, tick: Tick, me: AgentId) -> bool {
        let t = tick.index();
        debug_assert!(t >= 1);
        self.paths.iter().enumerate().any(|(i, path)| {
            AgentId(i as u32) != me && path[t] == from && path[t - 1] == to
        })
    }

    /// Whether `cell` is unreserved by everyone but `me` from `tick` to the
    /// horizon — the parking-safety test for a delivery goal.
    pub fn cell_free_from(&self, cell: Cell, tick: Tick, me: AgentId) -> bool {
        (tick.index()..self.horizon)
            .all(|t| !self.vertex_reserved(cell, Tick(t as u64), me))
    }

    // ── Task pool ─────────────────────────────────────────────────────────

    /// Add a task to the static schedule (load time only).
    pub fn schedule_task(&mut self, release_tick: Tick, task: TaskId) {
        self.schedule.push(release_tick, task);
    }

    /// Largest release tick in the schedule.
    pub fn last_release_tick(&self) -> Tick {
        self.schedule.last_release_tick()
    }

    /// Move every task with release tick `≤ tick` into the pending pool,
    /// preserving declaration order.  Returns how many were released.
    pub fn release_tasks_up_to(&mut self, tick: Tick) -> usize {
        let released = self.schedule.drain_through(tick);
        let n = released.len();
        self.pending.extend(released);
        n
    }

    /// Pending tasks in FIFO claim order.
    pub fn pending(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.pending.iter().copied()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Remove one task from the pool (immediate-commitment claim).
    /// Returns `false` if it was not pending.
    pub fn remove_pending(&mut self, task: TaskId) -> bool {
        match self.pending.iter().position(|&t| t == task) {
            Some(i) => {
                self.pending.remove(i);
                true
            }
            None => false,
        }
    }

    /// Keep only the pending tasks for which `keep` returns true
    /// (deferred-release pruning).
    pub fn retain_pending(&mut self, keep: impl FnMut(TaskId) -> bool) {
        let mut keep = keep;
        self.pending.retain(|&t| keep(t));
    }

    // ── Time ──────────────────────────────────────────────────────────────

    /// Advance the global timestep.  Regression is a protocol violation.
    pub fn advance_timestep(&mut self, tick: Tick) -> TokenResult<()> {
        if tick < self.timestep {
            return Err(TokenError::TimeRegression {
                current: self.timestep,
                requested: tick,
            });
        }
        self.timestep = tick;
        Ok(())
    }

    // ── Reservation writes ────────────────────────────────────────────────

    /// Commit `segment` as `agent`'s movement from `start` onward, parking
    /// on the segment's final cell for the rest of the horizon.
    ///
    /// Every slot that would be written — the segment *and* the parked tail —
    /// is checked against all other agents' reservations first; on any vertex
    /// or edge conflict nothing is written and the offending pair is
    /// reported.  Returns the arrival tick of the segment's final cell.
    pub fn reserve_path(
        &mut self,
        agent: AgentId,
        segment: &[Cell],
        start: Tick,
    ) -> TokenResult<Tick> {
        let Some(&parked) = segment.last() else {
            return Err(TokenError::EmptySegment { agent });
        };
        if start.index() + segment.len() > self.horizon {
            return Err(TokenError::HorizonOverrun {
                agent,
                start,
                len: segment.len(),
                horizon: self.horizon,
            });
        }
        debug_assert_eq!(
            segment[0],
            self.paths[agent.index()][start.index()],
            "segment must extend the agent's committed position"
        );

        // Phase 1: check every slot from the tick after `start` to the
        // horizon.  The slot at `start` itself is the already-committed
        // present and is not rewritten.
        let planned = |t: usize| -> Cell {
            debug_assert!(t >= start.index());
            match segment.get(t - start.index()) {
                Some(&cell) => cell,
                None => parked,
            }
        };
        for t in start.index() + 1..self.horizon {
            let mine = planned(t);
            let prev = planned(t - 1);
            for (i, path) in self.paths.iter().enumerate() {
                let other = AgentId(i as u32);
                if other == agent {
                    continue;
                }
                if path[t] == mine {
                    return Err(TokenError::Conflict {
                        agent,
                        other,
                        cell: mine,
                        tick: Tick(t as u64),
                        kind: ConflictKind::Vertex,
                    });
                }
                if path[t] == prev && path[t - 1] == mine {
                    return Err(TokenError::Conflict {
                        agent,
                        other,
                        cell: mine,
                        tick: Tick(t as u64),
                        kind: ConflictKind::Edge,
                    });
                }
            }
        }

        // Phase 2: all clear — write segment and parked tail.
        let row = &mut self.paths[agent.index()];
        for (offset, &cell) in segment.iter().enumerate() {
            row[start.index() + offset] = cell;
        }
        for slot in row.iter_mut().skip(start.index() + segment.len()) {
            *slot = parked;
        }

        Ok(start + (segment.len() as u64 - 1))
    }
}
