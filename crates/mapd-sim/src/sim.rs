//! The `Simulation` aggregate and its deadline-bounded event loop.

use tracing::{debug, info, warn};

use mapd_agent::{Agent, DecisionStrategy};
use mapd_core::{Clock, TaskId, Tick};
use mapd_grid::Endpoint;
use mapd_token::{Task, TaskState, Token, TokenError};

use crate::SimResult;

// ── Run outcome ───────────────────────────────────────────────────────────────

/// Terminal state of a run.  `RUNNING → {COMPLETE, DEADLINE_TRUNCATED}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// All released work scheduled, or the tick-0 batch converged.
    Complete,
    /// The wall-clock budget ran out.  A normal outcome with a well-defined
    /// partial result, not an error.
    DeadlineTruncated,
}

/// Aggregate statistics and the truncation point of one run.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub state: RunState,
    /// The tick up to which committed paths and completed tasks are
    /// reported by the exporters.
    pub end_timestep: Tick,
    /// Wall-clock time spent inside decision calls.
    pub computation_ms: f64,
    /// Number of decision calls.
    pub computations: u64,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The driver: exclusive owner of the Token, the task and endpoint arenas,
/// and the agent roster, threaded by exclusive reference through the loop.
#[derive(Debug)]
pub struct Simulation {
    token: Token,
    tasks: Vec<Task>,
    endpoints: Vec<Endpoint>,
    agents: Vec<Agent>,
    horizon: usize,
    /// Tasks released at tick 0 — inspected by the bootstrap convergence
    /// check every time the global tick advances past zero.
    batch_zero: Vec<TaskId>,
}

impl Simulation {
    /// Assemble a loaded instance.  Tasks are added afterwards via
    /// [`add_task`](Self::add_task); use [`crate::load_readers`] rather
    /// than calling this directly.
    pub fn new(
        token: Token,
        endpoints: Vec<Endpoint>,
        agents: Vec<Agent>,
        horizon: usize,
    ) -> Self {
        Self {
            token,
            tasks: Vec::new(),
            endpoints,
            agents,
            horizon,
            batch_zero: Vec::new(),
        }
    }

    /// Register a task in the arena and the Token's release schedule.
    pub fn add_task(&mut self, task: Task) {
        self.token.schedule_task(task.release_tick, task.id);
        self.tasks.push(task);
    }

    /// Release the tick-0 batch into the pool (done once at load time) and
    /// remember it for the bootstrap convergence check.
    pub fn release_initial_batch(&mut self) {
        self.token.release_tasks_up_to(Tick::ZERO);
        self.batch_zero = self.token.pending().collect();
    }

    // ── Accessors (read by the exporters) ─────────────────────────────────

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    // ── The event loop ────────────────────────────────────────────────────

    /// Run to completion or to the wall-clock deadline (milliseconds).
    ///
    /// The loop invariant at entry of every iteration: `token.timestep()`
    /// equals the `finish_time` of the most recently acted agent (or zero
    /// on the first iteration).
    pub fn run<S: DecisionStrategy, C: Clock>(
        &mut self,
        strategy: &S,
        clock: &mut C,
        deadline_ms: f64,
    ) -> SimResult<RunReport> {
        clock.restart();
        let mut computation_ms = 0.0;
        let mut computations: u64 = 0;
        info!(algorithm = strategy.name(), deadline_ms, "run started");

        let (state, end_timestep) = loop {
            // Loop guard: work remains while the pool is non-empty or the
            // schedule still extends past the current tick.
            if !self.token.has_pending()
                && self.token.timestep() > self.token.last_release_tick()
            {
                break (RunState::Complete, self.completion_tick());
            }

            // ── ① Deadline ────────────────────────────────────────────────
            if clock.elapsed_ms() > deadline_ms {
                let end = self.truncation_tick();
                warn!(tick = %self.token.timestep(), end = %end, "deadline reached");
                break (RunState::DeadlineTruncated, end);
            }

            // ── ② Select the next agent to act ────────────────────────────
            let now = self.token.timestep();
            let idx = self.select_agent(now);
            let finish = self.agents[idx].finish_time;

            // The reservation buffers end at the horizon; an unclaimable
            // pending task would otherwise leave agents idling past it.
            if finish.index() >= self.horizon {
                warn!(tick = %now, "horizon reached with work still pending");
                break (RunState::Complete, self.completion_tick());
            }

            // ── ③ Release tasks whose tick falls in (now, finish] ─────────
            let released = self.token.release_tasks_up_to(finish);
            if released > 0 {
                debug!(count = released, upto = %finish, "tasks released");
            }

            // ── ④ Advance time; move the agent; complete its delivery ─────
            self.token.advance_timestep(finish)?;
            let agent = &mut self.agents[idx];
            agent.location = self.token.cell_of(agent.id, finish);
            if let Some(tid) = agent.current_task {
                if self.tasks[tid.index()].arrive_goal() <= finish {
                    self.tasks[tid.index()].complete()?;
                    agent.current_task = None;
                    debug!(agent = %agent.id, task = %tid, tick = %finish, "delivered");
                }
            }

            // ── ⑤ Bootstrap convergence ───────────────────────────────────
            //
            // Once the tick advances past zero and every tick-0 task is
            // either still unclaimed or committed to a positive delivery
            // tick, the initial batch is fully scheduled.  Only the tick-0
            // batch is inspected; multi-batch applicability is unconfirmed.
            if finish > Tick::ZERO && self.batch_zero_resolved() {
                info!(tick = %finish, "initial batch converged");
                break (RunState::Complete, finish);
            }

            // ── ⑥ Strategy prune hook (deferred release) ──────────────────
            strategy.prune_pending(&mut self.token, &self.tasks);

            // ── ⑦ Decide or idle ──────────────────────────────────────────
            if !self.token.has_pending() {
                self.agents[idx].finish_time = finish + 1;
                continue;
            }
            computations += 1;
            let before_ms = clock.elapsed_ms();
            let claimed = strategy.decide(
                &mut self.agents[idx],
                &mut self.token,
                &mut self.tasks,
                &self.endpoints,
            )?;
            computation_ms += clock.elapsed_ms() - before_ms;
            if !claimed {
                // Nothing claimable — the normal "nothing to do yet" path.
                self.agents[idx].finish_time = finish + 1;
            }
        };

        info!(
            state = ?state,
            end = %end_timestep,
            computations,
            computation_ms,
            "run finished"
        );
        Ok(RunReport {
            state,
            end_timestep,
            computation_ms,
            computations,
        })
    }

    /// The agent with the smallest `finish_time`; an agent already at the
    /// current tick wins outright so the tick never advances needlessly.
    fn select_agent(&self, now: Tick) -> usize {
        let mut best = 0;
        for (i, agent) in self.agents.iter().enumerate() {
            if agent.finish_time == now {
                return i;
            }
            if agent.finish_time < self.agents[best].finish_time {
                best = i;
            }
        }
        best
    }

    /// Deadline truncation point: the earliest committed delivery still in
    /// flight, or the current tick if none is.
    fn truncation_tick(&self) -> Tick {
        self.tasks
            .iter()
            .filter(|t| t.state() == TaskState::Taken)
            .map(Task::arrive_goal)
            .min()
            .unwrap_or(self.token.timestep())
    }

    /// Natural-completion end point: the last committed delivery tick.
    fn completion_tick(&self) -> Tick {
        self.tasks
            .iter()
            .filter(|t| t.state() != TaskState::Waiting)
            .map(Task::arrive_goal)
            .max()
            .unwrap_or(self.token.timestep())
    }

    /// Every tick-0 task is either still `Waiting` or committed to a
    /// positive delivery tick.  Vacuously false with no tick-0 batch, so a
    /// later-release schedule is unaffected.
    fn batch_zero_resolved(&self) -> bool {
        !self.batch_zero.is_empty()
            && self.batch_zero.iter().all(|&tid| {
                let task = &self.tasks[tid.index()];
                task.state() == TaskState::Waiting || task.arrive_goal() > Tick::ZERO
            })
    }

    // ── Validation ────────────────────────────────────────────────────────

    /// Check every committed reservation for vertex and edge collisions,
    /// over the full buffer (history is never rewritten, so past ticks are
    /// as checkable as future ones).  A violation here is a correctness
    /// bug in planning, fatal in testing.
    pub fn verify_reservations(&self) -> Result<(), TokenError> {
        let n = self.agents.len();
        for a in 0..n {
            for b in a + 1..n {
                let pa = self.token.path(self.agents[a].id);
                let pb = self.token.path(self.agents[b].id);
                for t in 1..self.horizon {
                    if pa[t] == pb[t] {
                        return Err(TokenError::Conflict {
                            agent: self.agents[a].id,
                            other: self.agents[b].id,
                            cell: pa[t],
                            tick: Tick(t as u64),
                            kind: mapd_token::ConflictKind::Vertex,
                        });
                    }
                    if pa[t] == pb[t - 1] && pa[t - 1] == pb[t] {
                        return Err(TokenError::Conflict {
                            agent: self.agents[a].id,
                            other: self.agents[b].id,
                            cell: pa[t],
                            tick: Tick(t as u64),
                            kind: mapd_token::ConflictKind::Edge,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
