//! The two coordination variants, behind one strategy seam.
//!
//! Both variants share the whole claim pipeline — candidate scan, chained
//! two-leg search, atomic reservation — and differ *only* in when a claimed
//! task leaves the shared pool:
//!
//! - **TOTP** (task-on-token-passing): at commitment, as soon as planning
//!   succeeds, however far in the future the pickup lies.
//! - **TPTR** (task-passing with task release): at physical pickup — the
//!   task stays in the pool, marked taken, until the global tick reaches
//!   its `arrive_start`; the driver's prune hook removes it then.  A
//!   later-deciding agent thus observes committed-but-pending tasks.

use tracing::{debug, warn};

use mapd_core::TaskId;
use mapd_grid::Endpoint;
use mapd_token::{Task, TaskState, Token, TokenError, TokenResult};

use crate::search::plan_segment;
use crate::Agent;

/// One coordination variant, selected once at configuration time.
pub trait DecisionStrategy {
    fn name(&self) -> &'static str;

    /// Driver hook, run after every time advance and before the decision
    /// call.  Default: nothing to prune.
    fn prune_pending(&self, _token: &mut Token, _tasks: &[Task]) {}

    /// The agent's decision procedure, called only when
    /// `token.timestep() == agent.finish_time` (the agent has just become
    /// idle at its current location).
    ///
    /// On success, atomically with respect to the Token: one pending task is
    /// selected, a conflict-free two-leg path is reserved, the task becomes
    /// `Taken` with both arrival ticks, and `agent.finish_time` moves to the
    /// delivery tick.  Returns `Ok(false)` — leaving all state untouched —
    /// when no claimable task exists; the caller idles the agent one tick.
    ///
    /// Reservation conflicts are handled internally by falling through to
    /// the next candidate; an `Err` here is a task-state bug, not a planning
    /// failure.
    fn decide(
        &self,
        agent: &mut Agent,
        token: &mut Token,
        tasks: &mut [Task],
        endpoints: &[Endpoint],
    ) -> TokenResult<bool>;
}

/// Immediate task commitment.
pub struct Totp;

impl DecisionStrategy for Totp {
    fn name(&self) -> &'static str {
        "TOTP"
    }

    fn decide(
        &self,
        agent: &mut Agent,
        token: &mut Token,
        tasks: &mut [Task],
        endpoints: &[Endpoint],
    ) -> TokenResult<bool> {
        try_claim(agent, token, tasks, endpoints, RemovePending::AtCommit)
    }
}

/// Deferred task release, keyed on physical pickup time.
pub struct Tptr;

impl DecisionStrategy for Tptr {
    fn name(&self) -> &'static str {
        "TPTR"
    }

    /// Drop every claimed task whose pickup tick has arrived.
    fn prune_pending(&self, token: &mut Token, tasks: &[Task]) {
        let now = token.timestep();
        token.retain_pending(|tid| {
            let task = &tasks[tid.index()];
            task.state() == TaskState::Waiting || now < task.arrive_start()
        });
    }

    fn decide(
        &self,
        agent: &mut Agent,
        token: &mut Token,
        tasks: &mut [Task],
        endpoints: &[Endpoint],
    ) -> TokenResult<bool> {
        try_claim(agent, token, tasks, endpoints, RemovePending::AtPickup)
    }
}

/// When a committed task leaves the pending pool.
#[derive(Clone, Copy, PartialEq, Eq)]
enum RemovePending {
    AtCommit,
    AtPickup,
}

/// The shared claim pipeline.
///
/// Scans `pending` in FIFO order and commits to the first task that can be
/// planned: start endpoint reachable from the agent's location, neither
/// endpoint parked on by another agent, and both search legs succeed.  A
/// candidate that fails any step falls through to the next — planning
/// failure is never an error, just "not this one".
fn try_claim(
    agent: &mut Agent,
    token: &mut Token,
    tasks: &mut [Task],
    endpoints: &[Endpoint],
    removal: RemovePending,
) -> TokenResult<bool> {
    let now = token.timestep();
    debug_assert_eq!(agent.finish_time, now, "decide called while busy");

    let candidates: Vec<TaskId> = token.pending().collect();
    for tid in candidates {
        let task = &tasks[tid.index()];
        if task.state() != TaskState::Waiting {
            continue; // visible under deferred release, but already claimed
        }
        let start_ep = &endpoints[task.start.index()];
        let goal_ep = &endpoints[task.goal.index()];
        if !start_ep.reachable(agent.location) || !goal_ep.reachable(start_ep.cell) {
            continue;
        }
        // An endpoint already serving as someone's parking spot cannot be
        // traversed-and-held; skip rather than burn search effort.
        if token.parked_by_other(start_ep.cell, agent.id)
            || token.parked_by_other(goal_ep.cell, agent.id)
        {
            continue;
        }

        // Leg 1: current location → pickup.  No parking requirement — the
        // agent rolls straight on toward the goal.
        let Some(leg1) = plan_segment(token, agent.id, agent.location, now, start_ep, false)
        else {
            continue;
        };
        let arrive_start = now + (leg1.len() as u64 - 1);

        // Leg 2: pickup → delivery, parking on the goal.
        let Some(leg2) =
            plan_segment(token, agent.id, start_ep.cell, arrive_start, goal_ep, true)
        else {
            continue;
        };

        let mut path = leg1;
        path.extend_from_slice(&leg2[1..]);

        let arrive_goal = match token.reserve_path(agent.id, &path, now) {
            Ok(arrival) => arrival,
            Err(err @ TokenError::Conflict { .. }) => {
                // The search honors the same constraints the write re-checks,
                // so this is unexpected — but a conflict must degrade to
                // "skip the candidate", never crash the driver.
                warn!(agent = %agent.id, task = %tid, %err, "reservation rejected after planning");
                continue;
            }
            Err(err) => return Err(err),
        };

        tasks[tid.index()].assign(agent.id, arrive_start, arrive_goal)?;
        if removal == RemovePending::AtCommit {
            token.remove_pending(tid);
        }
        agent.current_task = Some(tid);
        agent.finish_time = arrive_goal;

        debug!(
            agent = %agent.id,
            task = %tid,
            pickup = %arrive_start,
            delivery = %arrive_goal,
            "task claimed"
        );
        return Ok(true);
    }

    debug!(agent = %agent.id, tick = %now, "no claimable task");
    Ok(false)
}
