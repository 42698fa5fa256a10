//! The delivery task and its state machine.

use mapd_core::{AgentId, EndpointId, TaskId, Tick};

use crate::{TokenError, TokenResult};

/// Lifecycle of a task.  Transitions only ever move rightward:
/// `Waiting → Taken → Done`.  A task is never resurrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Released into the pool, unclaimed.
    Waiting,
    /// Claimed by exactly one agent; arrival ticks are committed.
    Taken,
    /// Delivered.  Terminal.
    Done,
}

/// One delivery job: move a package from a start endpoint to a goal endpoint.
///
/// `desired_start`/`desired_goal` are advisory metadata from the task file,
/// not enforced constraints.  `arrive_start`/`arrive_goal` are the committed
/// ticks at which the assigned agent's reserved path reaches each endpoint;
/// both are `Tick::ZERO` until assignment.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub start: EndpointId,
    pub goal: EndpointId,
    pub release_tick: Tick,
    pub desired_start: Tick,
    pub desired_goal: Tick,
    state: TaskState,
    assigned: AgentId,
    arrive_start: Tick,
    arrive_goal: Tick,
}

impl Task {
    pub fn new(
        id: TaskId,
        start: EndpointId,
        goal: EndpointId,
        release_tick: Tick,
        desired_start: Tick,
        desired_goal: Tick,
    ) -> Self {
        Self {
            id,
            start,
            goal,
            release_tick,
            desired_start,
            desired_goal,
            state: TaskState::Waiting,
            assigned: AgentId::INVALID,
            arrive_start: Tick::ZERO,
            arrive_goal: Tick::ZERO,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// The claiming agent, once `Taken`.
    #[inline]
    pub fn assigned_agent(&self) -> Option<AgentId> {
        (self.assigned != AgentId::INVALID).then_some(self.assigned)
    }

    /// Tick at which the assigned agent's path reaches the start endpoint.
    #[inline]
    pub fn arrive_start(&self) -> Tick {
        self.arrive_start
    }

    /// Tick at which the assigned agent's path reaches the goal endpoint.
    #[inline]
    pub fn arrive_goal(&self) -> Tick {
        self.arrive_goal
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// `Waiting → Taken`: commit the claim and both arrival ticks.
    pub fn assign(
        &mut self,
        agent: AgentId,
        arrive_start: Tick,
        arrive_goal: Tick,
    ) -> TokenResult<()> {
        if self.state != TaskState::Waiting {
            return Err(TokenError::InvalidTransition {
                task: self.id,
                from: self.state,
                to: TaskState::Taken,
            });
        }
        debug_assert!(arrive_goal >= arrive_start);
        self.state = TaskState::Taken;
        self.assigned = agent;
        self.arrive_start = arrive_start;
        self.arrive_goal = arrive_goal;
        Ok(())
    }

    /// `Taken → Done`: the owning agent completed the delivery.
    pub fn complete(&mut self) -> TokenResult<()> {
        if self.state != TaskState::Taken {
            return Err(TokenError::InvalidTransition {
                task: self.id,
                from: self.state,
                to: TaskState::Done,
            });
        }
        self.state = TaskState::Done;
        Ok(())
    }
}
