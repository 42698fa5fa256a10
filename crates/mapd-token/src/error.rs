//! Token-subsystem error type.

use thiserror::Error;

use mapd_core::{AgentId, Cell, TaskId, Tick};

use crate::task::TaskState;

/// Which collision rule a rejected reservation violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Two agents occupying the same cell at the same tick.
    Vertex,
    /// Two agents swapping cells between consecutive ticks.
    Edge,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictKind::Vertex => write!(f, "vertex"),
            ConflictKind::Edge => write!(f, "edge"),
        }
    }
}

/// Errors produced by `mapd-token`.
#[derive(Debug, Error)]
pub enum TokenError {
    /// A reservation write would collide with an already-committed one.
    /// Internal to planning — the decision procedure catches this and moves
    /// on to the next candidate; it must never surface as a driver crash.
    #[error("{kind} conflict: {agent} vs {other} at {cell}, {tick}")]
    Conflict {
        agent: AgentId,
        other: AgentId,
        cell: Cell,
        tick: Tick,
        kind: ConflictKind,
    },

    #[error("timestep regression: current {current}, requested {requested}")]
    TimeRegression { current: Tick, requested: Tick },

    #[error("{agent}: segment of {len} cells at {start} overruns horizon {horizon}")]
    HorizonOverrun {
        agent: AgentId,
        start: Tick,
        len: usize,
        horizon: usize,
    },

    #[error("{agent}: empty path segment")]
    EmptySegment { agent: AgentId },

    #[error("task {task}: illegal transition {from:?} -> {to:?}")]
    InvalidTransition {
        task: TaskId,
        from: TaskState,
        to: TaskState,
    },
}

pub type TokenResult<T> = Result<T, TokenError>;
