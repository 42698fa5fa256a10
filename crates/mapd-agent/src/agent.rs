//! Agent state.

use mapd_core::{AgentId, Cell, TaskId, Tick};

/// One mobile unit of the fleet.
///
/// The agent's reserved space-time path is held by the Token (keyed by
/// `id`); what lives here is the decision-facing state: where the agent is
/// at the current global tick, when it next becomes free, and which task it
/// is carrying.  `finish_time` and `current_task` are mutated only by the
/// agent's own decision call and by the driver's delivery-completion step.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    /// Current location — kept in sync with the reserved path by the driver
    /// each time the global tick advances.
    pub location: Cell,
    /// The tick at which this agent is next free to decide.
    pub finish_time: Tick,
    /// The claimed, not-yet-delivered task, if any.
    pub current_task: Option<TaskId>,
}

impl Agent {
    /// A freshly spawned agent, idle at its home cell at tick zero.
    pub fn new(id: AgentId, home: Cell) -> Self {
        Self {
            id,
            location: home,
            finish_time: Tick::ZERO,
            current_task: None,
        }
    }
}
