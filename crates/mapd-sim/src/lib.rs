//! `mapd-sim` — instance loading and the event loop.
//!
//! # The event loop
//!
//! ```text
//! while tasks remain (pool non-empty, or schedule not yet exhausted):
//!   ① Deadline  — wall-clock budget exceeded → truncate and stop.
//!   ② Select    — the agent with the smallest finish_time (ties toward
//!                 one already at the current tick).
//!   ③ Release   — move tasks with release tick ≤ the selected agent's
//!                 finish_time into the Token's pool.
//!   ④ Advance   — global tick jumps to that finish_time; the agent's
//!                 location follows its reservation; a delivery whose
//!                 tick has arrived completes.
//!   ⑤ Converge  — bootstrap check: tick-0 batch fully scheduled → stop.
//!   ⑥ Prune     — strategy hook (deferred release drops picked-up tasks).
//!   ⑦ Decide    — claim-or-idle; timed for the computation statistics.
//! ```
//!
//! Exactly one decision procedure runs at a time and runs to completion;
//! the deadline is checked once per iteration, never inside a decision.

pub mod error;
pub mod loader;
pub mod sim;


pub use error::{SimError, SimResult};
pub use loader::{load_files, load_readers};
pub use sim::{RunReport, RunState, Simulation};
