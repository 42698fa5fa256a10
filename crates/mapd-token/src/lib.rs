//! `mapd-token` — the shared coordination state of the mapd simulator.
//!
//! Three pieces live here:
//!
//! - [`Task`] — one delivery job with its `WAITING → TAKEN → DONE` state
//!   machine and arrival bookkeeping.
//! - [`ReleaseQueue`] — the static schedule mapping release ticks to the
//!   tasks that appear at them.
//! - [`Token`] — the blackboard every decision procedure consults and
//!   mutates: the map, all agents' space-time reservations, the global
//!   timestep, and the FIFO pool of unclaimed tasks.
//!
//! Per the arena design, the Token holds `TaskId`s and agent-indexed
//! reservation rows — never references into other collections.  The task
//! arena itself (`Vec<Task>`) is owned by the simulation driver.

pub mod error;
pub mod release;
pub mod task;
pub mod token;


pub use error::{ConflictKind, TokenError, TokenResult};
pub use release::ReleaseQueue;
pub use task::{Task, TaskState};
pub use token::Token;
