//! `mapd-core` — foundational types for the mapd token-passing simulator.
//!
//! This crate is a dependency of every other `mapd-*` crate.  It has no
//! `mapd-*` dependencies and almost no external ones (only optional
//! `serde`).  Error enums live in the subsystem crates that raise them.
//!
//! # What lives here
//!
//! | Module    | Contents                                        |
//! |-----------|-------------------------------------------------|
//! | [`ids`]   | `AgentId`, `TaskId`, `EndpointId`, `Cell`       |
//! | [`time`]  | `Tick`, the injectable [`Clock`] abstraction    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{AgentId, Cell, EndpointId, TaskId};
pub use time::{Clock, FakeClock, Tick, WallClock};
