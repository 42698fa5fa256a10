//! `mapd-agent` — the per-agent side of the token-passing protocol.
//!
//! An [`Agent`] owns only its identity, current location, `finish_time`
//! (the tick at which it next becomes free to decide), and its in-flight
//! task; its space-time path lives in the Token's reservation table.
//!
//! The two coordination variants are implementations of one
//! [`DecisionStrategy`] trait sharing the same search and reservation
//! machinery:
//!
//! - [`Totp`] — a claimed task leaves the shared pool the moment planning
//!   succeeds.
//! - [`Tptr`] — a claimed task stays visible in the pool (marked taken)
//!   until the simulated tick reaches its physical pickup time.

pub mod agent;
pub mod search;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use agent::Agent;
pub use search::plan_segment;
pub use strategy::{DecisionStrategy, Totp, Tptr};
