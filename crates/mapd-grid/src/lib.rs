//! `mapd-grid` — static environment for the mapd simulator.
//!
//! Two read-only structures are built once at load time:
//!
//! - [`GridMap`] — walkability and endpoint flags per cell, with a forced
//!   one-cell blocked border so every search has closed boundaries.
//! - [`Endpoint`] — a named target location plus a precomputed true
//!   shortest-path distance to every walkable cell (the admissible
//!   heuristic consumed by the agents' space-time search).
//!
//! Neither structure is ever mutated after construction.

pub mod error;
pub mod heuristic;
pub mod map;


pub use error::{GridError, GridResult};
pub use heuristic::{Endpoint, INFINITY};
pub use map::{GridMap, MapLayout};
