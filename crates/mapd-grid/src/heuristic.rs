//! Endpoints and their precomputed distance tables.
//!
//! Each endpoint stores the true shortest-path distance (uniform edge cost,
//! 4-connected, walkable cells only) from its own cell to every cell on the
//! grid.  The table is exact, so it is trivially admissible as a heuristic
//! for any search targeting the endpoint; unreachable cells hold
//! [`INFINITY`].  Tables are computed once at load time and never mutated.

use std::collections::VecDeque;

use mapd_core::{Cell, EndpointId};

use crate::GridMap;

/// Distance sentinel for cells the endpoint cannot reach.
pub const INFINITY: u32 = u32::MAX;

/// A named location agents can target, with its heuristic table.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub id: EndpointId,
    pub cell: Cell,
    /// `dist[cell]` — true shortest-path length from `self.cell`, or
    /// [`INFINITY`] if unreachable.
    dist: Vec<u32>,
}

impl Endpoint {
    /// Compute the single-source shortest-path table from `cell` by BFS.
    pub fn new(id: EndpointId, cell: Cell, grid: &GridMap) -> Self {
        let mut dist = vec![INFINITY; grid.cell_count()];
        debug_assert!(grid.is_walkable(cell), "endpoint on a blocked cell");

        dist[cell.index()] = 0;
        let mut frontier = VecDeque::new();
        frontier.push_back(cell);

        while let Some(current) = frontier.pop_front() {
            let d = dist[current.index()];
            for neighbor in grid.walkable_neighbors(current) {
                if dist[neighbor.index()] == INFINITY {
                    dist[neighbor.index()] = d + 1;
                    frontier.push_back(neighbor);
                }
            }
        }

        Self { id, cell, dist }
    }

    /// True shortest-path distance from `from` to this endpoint, or
    /// [`INFINITY`] if disconnected.
    #[inline]
    pub fn distance(&self, from: Cell) -> u32 {
        self.dist[from.index()]
    }

    /// Whether the endpoint is reachable at all from `from`.
    #[inline]
    pub fn reachable(&self, from: Cell) -> bool {
        self.dist[from.index()] != INFINITY
    }
}
