//! Space-time shortest-path search over the Token's reservations.
//!
//! # Search space
//!
//! States are `(cell, tick)` pairs.  From `(c, t)` the agent may wait in
//! place or step to a walkable 4-neighbor, arriving at tick `t + 1`;
//! waiting is an ordinary move, not a separate code path.  A move is
//! forbidden if the destination cell is reserved by another agent at
//! `t + 1` (vertex conflict) or if it would swap cells with another
//! agent's reserved move across the same tick boundary (edge conflict).
//!
//! Edge cost is uniform, so `g` equals elapsed ticks and the endpoint's
//! precomputed BFS table is an exact, admissible `h`.  Heap entries order
//! by `f`, then lower `h`, then lower cell index, then tick, so results
//! are reproducible across runs.
//!
//! The horizon bounds the state space: the search fails (returns `None`)
//! rather than plan past the end of the reservation buffers.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use mapd_core::{AgentId, Cell, Tick};
use mapd_grid::Endpoint;
use mapd_token::Token;

/// Plan a conflict-free segment for `agent` from `from` (its committed cell
/// at `start`) to `goal`'s cell.
///
/// With `park` set, a goal arrival is only accepted if the goal cell stays
/// unreserved by every other agent from the arrival tick to the horizon —
/// required for the final delivery leg, where the agent parks on the goal.
///
/// Returns the cell sequence including both ends (`result[0] == from`), or
/// `None` if no conflict-free arrival exists within the horizon.
pub fn plan_segment(
    token: &Token,
    agent: AgentId,
    from: Cell,
    start: Tick,
    goal: &Endpoint,
    park: bool,
) -> Option<Vec<Cell>> {
    let horizon = token.horizon();
    if start.index() >= horizon || !goal.reachable(from) {
        return None;
    }

    let accepts = |cell: Cell, tick: Tick| -> bool {
        cell == goal.cell && (!park || token.cell_free_from(cell, tick, agent))
    };

    // Min-heap keyed (f, h, cell, tick); Reverse flips BinaryHeap to a min-heap.
    let mut open: BinaryHeap<Reverse<(u32, u32, Cell, Tick)>> = BinaryHeap::new();
    let mut closed: FxHashSet<(Cell, Tick)> = FxHashSet::default();
    // parent[(cell, t)] = cell occupied at t - 1 on the best-known path.
    let mut parent: FxHashMap<(Cell, Tick), Cell> = FxHashMap::default();

    let h0 = goal.distance(from);
    open.push(Reverse((h0, h0, from, start)));
    closed.insert((from, start));

    while let Some(Reverse((_, _, cell, tick))) = open.pop() {
        if accepts(cell, tick) {
            return Some(reconstruct(&parent, cell, tick, start));
        }

        let next_tick = tick + 1;
        if next_tick.index() >= horizon {
            continue;
        }

        // Wait in place, then the four grid steps.
        let steps = std::iter::once(cell).chain(token.grid().walkable_neighbors(cell));
        for next in steps {
            if closed.contains(&(next, next_tick)) {
                continue;
            }
            if token.vertex_reserved(next, next_tick, agent)
                || token.edge_reserved(cell, next, next_tick, agent)
            {
                continue;
            }
            let h = goal.distance(next);
            if h == mapd_grid::INFINITY {
                continue;
            }
            closed.insert((next, next_tick));
            parent.insert((next, next_tick), cell);
            let g = (next_tick - start) as u32;
            open.push(Reverse((g + h, h, next, next_tick)));
        }
    }

    None
}

fn reconstruct(
    parent: &FxHashMap<(Cell, Tick), Cell>,
    goal: Cell,
    arrival: Tick,
    start: Tick,
) -> Vec<Cell> {
    let mut cells = vec![goal];
    let mut cell = goal;
    let mut tick = arrival;
    while tick > start {
        cell = parent[&(cell, tick)];
        tick = Tick(tick.0 - 1);
        cells.push(cell);
    }
    cells.reverse();
    cells
}
