//! Grid map construction and cell geometry.
//!
//! # Data layout
//!
//! Cells are flat indices `row * width + col` over the *bordered* grid: the
//! declared interior is `rows × cols`, and a one-cell border is added on all
//! four sides regardless of input content.  Border cells are never walkable
//! and never endpoints, so a search expanding only walkable cells can never
//! index out of range.
//!
//! # Cell symbols
//!
//! | Symbol | Meaning                                             |
//! |--------|-----------------------------------------------------|
//! | `@`    | blocked                                             |
//! | `e`    | task endpoint (pickup/delivery target)              |
//! | `r`    | robot home — both a home endpoint and an agent spawn|
//! | `.`    | free cell                                           |
//!
//! Any other symbol is rejected with [`GridError::MapFormat`].

use mapd_core::Cell;

use crate::{GridError, GridResult};

// ── GridMap ───────────────────────────────────────────────────────────────────

/// Static walkability/endpoint grid, border included.  Read-only after
/// [`GridMap::build`].
#[derive(Debug, Clone)]
pub struct GridMap {
    /// Columns, border included (declared cols + 2).
    width: usize,
    /// Rows, border included (declared rows + 2).
    height: usize,
    /// `walkable[cell]` — false for `@` cells and the whole border.
    walkable: Vec<bool>,
    /// `endpoint[cell]` — true for `e` and `r` cells.
    endpoint: Vec<bool>,
}

/// Everything extracted from the map body: the grid itself plus the cells
/// that name endpoints and spawn agents, in declaration order (row-major).
#[derive(Debug, Clone)]
pub struct MapLayout {
    pub grid: GridMap,
    /// Cells marked `e`, in declaration order.  Task files index these.
    pub task_endpoints: Vec<Cell>,
    /// Cells marked `r`, in declaration order.  One agent spawns per cell,
    /// and each doubles as that agent's home endpoint.
    pub spawns: Vec<Cell>,
}

impl GridMap {
    /// Build a grid from `rows` lines of `cols` symbols.
    ///
    /// `rows`/`cols` are the *interior* dimensions; the returned grid is two
    /// cells larger in each direction.  Fails if the line count or any line
    /// length mismatches the declared size, or on an unrecognized symbol.
    pub fn build(rows: usize, cols: usize, lines: &[&str]) -> GridResult<MapLayout> {
        if lines.len() != rows {
            return Err(GridError::MapFormat(format!(
                "expected {rows} map rows, got {}",
                lines.len()
            )));
        }

        let width = cols + 2;
        let height = rows + 2;
        let mut grid = GridMap {
            width,
            height,
            walkable: vec![false; width * height],
            endpoint: vec![false; width * height],
        };
        let mut task_endpoints = Vec::new();
        let mut spawns = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(GridError::MapFormat(format!(
                    "row {i}: expected {cols} symbols, got {}",
                    line.chars().count()
                )));
            }
            for (j, symbol) in line.chars().enumerate() {
                // +1 on both axes: the border occupies row 0 / col 0.
                let cell = grid.cell_at(i + 1, j + 1);
                match symbol {
                    '@' => {}
                    '.' => grid.walkable[cell.index()] = true,
                    'e' => {
                        grid.walkable[cell.index()] = true;
                        grid.endpoint[cell.index()] = true;
                        task_endpoints.push(cell);
                    }
                    'r' => {
                        grid.walkable[cell.index()] = true;
                        grid.endpoint[cell.index()] = true;
                        spawns.push(cell);
                    }
                    other => {
                        return Err(GridError::MapFormat(format!(
                            "row {i}, col {j}: unrecognized symbol {other:?}"
                        )));
                    }
                }
            }
        }

        Ok(MapLayout { grid, task_endpoints, spawns })
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    /// Columns, border included.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows, border included.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total cell count, border included.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    // ── Cell geometry ─────────────────────────────────────────────────────

    /// Flat index for `(row, col)` in bordered coordinates.
    #[inline]
    pub fn cell_at(&self, row: usize, col: usize) -> Cell {
        debug_assert!(row < self.height && col < self.width);
        Cell((row * self.width + col) as u32)
    }

    /// `(row, col)` in bordered coordinates.
    #[inline]
    pub fn coords(&self, cell: Cell) -> (usize, usize) {
        (cell.index() / self.width, cell.index() % self.width)
    }

    /// `(x, y)` with the border offset removed — the coordinate system of
    /// every output record.
    #[inline]
    pub fn interior_xy(&self, cell: Cell) -> (usize, usize) {
        let (row, col) = self.coords(cell);
        (col - 1, row - 1)
    }

    // ── Flags ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.walkable[cell.index()]
    }

    #[inline]
    pub fn is_endpoint(&self, cell: Cell) -> bool {
        self.endpoint[cell.index()]
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// The 4-connected *walkable* neighbors of `cell`.
    ///
    /// `cell` must itself be interior (guaranteed for any walkable cell —
    /// the border is blocked), so the index arithmetic cannot escape the
    /// grid.
    pub fn walkable_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let w = self.width as u32;
        let c = cell.0;
        [c - 1, c + 1, c - w, c + w]
            .into_iter()
            .map(Cell)
            .filter(|&n| self.walkable[n.index()])
    }
}
