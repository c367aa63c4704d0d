//! Toroidal cell grid: state, neighbour counting and batch commits.

use std::fmt;

use tracing::trace;

use super::rules::{LifeRule, RuleTable};
use crate::error::{LifeError, LifeResult};

/// `(row, col)`, zero-based.
pub type Coord = (usize, usize);

/// A cell whose state flips in the next generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Update {
    pub coord: Coord,
    pub alive: bool,
}

/// Strings used by [`Grid::render`] for each cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyphs {
    pub dead: String,
    pub alive: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            dead: "  ".to_string(),
            alive: "[]".to_string(),
        }
    }
}

impl Glyphs {
    pub fn new(dead: impl Into<String>, alive: impl Into<String>) -> Self {
        Self {
            dead: dead.into(),
            alive: alive.into(),
        }
    }
}

// Row/col deltas of the eight neighbours, encoded as index into [up, same, down].
const NEIGHBOR_OFFSETS: [(usize, usize); 8] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (1, 0),
    (1, 2),
    (2, 0),
    (2, 1),
    (2, 2),
];

#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
    rule: LifeRule,
    table: RuleTable,
}

impl Grid {
    /// Build a B3/S23 grid with the listed cells alive.
    pub fn new<I>(rows: usize, cols: usize, alive: I) -> LifeResult<Self>
    where
        I: IntoIterator<Item = Coord>,
    {
        Self::with_rule(rows, cols, alive, LifeRule::default())
    }

    /// Build a grid evaluated with `rule`.
    ///
    /// Zero dimensions and seed cells outside `rows x cols` are rejected
    /// rather than wrapped.
    pub fn with_rule<I>(rows: usize, cols: usize, alive: I, rule: LifeRule) -> LifeResult<Self>
    where
        I: IntoIterator<Item = Coord>,
    {
        if rows == 0 || cols == 0 {
            return Err(LifeError::EmptyGrid { rows, cols });
        }
        let mut cells = vec![false; rows * cols];
        for (row, col) in alive {
            if row >= rows || col >= cols {
                return Err(LifeError::CellOutOfBounds {
                    row,
                    col,
                    rows,
                    cols,
                });
            }
            cells[row * cols + col] = true;
        }
        Ok(Self {
            rows,
            cols,
            cells,
            rule,
            table: RuleTable::new(rule),
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells, `rows * cols`.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    pub fn coord_of(&self, index: usize) -> Coord {
        (index / self.cols, index % self.cols)
    }

    #[inline(always)]
    pub fn index_of(&self, (row, col): Coord) -> usize {
        row * self.cols + col
    }

    /// State of `coord`, or `None` outside the grid.
    pub fn get(&self, (row, col): Coord) -> Option<bool> {
        (row < self.rows && col < self.cols).then(|| self.cells[row * self.cols + col])
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// True when no cell is alive.
    pub fn is_empty(&self) -> bool {
        !self.cells.contains(&true)
    }

    pub fn for_each_live<F: FnMut(usize, usize)>(&self, mut f: F) {
        for (index, _) in self.cells.iter().enumerate().filter(|(_, alive)| **alive) {
            let (row, col) = self.coord_of(index);
            f(row, col);
        }
    }

    /// Live cells in row-major order.
    pub fn live_cells(&self) -> Vec<Coord> {
        let mut out = Vec::new();
        self.for_each_live(|row, col| out.push((row, col)));
        out
    }

    /// Live neighbours of `coord` on the torus, the cell itself excluded.
    ///
    /// Each of the eight offsets is reduced modulo the grid size on its own,
    /// so on grids narrower than three cells a neighbour may be counted more
    /// than once.
    #[inline]
    pub fn neighbor_count(&self, (row, col): Coord) -> u8 {
        let row_idx = [
            (row + self.rows - 1) % self.rows,
            row,
            (row + 1) % self.rows,
        ];
        let col_idx = [
            (col + self.cols - 1) % self.cols,
            col,
            (col + 1) % self.cols,
        ];
        let mut count = 0u8;
        for &(dr, dc) in &NEIGHBOR_OFFSETS {
            count += self.cells[row_idx[dr] * self.cols + col_idx[dc]] as u8;
        }
        count
    }

    /// What `coord` becomes next generation, if it changes.
    #[inline]
    pub fn evaluate_cell(&self, coord: Coord) -> Option<Update> {
        let alive = self.cells[self.index_of(coord)];
        self.table
            .lookup(alive, self.neighbor_count(coord))
            .map(|alive| Update { coord, alive })
    }

    /// Apply one generation's updates. Each update touches a distinct cell,
    /// so order does not matter.
    ///
    /// Every update must lie inside the grid, as those produced by
    /// [`Grid::evaluate_cell`] do.
    pub fn commit<I>(&mut self, updates: I)
    where
        I: IntoIterator<Item = Update>,
    {
        let mut applied = 0usize;
        for Update { coord, alive } in updates {
            debug_assert!(
                coord.0 < self.rows && coord.1 < self.cols,
                "update {coord:?} outside {}x{} grid",
                self.rows,
                self.cols
            );
            let index = self.index_of(coord);
            self.cells[index] = alive;
            applied += 1;
        }
        trace!(applied, "committed generation");
    }

    /// One line per row, no trailing newline.
    pub fn render(&self, glyphs: &Glyphs) -> String {
        let width = glyphs.dead.len().max(glyphs.alive.len());
        let mut out = String::with_capacity(self.rows * (self.cols * width + 1));
        for (row_index, row) in self.cells.chunks(self.cols).enumerate() {
            if row_index > 0 {
                out.push('\n');
            }
            for &alive in row {
                out.push_str(if alive { &glyphs.alive } else { &glyphs.dead });
            }
        }
        out
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.rule == other.rule
            && self.cells == other.cells
    }
}

impl Eq for Grid {}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&Glyphs::default()))
    }
}
