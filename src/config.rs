//! Immutable run configuration.
//!
//! Built from `LifeConfig::default()` plus consuming builder methods; the CLI
//! maps its flags onto the same builders.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{LifeError, LifeResult};
use crate::torus::{Coord, Glyphs, Grid, LifeRule, OutputMode, RunOptions, Strategy};

/// A glider heading towards increasing row and column.
pub const GLIDER: [Coord; 5] = [(0, 2), (1, 2), (2, 2), (2, 1), (1, 0)];

#[derive(Clone, Debug)]
pub struct LifeConfig {
    pub output: OutputMode,
    pub glyphs: Glyphs,
    /// Steps per run. In data-generation mode every trial runs this many
    /// steps per strategy.
    pub iterations: u64,
    /// Pause after each step.
    pub delay: Duration,
    /// Run the timing sweep and persist results instead of a single grid.
    pub generate_data: bool,
    /// Number of sweep trials; trial `i` uses `5 * i` rows.
    pub trials: usize,
    /// Columns of every sweep grid.
    pub test_width: usize,
    /// Strategy for single-grid mode.
    pub strategy: Strategy,
    pub rule: LifeRule,
    pub rows: usize,
    pub cols: usize,
    pub start_cells: Vec<Coord>,
    /// Worker threads. `None` means one per logical CPU.
    pub threads: Option<usize>,
    /// Where sweep results are written.
    pub output_path: PathBuf,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            output: OutputMode::None,
            glyphs: Glyphs::default(),
            iterations: 1000,
            delay: Duration::ZERO,
            generate_data: false,
            trials: 5,
            test_width: 10,
            strategy: Strategy::Parallel,
            rule: LifeRule::default(),
            rows: 5,
            cols: 10,
            start_cells: GLIDER.to_vec(),
            threads: None,
            output_path: PathBuf::from("output.txt"),
        }
    }
}

impl LifeConfig {
    pub fn output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn glyphs(mut self, glyphs: Glyphs) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn iterations(mut self, n: u64) -> Self {
        self.iterations = n;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn generate_data(mut self, enabled: bool) -> Self {
        self.generate_data = enabled;
        self
    }

    pub fn trials(mut self, n: usize) -> Self {
        self.trials = n;
        self
    }

    pub fn test_width(mut self, cols: usize) -> Self {
        self.test_width = cols;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn rule(mut self, rule: LifeRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn size(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    pub fn start_cells(mut self, cells: Vec<Coord>) -> Self {
        self.start_cells = cells;
        self
    }

    /// Set an explicit worker count.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Reject settings that cannot produce a grid for the selected mode.
    pub fn validate(&self) -> LifeResult<()> {
        if self.generate_data {
            if self.trials == 0 {
                return Err(LifeError::InvalidConfig(
                    "data generation needs at least one trial".to_string(),
                ));
            }
            if self.test_width == 0 {
                return Err(LifeError::InvalidConfig(
                    "test width must be positive".to_string(),
                ));
            }
        } else if self.rows == 0 || self.cols == 0 {
            return Err(LifeError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            iterations: self.iterations,
            delay: self.delay,
            output: self.output,
            glyphs: self.glyphs.clone(),
        }
    }

    /// The single grid used outside data-generation mode.
    pub fn build_grid(&self) -> LifeResult<Grid> {
        Grid::with_rule(
            self.rows,
            self.cols,
            self.start_cells.iter().copied(),
            self.rule,
        )
    }
}
