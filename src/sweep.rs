//! Timing sweep over growing grids and persistence of its results.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::config::LifeConfig;
use crate::error::LifeResult;
use crate::torus::{Grid, Stepper, Strategy};

/// Rows added per sweep trial.
pub const ROW_STEP: usize = 5;

/// Mean step times per trial, index-aligned across the three lists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SweepResult {
    pub parallel_ms: Vec<f64>,
    pub sequential_ms: Vec<f64>,
    pub cell_counts: Vec<usize>,
}

/// `(rows, cols)` of each trial: a fixed width and `ROW_STEP * i` rows.
pub fn trial_sizes(trials: usize, width: usize) -> Vec<(usize, usize)> {
    (1..=trials).map(|i| (ROW_STEP * i, width)).collect()
}

/// Run every trial of the sweep. Each trial seeds a fresh grid with the
/// configured start cells, runs the parallel strategy, then runs the
/// sequential strategy on the state the parallel run left behind.
pub fn run_sweep<W: Write>(
    config: &LifeConfig,
    stepper: &Stepper<'_>,
    sink: &mut W,
) -> LifeResult<SweepResult> {
    let options = config.run_options();
    let mut result = SweepResult::default();

    for (rows, cols) in trial_sizes(config.trials, config.test_width) {
        let mut grid = Grid::with_rule(
            rows,
            cols,
            config.start_cells.iter().copied(),
            config.rule,
        )?;
        let parallel = stepper.run(&mut grid, Strategy::Parallel, &options, sink)?;
        let sequential = stepper.run(&mut grid, Strategy::Sequential, &options, sink)?;
        info!(
            rows,
            cols,
            parallel_ms = parallel,
            sequential_ms = sequential,
            "sweep trial finished"
        );

        result.parallel_ms.push(parallel);
        result.sequential_ms.push(sequential);
        result.cell_counts.push(rows * cols);
    }

    Ok(result)
}

impl SweepResult {
    pub fn len(&self) -> usize {
        self.cell_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_counts.is_empty()
    }

    /// Three bracketed lists, one per line: parallel means, sequential
    /// means, cell counts. No trailing newline.
    ///
    /// Floats use Rust's `Debug` formatting, which matches Python list
    /// literals for ordinary timings but writes exponents differently for
    /// very small or very large values (`1e-5` rather than `1e-05`).
    pub fn to_text(&self) -> String {
        format!(
            "{:?}\n{:?}\n{:?}",
            self.parallel_ms, self.sequential_ms, self.cell_counts
        )
    }

    /// Write [`SweepResult::to_text`] to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> LifeResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_text())?;
        info!(path = %path.display(), trials = self.len(), "sweep results written");
        Ok(())
    }
}
