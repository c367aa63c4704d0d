//! Generation stepping: sequential and pool-parallel scans over one frozen
//! grid, followed by a single batch commit.

use std::fmt;
use std::io::Write;
use std::ops::Range;
use std::str::FromStr;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, trace};

use super::grid::{Glyphs, Grid, Update};
use super::pool::WorkerPool;
use crate::error::{LifeError, LifeResult};

/// Chunks handed out per worker thread in a parallel step.
const CHUNKS_PER_WORKER: usize = 4;

/// How a generation is evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// One thread, row-major order.
    Sequential,
    /// Contiguous index chunks evaluated on the worker pool.
    #[default]
    Parallel,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Parallel, Strategy::Sequential];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Sequential => "single",
            Strategy::Parallel => "multi",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "sequential" => Ok(Strategy::Sequential),
            "multi" | "parallel" => Ok(Strategy::Parallel),
            other => Err(LifeError::InvalidConfig(format!(
                "unknown strategy: {other} (expected single or multi)"
            ))),
        }
    }
}

/// Whether the grid is printed before each step of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    None,
    Console,
}

impl FromStr for OutputMode {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(OutputMode::None),
            "console" => Ok(OutputMode::Console),
            other => Err(LifeError::InvalidConfig(format!(
                "unknown output mode: {other} (expected none or console)"
            ))),
        }
    }
}

/// Outcome of advancing one generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// Wall-clock time of evaluate, gather and commit.
    pub elapsed: Duration,
    /// Cells passed through the rule.
    pub evaluated: usize,
    /// Cells whose state flipped.
    pub changed: usize,
}

/// Per-run knobs for [`Stepper::run`].
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub iterations: u64,
    /// Sleep after each step.
    pub delay: Duration,
    pub output: OutputMode,
    pub glyphs: Glyphs,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            iterations: 1000,
            delay: Duration::ZERO,
            output: OutputMode::None,
            glyphs: Glyphs::default(),
        }
    }
}

/// Split `0..len` into at most `chunks` contiguous, non-empty ranges whose
/// sizes differ by at most one.
pub fn chunk_ranges(len: usize, chunks: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let chunks = chunks.clamp(1, len);
    let base = len / chunks;
    let extra = len % chunks;
    let mut start = 0;
    (0..chunks)
        .map(|i| {
            let size = base + usize::from(i < extra);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

/// Evaluate every cell in `range` against `grid`, returning the changes and
/// the number of cells visited.
fn evaluate_range(grid: &Grid, range: Range<usize>) -> (Vec<Update>, usize) {
    let mut updates = Vec::new();
    let mut evaluated = 0usize;
    for index in range {
        evaluated += 1;
        if let Some(update) = grid.evaluate_cell(grid.coord_of(index)) {
            updates.push(update);
        }
    }
    (updates, evaluated)
}

/// Advances grids one generation at a time using an injected worker pool.
pub struct Stepper<'p> {
    pool: &'p WorkerPool,
}

impl<'p> Stepper<'p> {
    pub fn new(pool: &'p WorkerPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &'p WorkerPool {
        self.pool
    }

    pub fn step(&self, grid: &mut Grid, strategy: Strategy) -> StepReport {
        match strategy {
            Strategy::Sequential => self.step_sequential(grid),
            Strategy::Parallel => self.step_parallel(grid),
        }
    }

    pub fn step_sequential(&self, grid: &mut Grid) -> StepReport {
        let start = Instant::now();
        let (updates, evaluated) = evaluate_range(grid, 0..grid.len());
        let changed = updates.len();
        grid.commit(updates);
        let report = StepReport {
            elapsed: start.elapsed(),
            evaluated,
            changed,
        };
        trace!(?report, "sequential step");
        report
    }

    /// Fan the flat index space out over the pool, wait for every chunk, then
    /// commit on the calling thread.
    pub fn step_parallel(&self, grid: &mut Grid) -> StepReport {
        let start = Instant::now();
        let ranges = chunk_ranges(grid.len(), self.pool.threads() * CHUNKS_PER_WORKER);
        let frozen: &Grid = grid;
        let partials: Vec<(Vec<Update>, usize)> = self.pool.install(|| {
            ranges
                .into_par_iter()
                .map(|range| evaluate_range(frozen, range))
                .collect()
        });

        let evaluated = partials.iter().map(|(_, n)| n).sum::<usize>();
        let updates: Vec<Update> = partials.into_iter().flat_map(|(u, _)| u).collect();
        let changed = updates.len();
        grid.commit(updates);
        let report = StepReport {
            elapsed: start.elapsed(),
            evaluated,
            changed,
        };
        trace!(?report, "parallel step");
        report
    }

    /// Step `options.iterations` times and return the mean step time in
    /// milliseconds. In console mode the grid is written to `sink` before
    /// every step.
    pub fn run<W: Write>(
        &self,
        grid: &mut Grid,
        strategy: Strategy,
        options: &RunOptions,
        sink: &mut W,
    ) -> LifeResult<f64> {
        if options.iterations == 0 {
            return Ok(0.0);
        }

        let mut total = Duration::ZERO;
        for _ in 0..options.iterations {
            if options.output == OutputMode::Console {
                writeln!(sink, "{}", grid.render(&options.glyphs))?;
            }
            total += self.step(grid, strategy).elapsed;
            if !options.delay.is_zero() {
                std::thread::sleep(options.delay);
            }
        }
        sink.flush()?;

        let mean_ms = total.as_secs_f64() * 1000.0 / options.iterations as f64;
        debug!(
            %strategy,
            iterations = options.iterations,
            cells = grid.len(),
            mean_ms,
            "run finished"
        );
        Ok(mean_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::time::Duration;

    use super::{OutputMode, RunOptions, Stepper, Strategy, chunk_ranges};
    use crate::torus::grid::{Glyphs, Grid};
    use crate::torus::pool::WorkerPool;

    fn blinker() -> Grid {
        Grid::new(5, 5, [(2, 1), (2, 2), (2, 3)]).unwrap()
    }

    #[test]
    fn chunk_ranges_cover_each_index_once() {
        for len in [0usize, 1, 7, 50, 1000] {
            for chunks in [1usize, 2, 3, 8, 64, 5000] {
                let ranges = chunk_ranges(len, chunks);
                let mut next = 0;
                for range in &ranges {
                    assert_eq!(range.start, next, "gap or overlap for len {len}");
                    assert!(!range.is_empty(), "empty chunk for len {len}");
                    next = range.end;
                }
                assert_eq!(next, len);
                assert!(ranges.len() <= chunks.max(1));
            }
        }
    }

    #[test]
    fn chunk_sizes_differ_by_at_most_one() {
        let sizes: Vec<usize> = chunk_ranges(50, 8).iter().map(|r| r.len()).collect();
        assert_eq!(sizes.len(), 8);
        let min = *sizes.iter().min().unwrap();
        let max = *sizes.iter().max().unwrap();
        assert!(max - min <= 1, "unbalanced chunks: {sizes:?}");
    }

    #[test]
    fn strategy_parses_source_names_and_aliases() {
        assert_eq!(Strategy::from_str("Single").unwrap(), Strategy::Sequential);
        assert_eq!(Strategy::from_str("multi").unwrap(), Strategy::Parallel);
        assert_eq!(Strategy::from_str("PARALLEL").unwrap(), Strategy::Parallel);
        assert_eq!(Strategy::from_str("sequential").unwrap(), Strategy::Sequential);
        assert!(Strategy::from_str("gpu").is_err());
        assert_eq!(Strategy::Parallel.to_string(), "multi");
    }

    #[test]
    fn output_mode_parses() {
        assert_eq!(OutputMode::from_str("Console").unwrap(), OutputMode::Console);
        assert_eq!(OutputMode::from_str("none").unwrap(), OutputMode::None);
        assert!(OutputMode::from_str("file").is_err());
    }

    #[test]
    fn step_reports_changed_cells() {
        let pool = WorkerPool::new(Some(2)).unwrap();
        let stepper = Stepper::new(&pool);
        for strategy in Strategy::ALL {
            let mut grid = blinker();
            let report = stepper.step(&mut grid, strategy);
            assert_eq!(report.evaluated, 25);
            // Two ends die, two cells are born.
            assert_eq!(report.changed, 4);
            assert_eq!(grid.live_cells(), vec![(1, 2), (2, 2), (3, 2)]);
        }
    }

    #[test]
    fn run_without_iterations_does_not_step() {
        let pool = WorkerPool::new(Some(1)).unwrap();
        let stepper = Stepper::new(&pool);
        let mut grid = blinker();
        let options = RunOptions {
            iterations: 0,
            ..RunOptions::default()
        };
        let mut sink: Vec<u8> = Vec::new();
        let mean = stepper
            .run(&mut grid, Strategy::Sequential, &options, &mut sink)
            .unwrap();
        assert_eq!(mean, 0.0);
        assert_eq!(grid, blinker());
        assert!(sink.is_empty());
    }

    #[test]
    fn console_run_renders_before_each_step() {
        let pool = WorkerPool::new(Some(2)).unwrap();
        let stepper = Stepper::new(&pool);
        let mut grid = blinker();
        let options = RunOptions {
            iterations: 2,
            delay: Duration::ZERO,
            output: OutputMode::Console,
            glyphs: Glyphs::new(".", "#"),
        };
        let mut sink: Vec<u8> = Vec::new();
        let mean = stepper
            .run(&mut grid, Strategy::Parallel, &options, &mut sink)
            .unwrap();
        assert!(mean >= 0.0);

        let horizontal = ".....\n.....\n.###.\n.....\n.....\n";
        let vertical = ".....\n..#..\n..#..\n..#..\n.....\n";
        let text = String::from_utf8(sink).unwrap();
        assert_eq!(text, format!("{horizontal}{vertical}"));
        assert_eq!(grid, blinker());
    }

    #[test]
    fn silent_run_writes_nothing() {
        let pool = WorkerPool::new(Some(2)).unwrap();
        let stepper = Stepper::new(&pool);
        let mut grid = blinker();
        let options = RunOptions {
            iterations: 3,
            ..RunOptions::default()
        };
        let mut sink: Vec<u8> = Vec::new();
        stepper
            .run(&mut grid, Strategy::Sequential, &options, &mut sink)
            .unwrap();
        assert!(sink.is_empty());
        assert_eq!(grid.live_cells(), vec![(1, 2), (2, 2), (3, 2)]);
    }
}
