#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use torus_life::config::LifeConfig;
use torus_life::error::LifeResult;
use torus_life::sweep;
use torus_life::torus::{Coord, Glyphs, LifeRule, OutputMode, Stepper, Strategy, WorkerPool};

/// Game of Life on a torus, timed with sequential and parallel steppers.
#[derive(Parser, Debug)]
#[command(name = "torus-life")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Grid output before each step: none or console
    #[arg(long, default_value = "none")]
    output: OutputMode,

    /// Glyph for dead cells
    #[arg(long, default_value = "  ")]
    dead: String,

    /// Glyph for live cells
    #[arg(long, default_value = "[]")]
    alive: String,

    /// Steps per run (per strategy and trial when generating data)
    #[arg(short = 'n', long, default_value_t = 1000)]
    iterations: u64,

    /// Pause after each step, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Run the timing sweep and write results to --out
    #[arg(long)]
    generate_data: bool,

    /// Number of sweep trials; trial i uses 5*i rows
    #[arg(long, default_value_t = 5)]
    trials: usize,

    /// Columns of every sweep grid
    #[arg(long, default_value_t = 10)]
    test_width: usize,

    /// Stepping strategy outside data generation: single or multi
    #[arg(short, long, default_value = "multi")]
    strategy: Strategy,

    /// Live neighbours that bring a dead cell to life
    #[arg(long, default_value_t = 3)]
    birth: u8,

    /// Live neighbours, besides --birth, that keep a cell alive
    #[arg(long, default_value_t = 2)]
    survival: u8,

    /// Grid rows outside data generation
    #[arg(long, default_value_t = 5)]
    rows: usize,

    /// Grid columns outside data generation
    #[arg(long, default_value_t = 10)]
    cols: usize,

    /// Initially live cell as ROW,COL (repeatable; default is a glider)
    #[arg(long = "cell", value_parser = parse_cell)]
    cells: Vec<Coord>,

    /// Worker threads (default: one per logical CPU)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Sweep results file
    #[arg(long, default_value = "output.txt")]
    out: PathBuf,
}

fn parse_cell(s: &str) -> Result<Coord, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got {s:?}"))?;
    let row = row
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("bad row in {s:?}: {e}"))?;
    let col = col
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("bad column in {s:?}: {e}"))?;
    Ok((row, col))
}

impl Cli {
    fn into_config(self) -> LifeConfig {
        let mut config = LifeConfig::default()
            .output(self.output)
            .glyphs(Glyphs::new(self.dead, self.alive))
            .iterations(self.iterations)
            .delay(Duration::from_millis(self.delay_ms))
            .generate_data(self.generate_data)
            .trials(self.trials)
            .test_width(self.test_width)
            .strategy(self.strategy)
            .rule(LifeRule::new(self.birth, self.survival))
            .size(self.rows, self.cols)
            .output_path(self.out);
        if !self.cells.is_empty() {
            config = config.start_cells(self.cells);
        }
        if let Some(n) = self.threads {
            config = config.threads(n);
        }
        config
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(config: LifeConfig) -> LifeResult<()> {
    config.validate()?;

    // The pool lives for the whole run and is released when this scope ends,
    // including on early error returns.
    let pool = WorkerPool::new(config.threads)?;
    let stepper = Stepper::new(&pool);
    let mut out = io::stdout().lock();

    if config.generate_data {
        let result = sweep::run_sweep(&config, &stepper, &mut out)?;
        result.write_to(&config.output_path)?;
    } else {
        let mut grid = config.build_grid()?;
        let mean_ms = stepper.run(&mut grid, config.strategy, &config.run_options(), &mut out)?;
        info!(
            strategy = %config.strategy,
            rows = grid.rows(),
            cols = grid.cols(),
            iterations = config.iterations,
            threads = stepper.pool().threads(),
            mean_ms,
            "run complete"
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli.into_config()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
