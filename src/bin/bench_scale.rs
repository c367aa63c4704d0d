//! Mean step time of both strategies on square grids of growing size.
//!
//! Use with `--release` for meaningful numbers. Pass a thread count as the
//! first argument to pin the pool size.

use rand::RngCore;
use rand::SeedableRng;
use torus_life::torus::{Grid, Stepper, Strategy, WorkerPool};

const LIVE_DENSITY: f64 = 0.42;
const SEED: u64 = 0x5EED_1234_ABCD_EF01;

fn seed_grid(size: usize, density: f64) -> Grid {
    let mut rng = rand::rngs::StdRng::seed_from_u64(SEED);
    let threshold = (u64::MAX as f64 * density) as u64;
    let mut cells = Vec::new();
    for row in 0..size {
        for col in 0..size {
            if rng.next_u64() <= threshold {
                cells.push((row, col));
            }
        }
    }
    Grid::new(size, size, cells).expect("bench grid is non-empty and in bounds")
}

fn bench(stepper: &Stepper<'_>, size: usize, strategy: Strategy, iters: u64) -> f64 {
    let mut grid = seed_grid(size, LIVE_DENSITY);
    let mut total_ms = 0.0;
    for _ in 0..iters {
        total_ms += stepper.step(&mut grid, strategy).elapsed.as_secs_f64() * 1000.0;
    }
    std::hint::black_box(grid.population());
    total_ms / iters as f64
}

fn main() {
    let threads = std::env::args()
        .nth(1)
        .map(|v| v.parse::<usize>().expect("thread count must be a positive integer"));
    let pool = WorkerPool::new(threads).expect("failed to build worker pool");
    let stepper = Stepper::new(&pool);

    let scales: &[(usize, u64)] = &[(64, 200), (128, 100), (256, 50), (512, 20), (1024, 10)];

    println!("threads={}", pool.threads());
    println!(
        "{:<10} {:>10} {:>8} {:>14} {:>14} {:>9}",
        "Grid", "Cells", "Iters", "Single(ms)", "Multi(ms)", "Speedup"
    );
    println!("{}", "-".repeat(70));

    for &(size, iters) in scales {
        let single_ms = bench(&stepper, size, Strategy::Sequential, iters);
        let multi_ms = bench(&stepper, size, Strategy::Parallel, iters);
        println!(
            "{:<10} {:>10} {:>8} {:>14.4} {:>14.4} {:>8.2}x",
            format!("{}x{}", size, size),
            size * size,
            iters,
            single_ms,
            multi_ms,
            single_ms / multi_ms
        );
    }
}
