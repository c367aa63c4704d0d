use rand::RngCore;
use rand::SeedableRng;
use torus_life::torus::{Grid, LifeRule, Stepper, WorkerPool};

fn random_grid(rows: usize, cols: usize, density: f64, seed: u64, rule: LifeRule) -> Grid {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let threshold = (u64::MAX as f64 * density) as u64;
    let mut cells = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            if rng.next_u64() <= threshold {
                cells.push((row, col));
            }
        }
    }
    Grid::with_rule(rows, cols, cells, rule).unwrap()
}

fn run_parity_case(
    rows: usize,
    cols: usize,
    density: f64,
    steps: u64,
    seed: u64,
    threads: usize,
    rule: LifeRule,
) {
    let pool = WorkerPool::new(Some(threads)).unwrap();
    let stepper = Stepper::new(&pool);
    let mut sequential = random_grid(rows, cols, density, seed, rule);
    let mut parallel = sequential.clone();

    for step in 0..steps {
        let seq_report = stepper.step_sequential(&mut sequential);
        let par_report = stepper.step_parallel(&mut parallel);
        assert_eq!(
            seq_report.changed, par_report.changed,
            "changed-count mismatch at step {step} for {rows}x{cols} seed {seed} threads {threads}"
        );
        assert_eq!(
            sequential, parallel,
            "grid mismatch at step {step} for {rows}x{cols} density {density} seed {seed} threads {threads}"
        );
    }
}

#[test]
fn parity_sparse_mid_dense() {
    let rule = LifeRule::default();
    run_parity_case(96, 96, 0.10, 6, 0xA1, 4, rule);
    run_parity_case(96, 96, 0.42, 6, 0xB2, 4, rule);
    run_parity_case(96, 96, 0.83, 4, 0xC3, 4, rule);
}

#[test]
fn parity_multiple_seeds_and_pool_sizes() {
    for threads in [1usize, 2, 3, 16] {
        for seed in [11u64, 22, 33, 44] {
            run_parity_case(37, 53, 0.35, 7, seed, threads, LifeRule::default());
        }
    }
}

#[test]
fn parity_more_workers_than_cells() {
    run_parity_case(3, 4, 0.5, 5, 0x77, 64, LifeRule::default());
}

#[test]
fn parity_degenerate_strips() {
    for (rows, cols) in [(1, 40), (40, 1), (2, 2), (1, 1), (2, 31)] {
        run_parity_case(rows, cols, 0.5, 5, 0x5EED, 3, LifeRule::default());
    }
}

#[test]
fn parity_custom_rule() {
    // B2/S1 churns far more than B3/S23.
    run_parity_case(48, 64, 0.3, 6, 0xD4, 4, LifeRule::new(2, 1));
}
