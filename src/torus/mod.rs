//! Toroidal Life engine: grid, rule, worker pool and steppers.

mod grid;
mod pool;
mod rules;
mod stepper;

pub use grid::{Coord, Glyphs, Grid, Update};
pub use pool::WorkerPool;
pub use rules::{LifeRule, RuleTable};
pub use stepper::{OutputMode, RunOptions, StepReport, Stepper, Strategy, chunk_ranges};
