//! Conway's Game of Life on a torus, with sequential and parallel steppers and
//! a timing sweep comparing them.

pub mod config;
pub mod error;
pub mod sweep;
pub mod torus;

pub use config::LifeConfig;
pub use error::{LifeError, LifeResult};
pub use torus::{Grid, LifeRule, Stepper, Strategy, WorkerPool};
