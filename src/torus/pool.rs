//! Worker pool handle shared by every parallel step of a run.

use tracing::{debug, warn};

use crate::error::LifeResult;

/// Owned rayon pool. Threads are released when the handle is dropped.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

#[inline]
fn auto_thread_count() -> usize {
    num_cpus::get().max(1)
}

/// Resolve a requested thread count, falling back to available parallelism.
fn resolve_thread_count(requested: Option<usize>) -> usize {
    match requested {
        Some(0) => {
            warn!("requested 0 worker threads, using 1");
            1
        }
        Some(n) => n,
        None => auto_thread_count(),
    }
}

impl WorkerPool {
    /// Build a pool with `threads` workers, or one per logical CPU when `None`.
    pub fn new(threads: Option<usize>) -> LifeResult<Self> {
        let threads = resolve_thread_count(threads);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("torus-life-{i}"))
            .build()?;
        debug!(threads, "worker pool started");
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `op` on the pool, blocking until it returns.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        debug!(threads = self.threads(), "worker pool released");
    }
}
