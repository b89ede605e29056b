//! Explicit harness parameters.
//!
//! Every knob the experiments depend on is carried in [`HarnessConfig`] and
//! handed to the harness, so nothing is read from process-wide state.

use std::time::Duration;

use crate::error::ConfigError;

/// Number of workload invocations per experiment.
pub const WORKER_COUNT: usize = 4;

/// How long the non-blocking workload sleeps.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(1);

/// How many increments the blocking workload performs.
pub const DEFAULT_ITERATIONS: u64 = 10_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub worker_count: usize,
    pub pool_size: usize,
    pub pause: Duration,
    pub iterations: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            worker_count: WORKER_COUNT,
            pool_size: WORKER_COUNT,
            pause: DEFAULT_PAUSE,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl HarnessConfig {
    /// Sets the invocation count and resizes the pool to match.
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self.pool_size = worker_count;
        self
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        Ok(())
    }
}
