//! Configuration for parallel depth sweeps

use std::time::Duration;

/// Configuration for a depth sweep
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Number of worker threads to spawn
    pub num_workers: usize,
    /// Overall timeout for the sweep
    pub timeout: Option<Duration>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            timeout: None,
        }
    }
}

impl SweepConfig {
    /// Set the number of workers (at least one)
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }

    /// Set the overall timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the overall timeout from an Option
    pub fn with_timeout_option(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Workers actually worth spawning for `depths` depths
    pub fn effective_workers(&self, depths: usize) -> usize {
        self.num_workers.min(depths).max(1)
    }
}
