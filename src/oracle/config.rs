//! Configuration for SAT oracle runs

use std::time::Duration;

/// How to invoke a SAT oracle
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Solver executable, looked up on `PATH` when not a path
    pub command: String,
    /// Extra arguments placed before the DIMACS file path
    pub args: Vec<String>,
    /// Wall-clock limit for one solve (None = wait forever)
    pub timeout: Option<Duration>,
    /// How often a running solve checks for cancellation and timeout
    pub poll_interval: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            command: "picosat".to_string(),
            args: Vec::new(),
            timeout: None,
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl OracleConfig {
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_timeout_option(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }
}
