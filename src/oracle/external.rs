//! SAT oracle backed by an external solver process

use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

use crate::dimacs::read_dimacs_header;
use crate::error::OracleError;
use crate::oracle::config::OracleConfig;
use crate::oracle::result::{OracleOutcome, parse_solver_output};
use crate::oracle::{CancelToken, SatOracle};

/// Runs `<command> <args...> <file>` and reads the verdict from stdout
#[derive(Debug, Clone, Default)]
pub struct ExternalOracle {
    config: OracleConfig,
}

impl ExternalOracle {
    pub fn new(config: OracleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn spawn(&self, path: &Path) -> Result<Child, OracleError> {
        Command::new(&self.config.command)
            .args(&self.config.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OracleError::NotFound(self.config.command.clone()),
                _ => OracleError::Io(e),
            })
    }
}

/// Read a pipe to the end on a helper thread so the child never blocks
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut text);
        }
        text
    })
}

fn stop(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl SatOracle for ExternalOracle {
    fn name(&self) -> &str {
        &self.config.command
    }

    fn solve_file(&self, path: &Path, cancel: &CancelToken) -> Result<OracleOutcome, OracleError> {
        let start = Instant::now();
        debug!(solver = %self.config.command, file = %path.display(), "starting SAT solver");

        let mut child = self.spawn(path)?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let deadline = self.config.timeout.map(|t| start + t);

        let status = loop {
            if cancel.is_cancelled() {
                stop(&mut child);
                return Err(OracleError::Cancelled);
            }
            if let Some(timeout) = self.config.timeout {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    warn!(?timeout, "SAT solver timed out");
                    stop(&mut child);
                    return Err(OracleError::Timeout(timeout));
                }
            }
            if let Some(status) = child.wait_timeout(self.config.poll_interval)? {
                break status;
            }
        };

        let output = stdout.join().unwrap_or_default();
        let errors = stderr.join().unwrap_or_default();
        let elapsed = start.elapsed();

        let parsed = read_dimacs_header(path)
            .map_err(OracleError::from)
            .and_then(|(num_vars, _)| parse_solver_output(&output, status.code(), num_vars));
        let (verdict, model) = match parsed {
            Ok(parsed) => parsed,
            Err(_) if !status.success() => {
                return Err(OracleError::Failed {
                    status: status.to_string(),
                    stderr: errors.trim().to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        info!(solver = %self.config.command, %verdict, ?elapsed, "SAT solver finished");

        Ok(OracleOutcome {
            solver: self.config.command.clone(),
            verdict,
            model,
            elapsed,
            output,
        })
    }
}
