//! In-process SAT oracle using varisat

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, bounded};
use tracing::{debug, warn};
use varisat::{CnfFormula, ExtendFormula, Solver};

use crate::dimacs::read_dimacs_file;
use crate::encoding::CnfInstance;
use crate::error::OracleError;
use crate::oracle::result::{Model, OracleOutcome, Verdict};
use crate::oracle::{CancelToken, SatOracle};

pub const BUILTIN_NAME: &str = "varisat";

/// Solves instances without leaving the process
///
/// The solver runs on its own thread. On timeout or cancellation the
/// thread is abandoned and finishes in the background.
#[derive(Debug, Clone)]
pub struct BuiltinOracle {
    timeout: Option<Duration>,
    poll_interval: Duration,
}

impl Default for BuiltinOracle {
    fn default() -> Self {
        Self {
            timeout: None,
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl BuiltinOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Solve an in-memory instance
    pub fn solve_instance(
        &self,
        instance: &CnfInstance,
        cancel: &CancelToken,
    ) -> Result<OracleOutcome, OracleError> {
        let start = Instant::now();
        let deadline = self.timeout.map(|t| start + t);
        let formula = to_formula(instance);

        debug!(
            vars = instance.num_vars(),
            clauses = instance.num_clauses(),
            "starting built-in solver"
        );

        let (tx, rx) = bounded(1);
        thread::spawn(move || {
            let mut solver = Solver::new();
            solver.add_formula(&formula);
            let result = solver
                .solve()
                .map(|sat| (sat, solver.model()))
                .map_err(|e| e.to_string());
            let _ = tx.send(result);
        });

        let (sat, model) = loop {
            if cancel.is_cancelled() {
                return Err(OracleError::Cancelled);
            }
            if let Some(timeout) = self.timeout {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    warn!(?timeout, "built-in solver timed out");
                    return Err(OracleError::Timeout(timeout));
                }
            }
            match rx.recv_timeout(self.poll_interval) {
                Ok(result) => break result.map_err(OracleError::Solver)?,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(OracleError::Solver("solver thread panicked".to_string()));
                }
            }
        };

        let verdict = if sat { Verdict::Sat } else { Verdict::Unsat };
        let model = model
            .filter(|_| sat)
            .map(|lits| {
                Model::from_dimacs(lits.iter().map(|l| l.to_dimacs() as i64), instance.num_vars())
            })
            .transpose()?;

        Ok(OracleOutcome {
            solver: BUILTIN_NAME.to_string(),
            verdict,
            model,
            elapsed: start.elapsed(),
            output: String::new(),
        })
    }
}

fn to_formula(instance: &CnfInstance) -> CnfFormula {
    let mut formula = CnfFormula::new();
    for clause in instance.clauses() {
        let lits: Vec<varisat::Lit> = clause
            .to_dimacs()
            .into_iter()
            .map(|v| varisat::Lit::from_dimacs(v as isize))
            .collect();
        formula.add_clause(&lits);
    }
    formula
}

impl SatOracle for BuiltinOracle {
    fn name(&self) -> &str {
        BUILTIN_NAME
    }

    fn solve_file(&self, path: &Path, cancel: &CancelToken) -> Result<OracleOutcome, OracleError> {
        let instance = read_dimacs_file(path)?;
        self.solve_instance(&instance, cancel)
    }
}
