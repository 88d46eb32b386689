//! SAT oracles
//!
//! An oracle takes a DIMACS file and answers SAT or UNSAT. Two backends
//! are provided: an external solver process (picosat by default) and an
//! in-process solver.

pub mod builtin;
pub mod config;
pub mod external;
pub mod result;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use builtin::BuiltinOracle;
pub use config::OracleConfig;
pub use external::ExternalOracle;
pub use result::{Model, OracleOutcome, Verdict, parse_solver_output};

use crate::error::OracleError;

/// Shared flag asking running solves to stop
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A decision procedure for DIMACS instances
pub trait SatOracle {
    fn name(&self) -> &str;

    fn solve_file(&self, path: &Path, cancel: &CancelToken) -> Result<OracleOutcome, OracleError>;
}
