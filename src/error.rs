//! Error types for compilation, unrolling and solving

use std::time::Duration;

use thiserror::Error;

use crate::dimacs::DimacsError;

/// Failures detected while compiling or unrolling a circuit
///
/// Every variant aborts the translation; no partial instance is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("malformed gate {gate}: {reason}")]
    MalformedGate { gate: String, reason: String },

    #[error("unsupported gate kind '{0}' (only 'and' and 'not' are supported)")]
    UnsupportedGateKind(String),

    #[error("target has {found} bits but the circuit has {expected} next-state signals")]
    TargetWidthMismatch { expected: usize, found: usize },

    #[error("next-state signal {next} has no matching state signal {expected_state}")]
    UnpairedStateSignal {
        next: String,
        expected_state: String,
    },

    #[error("invalid depth {0}: at least one clock cycle is required")]
    InvalidDepth(i64),

    #[error("invalid target bit {found:?} at position {position} (expected '0' or '1')")]
    InvalidTargetBit { position: usize, found: char },

    #[error("target bit {0} has no next-state signal NS{0}")]
    MissingTargetSignal(usize),

    #[error("'{0}' is not a state register name (expected S<digits>)")]
    InvalidStateSignal(String),

    #[error("signals {first} and {second} share register index {index}")]
    DuplicateRegisterIndex {
        index: usize,
        first: String,
        second: String,
    },

    #[error("{frames} frames of {vars_per_frame} variables exceed the DIMACS variable range")]
    VariableOverflow { vars_per_frame: u32, frames: usize },
}

pub type EncodeResult<T> = Result<T, EncodeError>;

/// Failures while running a SAT oracle
///
/// These are reported to the caller, never retried.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("SAT solver '{0}' not found")]
    NotFound(String),

    #[error("SAT solver timed out after {0:?}")]
    Timeout(Duration),

    #[error("SAT solver run was cancelled")]
    Cancelled,

    #[error("SAT solver exited with {status} and no verdict: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("could not interpret solver output: {0}")]
    Output(String),

    #[error("invalid DIMACS input: {0}")]
    Dimacs(#[from] DimacsError),

    #[error("built-in solver error: {0}")]
    Solver(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
