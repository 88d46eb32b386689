//! Bounded model checking front end.
//!
//! Compiles a gate-level sequential circuit into a DIMACS CNF instance
//! that is satisfiable exactly when a target register state is reachable
//! from the all-zero reset state within a given number of clock cycles.

pub mod dimacs;
pub mod encoding;
pub mod error;
pub mod ir;
pub mod oracle;
pub mod parser;
pub mod sweep;

pub use error::{EncodeError, EncodeResult, OracleError};
