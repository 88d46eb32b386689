//! SAT oracle verdicts, models and output parsing

use std::fmt;
use std::time::Duration;

use crate::encoding::Var;
use crate::error::OracleError;

/// Answer of a SAT oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The target is reachable within the bound
    Sat,
    /// The target is unreachable within the bound
    Unsat,
    /// The solver gave up
    Unknown,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Sat => write!(f, "SAT"),
            Verdict::Unsat => write!(f, "UNSAT"),
            Verdict::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A (possibly partial) satisfying assignment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    values: Vec<Option<bool>>,
}

impl Model {
    /// Build from signed DIMACS literals over `num_vars` variables
    ///
    /// Zeros are ignored. A literal naming a variable above `num_vars`
    /// is an output error.
    pub fn from_dimacs<I: IntoIterator<Item = i64>>(
        literals: I,
        num_vars: u32,
    ) -> Result<Self, OracleError> {
        let mut values = vec![None; num_vars as usize];
        for lit in literals {
            if lit == 0 {
                continue;
            }
            let slot = usize::try_from(lit.unsigned_abs() - 1)
                .ok()
                .and_then(|index| values.get_mut(index))
                .ok_or_else(|| {
                    OracleError::Output(format!(
                        "model literal {} outside declared {} variables",
                        lit, num_vars
                    ))
                })?;
            *slot = Some(lit > 0);
        }
        Ok(Self { values })
    }

    pub fn value(&self, var: Var) -> Option<bool> {
        self.values.get(var.index()).copied().flatten()
    }

    /// Full assignment for `num_vars` variables, unassigned ones false
    pub fn assignment(&self, num_vars: u32) -> Vec<bool> {
        (0..num_vars as usize)
            .map(|i| self.values.get(i).copied().flatten().unwrap_or(false))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// Result of one oracle run
#[derive(Debug, Clone)]
pub struct OracleOutcome {
    pub solver: String,
    pub verdict: Verdict,
    pub model: Option<Model>,
    pub elapsed: Duration,
    /// Raw solver stdout, empty for in-process solvers
    pub output: String,
}

/// Interpret a solver's stdout in the SAT competition format
///
/// Reads the `s ...` status line and `v ...` value lines. Without a status
/// line, exit codes 10 and 20 mean SAT and UNSAT. Model literals must lie
/// within the instance's `num_vars` variables.
pub fn parse_solver_output(
    stdout: &str,
    exit_code: Option<i32>,
    num_vars: u32,
) -> Result<(Verdict, Option<Model>), OracleError> {
    let mut verdict = None;
    let mut literals = Vec::new();

    for line in stdout.lines() {
        let line = line.trim();
        let status = line.strip_prefix("s ").map(str::trim).unwrap_or(line);
        match status {
            "SATISFIABLE" | "SAT" => verdict = Some(Verdict::Sat),
            "UNSATISFIABLE" | "UNSAT" => verdict = Some(Verdict::Unsat),
            "UNKNOWN" | "INDETERMINATE" => verdict = Some(Verdict::Unknown),
            _ => {}
        }

        if let Some(values) = line.strip_prefix("v ") {
            for token in values.split_whitespace() {
                let lit: i64 = token
                    .parse()
                    .map_err(|_| OracleError::Output(format!("invalid model literal '{}'", token)))?;
                literals.push(lit);
            }
        }
    }

    let verdict = match (verdict, exit_code) {
        (Some(v), _) => v,
        (None, Some(10)) => Verdict::Sat,
        (None, Some(20)) => Verdict::Unsat,
        _ => return Err(OracleError::Output("no verdict in solver output".to_string())),
    };

    let model = if verdict == Verdict::Sat && !literals.is_empty() {
        Some(Model::from_dimacs(literals, num_vars)?)
    } else {
        None
    };
    Ok((verdict, model))
}
