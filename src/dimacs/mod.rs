//! DIMACS CNF serialization
//!
//! Output layout:
//!
//! ```text
//! c <label>
//! p cnf <vars> <clauses>
//! <lit> <lit> ... 0
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::encoding::{Clause, CnfInstance, Lit};

/// Malformed DIMACS input
#[derive(Debug, Error)]
pub enum DimacsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("missing 'p cnf' header")]
    MissingHeader,
    #[error("header declares {declared} clauses but {found} were read")]
    ClauseCount { declared: usize, found: usize },
    #[error("last clause is not terminated by 0")]
    Unterminated,
}

/// Write `instance` in DIMACS format with a `c <label>` comment line
pub fn write_dimacs<W: Write>(out: &mut W, label: &str, instance: &CnfInstance) -> io::Result<()> {
    writeln!(out, "c {}", label)?;
    writeln!(out, "p cnf {} {}", instance.num_vars(), instance.num_clauses())?;
    for clause in instance.clauses() {
        writeln!(out, "{}", clause)?;
    }
    Ok(())
}

/// Write `instance` to `path`, replacing any existing file
pub fn write_dimacs_file(path: &Path, label: &str, instance: &CnfInstance) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_dimacs(&mut out, label, instance)?;
    out.flush()?;
    debug!(path = %path.display(), clauses = instance.num_clauses(), "wrote DIMACS file");
    Ok(())
}

/// Read a DIMACS CNF formula
///
/// Comments may appear anywhere; clauses may span lines. The header's
/// clause count and variable bound are checked.
pub fn read_dimacs<R: Read>(input: R) -> Result<CnfInstance, DimacsError> {
    let mut header: Option<(u32, usize)> = None;
    let mut clauses = Vec::new();
    let mut current: Vec<Lit> = Vec::new();

    for (index, line) in BufReader::new(input).lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('c') || trimmed.starts_with('%') {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('p') {
            if header.is_some() {
                return Err(syntax(line_number, "duplicate header"));
            }
            header = Some(parse_header(rest, line_number)?);
            continue;
        }

        let Some((num_vars, _)) = header else {
            return Err(DimacsError::MissingHeader);
        };

        for token in trimmed.split_whitespace() {
            let value: i64 = token
                .parse()
                .map_err(|_| syntax(line_number, format!("invalid literal '{}'", token)))?;
            if value == 0 {
                clauses.push(Clause::new(std::mem::take(&mut current)));
                continue;
            }
            let lit = Lit::from_dimacs(value)
                .filter(|l| l.var().id() <= num_vars)
                .ok_or_else(|| {
                    syntax(
                        line_number,
                        format!("literal {} outside declared {} variables", value, num_vars),
                    )
                })?;
            current.push(lit);
        }
    }

    let (num_vars, declared) = header.ok_or(DimacsError::MissingHeader)?;
    if !current.is_empty() {
        return Err(DimacsError::Unterminated);
    }
    if clauses.len() != declared {
        return Err(DimacsError::ClauseCount {
            declared,
            found: clauses.len(),
        });
    }

    Ok(CnfInstance::new(num_vars, clauses))
}

/// Read a DIMACS file from disk
pub fn read_dimacs_file(path: &Path) -> Result<CnfInstance, DimacsError> {
    read_dimacs(File::open(path)?)
}

/// Read only the `p cnf <vars> <clauses>` header of a DIMACS file
pub fn read_dimacs_header(path: &Path) -> Result<(u32, usize), DimacsError> {
    for (index, line) in BufReader::new(File::open(path)?).lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('c') || trimmed.starts_with('%') {
            continue;
        }
        return match trimmed.strip_prefix('p') {
            Some(rest) => parse_header(rest, index + 1),
            None => Err(DimacsError::MissingHeader),
        };
    }
    Err(DimacsError::MissingHeader)
}

fn parse_header(rest: &str, line: usize) -> Result<(u32, usize), DimacsError> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    match parts.as_slice() {
        ["cnf", vars, clauses] => {
            let vars = vars
                .parse()
                .map_err(|_| syntax(line, format!("invalid variable count '{}'", vars)))?;
            let clauses = clauses
                .parse()
                .map_err(|_| syntax(line, format!("invalid clause count '{}'", clauses)))?;
            Ok((vars, clauses))
        }
        _ => Err(syntax(line, "expected 'p cnf <vars> <clauses>'")),
    }
}

fn syntax(line: usize, message: impl Into<String>) -> DimacsError {
    DimacsError::Syntax {
        line,
        message: message.into(),
    }
}
