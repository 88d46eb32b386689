//! Gate-level Verilog loader
//!
//! Extracts the pieces of a structural Verilog module the encoder needs:
//! the module name, the state registers declared with `reg`, and the
//! primitive gate instances. Behavioral code is ignored.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::ir::{Gate, GateKind, Netlist};

/// Parse error with location information
#[derive(Debug, Clone)]
pub struct ParseError {
    pub line_number: usize,
    pub column: Option<usize>,
    pub message: String,
    pub line_content: String,
}

impl ParseError {
    pub fn new(
        line_number: usize,
        message: impl Into<String>,
        line_content: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            column: None,
            message: message.into(),
            line_content: line_content.into(),
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(col) = self.column {
            write!(
                f,
                "line {}, column {}: {}\n  | {}\n  | {}^",
                self.line_number,
                col,
                self.message,
                self.line_content,
                " ".repeat(col.saturating_sub(1))
            )
        } else {
            write!(
                f,
                "line {}: {}\n  | {}",
                self.line_number, self.message, self.line_content
            )
        }
    }
}

impl std::error::Error for ParseError {}

/// Failure to load a netlist file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

fn module_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bmodule\s+([A-Za-z_][A-Za-z0-9_$]*)").expect("regex compiles"))
}

fn reg_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\breg\b([^;]*);").expect("regex compiles"))
}

fn state_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bS\d+\b").expect("regex compiles"))
}

/// `kind [instance] ( ports );` for the Verilog gate primitives
fn gate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(and|nand|or|nor|xor|xnor|not|buf)\b\s*([^\s(;]*)\s*\(([^;]*?)\)\s*;")
            .expect("regex compiles")
    })
}

/// Blank out `//` and `/* */` comments, keeping line structure intact
fn strip_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('/', Some('/')) => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
                out.push_str("  ");
            }
            ('/', Some('*')) => {
                chars.next();
                out.push_str("  ");
                let mut prev = '\0';
                for next in chars.by_ref() {
                    out.push(if next == '\n' { '\n' } else { ' ' });
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// 1-based line and column of a byte offset
fn locate(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before.len() - before.rfind('\n').map_or(0, |p| p + 1) + 1;
    (line, column)
}

fn line_at(content: &str, line_number: usize) -> &str {
    content
        .lines()
        .nth(line_number.saturating_sub(1))
        .unwrap_or("")
}

/// Parse a netlist file
///
/// The file stem names the circuit (`counter_v2.v` is labelled
/// `counter_v2`); the declared module name is used only for paths
/// without a stem.
pub fn parse_netlist_file(path: &Path) -> Result<Netlist, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut netlist = parse_netlist_string(&content, "circuit")?;
    if let Some(stem) = path.file_stem() {
        netlist.name = stem.to_string_lossy().into_owned();
    }
    Ok(netlist)
}

/// Parse netlist text; `default_name` is used when no module is declared
pub fn parse_netlist_string(content: &str, default_name: &str) -> Result<Netlist, ParseError> {
    let code = strip_comments(content);

    let name = module_regex()
        .captures(&code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| default_name.to_string());

    let mut netlist = Netlist::new(name);

    for caps in reg_regex().captures_iter(&code) {
        let Some(decl) = caps.get(1) else { continue };
        for state in state_name_regex().find_iter(decl.as_str()) {
            let state = state.as_str();
            if !netlist.state_signals.iter().any(|s| s == state) {
                netlist.state_signals.push(state.to_string());
            }
        }
    }

    for caps in gate_regex().captures_iter(&code) {
        let (Some(whole), Some(kind), Some(ports)) = (caps.get(0), caps.get(1), caps.get(3))
        else {
            continue;
        };

        let kind: GateKind = kind.as_str().parse().map_err(|e| {
            let (line, column) = locate(&code, whole.start());
            ParseError::new(line, format!("{}", e), line_at(content, line)).with_column(column)
        })?;

        let mut nets = ports.as_str().split(',').map(|n| n.trim().to_string());
        let output = nets.next().unwrap_or_default();
        netlist.gates.push(Gate::new(kind, output, nets.collect()));
    }

    if netlist.gates.is_empty() && netlist.state_signals.is_empty() {
        return Err(ParseError::new(
            0,
            "no gates or state registers found",
            default_name,
        ));
    }

    debug!(
        module = %netlist.name,
        registers = netlist.state_signals.len(),
        gates = netlist.gates.len(),
        "loaded netlist"
    );

    Ok(netlist)
}
