//! Core types for the gate-level netlist representation

use std::fmt;
use std::str::FromStr;

use crate::error::EncodeError;

/// Role of a signal, recovered from its name
///
/// `S<digits>` is a state register, `NS<digits>` is the value that register
/// takes after the next clock edge. Everything else is an input or an
/// intermediate net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalRole {
    State(usize),
    NextState(usize),
    Other,
}

impl SignalRole {
    /// Classify a signal name
    pub fn of(name: &str) -> Self {
        if let Some(index) = name.strip_prefix("NS").and_then(parse_register_index) {
            SignalRole::NextState(index)
        } else if let Some(index) = name.strip_prefix('S').and_then(parse_register_index) {
            SignalRole::State(index)
        } else {
            SignalRole::Other
        }
    }

    /// Register index for state and next-state signals
    pub fn register_index(&self) -> Option<usize> {
        match self {
            SignalRole::State(i) | SignalRole::NextState(i) => Some(*i),
            SignalRole::Other => None,
        }
    }

    pub fn is_state(&self) -> bool {
        matches!(self, SignalRole::State(_))
    }

    pub fn is_next_state(&self) -> bool {
        matches!(self, SignalRole::NextState(_))
    }
}

/// Parse the digit suffix of a register name (`"12"` in `S12`)
fn parse_register_index(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Name of the state signal paired with a next-state signal (`NS3` -> `S3`)
pub fn paired_state_name(next_state: &str) -> Option<String> {
    match SignalRole::of(next_state) {
        SignalRole::NextState(_) => Some(format!("S{}", &next_state[2..])),
        _ => None,
    }
}

/// Whether a string is usable as a net name
pub fn is_valid_signal_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '(' | ')' | ';'))
}

/// Primitive gate kinds the encoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    And,
    Not,
}

impl GateKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            GateKind::And => "and",
            GateKind::Not => "not",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for GateKind {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "and" => Ok(GateKind::And),
            "not" => Ok(GateKind::Not),
            _ => Err(EncodeError::UnsupportedGateKind(s.to_string())),
        }
    }
}
