//! Gate and netlist definitions

use std::fmt;

use crate::error::EncodeError;
use crate::ir::types::{GateKind, is_valid_signal_name};

/// A primitive gate instance: `kind output(inputs...)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gate {
    pub kind: GateKind,
    pub output: String,
    pub inputs: Vec<String>,
}

impl Gate {
    pub fn new(kind: GateKind, output: impl Into<String>, inputs: Vec<String>) -> Self {
        Self {
            kind,
            output: output.into(),
            inputs,
        }
    }

    /// `output = inputs[0] & inputs[1] & ...`
    pub fn and<I, S>(output: impl Into<String>, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            GateKind::And,
            output,
            inputs.into_iter().map(Into::into).collect(),
        )
    }

    /// `output = !input`
    pub fn not(output: impl Into<String>, input: impl Into<String>) -> Self {
        Self::new(GateKind::Not, output, vec![input.into()])
    }

    /// Check operand names and arity
    pub fn validate(&self) -> Result<(), EncodeError> {
        if !is_valid_signal_name(&self.output) {
            return Err(self.malformed(format!("invalid output name {:?}", self.output)));
        }
        if let Some(bad) = self.inputs.iter().find(|i| !is_valid_signal_name(i)) {
            return Err(self.malformed(format!("invalid input name {:?}", bad)));
        }
        match self.kind {
            GateKind::And if self.inputs.is_empty() => {
                Err(self.malformed("and gate needs at least one input".to_string()))
            }
            GateKind::Not if self.inputs.len() != 1 => Err(self.malformed(format!(
                "not gate needs exactly one input, got {}",
                self.inputs.len()
            ))),
            _ => Ok(()),
        }
    }

    fn malformed(&self, reason: String) -> EncodeError {
        EncodeError::MalformedGate {
            gate: self.to_string(),
            reason,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}", self.kind, self.output)?;
        for input in &self.inputs {
            write!(f, ", {}", input)?;
        }
        write!(f, ")")
    }
}

/// A sequential circuit as handed over by the loader
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Netlist {
    /// Label used in the DIMACS comment and default output file name
    pub name: String,
    /// State register names in declaration order
    pub state_signals: Vec<String>,
    /// Gates in source order
    pub gates: Vec<Gate>,
}

impl Netlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_state_signals<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state_signals = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_gate(mut self, gate: Gate) -> Self {
        self.gates.push(gate);
        self
    }
}
