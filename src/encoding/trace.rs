//! Decoding satisfying assignments back into per-cycle signal values

use std::fmt;

use crate::encoding::cnf::Var;
use crate::encoding::compiler::BaseCircuit;
use crate::encoding::unroll::FrameLayout;
use crate::ir::SignalRole;

/// Values of the interesting signals in one clock cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameValues {
    pub frame: usize,
    /// State registers, in variable order
    pub state: Vec<(String, bool)>,
    /// Next-state signals, in variable order
    pub next_state: Vec<(String, bool)>,
    /// Signals that are neither registers nor gate outputs
    pub inputs: Vec<(String, bool)>,
}

/// Execution reaching the target, one entry per unrolled frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub frames: Vec<FrameValues>,
}

impl Trace {
    /// Read a trace out of `model`, where `model[i]` is the value of
    /// variable `i + 1`. Unassigned variables read as false.
    pub fn decode(base: &BaseCircuit, layout: &FrameLayout, model: &[bool]) -> Self {
        let value = |var: Var| model.get(var.index()).copied().unwrap_or(false);

        let frames = (0..layout.frames)
            .map(|frame| {
                let mut values = FrameValues {
                    frame,
                    state: Vec::new(),
                    next_state: Vec::new(),
                    inputs: Vec::new(),
                };
                for (name, var) in base.signals().iter() {
                    let entry = (name.to_string(), value(layout.at(var, frame)));
                    match SignalRole::of(name) {
                        SignalRole::State(_) => values.state.push(entry),
                        SignalRole::NextState(_) => values.next_state.push(entry),
                        SignalRole::Other if !base.is_driven(var) => values.inputs.push(entry),
                        SignalRole::Other => {}
                    }
                }
                values
            })
            .collect();

        Trace { frames }
    }
}

fn write_assignments(f: &mut fmt::Formatter<'_>, values: &[(String, bool)]) -> fmt::Result {
    for (i, (name, value)) in values.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}={}", name, u8::from(*value))?;
    }
    Ok(())
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.frames {
            write!(f, "cycle {}: ", frame.frame)?;
            write_assignments(f, &frame.state)?;
            if !frame.inputs.is_empty() {
                write!(f, " | inputs: ")?;
                write_assignments(f, &frame.inputs)?;
            }
            write!(f, " -> ")?;
            write_assignments(f, &frame.next_state)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
