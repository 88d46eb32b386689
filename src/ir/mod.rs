//! Netlist representation: signals, gates and circuits

pub mod gate;
pub mod types;

// Re-export commonly used types
pub use gate::{Gate, Netlist};
pub use types::{GateKind, SignalRole, paired_state_name};
