//! Translation of a netlist into a bounded reachability CNF instance
//!
//! The pipeline runs leaves first:
//! - [`allocator`]: signal names to dense DIMACS variables
//! - [`tseitin`]: one gate to clauses
//! - [`compiler`]: all gates of one time frame, plus the register pairing
//! - [`unroll`]: `k + 1` frames, reset state, frame links and target
//!
//! # Example
//!
//! ```
//! use bmcnf::encoding::{compile, unroll};
//! use bmcnf::ir::Gate;
//!
//! let base = compile(&["S0"], &[Gate::and("NS0", ["S0", "IN"])]).unwrap();
//! let instance = unroll(&base, 0, &"1".parse().unwrap()).unwrap();
//! assert_eq!(instance.num_vars(), 3);
//! ```

pub mod allocator;
pub mod cnf;
pub mod compiler;
pub mod trace;
pub mod tseitin;
pub mod unroll;

pub use allocator::VariableAllocator;
pub use cnf::{Clause, CnfInstance, Lit, Var};
pub use compiler::{BaseCircuit, RegisterPair, StatePairing, compile, compile_netlist};
pub use trace::{FrameValues, Trace};
pub use tseitin::encode_gate;
pub use unroll::{FrameLayout, TargetState, transition_steps, unroll};
