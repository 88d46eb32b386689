//! Parallel depth sweep
//!
//! Runs the bounded check for every depth `1..=max` on a pool of worker
//! threads and reports the shallowest depth at which the target state is
//! reachable.
//!
//! # Architecture
//!
//! - A **coordinator** that spawns workers and aggregates verdicts
//! - **Workers** that claim depths in increasing order, unroll and solve
//! - **Shared state** holding the next depth to claim and the best depth
//!   found, so workers skip depths that can no longer matter
//!
//! # Example
//!
//! ```
//! use bmcnf::encoding::compile;
//! use bmcnf::ir::Gate;
//! use bmcnf::sweep::{SweepConfig, run_sweep};
//!
//! let base = compile(&["S0"], &[Gate::not("NS0", "S0")]).unwrap();
//! let config = SweepConfig::default().with_workers(2);
//! let result = run_sweep(&base, &"1".parse().unwrap(), 4, &config);
//! assert_eq!(result.shallowest, Some(1));
//! ```

pub mod channel;
pub mod config;
pub mod coordinator;

pub use config::SweepConfig;
pub use coordinator::{DepthOutcome, SweepResult, run_sweep};
