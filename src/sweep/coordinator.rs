//! Sweep coordinator that manages worker threads

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use tracing::{debug, info, warn};

use crate::encoding::{BaseCircuit, FrameLayout, TargetState, Trace, transition_steps, unroll};
use crate::error::OracleError;
use crate::oracle::{BuiltinOracle, Verdict};
use crate::sweep::channel::{CoordinatorChannels, WorkerChannels, WorkerMessage, create_channels};
use crate::sweep::config::SweepConfig;

/// Verdict for one depth that was solved to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthOutcome {
    pub depth: usize,
    pub verdict: Verdict,
    pub elapsed: Duration,
}

/// Result of a depth sweep
#[derive(Debug, Clone)]
pub struct SweepResult {
    /// Shallowest depth at which the target is reachable
    pub shallowest: Option<usize>,
    /// Execution reaching the target at the shallowest depth
    pub trace: Option<Trace>,
    /// Completed depths in increasing order
    pub outcomes: Vec<DepthOutcome>,
    /// Worker failures as (depth, message)
    pub errors: Vec<(usize, String)>,
    /// True when the overall timeout stopped the sweep early
    pub timed_out: bool,
    pub elapsed: Duration,
}

impl SweepResult {
    /// Every depth up to `max_depth` (or up to the shallowest reachable
    /// one) was decided
    pub fn is_complete(&self, max_depth: usize) -> bool {
        let last = self.shallowest.unwrap_or(max_depth);
        (1..=last).all(|d| self.outcomes.iter().any(|o| o.depth == d))
    }
}

/// Find the shallowest depth in `1..=max_depth` at which `target` is
/// reachable, solving depths in parallel with the built-in oracle
///
/// Depths deeper than a reachable one are cancelled, but the in-process
/// solver cannot be interrupted: their solver threads keep running in the
/// background after this returns, until each instance is decided.
pub fn run_sweep(
    base: &BaseCircuit,
    target: &TargetState,
    max_depth: usize,
    config: &SweepConfig,
) -> SweepResult {
    let start_time = Instant::now();
    let num_workers = config.effective_workers(max_depth);

    let (coordinator_channels, worker_channels) = create_channels(num_workers);

    let base = Arc::new(base.clone());
    let target = Arc::new(target.clone());

    let worker_handles: Vec<_> = worker_channels
        .into_iter()
        .enumerate()
        .map(|(worker_id, channels)| {
            let base = Arc::clone(&base);
            let target = Arc::clone(&target);
            std::thread::spawn(move || run_worker(worker_id, &base, &target, max_depth, channels))
        })
        .collect();

    let result = run_coordinator(coordinator_channels, num_workers, config, start_time);

    // Workers blocked in a solve return as soon as they see their cancel
    for handle in worker_handles {
        let _ = handle.join();
    }

    info!(
        shallowest = ?result.shallowest,
        solved = result.outcomes.len(),
        elapsed = ?result.elapsed,
        "depth sweep finished"
    );

    result
}

/// Coordinator loop that receives messages from workers and aggregates results
fn run_coordinator(
    channels: CoordinatorChannels,
    total_workers: usize,
    config: &SweepConfig,
    start_time: Instant,
) -> SweepResult {
    let mut outcomes: BTreeMap<usize, DepthOutcome> = BTreeMap::new();
    let mut in_flight: Vec<Option<usize>> = vec![None; total_workers];
    let mut best: Option<(usize, Option<Trace>)> = None;
    let mut errors = Vec::new();
    let mut finished_count = 0;
    let mut timed_out = false;

    let deadline = config.timeout.map(|t| start_time + t);

    // Workers past the best depth are solving something irrelevant
    let cancel_deeper = |in_flight: &[Option<usize>], best: usize| {
        for (worker_id, depth) in in_flight.iter().enumerate() {
            if depth.is_some_and(|d| d > best) {
                channels.cancels[worker_id].cancel();
            }
        }
    };

    while finished_count < total_workers {
        if !timed_out && deadline.is_some_and(|d| Instant::now() >= d) {
            warn!("depth sweep timed out");
            timed_out = true;
            channels.stop_all();
        }

        match channels.from_workers.recv_timeout(Duration::from_millis(100)) {
            Ok(WorkerMessage::Started { worker_id, depth }) => {
                in_flight[worker_id] = Some(depth);
                let best = channels.shared.current_best();
                if depth > best {
                    channels.cancels[worker_id].cancel();
                }
            }
            Ok(WorkerMessage::Solved {
                worker_id,
                depth,
                verdict,
                elapsed,
                trace,
            }) => {
                in_flight[worker_id] = None;
                debug!(worker_id, depth, %verdict, ?elapsed, "depth solved");
                outcomes.insert(
                    depth,
                    DepthOutcome {
                        depth,
                        verdict,
                        elapsed,
                    },
                );
                if verdict == Verdict::Sat && channels.shared.try_update(depth) {
                    best = Some((depth, trace));
                    cancel_deeper(&in_flight, depth);
                }
            }
            Ok(WorkerMessage::Finished {
                worker_id,
                depths_solved,
            }) => {
                debug!(worker_id, depths_solved, "sweep worker finished");
                in_flight[worker_id] = None;
                finished_count += 1;
            }
            Ok(WorkerMessage::Error {
                worker_id,
                depth,
                message,
            }) => {
                warn!(worker_id, depth, %message, "sweep worker failed");
                in_flight[worker_id] = None;
                errors.push((depth, message));
                finished_count += 1;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    let (shallowest, trace) = match best {
        Some((depth, trace)) => (Some(depth), trace),
        None => (None, None),
    };

    SweepResult {
        shallowest,
        trace,
        outcomes: outcomes.into_values().collect(),
        errors,
        timed_out,
        elapsed: start_time.elapsed(),
    }
}

/// Worker loop: claim depths in increasing order until none are left
fn run_worker(
    worker_id: usize,
    base: &BaseCircuit,
    target: &TargetState,
    max_depth: usize,
    channels: WorkerChannels,
) {
    let oracle = BuiltinOracle::new();
    let mut depths_solved = 0;

    while let Some(depth) = channels.shared.claim(max_depth) {
        let _ = channels
            .to_coordinator
            .send(WorkerMessage::Started { worker_id, depth });

        match solve_depth(worker_id, &oracle, base, target, depth, &channels) {
            Ok(Some(message)) => {
                depths_solved += 1;
                let _ = channels.to_coordinator.send(message);
            }
            // Cancelled; any later claim is deeper still
            Ok(None) => break,
            Err(message) => {
                let _ = channels.to_coordinator.send(WorkerMessage::Error {
                    worker_id,
                    depth,
                    message,
                });
                return;
            }
        }
    }

    let _ = channels.to_coordinator.send(WorkerMessage::Finished {
        worker_id,
        depths_solved,
    });
}

/// Unroll and solve one depth; None when the solve was cancelled
fn solve_depth(
    worker_id: usize,
    oracle: &BuiltinOracle,
    base: &BaseCircuit,
    target: &TargetState,
    depth: usize,
    channels: &WorkerChannels,
) -> Result<Option<WorkerMessage>, String> {
    let depth_arg = i64::try_from(depth).map_err(|e| e.to_string())?;
    let k = transition_steps(depth_arg).map_err(|e| e.to_string())?;
    let instance = unroll(base, k, target).map_err(|e| e.to_string())?;

    let outcome = match oracle.solve_instance(&instance, &channels.cancel) {
        Ok(outcome) => outcome,
        Err(OracleError::Cancelled) => return Ok(None),
        Err(e) => return Err(e.to_string()),
    };

    let trace = match &outcome.model {
        Some(model) if outcome.verdict == Verdict::Sat => {
            let layout = FrameLayout::new(base.total_vars(), k).map_err(|e| e.to_string())?;
            Some(Trace::decode(base, &layout, &model.assignment(instance.num_vars())))
        }
        _ => None,
    };

    Ok(Some(WorkerMessage::Solved {
        worker_id,
        depth,
        verdict: outcome.verdict,
        elapsed: outcome.elapsed,
        trace,
    }))
}
