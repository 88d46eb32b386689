//! Messages and shared state between sweep workers and the coordinator

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::encoding::Trace;
use crate::oracle::{CancelToken, Verdict};

/// Message sent from workers to the coordinator
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// Worker claimed a depth and is about to solve it
    Started { worker_id: usize, depth: usize },
    /// Worker finished solving one depth
    Solved {
        worker_id: usize,
        depth: usize,
        verdict: Verdict,
        elapsed: Duration,
        trace: Option<Trace>,
    },
    /// Worker has no more depths to try
    Finished { worker_id: usize, depths_solved: usize },
    /// Worker failed on a depth and stopped
    Error {
        worker_id: usize,
        depth: usize,
        message: String,
    },
}

/// State shared by every worker without going through the channel
#[derive(Debug)]
pub struct SharedBest {
    /// Shallowest reachable depth so far (usize::MAX means none yet)
    pub best_depth: AtomicUsize,
    /// Next depth to hand out
    pub next_depth: AtomicUsize,
    /// Flag to signal all workers to stop
    pub should_stop: AtomicBool,
}

impl Default for SharedBest {
    fn default() -> Self {
        Self {
            best_depth: AtomicUsize::new(usize::MAX),
            next_depth: AtomicUsize::new(1),
            should_stop: AtomicBool::new(false),
        }
    }
}

impl SharedBest {
    /// Try to lower the best depth; true if this is a new best
    pub fn try_update(&self, depth: usize) -> bool {
        let mut current = self.best_depth.load(Ordering::SeqCst);
        loop {
            if depth >= current {
                return false;
            }
            match self.best_depth.compare_exchange_weak(
                current,
                depth,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(c) => current = c,
            }
        }
    }

    /// Claim the next depth, or None once `max_depth` is passed, a
    /// shallower reachable depth is known, or the sweep was stopped
    pub fn claim(&self, max_depth: usize) -> Option<usize> {
        if self.should_stop() {
            return None;
        }
        let depth = self.next_depth.fetch_add(1, Ordering::SeqCst);
        (depth <= max_depth && depth < self.current_best()).then_some(depth)
    }

    pub fn should_stop(&self) -> bool {
        self.should_stop.load(Ordering::SeqCst)
    }

    pub fn signal_stop(&self) {
        self.should_stop.store(true, Ordering::SeqCst);
    }

    /// Current best depth (usize::MAX if none found)
    pub fn current_best(&self) -> usize {
        self.best_depth.load(Ordering::SeqCst)
    }
}

/// Channel endpoints for a worker
pub struct WorkerChannels {
    pub to_coordinator: Sender<WorkerMessage>,
    /// Cancels this worker's in-flight solve
    pub cancel: CancelToken,
    pub shared: Arc<SharedBest>,
}

/// Channel endpoints for the coordinator
pub struct CoordinatorChannels {
    pub from_workers: Receiver<WorkerMessage>,
    /// One token per worker, indexed by worker id
    pub cancels: Vec<CancelToken>,
    pub shared: Arc<SharedBest>,
}

impl CoordinatorChannels {
    /// Stop everything: no new claims, running solves abandoned
    pub fn stop_all(&self) {
        self.shared.signal_stop();
        for cancel in &self.cancels {
            cancel.cancel();
        }
    }
}

/// Create channels for a sweep with the given number of workers
pub fn create_channels(num_workers: usize) -> (CoordinatorChannels, Vec<WorkerChannels>) {
    let shared = Arc::new(SharedBest::default());

    // Unbounded so workers never block on the coordinator
    let (worker_tx, coordinator_rx) = unbounded();

    let mut cancels = Vec::with_capacity(num_workers);
    let mut worker_channels = Vec::with_capacity(num_workers);

    for _ in 0..num_workers {
        let cancel = CancelToken::new();
        cancels.push(cancel.clone());
        worker_channels.push(WorkerChannels {
            to_coordinator: worker_tx.clone(),
            cancel,
            shared: Arc::clone(&shared),
        });
    }

    let coordinator = CoordinatorChannels {
        from_workers: coordinator_rx,
        cancels,
        shared,
    };

    (coordinator, worker_channels)
}
