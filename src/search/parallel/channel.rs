//! Worker to coordinator messaging and the shared found/stop state.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

/// Message sent from workers to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Worker matched the target and won the claim on it.
    Found {
        worker_id: usize,
        value: i64,
        steps: u64,
    },
    /// Worker ran off the top of the domain without a match.
    Exhausted { worker_id: usize, steps: u64 },
}

/// Shared state for the search outcome across all workers.
#[derive(Debug, Default)]
pub struct SharedFound {
    /// Matched value, 0 while nothing has been found. Targets are never 0.
    found: AtomicI64,
    /// Flag to signal all workers to stop.
    should_stop: AtomicBool,
}

impl SharedFound {
    /// Record `value` as the answer. Returns true only for the first caller.
    pub fn try_claim(&self, value: i64) -> bool {
        self.found
            .compare_exchange(0, value, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// The claimed answer, if any.
    pub fn found(&self) -> Option<i64> {
        match self.found.load(Ordering::Acquire) {
            0 => None,
            value => Some(value),
        }
    }

    /// Check if we should stop searching.
    pub fn should_stop(&self) -> bool {
        self.should_stop.load(Ordering::Relaxed)
    }

    /// Signal all workers to stop.
    pub fn signal_stop(&self) {
        self.should_stop.store(true, Ordering::Relaxed);
    }

    /// The raw stop flag, polled by the scan loops once per vector-step.
    pub fn stop_flag(&self) -> &AtomicBool {
        &self.should_stop
    }
}

/// Channel endpoints for a worker.
pub struct WorkerChannels {
    /// Send messages to coordinator.
    pub to_coordinator: Sender<WorkerMessage>,
    /// Shared found/stop state.
    pub shared: Arc<SharedFound>,
}

/// Channel endpoints for the coordinator.
pub struct CoordinatorChannels {
    /// Receive messages from workers.
    pub from_workers: Receiver<WorkerMessage>,
    /// Shared state.
    pub shared: Arc<SharedFound>,
}

/// Create channels for a search with the given number of workers.
pub fn create_channels(num_workers: usize) -> (CoordinatorChannels, Vec<WorkerChannels>) {
    let shared = Arc::new(SharedFound::default());

    // Unbounded so a finishing worker never blocks on the coordinator
    let (worker_tx, coordinator_rx) = unbounded();

    let worker_channels = (0..num_workers)
        .map(|_| WorkerChannels {
            to_coordinator: worker_tx.clone(),
            shared: Arc::clone(&shared),
        })
        .collect();

    let coordinator = CoordinatorChannels {
        from_workers: coordinator_rx,
        shared,
    };

    (coordinator, worker_channels)
}
