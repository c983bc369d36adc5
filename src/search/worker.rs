//! A search worker: one thread scanning one partition.

use crate::search::lanes::{Kernel, ScanContext, ScanOutcome};
use crate::search::parallel::channel::{WorkerChannels, WorkerMessage};
use crate::search::parallel::progress::ProgressBoard;
use crate::search::partition::Partition;
use crate::search::target::Target;
use log::{debug, warn};
use std::sync::Arc;

/// What a worker hands back when its thread ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub outcome: ScanOutcome,
}

pub struct SearchWorker {
    partition: Partition,
    target: Target,
    kernel: Kernel,
    progress: Arc<ProgressBoard>,
    channels: WorkerChannels,
}

impl SearchWorker {
    pub fn new(
        partition: Partition,
        target: Target,
        kernel: Kernel,
        progress: Arc<ProgressBoard>,
        channels: WorkerChannels,
    ) -> Self {
        Self {
            partition,
            target,
            kernel,
            progress,
            channels,
        }
    }

    pub fn id(&self) -> usize {
        self.partition.index
    }

    /// Scan until a match, a stop request or the top of the domain.
    ///
    /// On a match the worker claims the shared answer. Only the claimer
    /// notifies the coordinator, and the message is sent before the stop flag
    /// is raised.
    pub fn run(self) -> WorkerReport {
        let worker_id = self.id();
        debug!(
            "worker {} scanning from {} (block of {} values ending at {}, kernel {})",
            worker_id,
            self.partition.start,
            self.partition.size(),
            self.partition.end,
            self.kernel
        );

        let shared = &self.channels.shared;
        let ctx = ScanContext {
            target: self.target.value(),
            progress: self.progress.counter(worker_id),
            stop: shared.stop_flag(),
        };
        let outcome = self.kernel.scan(ctx, self.partition.start);

        match outcome {
            ScanOutcome::Found { value, steps } => {
                if shared.try_claim(value) {
                    debug!("worker {} matched {} after {} steps", worker_id, value, steps);
                    // The coordinator may already be gone; the claim still stands.
                    let _ = self.channels.to_coordinator.send(WorkerMessage::Found {
                        worker_id,
                        value,
                        steps,
                    });
                    shared.signal_stop();
                }
            }
            ScanOutcome::Exhausted { steps } => {
                warn!(
                    "worker {} reached the top of the domain after {} steps",
                    worker_id, steps
                );
                let _ = self
                    .channels
                    .to_coordinator
                    .send(WorkerMessage::Exhausted { worker_id, steps });
            }
            ScanOutcome::Stopped { steps } => {
                debug!("worker {} stopped after {} steps", worker_id, steps);
            }
        }

        WorkerReport { worker_id, outcome }
    }
}
