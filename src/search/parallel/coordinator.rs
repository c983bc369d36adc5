//! Search coordinator: partitions the domain, runs the workers, reports
//! throughput and shuts everything down once the target is found.

use crate::error::{GuessError, Result};
use crate::search::config::SearchConfig;
use crate::search::lanes::Kernel;
use crate::search::parallel::channel::{create_channels, CoordinatorChannels, WorkerMessage};
use crate::search::parallel::progress::{ProgressBoard, Throughput};
use crate::search::partition::partition_space;
use crate::search::result::{SearchResult, SearchStatistics};
use crate::search::target::Target;
use crate::search::worker::{SearchWorker, WorkerReport};
use crossbeam_channel::RecvTimeoutError;
use log::{debug, error, info, warn};
use std::io::Write;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How the monitoring loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonitorExit {
    Found { worker_id: usize, value: i64 },
    Exhausted,
    WorkerLost(usize),
}

/// Run the search for `target` with the given configuration.
///
/// Prints `Guesses per second: <n>` to `out` once per reporting interval and
/// `Found it: <value>` exactly once after every worker has stopped.
pub fn run_parallel_search<W: Write>(
    config: &SearchConfig,
    target: Target,
    out: &mut W,
) -> Result<SearchResult> {
    config.validate()?;

    let start_time = Instant::now();
    let num_workers = config.num_workers;
    let kernel = Kernel::select(config.lane_width, config.portable_only);
    info!(
        "searching with {} workers, kernel {}, report every {:?}",
        num_workers, kernel, config.report_interval
    );

    let progress = Arc::new(ProgressBoard::new(num_workers));
    let (coordinator_channels, worker_channels) = create_channels(num_workers);

    let mut handles: Vec<JoinHandle<WorkerReport>> = Vec::with_capacity(num_workers);
    for (partition, channels) in partition_space(num_workers).into_iter().zip(worker_channels) {
        let worker =
            SearchWorker::new(partition, target, kernel, Arc::clone(&progress), channels);
        let spawned = thread::Builder::new()
            .name(format!("guess-worker-{}", partition.index))
            .spawn(move || worker.run());

        match spawned {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                coordinator_channels.shared.signal_stop();
                let _ = join_workers(handles);
                return Err(GuessError::Spawn(e));
            }
        }
    }

    let mut monitor = Monitor {
        config,
        kernel,
        progress: &progress,
        channels: &coordinator_channels,
        reports_written: 0,
    };
    let exit = monitor.run(&handles, out);
    let reports_written = monitor.reports_written;

    coordinator_channels.shared.signal_stop();
    let reports = join_workers(handles);

    let exit = exit?;
    let reports = reports?;
    let statistics =
        SearchStatistics::from_reports(kernel, &reports, start_time.elapsed(), reports_written);

    match exit {
        MonitorExit::Found { worker_id, value } => {
            writeln!(out, "Found it: {}", value)?;
            out.flush()?;
            info!(
                "worker {} found {} after {:.2?} ({} candidates checked)",
                worker_id,
                value,
                statistics.elapsed_time,
                statistics.candidates_checked()
            );
            Ok(SearchResult {
                target,
                value,
                winner: worker_id,
                statistics,
            })
        }
        MonitorExit::Exhausted => Err(GuessError::Exhausted),
        MonitorExit::WorkerLost(worker_id) => Err(GuessError::WorkerPanicked(worker_id)),
    }
}

/// Wait for every worker, surfacing the first one that panicked.
fn join_workers(handles: Vec<JoinHandle<WorkerReport>>) -> Result<Vec<WorkerReport>> {
    let mut reports = Vec::with_capacity(handles.len());
    let mut panicked = None;
    for (worker_id, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(report) => reports.push(report),
            Err(_) => {
                error!("worker {} panicked", worker_id);
                panicked.get_or_insert(worker_id);
            }
        }
    }
    match panicked {
        Some(worker_id) => Err(GuessError::WorkerPanicked(worker_id)),
        None => Ok(reports),
    }
}

/// Coordinator state for the reporting loop.
struct Monitor<'a> {
    config: &'a SearchConfig,
    kernel: Kernel,
    progress: &'a ProgressBoard,
    channels: &'a CoordinatorChannels,
    reports_written: u64,
}

/// Which workers have ended with a message so far.
struct Finished {
    reported: Vec<bool>,
    exhausted: usize,
}

impl Finished {
    fn new(num_workers: usize) -> Self {
        Self {
            reported: vec![false; num_workers],
            exhausted: 0,
        }
    }

    fn record(&mut self, message: WorkerMessage) -> Option<MonitorExit> {
        match message {
            WorkerMessage::Found {
                worker_id,
                value,
                steps,
            } => {
                debug!("worker {} reported a match after {} steps", worker_id, steps);
                Some(MonitorExit::Found { worker_id, value })
            }
            WorkerMessage::Exhausted { worker_id, steps } => {
                if !std::mem::replace(&mut self.reported[worker_id], true) {
                    self.exhausted += 1;
                }
                warn!(
                    "worker {} exhausted after {} steps ({}/{} workers done)",
                    worker_id,
                    steps,
                    self.exhausted,
                    self.reported.len()
                );
                (self.exhausted == self.reported.len()).then_some(MonitorExit::Exhausted)
            }
        }
    }
}

impl Monitor<'_> {
    /// Sample progress every interval until a worker reports a match, every
    /// worker is exhausted, or a worker thread dies without reporting.
    fn run<W: Write>(
        &mut self,
        handles: &[JoinHandle<WorkerReport>],
        out: &mut W,
    ) -> Result<MonitorExit> {
        let interval = self.config.report_interval;
        let mut finished = Finished::new(handles.len());
        let mut before = self.progress.snapshot();
        let mut deadline = Instant::now() + interval;

        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            match self.channels.from_workers.recv_timeout(timeout) {
                Ok(message) => {
                    if let Some(exit) = finished.record(message) {
                        return Ok(exit);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    let after = self.progress.snapshot();
                    self.report(&before, &after, interval, out)?;
                    before = after;
                    deadline += interval;

                    if let Some(exit) = self.check_workers(handles, &mut finished) {
                        return Ok(exit);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    // Every worker has ended and no match arrived.
                    return Ok(MonitorExit::Exhausted);
                }
            }
        }
    }

    fn report<W: Write>(
        &mut self,
        before: &[u64],
        after: &[u64],
        window: Duration,
        out: &mut W,
    ) -> Result<()> {
        let throughput = Throughput::between(before, after, self.kernel.lane_width());
        debug!("progress sample: {:?}", after);
        writeln!(out, "Guesses per second: {}", throughput.per_second(window))?;
        out.flush()?;
        self.reports_written += 1;
        Ok(())
    }

    /// A worker whose thread finished without sending a message has panicked,
    /// unless the stop flag was raised: then it stopped because another worker
    /// claimed the target, and that worker's `Found` is still on its way.
    fn check_workers(
        &self,
        handles: &[JoinHandle<WorkerReport>],
        finished: &mut Finished,
    ) -> Option<MonitorExit> {
        // Pick up messages sent just before their thread ended.
        for message in self.channels.from_workers.try_iter() {
            if let Some(exit) = finished.record(message) {
                return Some(exit);
            }
        }
        let (worker_id, _) = handles
            .iter()
            .enumerate()
            .find(|(worker_id, handle)| handle.is_finished() && !finished.reported[*worker_id])?;

        let shared = &self.channels.shared;
        if shared.should_stop() {
            debug!(
                "worker {} stopped with {:?} claimed, waiting for the match report",
                worker_id,
                shared.found()
            );
            return None;
        }
        Some(MonitorExit::WorkerLost(worker_id))
    }
}
