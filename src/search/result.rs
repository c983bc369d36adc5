//! Search result types and statistics

use crate::search::config::LaneWidth;
use crate::search::lanes::Kernel;
use crate::search::target::Target;
use crate::search::worker::WorkerReport;
use std::time::Duration;

/// Result of a successful search
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The secret that was searched for
    pub target: Target,
    /// The value the winning worker matched
    pub value: i64,
    /// Index of the worker that found it
    pub winner: usize,
    /// Statistics from the search
    pub statistics: SearchStatistics,
}

/// Statistics from a search run
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Kernel the workers ran
    pub kernel: Option<Kernel>,
    /// Candidates compared per vector-step
    pub lane_width: LaneWidth,
    /// Total time spent searching
    pub elapsed_time: Duration,
    /// Vector-steps evaluated by each worker, indexed by worker id
    pub worker_steps: Vec<u64>,
    /// Number of throughput lines printed
    pub reports: u64,
}

impl SearchStatistics {
    /// Collect per-worker step counts from the joined workers.
    pub fn from_reports(
        kernel: Kernel,
        reports: &[WorkerReport],
        elapsed_time: Duration,
        report_lines: u64,
    ) -> Self {
        let mut worker_steps = vec![0; reports.len()];
        for report in reports {
            if let Some(slot) = worker_steps.get_mut(report.worker_id) {
                *slot = report.outcome.steps();
            }
        }
        Self {
            kernel: Some(kernel),
            lane_width: kernel.lane_width(),
            elapsed_time,
            worker_steps,
            reports: report_lines,
        }
    }

    /// Vector-steps summed over all workers
    pub fn vector_steps(&self) -> u64 {
        self.worker_steps.iter().sum()
    }

    /// Individual candidates compared against the target
    pub fn candidates_checked(&self) -> u64 {
        self.vector_steps()
            .saturating_mul(self.lane_width.lanes() as u64)
    }

    /// Get candidates checked per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.candidates_checked() as f64 / secs
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        if let Some(kernel) = self.kernel {
            s.push_str(&format!("Kernel: {}\n", kernel));
        }
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Workers: {}\n", self.worker_steps.len()));
        s.push_str(&format!("Reports: {}\n", self.reports));
        s.push_str(&format!("Vector steps: {}\n", self.vector_steps()));
        s.push_str(&format!(
            "Candidates checked: {}\n",
            self.candidates_checked()
        ));
        s.push_str(&format!(
            "Throughput: {:.0} candidates/sec\n",
            self.throughput()
        ));
        s
    }
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Target: {}", self.target)?;
        writeln!(f, "Found by worker {}: {}", self.winner, self.value)?;
        write!(f, "{}", self.statistics.format_summary())
    }
}
