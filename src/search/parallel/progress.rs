//! Per-worker progress counters and the throughput figure derived from them.

use crate::search::config::LaneWidth;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// One counter per cache line so workers do not contend on a shared line.
#[repr(align(64))]
#[derive(Debug, Default)]
struct PaddedCounter(AtomicU64);

/// Vector-steps completed by each worker.
///
/// Each slot is written only by its worker and read by the coordinator.
/// `Relaxed` ordering is enough: the values are telemetry, and each slot is
/// a single atomic word so reads are never torn.
#[derive(Debug)]
pub struct ProgressBoard {
    counters: Vec<PaddedCounter>,
}

impl ProgressBoard {
    pub fn new(num_workers: usize) -> Self {
        Self {
            counters: (0..num_workers).map(|_| PaddedCounter::default()).collect(),
        }
    }

    /// The counter owned by `worker_id`.
    pub fn counter(&self, worker_id: usize) -> &AtomicU64 {
        &self.counters[worker_id].0
    }

    pub fn snapshot(&self) -> Vec<u64> {
        self.counters
            .iter()
            .map(|c| c.0.load(Ordering::Relaxed))
            .collect()
    }
}

/// Candidates checked across all workers during one reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Throughput {
    pub guesses: u64,
}

impl Throughput {
    /// `lane_width * sum(after[i] - before[i])`. A counter that moved
    /// backwards contributes zero.
    pub fn between(before: &[u64], after: &[u64], lane_width: LaneWidth) -> Self {
        let steps: u64 = before
            .iter()
            .zip(after)
            .map(|(b, a)| a.saturating_sub(*b))
            .sum();
        Self {
            guesses: steps.saturating_mul(lane_width.lanes() as u64),
        }
    }

    /// Scale the window count to guesses per second.
    pub fn per_second(self, window: Duration) -> u64 {
        let nanos = window.as_nanos();
        if nanos == 0 {
            return 0;
        }
        (self.guesses as u128 * 1_000_000_000 / nanos).min(u64::MAX as u128) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_sums_deltas_times_width() {
        let before = [10, 20, 30, 40];
        let after = [13, 27, 30, 45];
        let throughput = Throughput::between(&before, &after, LaneWidth::Four);
        assert_eq!(throughput.guesses, 4 * (3 + 7 + 0 + 5));
    }

    #[test]
    fn test_throughput_synthetic_deltas() {
        let (d0, d1, d2, d3) = (1_000u64, 2_500, 0, 42);
        let before = [0u64; 4];
        let after = [d0, d1, d2, d3];
        let throughput = Throughput::between(&before, &after, LaneWidth::Four);
        assert_eq!(throughput.per_second(Duration::from_secs(1)), 4 * (d0 + d1 + d2 + d3));
    }

    #[test]
    fn test_throughput_respects_lane_width() {
        let throughput = Throughput::between(&[0, 0], &[5, 5], LaneWidth::Eight);
        assert_eq!(throughput.guesses, 80);
        let throughput = Throughput::between(&[0], &[5], LaneWidth::One);
        assert_eq!(throughput.guesses, 5);
    }

    #[test]
    fn test_throughput_ignores_backwards_counter() {
        let throughput = Throughput::between(&[10, 5], &[4, 6], LaneWidth::Four);
        assert_eq!(throughput.guesses, 4);
    }

    #[test]
    fn test_per_second_scales_window() {
        let throughput = Throughput { guesses: 500 };
        assert_eq!(throughput.per_second(Duration::from_millis(500)), 1000);
        assert_eq!(throughput.per_second(Duration::from_secs(2)), 250);
        assert_eq!(throughput.per_second(Duration::ZERO), 0);
    }

    #[test]
    fn test_board_counters_are_independent() {
        let board = ProgressBoard::new(4);
        assert_eq!(board.snapshot(), vec![0, 0, 0, 0]);

        board.counter(1).store(7, Ordering::Relaxed);
        board.counter(3).store(2, Ordering::Relaxed);
        assert_eq!(board.snapshot(), vec![0, 7, 0, 2]);
    }

    #[test]
    fn test_counters_sit_on_separate_cache_lines() {
        let board = ProgressBoard::new(2);
        let a = board.counter(0) as *const AtomicU64 as usize;
        let b = board.counter(1) as *const AtomicU64 as usize;
        assert!(b - a >= 64);
    }
}
