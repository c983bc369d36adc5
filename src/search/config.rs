//! Runtime configuration for the brute-force search.

use crate::error::{GuessError, Result};
use std::time::Duration;

/// Number of candidates tested per vector-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaneWidth {
    One,
    Two,
    #[default]
    Four,
    Eight,
}

impl LaneWidth {
    pub fn lanes(self) -> usize {
        match self {
            LaneWidth::One => 1,
            LaneWidth::Two => 2,
            LaneWidth::Four => 4,
            LaneWidth::Eight => 8,
        }
    }
}

impl TryFrom<usize> for LaneWidth {
    type Error = GuessError;

    fn try_from(lanes: usize) -> Result<Self> {
        match lanes {
            1 => Ok(LaneWidth::One),
            2 => Ok(LaneWidth::Two),
            4 => Ok(LaneWidth::Four),
            8 => Ok(LaneWidth::Eight),
            other => Err(GuessError::UnsupportedLaneWidth(other)),
        }
    }
}

impl std::fmt::Display for LaneWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lanes())
    }
}

/// Configuration for a search run.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of worker threads, one partition each.
    pub num_workers: usize,
    /// Candidates compared per vector-step.
    pub lane_width: LaneWidth,
    /// Time between throughput reports.
    pub report_interval: Duration,
    /// Fixed secret (None = draw one at random).
    pub target: Option<i64>,
    /// Seed for the target draw (None = OS entropy).
    pub seed: Option<u64>,
    /// Skip the explicit SIMD kernel even when the CPU supports it.
    pub portable_only: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_workers: 4,
            lane_width: LaneWidth::Four,
            report_interval: Duration::from_secs(1),
            target: None,
            seed: None,
            portable_only: false,
        }
    }
}

impl SearchConfig {
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    pub fn with_lane_width(mut self, lane_width: LaneWidth) -> Self {
        self.lane_width = lane_width;
        self
    }

    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Set the fixed target from an Option.
    pub fn with_target_option(mut self, target: Option<i64>) -> Self {
        self.target = target;
        self
    }

    /// Set the random seed from an Option.
    pub fn with_seed_option(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_portable_only(mut self, portable_only: bool) -> Self {
        self.portable_only = portable_only;
        self
    }

    /// Check the configuration before any thread is spawned.
    pub fn validate(&self) -> Result<()> {
        if self.num_workers == 0 {
            return Err(GuessError::NoWorkers);
        }
        if self.report_interval < Duration::from_millis(1) {
            return Err(GuessError::InvalidInterval);
        }
        if let Some(target) = self.target {
            if target < 1 {
                return Err(GuessError::InvalidTarget(target));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.num_workers, 4);
        assert_eq!(config.lane_width, LaneWidth::Four);
        assert_eq!(config.report_interval, Duration::from_secs(1));
        assert!(config.target.is_none());
        assert!(config.seed.is_none());
        assert!(!config.portable_only);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SearchConfig::default()
            .with_workers(2)
            .with_lane_width(LaneWidth::Eight)
            .with_report_interval(Duration::from_millis(250))
            .with_target_option(Some(17))
            .with_seed_option(Some(7))
            .with_portable_only(true);

        assert_eq!(config.num_workers, 2);
        assert_eq!(config.lane_width.lanes(), 8);
        assert_eq!(config.report_interval, Duration::from_millis(250));
        assert_eq!(config.target, Some(17));
        assert_eq!(config.seed, Some(7));
        assert!(config.portable_only);
    }

    #[test]
    fn test_lane_width_conversion() {
        for lanes in [1, 2, 4, 8] {
            assert_eq!(LaneWidth::try_from(lanes).unwrap().lanes(), lanes);
        }
        assert!(matches!(
            LaneWidth::try_from(3),
            Err(GuessError::UnsupportedLaneWidth(3))
        ));
        assert!(LaneWidth::try_from(16).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = SearchConfig::default().with_workers(0);
        assert!(matches!(config.validate(), Err(GuessError::NoWorkers)));

        let config = SearchConfig::default().with_report_interval(Duration::ZERO);
        assert!(matches!(config.validate(), Err(GuessError::InvalidInterval)));

        let config = SearchConfig::default().with_target_option(Some(0));
        assert!(matches!(config.validate(), Err(GuessError::InvalidTarget(0))));

        let config = SearchConfig::default().with_target_option(Some(-5));
        assert!(config.validate().is_err());

        let config = SearchConfig::default().with_target_option(Some(i64::MAX));
        assert!(config.validate().is_ok());
    }
}
