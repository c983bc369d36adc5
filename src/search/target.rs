//! The secret value the workers are searching for.

use crate::error::{GuessError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Smallest value a target may take.
pub const TARGET_MIN: i64 = 1;

/// A secret drawn from `TARGET_MIN..=i64::MAX`. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target(i64);

impl Target {
    /// Wrap an explicit value, rejecting anything outside the domain.
    pub fn new(value: i64) -> Result<Self> {
        if value < TARGET_MIN {
            return Err(GuessError::InvalidTarget(value));
        }
        Ok(Self(value))
    }

    /// Draw a target uniformly from the domain.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(TARGET_MIN..=i64::MAX))
    }

    /// Draw a target from a seeded generator, or from OS entropy if no seed is given.
    pub fn from_seed(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::random(&mut rng)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_domain_bounds() {
        assert_eq!(Target::new(1).unwrap().value(), 1);
        assert_eq!(Target::new(i64::MAX).unwrap().value(), i64::MAX);
    }

    #[test]
    fn test_new_rejects_zero_and_negative() {
        assert!(matches!(Target::new(0), Err(GuessError::InvalidTarget(0))));
        assert!(Target::new(-1).is_err());
        assert!(Target::new(i64::MIN).is_err());
    }

    #[test]
    fn test_random_stays_in_domain() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let target = Target::random(&mut rng);
            assert!(target.value() >= TARGET_MIN);
        }
    }

    #[test]
    fn test_seeded_draw_is_reproducible() {
        assert_eq!(Target::from_seed(Some(9)), Target::from_seed(Some(9)));
    }

    #[test]
    fn test_unseeded_draws_vary() {
        let values: std::collections::HashSet<_> =
            (0..8).map(|_| Target::from_seed(None).value()).collect();
        assert!(values.len() > 1);
    }
}
