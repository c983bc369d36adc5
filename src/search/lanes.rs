//! Candidate vectors and the scan kernels that drive them.
//!
//! A worker holds `N` consecutive candidates `{base, base + 1, ..., base + N - 1}`
//! and compares all of them against the target in one vector-step, then moves
//! every lane forward by `N`. Two kernels implement that loop:
//!
//! | Kernel | Lanes | Notes |
//! |--------|-------|-------|
//! | [`Kernel::Portable`] | 1, 2, 4, 8 | `[i64; N]` arrays, auto-vectorised |
//! | [`Kernel::Avx2`] | 4 | `_mm256_cmpeq_epi64` + `_mm256_movemask_epi8` |
//!
//! # Top of the domain
//!
//! Lanes are derived from the base with saturating addition, so the last
//! partial vector below `i64::MAX` repeats `i64::MAX` in its upper lanes
//! instead of wrapping into negative numbers. The base itself moves with
//! `checked_add`; once it would overflow the scan ends with
//! [`ScanOutcome::Exhausted`].

use crate::search::config::LaneWidth;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A lane matched. `steps` includes the matching vector-step.
    Found { value: i64, steps: u64 },
    /// Another worker raised the stop flag.
    Stopped { steps: u64 },
    /// The base ran past `i64::MAX` without a match.
    Exhausted { steps: u64 },
}

impl ScanOutcome {
    /// Vector-steps evaluated before the scan ended.
    pub fn steps(&self) -> u64 {
        match *self {
            ScanOutcome::Found { steps, .. }
            | ScanOutcome::Stopped { steps }
            | ScanOutcome::Exhausted { steps } => steps,
        }
    }
}

/// Shared inputs of a scan: what to look for, where to publish progress and
/// when to give up.
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    pub target: i64,
    /// Completed non-matching vector-steps, written only by this worker.
    pub progress: &'a AtomicU64,
    pub stop: &'a AtomicBool,
}

/// `N` candidates tested in lock-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lanes<const N: usize> {
    base: i64,
    lanes: [i64; N],
}

impl<const N: usize> Lanes<N> {
    const STRIDE: i64 = N as i64;

    pub fn starting_at(base: i64) -> Self {
        let mut lanes = [0i64; N];
        for (i, lane) in lanes.iter_mut().enumerate() {
            *lane = base.saturating_add(i as i64);
        }
        Self { base, lanes }
    }

    /// Bit `i` is set when lane `i` equals `target`.
    #[inline(always)]
    pub fn match_mask(&self, target: i64) -> u32 {
        let mut mask = 0u32;
        for (i, &lane) in self.lanes.iter().enumerate() {
            mask |= ((lane == target) as u32) << i;
        }
        mask
    }

    #[inline(always)]
    pub fn first_match(&self, target: i64) -> Option<i64> {
        let mask = self.match_mask(target);
        if mask == 0 {
            None
        } else {
            Some(self.lanes[mask.trailing_zeros() as usize])
        }
    }

    /// Move every lane forward by `N`. Returns false when the base would
    /// overflow, leaving the lanes untouched.
    #[inline(always)]
    pub fn advance(&mut self) -> bool {
        let Some(base) = self.base.checked_add(Self::STRIDE) else {
            return false;
        };
        self.base = base;
        for lane in &mut self.lanes {
            *lane = lane.saturating_add(Self::STRIDE);
        }
        true
    }
}

/// Scan upwards from `start` with the portable `N`-lane kernel.
///
/// `steps` is the number of vector-steps already completed by the caller, so
/// a kernel can hand the tail of its range over without resetting progress.
pub fn scan_portable<const N: usize>(
    ctx: ScanContext<'_>,
    start: i64,
    mut steps: u64,
) -> ScanOutcome {
    let mut lanes = Lanes::<N>::starting_at(start);
    loop {
        if ctx.stop.load(Ordering::Relaxed) {
            return ScanOutcome::Stopped { steps };
        }
        if let Some(value) = lanes.first_match(ctx.target) {
            return ScanOutcome::Found {
                value,
                steps: steps + 1,
            };
        }
        steps += 1;
        ctx.progress.store(steps, Ordering::Relaxed);
        if !lanes.advance() {
            return ScanOutcome::Exhausted { steps };
        }
    }
}

/// Runtime detection for AVX2 support.
pub fn avx2_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::arch::is_x86_feature_detected!("avx2")
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// The loop a worker runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    Portable(LaneWidth),
    Avx2,
}

impl Kernel {
    /// Pick the fastest kernel for `width` on this CPU.
    pub fn select(width: LaneWidth, portable_only: bool) -> Self {
        if width == LaneWidth::Four && !portable_only && avx2_available() {
            Kernel::Avx2
        } else {
            Kernel::Portable(width)
        }
    }

    pub fn lane_width(self) -> LaneWidth {
        match self {
            Kernel::Portable(width) => width,
            Kernel::Avx2 => LaneWidth::Four,
        }
    }

    /// Run the scan from `start` until a match, a stop request or the top of the domain.
    pub fn scan(self, ctx: ScanContext<'_>, start: i64) -> ScanOutcome {
        match self {
            Kernel::Portable(LaneWidth::One) => scan_portable::<1>(ctx, start, 0),
            Kernel::Portable(LaneWidth::Two) => scan_portable::<2>(ctx, start, 0),
            Kernel::Portable(LaneWidth::Four) => scan_portable::<4>(ctx, start, 0),
            Kernel::Portable(LaneWidth::Eight) => scan_portable::<8>(ctx, start, 0),
            Kernel::Avx2 => scan_avx2_or_portable(ctx, start),
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn scan_avx2_or_portable(ctx: ScanContext<'_>, start: i64) -> ScanOutcome {
    if avx2_available() {
        // SAFETY: AVX2 support was checked just above.
        unsafe { x86_avx2::scan_avx2(ctx, start) }
    } else {
        scan_portable::<4>(ctx, start, 0)
    }
}

#[cfg(not(target_arch = "x86_64"))]
fn scan_avx2_or_portable(ctx: ScanContext<'_>, start: i64) -> ScanOutcome {
    scan_portable::<4>(ctx, start, 0)
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kernel::Portable(width) => write!(f, "portable x{}", width),
            Kernel::Avx2 => write!(f, "avx2 x4"),
        }
    }
}

/// AVX2 kernel for four 64-bit lanes.
#[cfg(target_arch = "x86_64")]
#[allow(unsafe_op_in_unsafe_fn)]
mod x86_avx2 {
    use super::{scan_portable, ScanContext, ScanOutcome};
    use std::arch::x86_64::{
        _mm256_add_epi64, _mm256_cmpeq_epi64, _mm256_movemask_epi8, _mm256_set1_epi64x,
        _mm256_setr_epi64x,
    };
    use std::sync::atomic::Ordering;

    /// Highest base whose four lanes and the following vector are all representable.
    const LAST_VECTOR_BASE: i64 = i64::MAX - 7;

    /// `cmpeq` sets all 64 bits of a matching lane, so `movemask_epi8` yields
    /// eight set bits per match and `trailing_zeros / 8` is the lane index.
    /// The last few vectors below `i64::MAX` are handed to the portable kernel,
    /// which saturates instead of wrapping.
    #[target_feature(enable = "avx2")]
    pub unsafe fn scan_avx2(ctx: ScanContext<'_>, start: i64) -> ScanOutcome {
        if start > LAST_VECTOR_BASE {
            return scan_portable::<4>(ctx, start, 0);
        }

        let answer = _mm256_set1_epi64x(ctx.target);
        let increment = _mm256_set1_epi64x(4);
        let mut candidates = _mm256_setr_epi64x(start, start + 1, start + 2, start + 3);
        let mut base = start;
        let mut steps = 0u64;

        loop {
            if ctx.stop.load(Ordering::Relaxed) {
                return ScanOutcome::Stopped { steps };
            }

            let mask = _mm256_movemask_epi8(_mm256_cmpeq_epi64(candidates, answer));
            if mask != 0 {
                let lane = (mask as u32).trailing_zeros() / 8;
                return ScanOutcome::Found {
                    value: base + lane as i64,
                    steps: steps + 1,
                };
            }

            steps += 1;
            ctx.progress.store(steps, Ordering::Relaxed);

            if base > LAST_VECTOR_BASE - 4 {
                return scan_portable::<4>(ctx, base + 4, steps);
            }
            base += 4;
            candidates = _mm256_add_epi64(candidates, increment);
        }
    }
}
