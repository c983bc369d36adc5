//! Splitting `0..=i64::MAX` into one block per worker.
//!
//! The domain is cut into `num_workers` blocks of `i64::MAX / num_workers`
//! values. Worker `i` starts at `i * block_size`. Workers are not stopped at
//! their block end and may run on into the next block. The last block also
//! absorbs the remainder left by the integer division.

/// The nominal slice of the number space owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// Worker index, used to address its progress counter.
    pub index: usize,
    /// First candidate the worker tests.
    pub start: i64,
    /// Last value of the nominal block (inclusive).
    pub end: i64,
}

impl Partition {
    /// Number of values in the nominal block.
    pub fn size(&self) -> u64 {
        (self.end - self.start) as u64 + 1
    }
}

/// Size of each block for the given worker count.
pub fn block_size(num_workers: usize) -> i64 {
    i64::MAX / num_workers.max(1) as i64
}

/// Partition the domain among `num_workers` workers.
pub fn partition_space(num_workers: usize) -> Vec<Partition> {
    let num_workers = num_workers.max(1);
    let increment = block_size(num_workers);

    (0..num_workers)
        .map(|index| {
            let start = increment * index as i64;
            let end = if index + 1 == num_workers {
                i64::MAX
            } else {
                start + increment - 1
            };
            Partition { index, start, end }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_worker_offsets() {
        let increment = i64::MAX / 4;
        let partitions = partition_space(4);

        assert_eq!(partitions.len(), 4);
        for (i, p) in partitions.iter().enumerate() {
            assert_eq!(p.index, i);
            assert_eq!(p.start, i as i64 * increment);
        }
        for pair in partitions.windows(2) {
            assert!(pair[0].start < pair[1].start);
            assert_eq!(pair[1].start - pair[0].start, increment);
        }
    }

    #[test]
    fn test_blocks_are_contiguous_and_cover_domain() {
        for workers in [1, 2, 3, 4, 7, 16] {
            let partitions = partition_space(workers);
            assert_eq!(partitions[0].start, 0);
            assert_eq!(partitions.last().unwrap().end, i64::MAX);
            for pair in partitions.windows(2) {
                assert_eq!(pair[0].end + 1, pair[1].start);
            }
        }
    }

    #[test]
    fn test_single_worker_owns_everything() {
        let partitions = partition_space(1);
        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].start, 0);
        assert_eq!(partitions[0].end, i64::MAX);
        assert_eq!(partitions[0].size(), i64::MAX as u64 + 1);
    }

    #[test]
    fn test_last_block_takes_remainder() {
        let partitions = partition_space(3);
        let increment = block_size(3);
        assert_eq!(partitions[0].size(), increment as u64);
        assert_eq!(partitions[1].size(), increment as u64);
        assert_eq!(
            partitions[2].size(),
            increment as u64 + (i64::MAX % 3) as u64 + 1
        );
    }

    #[test]
    fn test_zero_workers_treated_as_one() {
        assert_eq!(partition_space(0).len(), 1);
        assert_eq!(block_size(0), i64::MAX);
    }
}
