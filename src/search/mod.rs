//! Brute-force search for a secret in the non-negative `i64` range
//!
//! - Partition: the domain split into one contiguous block per worker
//! - Lanes: the candidate vector each worker advances, with SIMD kernels
//! - Worker: one thread scanning its block until told to stop
//! - Parallel: coordinator, progress counters and shutdown signalling

pub mod config;
pub mod lanes;
pub mod parallel;
pub mod partition;
pub mod result;
pub mod target;
pub mod worker;

pub use config::{LaneWidth, SearchConfig};
pub use parallel::run_parallel_search;
pub use result::SearchResult;
pub use target::Target;
