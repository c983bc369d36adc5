//! Parallel execution of the brute-force search.
//!
//! # Architecture
//!
//! - A **coordinator** that partitions the domain, spawns one worker thread per
//!   partition and samples progress once per reporting interval
//! - A **progress board** of per-worker atomic counters, written by each worker
//!   and read by the coordinator
//! - **Shared found state** so the first matching worker claims the answer and
//!   every other worker stops at its next vector-step
//! - A **channel** carrying match and exhaustion notices back to the coordinator
//!
//! # Example
//!
//! ```ignore
//! let config = SearchConfig::default().with_workers(4);
//! let target = Target::from_seed(None);
//! let result = run_parallel_search(&config, target, &mut std::io::stdout())?;
//! ```

pub mod channel;
pub mod coordinator;
pub mod progress;

pub use coordinator::run_parallel_search;
