//! Read load generator for etcd.
//!
//! Issues a fixed number of `get` calls against one key in bursts. Every
//! burst runs on a freshly connected client, spawns one task per request,
//! and waits for all of them before the next burst starts. Each task sleeps
//! a random 1..=max seconds before its single read.
//!
//! # Example
//!
//! ```ignore
//! use get_overload::{LoadGenerator, LoadTestPlan};
//!
//! let plan = LoadTestPlan::new("/config/a", 10).with_burst_size(4);
//! let summary = LoadGenerator::new(plan, factory).run().await?;
//! assert_eq!(summary.requests, 10);
//! ```

pub mod args;
pub mod error;
pub mod generator;
pub mod plan;

pub use args::GetOverloadArgs;
pub use error::LoadTestError;
pub use generator::{LoadGenerator, RunSummary};
pub use plan::{Bursts, LoadTestPlan, DEFAULT_MAX_JITTER_SECS};
