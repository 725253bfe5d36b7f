//! CLI argument definitions for the load generator.

use crate::plan::{LoadTestPlan, DEFAULT_MAX_JITTER_SECS};
use clap::Args;

#[derive(Args, Clone, Debug)]
pub struct GetOverloadArgs {
    /// Key in etcd to get
    #[arg(long)]
    pub etcd_key: String,

    /// Number of gets
    #[arg(long, default_value = "1")]
    pub numgets: u64,

    /// Number of gets after which the client is refreshed (0 = one client for the whole run)
    #[arg(long, default_value = "0")]
    pub refresh_interval: u64,

    /// Upper bound on seconds to wait before each get
    #[arg(long, default_value_t = DEFAULT_MAX_JITTER_SECS)]
    pub max_wait: u64,

    /// Seed for the jitter RNG (same seed = same delays)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl GetOverloadArgs {
    pub fn to_plan(&self) -> LoadTestPlan {
        let mut plan = LoadTestPlan::new(self.etcd_key.clone(), self.numgets)
            .with_burst_size(self.refresh_interval)
            .with_max_jitter_secs(self.max_wait);
        if let Some(seed) = self.seed {
            plan = plan.with_seed(seed);
        }
        plan
    }
}
