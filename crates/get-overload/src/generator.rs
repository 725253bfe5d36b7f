//! Burst scheduling.

use crate::{LoadTestError, LoadTestPlan};
use etcd_store::StoreClientFactory;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Counts of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub bursts: u64,
    pub requests: u64,
}

/// Drives a `LoadTestPlan` against clients produced by `factory`.
pub struct LoadGenerator<F> {
    plan: LoadTestPlan,
    factory: F,
}

impl<F: StoreClientFactory> LoadGenerator<F> {
    pub fn new(plan: LoadTestPlan, factory: F) -> Self {
        Self { plan, factory }
    }

    pub fn plan(&self) -> &LoadTestPlan {
        &self.plan
    }

    /// Run every burst of the plan.
    ///
    /// The first failed read ends the run; tasks still pending in that burst
    /// are aborted.
    pub async fn run(&self) -> Result<RunSummary, LoadTestError> {
        self.plan.validate()?;

        // Hands out one independent seed per task.
        let mut seeds = match self.plan.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let max_jitter = self.plan.max_jitter_secs();
        let mut summary = RunSummary::default();

        info!(
            "Issuing {} gets of {} in {} bursts",
            self.plan.total_requests(),
            self.plan.target_key(),
            self.plan.burst_count()
        );

        for (burst, size) in (0u64..).zip(self.plan.bursts()) {
            let client = self
                .factory
                .connect()
                .await
                .map_err(|source| LoadTestError::Connect { burst, source })?;

            info!(
                "Burst {burst}: {size} gets over a new {} connection",
                client.protocol()
            );

            let mut tasks = JoinSet::new();
            for _ in 0..size {
                let client = Arc::clone(&client);
                let key = self.plan.target_key().to_string();
                let mut rng = StdRng::seed_from_u64(seeds.random());

                tasks.spawn(async move {
                    let jitter = Duration::from_secs(rng.random_range(1..=max_jitter));
                    tokio::time::sleep(jitter).await;
                    client.get(&key).await.map(|_| ())
                });
            }

            while let Some(joined) = tasks.join_next().await {
                joined?.map_err(|source| LoadTestError::Get { burst, source })?;
                summary.requests += 1;
            }

            summary.bursts += 1;
            debug!("Burst {burst} complete, closing its connection");
        }

        info!(
            "Completed {} gets in {} bursts",
            summary.requests, summary.bursts
        );
        Ok(summary)
    }
}
