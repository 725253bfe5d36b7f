//! Load test plan and burst partitioning.

use crate::LoadTestError;

/// Jitter upper bound used when none is configured.
pub const DEFAULT_MAX_JITTER_SECS: u64 = 10;

/// What a load run does: which key, how many reads, and how they are grouped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTestPlan {
    target_key: String,
    total_requests: u64,
    /// `None` means a single burst covering every request.
    burst_size: Option<u64>,
    max_jitter_secs: u64,
    seed: Option<u64>,
}

impl LoadTestPlan {
    pub fn new(target_key: impl Into<String>, total_requests: u64) -> Self {
        Self {
            target_key: target_key.into(),
            total_requests,
            burst_size: None,
            max_jitter_secs: DEFAULT_MAX_JITTER_SECS,
            seed: None,
        }
    }

    /// Requests per burst. Zero leaves the burst size unset.
    pub fn with_burst_size(mut self, burst_size: u64) -> Self {
        self.burst_size = (burst_size > 0).then_some(burst_size);
        self
    }

    pub fn with_max_jitter_secs(mut self, max_jitter_secs: u64) -> Self {
        self.max_jitter_secs = max_jitter_secs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn target_key(&self) -> &str {
        &self.target_key
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    /// Effective burst size, falling back to the total request count.
    pub fn burst_size(&self) -> u64 {
        self.burst_size.unwrap_or(self.total_requests)
    }

    pub fn max_jitter_secs(&self) -> u64 {
        self.max_jitter_secs
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn validate(&self) -> Result<(), LoadTestError> {
        if self.max_jitter_secs == 0 {
            return Err(LoadTestError::InvalidPlan(
                "maximum jitter must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Sizes of the bursts this plan runs, in order.
    pub fn bursts(&self) -> Bursts {
        Bursts {
            remaining: self.total_requests,
            burst_size: self.burst_size(),
        }
    }

    pub fn burst_count(&self) -> u64 {
        match self.burst_size() {
            0 => 0,
            size => self.total_requests.div_ceil(size),
        }
    }
}

/// Iterator over burst sizes: `min(burst_size, remaining)` until exhausted.
#[derive(Debug, Clone)]
pub struct Bursts {
    remaining: u64,
    burst_size: u64,
}

impl Iterator for Bursts {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 || self.burst_size == 0 {
            return None;
        }
        let size = self.burst_size.min(self.remaining);
        self.remaining -= size;
        Some(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bursts_with_remainder() {
        let plan = LoadTestPlan::new("/k", 10).with_burst_size(4);
        assert_eq!(plan.bursts().collect::<Vec<_>>(), vec![4, 4, 2]);
        assert_eq!(plan.burst_count(), 3);
    }

    #[test]
    fn test_bursts_exact_multiple() {
        let plan = LoadTestPlan::new("/k", 9).with_burst_size(3);
        assert_eq!(plan.bursts().collect::<Vec<_>>(), vec![3, 3, 3]);
    }

    #[test]
    fn test_unset_burst_size_is_single_burst() {
        let plan = LoadTestPlan::new("/k", 7);
        assert_eq!(plan.bursts().collect::<Vec<_>>(), vec![7]);

        let plan = LoadTestPlan::new("/k", 7).with_burst_size(0);
        assert_eq!(plan.burst_size(), 7);
        assert_eq!(plan.burst_count(), 1);
    }

    #[test]
    fn test_burst_larger_than_total() {
        let plan = LoadTestPlan::new("/k", 3).with_burst_size(100);
        assert_eq!(plan.bursts().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_zero_requests() {
        let plan = LoadTestPlan::new("/k", 0).with_burst_size(5);
        assert_eq!(plan.bursts().count(), 0);
        assert_eq!(LoadTestPlan::new("/k", 0).burst_count(), 0);
    }

    #[test]
    fn test_bursts_sum_to_total() {
        for total in 0..50u64 {
            for burst in 0..12u64 {
                let plan = LoadTestPlan::new("/k", total).with_burst_size(burst);
                let sizes: Vec<u64> = plan.bursts().collect();
                assert_eq!(sizes.iter().sum::<u64>(), total);
                assert_eq!(sizes.len() as u64, plan.burst_count());
            }
        }
    }

    #[test]
    fn test_validate_jitter() {
        let plan = LoadTestPlan::new("/k", 1).with_max_jitter_secs(0);
        assert!(matches!(plan.validate(), Err(LoadTestError::InvalidPlan(_))));
        assert!(LoadTestPlan::new("/k", 1).with_max_jitter_secs(1).validate().is_ok());
    }
}
