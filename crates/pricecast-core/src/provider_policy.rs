use std::time::Duration;

use crate::ProviderId;

/// Client-side request budget for an upstream provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderPolicy {
    pub provider_id: ProviderId,
    pub quota_window: Duration,
    pub quota_limit: u32,
    pub retry_backoff: BackoffPolicy,
}

/// Exponential retry hint reported when the budget is exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub max_retries: u32,
}

impl BackoffPolicy {
    /// Delay to suggest after `attempt` consecutive rejections (0-based),
    /// or `None` once `max_retries` is exceeded.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt > self.max_retries {
            return None;
        }

        let seconds =
            self.initial_delay.as_secs_f64() * self.multiplier.powf(f64::from(attempt));
        Some(Duration::from_secs_f64(
            seconds.min(self.max_delay.as_secs_f64()),
        ))
    }
}

impl ProviderPolicy {
    /// Alpha Vantage free tier: five calls per minute.
    pub fn alphavantage_default() -> Self {
        Self {
            provider_id: ProviderId::Alphavantage,
            quota_window: Duration::from_secs(60),
            quota_limit: 5,
            retry_backoff: BackoffPolicy {
                initial_delay: Duration::from_secs(1),
                max_delay: Duration::from_secs(60),
                multiplier: 2.0,
                max_retries: 3,
            },
        }
    }

    /// Local sources have no upstream budget.
    pub fn default_for(provider_id: ProviderId) -> Option<Self> {
        match provider_id {
            ProviderId::Alphavantage => Some(Self::alphavantage_default()),
            ProviderId::Simulated => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphavantage_policy_matches_free_tier() {
        let policy = ProviderPolicy::alphavantage_default();

        assert_eq!(policy.quota_window, Duration::from_secs(60));
        assert_eq!(policy.quota_limit, 5);
        assert!(ProviderPolicy::default_for(ProviderId::Simulated).is_none());
    }

    #[test]
    fn backoff_doubles_until_capped_then_gives_up() {
        let backoff = BackoffPolicy {
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            max_retries: 3,
        };

        assert_eq!(backoff.delay_for(0), Some(Duration::from_secs(2)));
        assert_eq!(backoff.delay_for(1), Some(Duration::from_secs(4)));
        assert_eq!(backoff.delay_for(2), Some(Duration::from_secs(8)));
        assert_eq!(backoff.delay_for(3), Some(Duration::from_secs(10)));
        assert_eq!(backoff.delay_for(4), None);
    }
}
