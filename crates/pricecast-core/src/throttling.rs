use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

use crate::provider_policy::{BackoffPolicy, ProviderPolicy};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared request budget for one upstream provider.
///
/// Clones share the same limiter, so every adapter handle draws from one
/// quota.
#[derive(Clone)]
pub struct RequestBudget {
    limiter: Arc<DirectRateLimiter>,
    rejections: Arc<AtomicU32>,
    backoff: BackoffPolicy,
}

impl RequestBudget {
    pub fn new(quota_window: Duration, quota_limit: u32, backoff: BackoffPolicy) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::direct(quota_from_window(
                quota_window,
                quota_limit,
            ))),
            rejections: Arc::new(AtomicU32::new(0)),
            backoff,
        }
    }

    pub fn from_policy(policy: &ProviderPolicy) -> Self {
        Self::new(
            policy.quota_window,
            policy.quota_limit,
            policy.retry_backoff.clone(),
        )
    }

    /// Takes one unit of budget, or returns how long the caller should wait.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        if self.limiter.check().is_ok() {
            self.rejections.store(0, Ordering::Relaxed);
            return Ok(());
        }

        let attempt = self.rejections.fetch_add(1, Ordering::Relaxed);
        Err(self
            .backoff
            .delay_for(attempt)
            .unwrap_or(self.backoff.max_delay))
    }

    pub fn consecutive_rejections(&self) -> u32 {
        self.rejections.load(Ordering::Relaxed)
    }
}

fn quota_from_window(quota_window: Duration, quota_limit: u32) -> Quota {
    let burst = NonZeroU32::new(quota_limit).unwrap_or(NonZeroU32::MIN);
    let seconds_per_cell = (quota_window.as_secs_f64() / f64::from(burst.get())).max(0.001);

    Quota::with_period(Duration::from_secs_f64(seconds_per_cell))
        .unwrap_or_else(|| Quota::per_second(burst))
        .allow_burst(burst)
}
