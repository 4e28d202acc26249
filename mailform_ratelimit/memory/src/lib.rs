use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::{DateTime, TimeDelta, Utc};
use mailform_ratelimit_contracts::{RateLimitDecision, RateLimitService};
use mailform_shared_contracts::time::TimeService;

/// Fixed-window counters held in process memory. Counters reset when the
/// process restarts.
#[derive(Debug, Clone)]
pub struct MemoryRateLimitServiceImpl<Time> {
    time: Time,
    config: MemoryRateLimitServiceConfig,
    state: Arc<Mutex<HashMap<String, Window>>>,
}

#[derive(Debug, Clone, Copy)]
pub struct MemoryRateLimitServiceConfig {
    pub max_requests: u64,
    pub window: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: DateTime<Utc>,
    count: u64,
}

impl<Time> MemoryRateLimitServiceImpl<Time> {
    pub fn new(time: Time, config: MemoryRateLimitServiceConfig) -> Self {
        Self {
            time,
            config,
            state: Default::default(),
        }
    }
}

impl<Time> RateLimitService for MemoryRateLimitServiceImpl<Time>
where
    Time: TimeService,
{
    async fn check(&self, key: &str) -> RateLimitDecision {
        let now = self.time.now();
        let window = TimeDelta::from_std(self.config.window).unwrap_or(TimeDelta::MAX);

        let mut state = self.state.lock().unwrap_or_else(|err| err.into_inner());

        let entry = state.entry(key.to_owned()).or_insert(Window {
            started_at: now,
            count: 0,
        });
        if now >= entry.started_at + window {
            entry.started_at = now;
            entry.count = 0;
        }

        if entry.count >= self.config.max_requests {
            let retry_after = (entry.started_at + window - now)
                .to_std()
                .unwrap_or_default();
            return RateLimitDecision::Limited { retry_after };
        }

        entry.count += 1;
        RateLimitDecision::Allowed {
            remaining: self.config.max_requests - entry.count,
        }
    }
}
