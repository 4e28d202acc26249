use std::{future::Future, time::Duration};

/// Admission counter for a single client identity. Implementations must
/// count atomically per key so concurrent bursts from the same client are
/// not undercounted. Process-local implementations lose their counters on
/// restart; a multi-instance deployment can substitute one backed by a
/// shared store.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RateLimitService: Send + Sync + 'static {
    /// Counts a request for `key` and decides whether it may proceed within
    /// the current window.
    fn check(&self, key: &str) -> impl Future<Output = RateLimitDecision> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u64 },
    Limited { retry_after: Duration },
}

#[cfg(feature = "mock")]
impl MockRateLimitService {
    pub fn with_check(mut self, key: String, decision: RateLimitDecision) -> Self {
        self.expect_check()
            .once()
            .with(mockall::predicate::eq(key))
            .return_once(move |_| Box::pin(std::future::ready(decision)));
        self
    }
}
