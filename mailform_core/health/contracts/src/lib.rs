use chrono::{DateTime, Utc};

/// Static liveness report. Deliberately does not probe the mail relay or any
/// other dependency; a healthy process answers even when the provider is
/// down.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait HealthService: Send + Sync + 'static {
    fn get_status(&self) -> HealthStatus;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub service: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(feature = "mock")]
impl MockHealthService {
    pub fn with_get_status(mut self, status: HealthStatus) -> Self {
        self.expect_get_status().once().return_const(status);
        self
    }
}
