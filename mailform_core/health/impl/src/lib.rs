use mailform_core_health_contracts::{HealthService, HealthStatus};
use mailform_shared_contracts::time::TimeService;

#[derive(Debug, Clone)]
pub struct HealthServiceImpl<Time> {
    time: Time,
    config: HealthServiceConfig,
}

#[derive(Debug, Clone)]
pub struct HealthServiceConfig {
    pub service: String,
}

impl<Time> HealthServiceImpl<Time> {
    pub fn new(time: Time, config: HealthServiceConfig) -> Self {
        Self { time, config }
    }
}

impl<Time> HealthService for HealthServiceImpl<Time>
where
    Time: TimeService,
{
    fn get_status(&self) -> HealthStatus {
        HealthStatus {
            service: self.config.service.clone(),
            timestamp: self.time.now(),
        }
    }
}
