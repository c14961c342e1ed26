//! Business logic services

pub mod circulation;
pub mod fines;
pub mod reports;
pub mod requests;

use crate::{config::CirculationConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub circulation: circulation::CirculationEngine,
    pub requests: requests::RequestsService,
    pub reports: reports::ReportsService,
}

impl Services {
    /// Create all services with the given repository and circulation policy
    pub fn new(repository: Repository, circulation_config: CirculationConfig) -> Self {
        let circulation =
            circulation::CirculationEngine::new(repository.clone(), circulation_config);
        Self {
            requests: requests::RequestsService::new(repository.clone(), circulation.clone()),
            reports: reports::ReportsService::new(repository),
            circulation,
        }
    }
}
