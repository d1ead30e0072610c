use std::sync::Arc;

use adapter::repository::reservation::ReservationRepositoryImpl;
use adapter::{database::ConnectionPool, repository::health::HealthCheckRepositoryImpl};
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::reservation::ReservationRepository;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let reservation_repository = Arc::new(ReservationRepositoryImpl::new(pool));
        Self {
            health_check_repository,
            reservation_repository,
        }
    }

    // Wires pre-built repositories; lets tests run the router against
    // in-memory implementations instead of Postgres.
    pub fn from_parts(
        health_check_repository: Arc<dyn HealthCheckRepository>,
        reservation_repository: Arc<dyn ReservationRepository>,
    ) -> Self {
        Self {
            health_check_repository,
            reservation_repository,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }
}
