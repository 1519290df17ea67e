//! Delivery employee persistence core.
//! Owns the `employee`/`delivery_employee` storage contract and the
//! validation rules applied before data reaches it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{ConnectionProvider, DbError, DbResult, FileConnectionProvider, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::employee::{
    DeliveryEmployeeUpdate, Employee, EmployeeId, EmployeeValidationError, NewDeliveryEmployee,
};
pub use repo::delivery_employee_repo::{
    CreationFailureReason, DeliveryEmployeeRepository, RepoError, RepoResult,
    SqliteDeliveryEmployeeRepository,
};
pub use service::delivery_employee_service::{
    DeliveryEmployeeService, ServiceError, ServiceResult,
};

/// Minimal health-check API for linkage probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
