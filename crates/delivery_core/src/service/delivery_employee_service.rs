//! Delivery employee use-case service.
//!
//! # Responsibility
//! - Validate caller input before it reaches persistence.
//! - Enforce delivery membership for reads and updates.
//!
//! # Invariants
//! - `update` never touches an employee that is not registered for delivery.
//! - `get` hides employees outside the delivery registry.

use crate::model::employee::{
    DeliveryEmployeeUpdate, Employee, EmployeeId, EmployeeValidationError, NewDeliveryEmployee,
};
use crate::repo::delivery_employee_repo::{DeliveryEmployeeRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for delivery employee use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected before any storage access.
    Validation(EmployeeValidationError),
    /// Target id is not in the delivery registry.
    NotDeliveryEmployee(EmployeeId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid delivery employee: {err}"),
            Self::NotDeliveryEmployee(id) => write!(f, "employee {id} is not a delivery employee"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotDeliveryEmployee(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<EmployeeValidationError> for ServiceError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case wrapper over a delivery employee repository.
pub struct DeliveryEmployeeService<R: DeliveryEmployeeRepository> {
    repo: R,
}

impl<R: DeliveryEmployeeRepository> DeliveryEmployeeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and registers a new delivery employee, returning its id.
    pub fn create(&self, request: &NewDeliveryEmployee) -> ServiceResult<EmployeeId> {
        request.validate()?;
        Ok(self.repo.create_delivery_employee(request)?)
    }

    pub fn list_ids(&self) -> ServiceResult<Vec<EmployeeId>> {
        Ok(self.repo.list_delivery_employee_ids()?)
    }

    /// Returns `None` for unknown ids and for employees outside the registry.
    pub fn get(&self, employee_id: EmployeeId) -> ServiceResult<Option<Employee>> {
        if !self.repo.is_delivery_employee(employee_id)? {
            return Ok(None);
        }
        Ok(self.repo.get_employee(employee_id)?)
    }

    /// Validates `update` and applies it to a registered delivery employee.
    ///
    /// # Errors
    /// - `NotDeliveryEmployee` when `employee_id` is not in the registry.
    pub fn update(
        &self,
        employee_id: EmployeeId,
        update: &DeliveryEmployeeUpdate,
    ) -> ServiceResult<()> {
        update.validate()?;
        if !self.repo.is_delivery_employee(employee_id)? {
            return Err(ServiceError::NotDeliveryEmployee(employee_id));
        }
        Ok(self.repo.update_delivery_employee(employee_id, update)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{DeliveryEmployeeService, ServiceError};
    use crate::model::employee::{
        DeliveryEmployeeUpdate, Employee, EmployeeId, EmployeeValidationError, NewDeliveryEmployee,
    };
    use crate::repo::delivery_employee_repo::{DeliveryEmployeeRepository, RepoResult};
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Mutex;

    /// In-memory stand-in tracking employees and registry separately.
    #[derive(Default)]
    struct InMemoryRepository {
        employees: Mutex<BTreeMap<EmployeeId, Employee>>,
        registry: Mutex<BTreeSet<EmployeeId>>,
        updates: Mutex<Vec<EmployeeId>>,
    }

    impl InMemoryRepository {
        fn insert_plain_employee(&self, employee: Employee) {
            self.employees
                .lock()
                .unwrap()
                .insert(employee.employee_id, employee);
        }
    }

    impl DeliveryEmployeeRepository for InMemoryRepository {
        fn create_delivery_employee(
            &self,
            employee: &NewDeliveryEmployee,
        ) -> RepoResult<EmployeeId> {
            let mut employees = self.employees.lock().unwrap();
            let id = employees.keys().last().copied().unwrap_or(0) + 1;
            employees.insert(id, Employee::from_new(id, employee));
            self.registry.lock().unwrap().insert(id);
            Ok(id)
        }

        fn list_delivery_employee_ids(&self) -> RepoResult<Vec<EmployeeId>> {
            Ok(self.registry.lock().unwrap().iter().copied().collect())
        }

        fn get_employee(&self, employee_id: EmployeeId) -> RepoResult<Option<Employee>> {
            Ok(self.employees.lock().unwrap().get(&employee_id).cloned())
        }

        fn update_delivery_employee(
            &self,
            employee_id: EmployeeId,
            update: &DeliveryEmployeeUpdate,
        ) -> RepoResult<()> {
            self.updates.lock().unwrap().push(employee_id);
            if let Some(employee) = self.employees.lock().unwrap().get_mut(&employee_id) {
                employee.first_name = update.first_name.clone();
                employee.last_name = update.last_name.clone();
                employee.salary = update.salary;
                employee.bank_account_number = update.bank_account_number.clone();
            }
            Ok(())
        }

        fn is_delivery_employee(&self, employee_id: EmployeeId) -> RepoResult<bool> {
            Ok(self.registry.lock().unwrap().contains(&employee_id))
        }
    }

    fn ana() -> NewDeliveryEmployee {
        NewDeliveryEmployee::new("Ana", "Ruiz", 32000.0, "GB00AAAA00000000", "QQ123456C")
    }

    #[test]
    fn create_rejects_invalid_input_before_persisting() {
        let service = DeliveryEmployeeService::new(InMemoryRepository::default());
        let mut request = ana();
        request.last_name = String::new();

        let err = service.create(&request).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(EmployeeValidationError::EmptyField("last_name"))
        ));
        assert!(service.list_ids().unwrap().is_empty());
    }

    #[test]
    fn create_then_get_returns_employee() {
        let service = DeliveryEmployeeService::new(InMemoryRepository::default());
        let id = service.create(&ana()).unwrap();

        let loaded = service.get(id).unwrap().unwrap();
        assert_eq!(loaded, Employee::from_new(id, &ana()));
        assert_eq!(service.list_ids().unwrap(), vec![id]);
    }

    #[test]
    fn get_hides_employees_outside_registry() {
        let repo = InMemoryRepository::default();
        repo.insert_plain_employee(Employee::from_new(40, &ana()));
        let service = DeliveryEmployeeService::new(repo);

        assert!(service.get(40).unwrap().is_none());
    }

    #[test]
    fn update_refuses_non_delivery_employee_without_touching_repository() {
        let repo = InMemoryRepository::default();
        repo.insert_plain_employee(Employee::from_new(40, &ana()));
        let service = DeliveryEmployeeService::new(repo);

        let update = DeliveryEmployeeUpdate::new("Eva", "Ruiz", 35000.0, "GB11BBBB11111111");
        let err = service.update(40, &update).unwrap_err();
        assert!(matches!(err, ServiceError::NotDeliveryEmployee(40)));
        assert!(service.repo.updates.lock().unwrap().is_empty());
    }

    #[test]
    fn update_applies_to_registered_employee() {
        let service = DeliveryEmployeeService::new(InMemoryRepository::default());
        let id = service.create(&ana()).unwrap();

        let update = DeliveryEmployeeUpdate::new("Eva", "Ruiz", 35000.0, "GB11BBBB11111111");
        service.update(id, &update).unwrap();

        let loaded = service.get(id).unwrap().unwrap();
        assert_eq!(loaded.first_name, "Eva");
        assert_eq!(loaded.national_insurance_number, "QQ123456C");
    }
}
