//! Delivery employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Create, read, list and update delivery employees over `employee` and
//!   `delivery_employee`.
//! - Map storage faults to one failure kind per operation.
//!
//! # Invariants
//! - Each operation acquires its own connection and releases it on every
//!   exit path.
//! - Creation writes the employee row and its registry row in one
//!   transaction; a failure leaves neither behind.
//! - All caller values are bound as parameters, never interpolated.
//! - Updates never touch `national_insurance_number`.

use crate::db::schema::REQUIRED_COLUMNS;
use crate::db::{ConnectionProvider, DbError, DbResult};
use crate::model::employee::{DeliveryEmployeeUpdate, Employee, EmployeeId, NewDeliveryEmployee};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const INSERT_EMPLOYEE_SQL: &str = "INSERT INTO employee (
    first_name,
    last_name,
    salary,
    bank_account_number,
    national_insurance_number
) VALUES (?1, ?2, ?3, ?4, ?5)
RETURNING employee_id;";

const INSERT_DELIVERY_EMPLOYEE_SQL: &str =
    "INSERT INTO delivery_employee (employee_id) VALUES (?1);";

const LIST_DELIVERY_EMPLOYEE_IDS_SQL: &str = "SELECT employee_id
FROM employee
JOIN delivery_employee USING (employee_id)
ORDER BY employee_id ASC;";

const SELECT_EMPLOYEE_SQL: &str = "SELECT
    employee_id,
    first_name,
    last_name,
    salary,
    bank_account_number,
    national_insurance_number
FROM employee
WHERE employee_id = ?1;";

const UPDATE_EMPLOYEE_SQL: &str = "UPDATE employee
SET
    first_name = ?1,
    last_name = ?2,
    salary = ?3,
    bank_account_number = ?4
WHERE employee_id = ?5;";

const SELECT_DELIVERY_EMPLOYEE_SQL: &str =
    "SELECT employee_id FROM delivery_employee WHERE employee_id = ?1;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Why a delivery employee could not be created.
#[derive(Debug)]
pub enum CreationFailureReason {
    Db(DbError),
    MissingGeneratedId,
    NonPositiveGeneratedId(EmployeeId),
}

impl Display for CreationFailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingGeneratedId => write!(f, "store returned no generated employee id"),
            Self::NonPositiveGeneratedId(id) => {
                write!(f, "store returned non-positive employee id {id}")
            }
        }
    }
}

impl Error for CreationFailureReason {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingGeneratedId | Self::NonPositiveGeneratedId(_) => None,
        }
    }
}

impl From<DbError> for CreationFailureReason {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CreationFailureReason {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository error for delivery employee persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Employee or registry insert failed; `employee` describes the masked input.
    Creation {
        employee: String,
        reason: CreationFailureReason,
    },
    /// Read failed while loading an employee or checking membership.
    Retrieval(DbError),
    /// Update statement failed.
    Update(DbError),
    /// Registry listing failed.
    List(DbError),
    /// No connection could be obtained while wiring the repository.
    Connection(DbError),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Creation { employee, reason } => {
                write!(f, "failed to create delivery employee: {reason}; input: {employee}")
            }
            Self::Retrieval(err) => write!(f, "failed to get employee: {err}"),
            Self::Update(err) => write!(f, "failed to update delivery employee: {err}"),
            Self::List(err) => write!(f, "failed to list delivery employees: {err}"),
            Self::Connection(err) => write!(f, "database connection unavailable: {err}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Creation { reason, .. } => Some(reason),
            Self::Retrieval(err) | Self::Update(err) | Self::List(err) | Self::Connection(err) => {
                Some(err)
            }
            Self::MissingRequiredTable(_) | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

/// Data access contract for delivery employees.
pub trait DeliveryEmployeeRepository {
    /// Inserts the employee and registers it as a delivery employee atomically.
    fn create_delivery_employee(&self, employee: &NewDeliveryEmployee) -> RepoResult<EmployeeId>;
    /// Returns registered ids in ascending order.
    fn list_delivery_employee_ids(&self) -> RepoResult<Vec<EmployeeId>>;
    /// Loads any employee by id, delivery or not.
    fn get_employee(&self, employee_id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Overwrites the mutable fields. A missing id is a no-op; membership is
    /// the caller's responsibility.
    fn update_delivery_employee(
        &self,
        employee_id: EmployeeId,
        update: &DeliveryEmployeeUpdate,
    ) -> RepoResult<()>;
    /// Returns whether `employee_id` is in the delivery registry; absence is
    /// `false`, not an error.
    fn is_delivery_employee(&self, employee_id: EmployeeId) -> RepoResult<bool>;
}

/// SQLite-backed delivery employee repository.
pub struct SqliteDeliveryEmployeeRepository<P> {
    provider: P,
}

impl<P: ConnectionProvider> SqliteDeliveryEmployeeRepository<P> {
    /// Wires the repository to `provider` after checking the schema it serves.
    pub fn try_new(provider: P) -> RepoResult<Self> {
        let conn = provider.get_connection().map_err(RepoError::Connection)?;
        ensure_connection_ready(&conn)?;
        drop(conn);
        Ok(Self { provider })
    }

    fn insert_with_registration(
        &self,
        employee: &NewDeliveryEmployee,
    ) -> Result<EmployeeId, CreationFailureReason> {
        let mut conn = self.provider.get_connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let generated = tx
            .query_row(
                INSERT_EMPLOYEE_SQL,
                params![
                    employee.first_name.as_str(),
                    employee.last_name.as_str(),
                    employee.salary,
                    employee.bank_account_number.as_str(),
                    employee.national_insurance_number.as_str(),
                ],
                |row| row.get::<_, EmployeeId>(0),
            )
            .optional()?;

        let employee_id = match generated {
            None => return Err(CreationFailureReason::MissingGeneratedId),
            Some(id) if id <= 0 => return Err(CreationFailureReason::NonPositiveGeneratedId(id)),
            Some(id) => id,
        };

        tx.execute(INSERT_DELIVERY_EMPLOYEE_SQL, [employee_id])?;
        tx.commit()?;

        Ok(employee_id)
    }

    fn query_registered_ids(&self) -> DbResult<Vec<EmployeeId>> {
        let conn = self.provider.get_connection()?;
        let mut stmt = conn.prepare(LIST_DELIVERY_EMPLOYEE_IDS_SQL)?;
        let ids = stmt
            .query_map([], |row| row.get::<_, EmployeeId>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn query_employee(&self, employee_id: EmployeeId) -> DbResult<Option<Employee>> {
        let conn = self.provider.get_connection()?;
        let employee = conn
            .query_row(SELECT_EMPLOYEE_SQL, [employee_id], parse_employee_row)
            .optional()?;
        Ok(employee)
    }

    fn execute_update(
        &self,
        employee_id: EmployeeId,
        update: &DeliveryEmployeeUpdate,
    ) -> DbResult<usize> {
        let conn = self.provider.get_connection()?;
        let changed = conn.execute(
            UPDATE_EMPLOYEE_SQL,
            params![
                update.first_name.as_str(),
                update.last_name.as_str(),
                update.salary,
                update.bank_account_number.as_str(),
                employee_id,
            ],
        )?;
        Ok(changed)
    }

    fn query_registry(&self, employee_id: EmployeeId) -> DbResult<bool> {
        let conn = self.provider.get_connection()?;
        let found = conn
            .query_row(SELECT_DELIVERY_EMPLOYEE_SQL, [employee_id], |row| {
                row.get::<_, EmployeeId>(0)
            })
            .optional()?;
        Ok(found.is_some())
    }
}

impl<P: ConnectionProvider> DeliveryEmployeeRepository for SqliteDeliveryEmployeeRepository<P> {
    fn create_delivery_employee(&self, employee: &NewDeliveryEmployee) -> RepoResult<EmployeeId> {
        let started_at = Instant::now();
        match self.insert_with_registration(employee) {
            Ok(employee_id) => {
                debug!(
                    "event=delivery_employee_create module=repo status=ok employee_id={} duration_ms={}",
                    employee_id,
                    started_at.elapsed().as_millis()
                );
                Ok(employee_id)
            }
            Err(reason) => {
                warn!(
                    "event=delivery_employee_create module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    reason
                );
                Err(RepoError::Creation {
                    employee: employee.to_string(),
                    reason,
                })
            }
        }
    }

    fn list_delivery_employee_ids(&self) -> RepoResult<Vec<EmployeeId>> {
        let ids = self.query_registered_ids().map_err(|err| {
            warn!("event=delivery_employee_list module=repo status=error error={err}");
            RepoError::List(err)
        })?;
        debug!(
            "event=delivery_employee_list module=repo status=ok count={}",
            ids.len()
        );
        Ok(ids)
    }

    fn get_employee(&self, employee_id: EmployeeId) -> RepoResult<Option<Employee>> {
        let employee = self.query_employee(employee_id).map_err(|err| {
            warn!(
                "event=employee_get module=repo status=error employee_id={employee_id} error={err}"
            );
            RepoError::Retrieval(err)
        })?;
        debug!(
            "event=employee_get module=repo status=ok employee_id={} found={}",
            employee_id,
            employee.is_some()
        );
        Ok(employee)
    }

    fn update_delivery_employee(
        &self,
        employee_id: EmployeeId,
        update: &DeliveryEmployeeUpdate,
    ) -> RepoResult<()> {
        let changed = self.execute_update(employee_id, update).map_err(|err| {
            warn!(
                "event=delivery_employee_update module=repo status=error employee_id={employee_id} error={err}"
            );
            RepoError::Update(err)
        })?;
        debug!(
            "event=delivery_employee_update module=repo status=ok employee_id={employee_id} changed={changed}"
        );
        Ok(())
    }

    fn is_delivery_employee(&self, employee_id: EmployeeId) -> RepoResult<bool> {
        self.query_registry(employee_id).map_err(|err| {
            warn!(
                "event=delivery_employee_check module=repo status=error employee_id={employee_id} error={err}"
            );
            RepoError::Retrieval(err)
        })
    }
}

fn parse_employee_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        employee_id: row.get("employee_id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        salary: row.get("salary")?,
        bank_account_number: row.get("bank_account_number")?,
        national_insurance_number: row.get("national_insurance_number")?,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    for &(table, columns) in REQUIRED_COLUMNS {
        let present = table_columns(conn, table).map_err(RepoError::Connection)?;
        if present.is_empty() {
            return Err(RepoError::MissingRequiredTable(table));
        }
        if let Some(column) = columns
            .iter()
            .copied()
            .find(|column| !present.iter().any(|name| name.as_str() == *column))
        {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
