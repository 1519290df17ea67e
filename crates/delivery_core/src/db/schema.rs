//! Schema required by delivery employee persistence.
//!
//! # Invariants
//! - Bootstrap is idempotent; existing tables and rows are left untouched.
//! - `delivery_employee.employee_id` references `employee.employee_id`.

use rusqlite::Connection;

pub const EMPLOYEE_TABLE: &str = "employee";
pub const DELIVERY_EMPLOYEE_TABLE: &str = "delivery_employee";

/// Columns the repository reads or writes, per table.
pub const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        EMPLOYEE_TABLE,
        &[
            "employee_id",
            "first_name",
            "last_name",
            "salary",
            "bank_account_number",
            "national_insurance_number",
        ],
    ),
    (DELIVERY_EMPLOYEE_TABLE, &["employee_id"]),
];

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS employee (
    employee_id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    salary REAL NOT NULL,
    bank_account_number TEXT NOT NULL,
    national_insurance_number TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS delivery_employee (
    employee_id INTEGER PRIMARY KEY NOT NULL,
    FOREIGN KEY (employee_id) REFERENCES employee (employee_id)
);
";

/// Creates missing tables on the given connection.
pub fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
