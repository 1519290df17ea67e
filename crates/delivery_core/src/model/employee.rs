//! Employee domain model.
//!
//! # Responsibility
//! - Define the stored employee record and the create/update inputs.
//! - Provide input validation used by the service layer.
//!
//! # Invariants
//! - `employee_id` is assigned by the store and is positive once persisted.
//! - `national_insurance_number` never changes after creation.
//! - `Display` output masks bank account and national insurance numbers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-generated employee identifier.
pub type EmployeeId = i64;

static NI_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}[0-9]{6}[A-D]$").expect("valid ni number regex"));

const MASK_VISIBLE_CHARS: usize = 4;

/// Persisted employee row.
///
/// Any employee can be loaded by id; delivery membership is tracked separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub salary: f64,
    pub bank_account_number: String,
    pub national_insurance_number: String,
}

/// Input for registering a new delivery employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDeliveryEmployee {
    pub first_name: String,
    pub last_name: String,
    pub salary: f64,
    pub bank_account_number: String,
    pub national_insurance_number: String,
}

/// Mutable subset of employee fields.
///
/// National insurance number is deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEmployeeUpdate {
    pub first_name: String,
    pub last_name: String,
    pub salary: f64,
    pub bank_account_number: String,
}

/// Field-level validation failure for employee inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    EmptyField(&'static str),
    InvalidSalary,
    InvalidNationalInsuranceNumber,
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} cannot be empty"),
            Self::InvalidSalary => write!(f, "salary must be a finite, non-negative number"),
            Self::InvalidNationalInsuranceNumber => {
                write!(f, "national insurance number must match format AA999999A")
            }
        }
    }
}

impl Error for EmployeeValidationError {}

impl Employee {
    /// Builds the stored record for `input` once the store assigned `employee_id`.
    pub fn from_new(employee_id: EmployeeId, input: &NewDeliveryEmployee) -> Self {
        Self {
            employee_id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            salary: input.salary,
            bank_account_number: input.bank_account_number.clone(),
            national_insurance_number: input.national_insurance_number.clone(),
        }
    }
}

impl NewDeliveryEmployee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        salary: f64,
        bank_account_number: impl Into<String>,
        national_insurance_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            salary,
            bank_account_number: bank_account_number.into(),
            national_insurance_number: national_insurance_number.into(),
        }
    }

    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        validate_common(
            &self.first_name,
            &self.last_name,
            self.salary,
            &self.bank_account_number,
        )?;
        if !NI_NUMBER_RE.is_match(&self.national_insurance_number) {
            return Err(EmployeeValidationError::InvalidNationalInsuranceNumber);
        }
        Ok(())
    }
}

impl Display for NewDeliveryEmployee {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NewDeliveryEmployee {{ first_name: {}, last_name: {}, salary: {}, bank_account_number: {}, national_insurance_number: {} }}",
            self.first_name,
            self.last_name,
            self.salary,
            mask(&self.bank_account_number),
            mask(&self.national_insurance_number)
        )
    }
}

impl DeliveryEmployeeUpdate {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        salary: f64,
        bank_account_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            salary,
            bank_account_number: bank_account_number.into(),
        }
    }

    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        validate_common(
            &self.first_name,
            &self.last_name,
            self.salary,
            &self.bank_account_number,
        )
    }
}

fn validate_common(
    first_name: &str,
    last_name: &str,
    salary: f64,
    bank_account_number: &str,
) -> Result<(), EmployeeValidationError> {
    if first_name.trim().is_empty() {
        return Err(EmployeeValidationError::EmptyField("first_name"));
    }
    if last_name.trim().is_empty() {
        return Err(EmployeeValidationError::EmptyField("last_name"));
    }
    if !salary.is_finite() || salary < 0.0 {
        return Err(EmployeeValidationError::InvalidSalary);
    }
    if bank_account_number.trim().is_empty() {
        return Err(EmployeeValidationError::EmptyField("bank_account_number"));
    }
    Ok(())
}

/// Keeps the last few characters of a sensitive value.
fn mask(value: &str) -> String {
    let total = value.chars().count();
    if total <= MASK_VISIBLE_CHARS {
        return "*".repeat(total);
    }
    let visible: String = value.chars().skip(total - MASK_VISIBLE_CHARS).collect();
    format!("{}{visible}", "*".repeat(total - MASK_VISIBLE_CHARS))
}
