//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the delivery employee data access contract.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Storage faults surface as the failure kind of the operation that hit them.
//! - Absence is a value (`None`/`false`), never an error.

pub mod delivery_employee_repo;
