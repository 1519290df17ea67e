//! Domain model for employee records.
//!
//! # Responsibility
//! - Define the employee record and the inputs that create or change it.
//!
//! # Invariants
//! - A delivery employee is an `Employee` whose id is in the delivery registry;
//!   there is no separate stored shape.

pub mod employee;
