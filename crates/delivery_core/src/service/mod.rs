//! Core use-case services.
//!
//! # Responsibility
//! - Validate input and enforce delivery membership before repository calls.
//! - Keep callers decoupled from storage details.

pub mod delivery_employee_service;
