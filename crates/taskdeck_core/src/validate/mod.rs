//! Boundary validation for user-submitted task drafts.
//!
//! # Responsibility
//! - Turn raw form input into normalized payloads or field-keyed errors.
//!
//! # Invariants
//! - Validation is pure and always returns a structured result.

pub mod form;
