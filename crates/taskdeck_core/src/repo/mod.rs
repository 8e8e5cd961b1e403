//! Data access layer.
//!
//! # Responsibility
//! - `task_store`: async in-memory task collection behind `TaskRepository`.
//! - `kv_repo`: key-value capability used for session persistence.
//!
//! # Invariants
//! - Repositories return semantic errors (`NotFound`) rather than panicking.
//! - Validation happens before data reaches this layer.

pub mod kv_repo;
pub mod task_store;
