//! Client-side task querying.
//!
//! # Responsibility
//! - Turn a task snapshot plus filter/sort specs into the visible list.
//! - Derive dashboard statistics.
//!
//! The engine only reads task slices; the task store stays the sole owner
//! of the collection.

pub mod engine;
