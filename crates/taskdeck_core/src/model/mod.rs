//! Domain model for tasks and sessions.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the transport shape (serde) so enum decoding happens at the boundary.
//!
//! # Invariants
//! - Every task is identified by a store-assigned `TaskId`.
//! - Enum fields are typed; string tokens only exist in drafts and on the wire.

pub mod session;
pub mod task;
