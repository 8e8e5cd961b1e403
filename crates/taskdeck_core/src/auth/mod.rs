//! Authentication stub and session persistence.
//!
//! # Responsibility
//! - Issue, persist, restore and clear the single user session.
//! - Depend on storage only through `KeyValueStore`.

pub mod session;
