//! Authenticated session record.
//!
//! # Invariants
//! - Only identity and the opaque token are stored; never a password.
//! - The persisted JSON shape is `{id, email, name, token}`.

use serde::{Deserialize, Serialize};

/// Authenticated user's identity plus opaque access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub token: String,
}
