//! Core domain logic for TaskDeck.
//! This crate is the single source of truth for task and session invariants.

pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod reminder;
pub mod repo;
pub mod service;
pub mod validate;

pub use auth::session::{AuthError, AuthService, DEMO_EMAIL, DEMO_PASSWORD, SESSION_KEY};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::session::Session;
pub use model::task::{Priority, ReminderType, Task, TaskId, TaskInput, TaskPatch};
pub use query::engine::{
    apply, FilterSpec, QueryOutcome, SortDirection, SortField, SortSpec, TaskStats,
};
pub use reminder::planner::{due_reminders, plan_reminder, ReminderChannel, ReminderPlan};
pub use repo::kv_repo::{KeyValueStore, KvError, MemoryKeyValueStore, SqliteKeyValueStore};
pub use repo::task_store::{StoreError, StoreResult, TaskRepository, TaskStore};
pub use service::board_service::{BoardError, BoardView, TaskBoard};
pub use validate::form::{validate, FieldErrors, TaskDraft, TaskField};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
