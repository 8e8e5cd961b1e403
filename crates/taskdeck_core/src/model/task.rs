//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its wire shape.
//! - Define the normalized write payload (`TaskInput`) and partial updates
//!   (`TaskPatch`) consumed by the task store.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes afterwards.
//! - `updated_at >= created_at` for every stored task.
//! - `reminder_type == None` is the explicit "no reminder" sentinel.
//! - `phone_number` is only meaningful when `reminder_type == Some(Sms)`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned, monotonically increasing task identifier.
pub type TaskId = u64;

/// Maximum trimmed title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Task urgency. Upper-case tokens on the wire, lower-case in edit forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Ordering rank used by priority sorting.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    /// Lower-case token used by edit forms.
    pub fn as_form_value(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a form or wire token, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, ParseEnumError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError::new("priority", value)),
        }
    }
}

/// Reminder delivery channel. Absence of a reminder is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReminderType {
    Email,
    Sms,
    Alarm,
}

impl ReminderType {
    /// Lower-case token used by edit forms.
    pub fn as_form_value(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Alarm => "alarm",
        }
    }

    /// Parses a form/wire token. `""` and `"none"` decode to `Ok(None)`.
    pub fn parse_optional(value: &str) -> Result<Option<Self>, ParseEnumError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(None),
            "email" => Ok(Some(Self::Email)),
            "sms" => Ok(Some(Self::Sms)),
            "alarm" => Ok(Some(Self::Alarm)),
            _ => Err(ParseEnumError::new("reminder type", value)),
        }
    }
}

/// Unknown enum token at a decoding boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl Display for ParseEnumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl Error for ParseEnumError {}

/// Canonical task record. Serializes to the transport shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub reminder_type: Option<ReminderType>,
    pub reminder_time: Option<DateTime<Utc>>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Materializes a new record from a normalized payload.
    ///
    /// # Invariants
    /// - `completed` starts as `false`.
    /// - `created_at == updated_at == now`.
    pub fn from_input(id: TaskId, input: TaskInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            completed: false,
            priority: input.priority,
            due_date: input.due_date,
            reminder_type: input.reminder_type,
            reminder_time: input.reminder_time,
            phone_number: input.phone_number,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update and stamps `updated_at`.
    ///
    /// `id` and `created_at` are never touched. `updated_at` is clamped so it
    /// cannot move before `created_at` when the clock goes backwards.
    pub fn apply_patch(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(reminder_type) = patch.reminder_type {
            self.reminder_type = reminder_type;
        }
        if let Some(reminder_time) = patch.reminder_time {
            self.reminder_time = reminder_time;
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = phone_number;
        }
        self.touch(now);
    }

    /// Flips completion state and stamps `updated_at`.
    pub fn toggle_completed(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.touch(now);
    }

    /// Returns whether the task is incomplete and due before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Normalized task payload produced by the form validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub reminder_type: Option<ReminderType>,
    pub reminder_time: Option<DateTime<Utc>>,
    pub phone_number: Option<String>,
}

impl TaskInput {
    /// Minimal payload with defaults for every optional field.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            due_date: None,
            reminder_type: None,
            reminder_time: None,
            phone_number: None,
        }
    }
}

/// Partial update. Outer `None` leaves the field unchanged; for nullable
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub reminder_type: Option<Option<ReminderType>>,
    pub reminder_time: Option<Option<DateTime<Utc>>>,
    pub phone_number: Option<Option<String>>,
}

impl TaskPatch {
    /// Full replacement of every writable field except `completed`.
    ///
    /// Used by edit forms, which always submit the whole draft.
    pub fn replace_with(input: TaskInput) -> Self {
        Self {
            title: Some(input.title),
            description: Some(input.description),
            completed: None,
            priority: Some(input.priority),
            due_date: Some(input.due_date),
            reminder_type: Some(input.reminder_type),
            reminder_time: Some(input.reminder_time),
            phone_number: Some(input.phone_number),
        }
    }

    /// Returns whether applying this patch would change no field.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, ReminderType, Task, TaskInput, TaskPatch};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn sample_task() -> Task {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        Task::from_input(7, TaskInput::titled("write report"), created)
    }

    #[test]
    fn priority_parse_accepts_form_and_wire_tokens() {
        assert_eq!(Priority::parse("high").unwrap(), Priority::High);
        assert_eq!(Priority::parse(" LOW ").unwrap(), Priority::Low);
        assert!(Priority::parse("urgent").is_err());
    }

    #[test]
    fn reminder_type_none_decodes_to_sentinel() {
        assert_eq!(ReminderType::parse_optional("none").unwrap(), None);
        assert_eq!(ReminderType::parse_optional("").unwrap(), None);
        assert_eq!(
            ReminderType::parse_optional("SMS").unwrap(),
            Some(ReminderType::Sms)
        );
    }

    #[test]
    fn apply_patch_keeps_identity_and_clamps_updated_at() {
        let mut task = sample_task();
        let created_at = task.created_at;

        let patch = TaskPatch {
            title: Some("rewritten".to_string()),
            due_date: Some(Some(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap())),
            ..TaskPatch::default()
        };
        task.apply_patch(patch, created_at - Duration::hours(1));

        assert_eq!(task.id, 7);
        assert_eq!(task.title, "rewritten");
        assert_eq!(task.created_at, created_at);
        assert_eq!(task.updated_at, created_at);
    }

    #[test]
    fn wire_shape_uses_camel_case_and_upper_case_tokens() {
        let mut task = sample_task();
        task.priority = Priority::High;
        task.reminder_type = Some(ReminderType::Email);

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["priority"], "HIGH");
        assert_eq!(value["reminderType"], "EMAIL");
        assert_eq!(value["dueDate"], serde_json::Value::Null);
        assert_eq!(value["createdAt"], "2026-03-01T09:00:00Z");
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(TaskPatch::default().is_empty());
        assert!(!TaskPatch::replace_with(TaskInput::titled("x")).is_empty());
    }
}
