//! Task draft validation and normalization.
//!
//! # Responsibility
//! - Decode raw form strings into a typed `TaskInput`.
//! - Report every invalid field at once, one message per field.
//!
//! # Invariants
//! - Never panics and never short-circuits across fields.
//! - The first violated rule wins within a single field.
//! - Validating the draft rebuilt from a normalized payload yields the same
//!   payload (idempotent), given the same `now`.

use crate::model::task::{
    Priority, ReminderType, TaskInput, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ()\-]+$").expect("valid phone regex"));

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Unvalidated task form values, exactly as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    /// `low|medium|high`; empty means medium.
    pub priority: String,
    /// `YYYY-MM-DD`; empty means no due date.
    pub due_date: String,
    /// `none|email|sms|alarm`; empty means none.
    pub reminder_type: String,
    /// RFC 3339 or `YYYY-MM-DDTHH:MM[:SS]` (UTC); empty means unset.
    pub reminder_time: String,
    pub phone_number: String,
}

impl TaskDraft {
    /// Draft with only a title; every other field at its form default.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Rebuilds form values from a stored or normalized payload.
    ///
    /// Used to pre-fill edit forms.
    pub fn from_input(input: &TaskInput) -> Self {
        Self {
            title: input.title.clone(),
            description: input.description.clone(),
            priority: input.priority.as_form_value().to_string(),
            due_date: input
                .due_date
                .map(|due| due.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            reminder_type: input
                .reminder_type
                .map_or("none", ReminderType::as_form_value)
                .to_string(),
            reminder_time: input
                .reminder_time
                .map(|at| at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                .unwrap_or_default(),
            phone_number: input.phone_number.clone().unwrap_or_default(),
        }
    }
}

/// Validated form field names, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskField {
    Title,
    Description,
    Priority,
    DueDate,
    ReminderType,
    ReminderTime,
    PhoneNumber,
}

impl TaskField {
    /// Form field key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Priority => "priority",
            Self::DueDate => "dueDate",
            Self::ReminderType => "reminderType",
            Self::ReminderTime => "reminderTime",
            Self::PhoneNumber => "phoneNumber",
        }
    }
}

/// Field-keyed validation messages; one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<TaskField, String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: TaskField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: TaskField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskField, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    /// Records the message unless the field already failed an earlier rule.
    fn reject(&mut self, field: TaskField, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.errors.keys().map(|field| field.as_str()).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl Error for FieldErrors {}

/// Validates and normalizes one draft against the instant `now`.
///
/// Due dates compare against `now`'s UTC calendar day; reminder times compare
/// against the full instant.
pub fn validate(draft: &TaskDraft, now: DateTime<Utc>) -> Result<TaskInput, FieldErrors> {
    let mut errors = FieldErrors::default();
    let today = now.date_naive();

    let title = draft.title.trim();
    if title.is_empty() {
        errors.reject(TaskField::Title, "Task title is required");
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.reject(
            TaskField::Title,
            format!("Title must be at most {TITLE_MAX_CHARS} characters"),
        );
    }

    if draft.description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.reject(
            TaskField::Description,
            format!("Description must be at most {DESCRIPTION_MAX_CHARS} characters"),
        );
    }

    let priority = if draft.priority.trim().is_empty() {
        Some(Priority::default())
    } else {
        Priority::parse(&draft.priority)
            .map_err(|_| errors.reject(TaskField::Priority, "Select a valid priority"))
            .ok()
    };

    let due_date = parse_due_date(&draft.due_date)
        .map_err(|message| errors.reject(TaskField::DueDate, message))
        .ok()
        .flatten();
    if due_date.is_some_and(|due| due < today) {
        errors.reject(TaskField::DueDate, "Due date cannot be in the past");
    }

    let reminder_type = ReminderType::parse_optional(&draft.reminder_type)
        .map_err(|_| errors.reject(TaskField::ReminderType, "Select a valid reminder type"))
        .ok()
        .flatten();
    let reminder_selected = !matches!(
        draft.reminder_type.trim().to_ascii_lowercase().as_str(),
        "" | "none"
    );

    let reminder_time = parse_reminder_time(&draft.reminder_time)
        .map_err(|message| errors.reject(TaskField::ReminderTime, message))
        .ok()
        .flatten();
    if reminder_selected && reminder_time.is_none() {
        errors.reject(
            TaskField::ReminderTime,
            "Reminder time is required when a reminder is set",
        );
    }
    if reminder_time.is_some_and(|at| at < now) {
        errors.reject(TaskField::ReminderTime, "Reminder time cannot be in the past");
    }

    let phone = draft.phone_number.trim();
    let is_sms = reminder_type == Some(ReminderType::Sms);
    if is_sms && phone.is_empty() {
        errors.reject(
            TaskField::PhoneNumber,
            "Phone number is required for SMS reminders",
        );
    }
    if !phone.is_empty() && !PHONE_RE.is_match(phone) {
        errors.reject(
            TaskField::PhoneNumber,
            "Phone number may only contain digits, spaces, hyphens and parentheses",
        );
    }

    match priority {
        Some(priority) if errors.is_empty() => Ok(TaskInput {
            title: title.to_string(),
            description: draft.description.trim().to_string(),
            priority,
            due_date,
            reminder_type,
            reminder_time,
            phone_number: is_sms.then(|| phone.to_string()),
        }),
        _ => Err(errors),
    }
}

fn parse_due_date(value: &str) -> Result<Option<NaiveDate>, &'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(trimmed).map(|at| at.date_naive()))
        .map(Some)
        .ok_or("Due date must be a valid date")
}

fn parse_reminder_time(value: &str) -> Result<Option<DateTime<Utc>>, &'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_timestamp(trimmed)
        .map(Some)
        .ok_or("Reminder time must be a valid date and time")
}

/// RFC 3339, or a zone-less `YYYY-MM-DDTHH:MM[:SS]` read as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::{parse_reminder_time, validate, TaskDraft, TaskField};
    use crate::model::task::{Priority, ReminderType};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    #[test]
    fn whitespace_title_is_required_error() {
        let errors = validate(&TaskDraft::titled("   "), now()).unwrap_err();
        assert_eq!(errors.get(TaskField::Title), Some("Task title is required"));
    }

    #[test]
    fn title_length_counts_trimmed_characters() {
        let padded = format!("  {}  ", "a".repeat(100));
        assert!(validate(&TaskDraft::titled(padded), now()).is_ok());

        let too_long = "é".repeat(101);
        let errors = validate(&TaskDraft::titled(too_long), now()).unwrap_err();
        assert!(errors.contains(TaskField::Title));
    }

    #[test]
    fn due_today_is_accepted_yesterday_rejected() {
        let mut draft = TaskDraft::titled("pay rent");
        draft.due_date = "2026-10-16".to_string();
        assert!(validate(&draft, now()).is_ok());

        draft.due_date = "2026-10-15".to_string();
        let errors = validate(&draft, now()).unwrap_err();
        assert_eq!(
            errors.get(TaskField::DueDate),
            Some("Due date cannot be in the past")
        );
    }

    #[test]
    fn unparsable_due_date_reports_format_message_first() {
        let mut draft = TaskDraft::titled("x");
        draft.due_date = "next tuesday".to_string();
        let errors = validate(&draft, now()).unwrap_err();
        assert_eq!(
            errors.get(TaskField::DueDate),
            Some("Due date must be a valid date")
        );
    }

    #[test]
    fn due_date_rejects_trailing_garbage_after_time_separator() {
        let mut draft = TaskDraft::titled("x");
        draft.due_date = "2026-10-20Tgarbage".to_string();
        let errors = validate(&draft, now()).unwrap_err();
        assert_eq!(
            errors.get(TaskField::DueDate),
            Some("Due date must be a valid date")
        );

        draft.due_date = "2026-10-20T08:15:00Z".to_string();
        let input = validate(&draft, now()).unwrap();
        assert_eq!(input.due_date, NaiveDate::from_ymd_opt(2026, 10, 20));
    }

    #[test]
    fn reminder_requires_future_time() {
        let mut draft = TaskDraft::titled("call mom");
        draft.reminder_type = "email".to_string();
        let errors = validate(&draft, now()).unwrap_err();
        assert!(errors.contains(TaskField::ReminderTime));

        draft.reminder_time = "2026-10-16T09:00".to_string();
        let errors = validate(&draft, now()).unwrap_err();
        assert_eq!(
            errors.get(TaskField::ReminderTime),
            Some("Reminder time cannot be in the past")
        );

        draft.reminder_time = "2026-10-16T10:00".to_string();
        let input = validate(&draft, now()).unwrap();
        assert_eq!(input.reminder_type, Some(ReminderType::Email));
        assert_eq!(input.phone_number, None);
    }

    #[test]
    fn phone_pattern_allows_formatting_characters_only() {
        let mut draft = TaskDraft::titled("text me");
        draft.reminder_type = "sms".to_string();
        draft.reminder_time = "2026-10-17T08:00".to_string();

        draft.phone_number = "+1 (555) 010-9999".to_string();
        assert!(validate(&draft, now()).is_ok());

        draft.phone_number = "555-CALL".to_string();
        assert!(validate(&draft, now())
            .unwrap_err()
            .contains(TaskField::PhoneNumber));

        draft.phone_number = "+1\t555\n0100".to_string();
        let errors = validate(&draft, now()).unwrap_err();
        assert_eq!(
            errors.get(TaskField::PhoneNumber),
            Some("Phone number may only contain digits, spaces, hyphens and parentheses")
        );
    }

    #[test]
    fn phone_is_dropped_unless_sms() {
        let mut draft = TaskDraft::titled("alarm");
        draft.reminder_type = "alarm".to_string();
        draft.reminder_time = "2026-10-17T08:00".to_string();
        draft.phone_number = "555 0100".to_string();

        let input = validate(&draft, now()).unwrap();
        assert_eq!(input.phone_number, None);
    }

    #[test]
    fn unknown_enum_tokens_are_field_errors() {
        let mut draft = TaskDraft::titled("x");
        draft.priority = "urgent".to_string();
        draft.reminder_type = "pigeon".to_string();
        let errors = validate(&draft, now()).unwrap_err();
        assert!(errors.contains(TaskField::Priority));
        assert!(errors.contains(TaskField::ReminderType));
    }

    #[test]
    fn empty_priority_defaults_to_medium() {
        let input = validate(&TaskDraft::titled("x"), now()).unwrap();
        assert_eq!(input.priority, Priority::Medium);
        assert_eq!(input.reminder_type, None);
    }

    #[test]
    fn reminder_time_accepts_rfc3339_offsets() {
        let parsed = parse_reminder_time("2026-10-16T12:00:00+02:00")
            .unwrap()
            .unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 10, 16, 10, 0, 0).unwrap());
    }
}
