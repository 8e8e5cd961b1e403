use chrono::{DateTime, TimeZone, Utc};
use taskdeck_core::{validate, Priority, ReminderType, TaskDraft, TaskField};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 14, 0, 0).unwrap()
}

fn full_draft() -> TaskDraft {
    TaskDraft {
        title: "  Renew passport  ".to_string(),
        description: "  bring two photos \n".to_string(),
        priority: "high".to_string(),
        due_date: "2026-11-02".to_string(),
        reminder_type: "sms".to_string(),
        reminder_time: "2026-11-01T09:00".to_string(),
        phone_number: " +44 (20) 7946-0000 ".to_string(),
    }
}

#[test]
fn every_invalid_field_is_reported_together() {
    let draft = TaskDraft {
        title: String::new(),
        reminder_type: "sms".to_string(),
        phone_number: String::new(),
        ..TaskDraft::default()
    };

    let errors = validate(&draft, now()).unwrap_err();
    assert!(errors.contains(TaskField::Title));
    assert!(errors.contains(TaskField::PhoneNumber));
    assert_eq!(
        errors.get(TaskField::PhoneNumber),
        Some("Phone number is required for SMS reminders")
    );
    assert!(errors.contains(TaskField::ReminderTime));
}

#[test]
fn normalizes_text_enums_and_times() {
    let input = validate(&full_draft(), now()).unwrap();

    assert_eq!(input.title, "Renew passport");
    assert_eq!(input.description, "bring two photos");
    assert_eq!(input.priority, Priority::High);
    assert_eq!(input.reminder_type, Some(ReminderType::Sms));
    assert_eq!(
        input.reminder_time,
        Some(Utc.with_ymd_and_hms(2026, 11, 1, 9, 0, 0).unwrap())
    );
    assert_eq!(input.phone_number.as_deref(), Some("+44 (20) 7946-0000"));

    let wire = serde_json::to_value(&input).unwrap();
    assert_eq!(wire["priority"], "HIGH");
    assert_eq!(wire["reminderType"], "SMS");
}

#[test]
fn unselected_reminder_type_becomes_none_sentinel() {
    let mut draft = full_draft();
    draft.reminder_type = "none".to_string();
    draft.reminder_time = String::new();

    let input = validate(&draft, now()).unwrap();
    assert_eq!(input.reminder_type, None);
    assert_eq!(input.phone_number, None);

    let wire = serde_json::to_value(&input).unwrap();
    assert!(wire["reminderType"].is_null());
}

#[test]
fn revalidating_normalized_output_is_idempotent() {
    let drafts = [
        full_draft(),
        TaskDraft::titled(" minimal "),
        TaskDraft {
            title: "alarm".to_string(),
            priority: "LOW".to_string(),
            reminder_type: "alarm".to_string(),
            reminder_time: "2026-10-16T15:30:00+01:00".to_string(),
            phone_number: "0800 000".to_string(),
            ..TaskDraft::default()
        },
    ];

    for draft in drafts {
        let first = validate(&draft, now()).unwrap();
        let second = validate(&TaskDraft::from_input(&first), now()).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn description_limit_applies_to_raw_length() {
    let mut draft = TaskDraft::titled("long");
    draft.description = "x".repeat(500);
    assert!(validate(&draft, now()).is_ok());

    draft.description = "x".repeat(501);
    let errors = validate(&draft, now()).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.contains(TaskField::Description));
}

#[test]
fn error_display_lists_field_names() {
    let mut draft = TaskDraft::titled("");
    draft.due_date = "2020-01-01".to_string();
    let errors = validate(&draft, now()).unwrap_err();
    assert_eq!(errors.to_string(), "invalid fields: title, dueDate");
}

#[test]
fn control_characters_in_phone_number_are_rejected() {
    let mut draft = full_draft();
    draft.phone_number = "+1\t555\n0100".to_string();

    let errors = validate(&draft, now()).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.contains(TaskField::PhoneNumber));
}

#[test]
fn due_date_must_parse_as_a_whole() {
    let mut draft = full_draft();
    draft.due_date = "2026-10-20Tgarbage".to_string();

    let errors = validate(&draft, now()).unwrap_err();
    assert_eq!(
        errors.get(TaskField::DueDate),
        Some("Due date must be a valid date")
    );
}
