//! Reminder dispatch planning.
//!
//! Turns task reminder settings into channel-specific plans. Delivery itself
//! (mail, SMS gateway, device alarm) belongs to the host application.

use crate::model::task::{ReminderType, Task, TaskId};
use chrono::{DateTime, Utc};
use log::debug;

const RULE_NAME_PREFIX: &str = "reminder-task-";

/// Where a reminder is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderChannel {
    Email { to: String },
    Sms { to: String },
    Alarm,
}

/// One scheduled reminder for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPlan {
    pub task_id: TaskId,
    /// Stable schedule identifier, `reminder-task-{id}-{channel}`.
    pub rule_name: String,
    pub fire_at: DateTime<Utc>,
    pub channel: ReminderChannel,
    pub message: String,
}

/// Builds the plan for `task`, if it has a complete reminder setup.
///
/// SMS reminders without a phone number produce no plan.
pub fn plan_reminder(task: &Task, recipient_email: &str) -> Option<ReminderPlan> {
    let kind = task.reminder_type?;
    let fire_at = task.reminder_time?;

    let channel = match kind {
        ReminderType::Email => ReminderChannel::Email {
            to: recipient_email.to_string(),
        },
        ReminderType::Sms => ReminderChannel::Sms {
            to: task.phone_number.clone().filter(|phone| !phone.is_empty())?,
        },
        ReminderType::Alarm => ReminderChannel::Alarm,
    };

    let mut message = format!("Reminder: {}", task.title);
    if let Some(due) = task.due_date {
        message.push_str(&format!(" (due {})", due.format("%Y-%m-%d")));
    }

    Some(ReminderPlan {
        task_id: task.id,
        rule_name: format!("{RULE_NAME_PREFIX}{}-{}", task.id, kind.as_form_value()),
        fire_at,
        channel,
        message,
    })
}

/// Plans for incomplete tasks whose reminder time has arrived, earliest first.
pub fn due_reminders(tasks: &[Task], now: DateTime<Utc>, recipient_email: &str) -> Vec<ReminderPlan> {
    let mut plans: Vec<ReminderPlan> = tasks
        .iter()
        .filter(|task| !task.completed)
        .filter_map(|task| plan_reminder(task, recipient_email))
        .filter(|plan| plan.fire_at <= now)
        .collect();
    plans.sort_by_key(|plan| plan.fire_at);
    debug!(
        "event=reminders_due module=reminder status=ok count={}",
        plans.len()
    );
    plans
}
