//! Reminder planning for tasks with email, SMS or alarm reminders.

pub mod planner;
