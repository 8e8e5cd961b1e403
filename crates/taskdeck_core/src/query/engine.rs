//! Filter, sort and statistics derivation over task snapshots.
//!
//! # Responsibility
//! - Produce the visible ordered subset for a filter and sort order.
//! - Derive aggregate counts over the full, unfiltered task set.
//!
//! # Invariants
//! - Pure: inputs are never mutated and no state survives between calls.
//! - Filters are conjunctive: completed, then priority, then search.
//! - Sorting is stable in both directions; equal keys keep input order.

use crate::model::task::{Priority, Task};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Visible-set predicate. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
}

impl FilterSpec {
    /// Returns whether `task` satisfies every active predicate.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(completed) = self.completed {
            if task.completed != completed {
                return false;
            }
        }

        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }

        match self.normalized_search() {
            Some(needle) => {
                task.title.to_lowercase().contains(&needle)
                    || task.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    /// Overlays the set fields of `other` onto `self`.
    ///
    /// Mirrors incremental filter edits: only fields present in `other`
    /// change. Use `FilterSpec::default()` to clear everything.
    pub fn merge(&mut self, other: FilterSpec) {
        if other.completed.is_some() {
            self.completed = other.completed;
        }
        if other.priority.is_some() {
            self.priority = other.priority;
        }
        if other.search.is_some() {
            self.search = other.search;
        }
    }

    fn normalized_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase)
    }
}

/// Sortable task attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    DueDate,
    Priority,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Sort order. Defaults to newest-created first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Column-header behavior: same field flips direction, a new field
    /// starts ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }

    fn compare(&self, left: &Task, right: &Task) -> Ordering {
        let ordering = match self.field {
            SortField::CreatedAt => left.created_at.cmp(&right.created_at),
            SortField::UpdatedAt => left.updated_at.cmp(&right.updated_at),
            SortField::DueDate => due_instant(left).cmp(&due_instant(right)),
            SortField::Priority => left.priority.rank().cmp(&right.priority.rank()),
            SortField::Title => left.title.to_lowercase().cmp(&right.title.to_lowercase()),
        };

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Aggregate counts over the full task set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

impl TaskStats {
    /// Counts tasks; `overdue` means incomplete with a due date before `today`.
    pub fn collect(tasks: &[Task], today: NaiveDate) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        let overdue = tasks.iter().filter(|task| task.is_overdue(today)).count();

        Self {
            total,
            completed,
            pending: total - completed,
            overdue,
        }
    }
}

/// Result of one query pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Filtered and sorted tasks.
    pub visible: Vec<Task>,
    /// Counts over the unfiltered input.
    pub stats: TaskStats,
}

impl QueryOutcome {
    /// True when there are no tasks at all (not merely none visible).
    pub fn is_empty(&self) -> bool {
        self.stats.total == 0
    }
}

/// Filters, sorts and summarizes `tasks`.
pub fn apply(tasks: &[Task], filter: &FilterSpec, sort: &SortSpec, today: NaiveDate) -> QueryOutcome {
    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect();
    // `sort_by` is a stable merge sort.
    visible.sort_by(|left, right| sort.compare(left, right));

    QueryOutcome {
        visible,
        stats: TaskStats::collect(tasks, today),
    }
}

fn due_instant(task: &Task) -> DateTime<Utc> {
    task.due_date
        .and_then(|due| due.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}
