//! In-memory asynchronous task store.
//!
//! # Responsibility
//! - Own the task collection and expose CRUD/toggle use-cases over it.
//! - Simulate backend latency so callers are written against an async API.
//!
//! # Invariants
//! - Identifiers are strictly increasing and never reused in-process.
//! - `create` stamps `created_at == updated_at == now` and `completed = false`.
//! - Mutations never change `id` or `created_at`.
//! - Deleted ids fail every later lookup with `NotFound`.
//! - Validation happens upstream; this layer only fails with `NotFound`.

use crate::clock::{Clock, SystemClock};
use crate::model::task::{Priority, Task, TaskId, TaskInput, TaskPatch};
use crate::query::engine::FilterSpec;
use chrono::{Duration as ChronoDuration, NaiveDate};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Default artificial delay applied before every store operation.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

pub type StoreResult<T> = Result<T, StoreError>;

/// Task store failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(TaskId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for StoreError {}

/// Async data-access contract consumed by the task board.
#[allow(async_fn_in_trait)]
pub trait TaskRepository {
    async fn list(&self, filter: &FilterSpec) -> StoreResult<Vec<Task>>;
    async fn get(&self, id: TaskId) -> StoreResult<Task>;
    async fn create(&self, input: TaskInput) -> StoreResult<Task>;
    async fn update(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task>;
    async fn delete(&self, id: TaskId) -> StoreResult<()>;
    async fn toggle_complete(&self, id: TaskId) -> StoreResult<Task>;
}

#[derive(Debug, Default)]
struct StoreState {
    /// Insertion order is the canonical list order.
    tasks: Vec<Task>,
    last_id: TaskId,
}

impl StoreState {
    fn position(&self, id: TaskId) -> StoreResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

/// Explicitly constructed in-memory store; create one per process (or test).
pub struct TaskStore {
    state: Mutex<StoreState>,
    clock: Arc<dyn Clock>,
    latency: Duration,
}

impl TaskStore {
    /// Creates an empty store using the wall clock and default latency.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock), DEFAULT_LATENCY)
    }

    /// Creates an empty store with an injected clock and latency.
    pub fn with_clock(clock: Arc<dyn Clock>, latency: Duration) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            clock,
            latency,
        }
    }

    /// Creates a store pre-populated with three sample tasks.
    ///
    /// Due dates are relative to the clock's current day so the sample always
    /// shows one overdue, one completed and one upcoming task.
    pub fn with_demo_tasks(clock: Arc<dyn Clock>, latency: Duration) -> Self {
        let now = clock.now();
        let today = clock.today();
        let samples = [
            (
                "Complete project documentation",
                "Write comprehensive documentation for the todo app",
                Priority::High,
                offset_day(today, 5),
                false,
            ),
            (
                "Review code changes",
                "Review pull requests from team members",
                Priority::Medium,
                offset_day(today, 2),
                true,
            ),
            (
                "Setup CI/CD pipeline",
                "Configure automated testing and deployment",
                Priority::Low,
                offset_day(today, -1),
                false,
            ),
        ];

        let mut state = StoreState::default();
        for (title, description, priority, due_date, completed) in samples {
            state.last_id += 1;
            let mut input = TaskInput::titled(title);
            input.description = description.to_string();
            input.priority = priority;
            input.due_date = due_date;
            let mut task = Task::from_input(state.last_id, input, now);
            task.completed = completed;
            state.tasks.push(task);
        }
        info!(
            "event=store_seed module=store status=ok count={}",
            state.tasks.len()
        );

        Self {
            state: Mutex::new(state),
            clock,
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRepository for TaskStore {
    async fn list(&self, filter: &FilterSpec) -> StoreResult<Vec<Task>> {
        self.simulate_latency().await;
        let state = self.state.lock().await;
        let tasks: Vec<Task> = state
            .tasks
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        debug!(
            "event=task_list module=store status=ok total={} returned={}",
            state.tasks.len(),
            tasks.len()
        );
        Ok(tasks)
    }

    async fn get(&self, id: TaskId) -> StoreResult<Task> {
        self.simulate_latency().await;
        let state = self.state.lock().await;
        let index = state.position(id).inspect_err(|_| log_not_found("task_get", id))?;
        Ok(state.tasks[index].clone())
    }

    async fn create(&self, input: TaskInput) -> StoreResult<Task> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.last_id += 1;
        let task = Task::from_input(state.last_id, input, self.clock.now());
        state.tasks.push(task.clone());
        info!("event=task_create module=store status=ok id={}", task.id);
        Ok(task)
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        let index = state
            .position(id)
            .inspect_err(|_| log_not_found("task_update", id))?;
        let changed = !patch.is_empty();
        let task = &mut state.tasks[index];
        task.apply_patch(patch, self.clock.now());
        info!("event=task_update module=store status=ok id={id} changed={changed}");
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> StoreResult<()> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        let index = state
            .position(id)
            .inspect_err(|_| log_not_found("task_delete", id))?;
        state.tasks.remove(index);
        info!("event=task_delete module=store status=ok id={id}");
        Ok(())
    }

    async fn toggle_complete(&self, id: TaskId) -> StoreResult<Task> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        let index = state
            .position(id)
            .inspect_err(|_| log_not_found("task_toggle", id))?;
        let task = &mut state.tasks[index];
        task.toggle_completed(self.clock.now());
        info!(
            "event=task_toggle module=store status=ok id={id} completed={}",
            task.completed
        );
        Ok(task.clone())
    }
}

fn log_not_found(event: &str, id: TaskId) {
    warn!("event={event} module=store status=error error_code=not_found id={id}");
}

fn offset_day(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    today.checked_add_signed(ChronoDuration::days(days))
}
