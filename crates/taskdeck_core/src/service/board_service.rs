//! Task board use-case service.
//!
//! # Responsibility
//! - Drive the validate → store mutation → local state → query flow.
//! - Own the view state (loading / failed / ready) and the error banner.
//!
//! # Invariants
//! - Invalid drafts never reach the repository.
//! - Local state is updated from each mutation response; the full list is
//!   only fetched by `refresh`.
//! - `&mut self` receivers keep at most one request in flight.
//! - Store failures set the banner; validation failures do not.

use crate::clock::Clock;
use crate::model::task::{Task, TaskId, TaskPatch};
use crate::query::engine::{self, FilterSpec, QueryOutcome, SortField, SortSpec};
use crate::repo::task_store::{StoreError, TaskRepository};
use crate::validate::form::{self, FieldErrors, TaskDraft};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Failure surfaced to board callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    NotFound(TaskId),
    Validation(FieldErrors),
    /// Any lower-layer failure without a more specific class.
    Transport(String),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "Task not found: {id}"),
            Self::Validation(errors) => write!(f, "{errors}"),
            Self::Transport(message) => write!(f, "{message}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<StoreError> for BoardError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
        }
    }
}

impl From<FieldErrors> for BoardError {
    fn from(value: FieldErrors) -> Self {
        Self::Validation(value)
    }
}

/// Mutually exclusive presentation states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardView {
    /// No task list has been loaded yet.
    Loading,
    /// The last load failed with this message.
    Failed(String),
    /// Derived content; `QueryOutcome::is_empty` marks the empty state.
    Ready(QueryOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadPhase {
    Loading,
    Failed(String),
    Loaded,
}

pub struct TaskBoard<R: TaskRepository> {
    repo: R,
    clock: Arc<dyn Clock>,
    filter: FilterSpec,
    sort: SortSpec,
    tasks: Vec<Task>,
    phase: LoadPhase,
    banner: Option<String>,
}

impl<R: TaskRepository> TaskBoard<R> {
    pub fn new(repo: R, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            filter: FilterSpec::default(),
            sort: SortSpec::default(),
            tasks: Vec::new(),
            phase: LoadPhase::Loading,
            banner: None,
        }
    }

    /// Reloads the full task set from the repository.
    pub async fn refresh(&mut self) -> Result<(), BoardError> {
        self.banner = None;
        match self.repo.list(&FilterSpec::default()).await {
            Ok(tasks) => {
                debug!(
                    "event=board_refresh module=board status=ok count={}",
                    tasks.len()
                );
                self.tasks = tasks;
                self.phase = LoadPhase::Loaded;
                Ok(())
            }
            Err(err) => {
                let err = BoardError::Transport(format!("Failed to fetch tasks: {err}"));
                warn!("event=board_refresh module=board status=error error={err}");
                self.phase = LoadPhase::Failed(err.to_string());
                self.banner = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Current presentation state with the visible list re-derived.
    pub fn view(&self) -> BoardView {
        match &self.phase {
            LoadPhase::Loading => BoardView::Loading,
            LoadPhase::Failed(message) => BoardView::Failed(message.clone()),
            LoadPhase::Loaded => BoardView::Ready(engine::apply(
                &self.tasks,
                &self.filter,
                &self.sort,
                self.clock.today(),
            )),
        }
    }

    /// Local snapshot in repository order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
    }

    /// Merges only the fields set in `changes`.
    pub fn update_filter(&mut self, changes: FilterSpec) {
        self.filter.merge(changes);
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    /// Fetches one task without touching the local list.
    pub async fn load_task(&mut self, id: TaskId) -> Result<Task, BoardError> {
        let result = self.repo.get(id).await.map_err(BoardError::from);
        self.record_failure(result, "board_get")
    }

    /// Validates `draft` and creates a task from it.
    pub async fn create(&mut self, draft: &TaskDraft) -> Result<Task, BoardError> {
        let input = form::validate(draft, self.clock.now())?;
        let result = self.repo.create(input).await.map_err(BoardError::from);
        let task = self.record_failure(result, "board_create")?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Validates `draft` and replaces every editable field of task `id`.
    pub async fn update(&mut self, id: TaskId, draft: &TaskDraft) -> Result<Task, BoardError> {
        let input = form::validate(draft, self.clock.now())?;
        let result = self
            .repo
            .update(id, TaskPatch::replace_with(input))
            .await
            .map_err(BoardError::from);
        let task = self.record_mutation(id, result, "board_update")?;
        self.upsert_local(task.clone());
        Ok(task)
    }

    pub async fn toggle(&mut self, id: TaskId) -> Result<Task, BoardError> {
        let result = self.repo.toggle_complete(id).await.map_err(BoardError::from);
        let task = self.record_mutation(id, result, "board_toggle")?;
        self.upsert_local(task.clone());
        Ok(task)
    }

    pub async fn delete(&mut self, id: TaskId) -> Result<(), BoardError> {
        let result = self.repo.delete(id).await.map_err(BoardError::from);
        self.record_mutation(id, result, "board_delete")?;
        self.tasks.retain(|task| task.id != id);
        Ok(())
    }

    /// Dismissible message for the last store failure.
    pub fn error_banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.banner = None;
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Like `record_failure`, and also drops a stale local copy of `id`
    /// when the repository no longer knows it.
    fn record_mutation<T>(
        &mut self,
        id: TaskId,
        result: Result<T, BoardError>,
        event: &str,
    ) -> Result<T, BoardError> {
        if matches!(result, Err(BoardError::NotFound(missing)) if missing == id) {
            self.tasks.retain(|task| task.id != id);
        }
        self.record_failure(result, event)
    }

    fn record_failure<T>(
        &mut self,
        result: Result<T, BoardError>,
        event: &str,
    ) -> Result<T, BoardError> {
        match result {
            Ok(value) => {
                self.banner = None;
                Ok(value)
            }
            Err(err) => {
                warn!("event={event} module=board status=error error={err}");
                self.banner = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn upsert_local(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|local| local.id == task.id) {
            Some(local) => *local = task,
            None => self.tasks.push(task),
        }
    }
}
