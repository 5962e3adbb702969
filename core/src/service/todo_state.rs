use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::TaskError;
use crate::model::stats::Stats;
use crate::model::task::{Task, TaskUpdate};
use crate::repository::{TaskRepository, TaskStore};
use crate::service::ordering::display_order;
use crate::validation::{sanitize, validate};

/// In-memory view of the task list plus a single error slot.
///
/// Action methods never return errors: failures are written to the error
/// slot (replacing any previous message) and reported through the return
/// value. The in-memory list only changes after the repository succeeds.
pub struct TodoState<S: TaskStore, C: Clock = SystemClock> {
    repo: TaskRepository<S, C>,
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
}

impl<S: TaskStore, C: Clock> TodoState<S, C> {
    pub fn new(repo: TaskRepository<S, C>) -> Self {
        let mut state = Self {
            repo,
            tasks: Vec::new(),
            loading: true,
            error: None,
        };
        state.tasks = state.repo.list();
        state.loading = false;
        info!(count = state.tasks.len(), "loaded todos");
        state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn display_tasks(&self) -> Vec<Task> {
        display_order(&self.tasks)
    }

    pub fn find(&self, id: &Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn repository(&self) -> &TaskRepository<S, C> {
        &self.repo
    }

    /// Computed from the in-memory list on every call.
    pub fn stats(&self) -> Stats {
        Stats::from_tasks(&self.tasks)
    }

    pub fn add_task(&mut self, text: &str) -> Option<Task> {
        if let Err(e) = validate(text) {
            self.set_error(TaskError::from(e));
            return None;
        }

        match self.repo.create(&sanitize(text)) {
            Ok(task) => {
                self.tasks.push(task.clone());
                self.error = None;
                Some(task)
            }
            Err(e) => {
                self.set_error(e);
                None
            }
        }
    }

    pub fn update_task(&mut self, id: &Uuid, mut update: TaskUpdate) -> bool {
        if let Some(text) = update.text.take() {
            if let Err(e) = validate(&text) {
                self.set_error(TaskError::from(e));
                return false;
            }
            update.text = Some(sanitize(&text));
        }

        match self.repo.update(id, update) {
            Ok(updated) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == *id) {
                    *slot = updated;
                }
                self.error = None;
                true
            }
            Err(e) => {
                self.set_error(e);
                false
            }
        }
    }

    pub fn toggle_task(&mut self, id: &Uuid) -> bool {
        let Some(completed) = self.find(id).map(|t| t.completed) else {
            self.set_error(TaskError::NotFound(*id));
            return false;
        };
        self.update_task(id, TaskUpdate::completed(!completed))
    }

    pub fn delete_task(&mut self, id: &Uuid) -> bool {
        match self.repo.delete(id) {
            Ok(true) => {
                self.tasks.retain(|t| t.id != *id);
                self.error = None;
                true
            }
            Ok(false) => {
                self.set_error(TaskError::NotFound(*id));
                false
            }
            Err(e) => {
                self.set_error(e);
                false
            }
        }
    }

    pub fn clear_completed_tasks(&mut self) -> usize {
        match self.repo.clear_completed() {
            Ok(removed) => {
                self.tasks.retain(|t| !t.completed);
                self.error = None;
                removed
            }
            Err(e) => {
                self.set_error(e);
                0
            }
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn set_error(&mut self, err: TaskError) {
        warn!(error = ?err, "todo action failed");
        self.error = Some(err.to_string());
    }
}
