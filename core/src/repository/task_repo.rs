use tracing::debug;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TaskError};
use crate::model::stats::Stats;
use crate::model::task::{Task, TaskUpdate};
use crate::repository::traits::TaskStore;

/// CRUD over the persisted collection.
///
/// Every operation reloads the full collection from the store, mutates it
/// and writes it back; nothing is cached between calls.
#[derive(Debug)]
pub struct TaskRepository<S: TaskStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
}

impl<S: TaskStore> TaskRepository<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: TaskStore, C: Clock> TaskRepository<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list(&self) -> Vec<Task> {
        self.store.load()
    }

    pub fn create(&self, text: &str) -> Result<Task> {
        let mut tasks = self.store.load();
        let task = Task::new(text.trim().to_string(), self.clock.now());
        tasks.push(task.clone());
        self.store.save(&tasks)?;
        debug!(id = %task.id, total = tasks.len(), "created todo");
        Ok(task)
    }

    pub fn update(&self, id: &Uuid, update: TaskUpdate) -> Result<Task> {
        let mut tasks = self.store.load();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or(TaskError::NotFound(*id))?;

        task.apply(update, self.clock.now());
        let updated = task.clone();

        self.store.save(&tasks)?;
        debug!(id = %id, completed = updated.completed, "updated todo");
        Ok(updated)
    }

    /// Returns whether a task was removed. The store is only written when
    /// something changed.
    pub fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut tasks = self.store.load();
        let initial_len = tasks.len();
        tasks.retain(|t| t.id != *id);

        if tasks.len() == initial_len {
            return Ok(false);
        }

        self.store.save(&tasks)?;
        debug!(id = %id, "deleted todo");
        Ok(true)
    }

    pub fn clear_completed(&self) -> Result<usize> {
        let mut tasks = self.store.load();
        let initial_len = tasks.len();
        tasks.retain(|t| !t.completed);
        let removed = initial_len - tasks.len();

        self.store.save(&tasks)?;
        debug!(removed, remaining = tasks.len(), "cleared completed todos");
        Ok(removed)
    }

    pub fn clear_all(&self) -> Result<()> {
        self.store.clear()?;
        debug!("cleared todo storage");
        Ok(())
    }

    pub fn stats(&self) -> Stats {
        Stats::from_tasks(&self.store.load())
    }
}
