use tracing::{debug, warn};

use crate::error::StorageError;
use crate::model::task::Task;
use crate::repository::traits::{KeyValueStorage, TaskStore};

pub const STORAGE_KEY: &str = "todos";

/// Nominal storage budget used for usage reporting.
pub const STORAGE_BUDGET_BYTES: usize = 5 * 1024 * 1024;

/// Serializes the whole task collection as JSON under a single key.
#[derive(Debug)]
pub struct KeyValueTaskStore<S: KeyValueStorage> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> KeyValueTaskStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: STORAGE_KEY.to_string(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn read_tasks(&self) -> Result<Vec<Task>, StorageError> {
        match self.storage.get_item(&self.key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::Read {
                key: self.key.clone(),
                reason: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

impl<S: KeyValueStorage> TaskStore for KeyValueTaskStore<S> {
    fn load(&self) -> Vec<Task> {
        match self.read_tasks() {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to load todos, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(tasks)?;
        self.storage.set_item(&self.key, &raw).inspect_err(|e| {
            warn!(key = %self.key, error = %e, "failed to save todos");
        })?;
        debug!(key = %self.key, count = tasks.len(), bytes = raw.len(), "saved todos");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(&self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageUsage {
    pub used: usize,
    pub total: usize,
    pub percentage: f64,
}

/// Rough usage estimate across every key in `storage`.
pub fn storage_usage<S: KeyValueStorage>(storage: &S) -> StorageUsage {
    if !storage.is_available() {
        return StorageUsage {
            used: 0,
            total: 0,
            percentage: 0.0,
        };
    }

    let used = storage
        .keys()
        .unwrap_or_default()
        .iter()
        .filter_map(|key| {
            let value = storage.get_item(key).ok().flatten()?;
            Some(key.len() + value.len())
        })
        .sum();

    StorageUsage {
        used,
        total: STORAGE_BUDGET_BYTES,
        percentage: used as f64 / STORAGE_BUDGET_BYTES as f64 * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryStorage;
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<Task> {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        let mut done = Task::new("Write report".to_string(), t0);
        done.completed = true;
        vec![Task::new("Buy milk".to_string(), t0), done]
    }

    #[test]
    fn test_load_missing_entry_is_empty() {
        let store = KeyValueTaskStore::new(MemoryStorage::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load_reconstructs_collection() {
        let store = KeyValueTaskStore::new(MemoryStorage::new());
        let tasks = sample();
        store.save(&tasks).unwrap();
        assert_eq!(store.load(), tasks);
    }

    #[test]
    fn test_corrupt_entry_loads_as_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, "{not json").unwrap();
        let store = KeyValueTaskStore::new(&storage);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_reads_camel_case_records() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                STORAGE_KEY,
                r#"[{"id":"6f1c1f3e-8d5a-4a47-9a39-1f4f1d7a2b10","text":"Buy milk","completed":true,
                    "createdAt":"2025-03-01T08:30:00.000Z","updatedAt":"2025-03-01T09:00:00.000Z"}]"#,
            )
            .unwrap();
        let tasks = KeyValueTaskStore::new(&storage).load();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].completed);
        assert_eq!(
            tasks[0].created_at,
            Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap()
        );
        assert!(tasks[0].updated_at > tasks[0].created_at);
    }

    #[test]
    fn test_save_rejected_by_quota() {
        let storage = MemoryStorage::with_quota(16);
        let store = KeyValueTaskStore::new(&storage);
        let err = store.save(&sample()).unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_clear_removes_entry() {
        let storage = MemoryStorage::new();
        let store = KeyValueTaskStore::new(&storage);
        store.save(&sample()).unwrap();
        store.clear().unwrap();
        assert_eq!(storage.get_item(STORAGE_KEY).unwrap(), None);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_storage_usage() {
        let storage = MemoryStorage::new();
        storage.set_item("todos", "[]").unwrap();
        let usage = storage_usage(&storage);
        assert_eq!(usage.used, 7);
        assert_eq!(usage.total, STORAGE_BUDGET_BYTES);
        assert!(usage.percentage > 0.0 && usage.percentage < 1.0);

        let full = MemoryStorage::with_quota(0);
        assert_eq!(storage_usage(&full).total, 0);
    }
}
