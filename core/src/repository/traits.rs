use crate::error::StorageError;
use crate::model::task::Task;

const PROBE_KEY: &str = "__storage_test__";

/// A string key-value medium, the shape of a browser's local storage.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Probes the medium with a throwaway write.
    fn is_available(&self) -> bool {
        self.set_item(PROBE_KEY, "test").is_ok() && self.remove_item(PROBE_KEY).is_ok()
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Whole-collection persistence for tasks.
///
/// `load` never fails: unreadable data is reported and treated as empty.
pub trait TaskStore {
    fn load(&self) -> Vec<Task>;
    fn save(&self, tasks: &[Task]) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}
