pub mod clock;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, StorageError, TaskError};
pub use input::{expand_id, join_words, short_id, IdError};
pub use model::stats::Stats;
pub use model::task::{Task, TaskUpdate};
pub use repository::{
    storage_usage, FileStorage, KeyValueStorage, KeyValueTaskStore, MemoryStorage, StorageUsage,
    TaskRepository, TaskStore, STORAGE_KEY,
};
pub use service::{compare_for_display, display_order, sort_for_display, TodoState};
pub use validation::{sanitize, validate, ValidationError, MAX_TEXT_LEN};

/// A file-backed state rooted at `data_dir`, the setup every front end uses.
pub type FileTodoState = TodoState<KeyValueTaskStore<FileStorage>, SystemClock>;

pub fn open_file_state(
    data_dir: impl Into<std::path::PathBuf>,
) -> std::result::Result<FileTodoState, StorageError> {
    let storage = FileStorage::new(data_dir)?;
    Ok(TodoState::new(TaskRepository::new(
        KeyValueTaskStore::new(storage),
    )))
}
