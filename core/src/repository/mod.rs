pub mod file;
pub mod memory;
pub mod store;
pub mod task_repo;
pub mod traits;

// Re-export
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use store::{storage_usage, KeyValueTaskStore, StorageUsage, STORAGE_KEY};
pub use task_repo::TaskRepository;
pub use traits::{KeyValueStorage, TaskStore};
