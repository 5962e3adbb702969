use thiserror::Error;
use uuid::Uuid;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    #[error("failed to read '{key}': {reason}")]
    Read { key: String, reason: String },

    #[error("failed to serialize todos: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Todo not found")]
    NotFound(Uuid),

    #[error("Failed to save todos. Storage might be full.")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, TaskError>;
