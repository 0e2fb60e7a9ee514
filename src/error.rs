// Error types for store operations

/// Result alias for library operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by [`TaskStore`](crate::store::TaskStore) and the storage layer.
///
/// Corrupt stored data is never reported through this type: `load()` recovers
/// by substituting seed tasks instead.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A required field failed validation; the collection is unchanged.
    #[error("{0}")]
    Validation(String),

    /// No task with the given id exists.
    #[error("no task with id {0}")]
    NotFound(i64),

    /// The task exists but has no subtask with the given id.
    #[error("task {0} has no subtask with id {1}")]
    SubtaskNotFound(i64, i64),

    /// The durable medium failed.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Task payload could not be encoded for persistence.
    #[error("failed to encode tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}
