// TodoStore - Local task tracking with a pluggable key-value medium

pub mod error;
pub mod models;
pub mod query;
pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use error::{Result, StoreError};
pub use models::{Category, Priority, Subtask, SubtaskDraft, Task, TaskDraft, parse_tags};
pub use query::{DueBadge, SortKey, Stats, StatusFilter, TaskQuery};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{TaskStore, now_ms};
