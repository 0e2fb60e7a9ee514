// Data models for TodoStore

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user-created unit of work with scheduling and categorization metadata.
///
/// Serialized field names are camelCase to match the persisted layout
/// (`dueDate`, `createdAt`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique across the collection; assigned by the store, immutable.
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Local time-of-day string, e.g. "14:00".
    #[serde(default)]
    pub time: Option<String>,
    /// Order-preserving; duplicates are allowed (see `parse_tags`).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Presentation-only flag; no notification scheduling exists in the core.
    #[serde(default)]
    pub reminder: bool,
    pub completed: bool,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Set once at creation, never changed by edits.
    pub created_at: DateTime<Utc>,
}

/// A named, independently completable checklist item owned by one task.
///
/// Subtask completion does not feed back into the parent's `completed` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    #[default]
    Personal,
    Shopping,
    Health,
}

impl Category {
    /// The fixed category set, in sidebar order.
    pub const ALL: [Category; 4] = [
        Category::Work,
        Category::Personal,
        Category::Shopping,
        Category::Health,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Work => write!(f, "work"),
            Category::Personal => write!(f, "personal"),
            Category::Shopping => write!(f, "shopping"),
            Category::Health => write!(f, "health"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Category::Work),
            "personal" => Ok(Category::Personal),
            "shopping" => Ok(Category::Shopping),
            "health" => Ok(Category::Health),
            other => Err(format!(
                "unknown category: {} (expected work, personal, shopping or health)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: high(1) < medium(2) < low(3).
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!(
                "unknown priority: {} (expected high, medium or low)",
                other
            )),
        }
    }
}

/// Mutable task fields supplied by the caller for create/update.
///
/// The store assigns `id` and `created_at`; `completed` is controlled
/// through `toggle_completion` only.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub time: Option<String>,
    pub tags: Vec<String>,
    pub reminder: bool,
    pub subtasks: Vec<SubtaskDraft>,
}

/// Subtask input; `id` is kept when editing an existing subtask and assigned
/// fresh by the store when `None`.
#[derive(Debug, Clone, Default)]
pub struct SubtaskDraft {
    pub id: Option<i64>,
    pub title: String,
    pub completed: bool,
}

/// Split a comma-separated tag string into individual tags.
///
/// Pieces are trimmed and empties dropped; order and duplicates are kept
/// as entered.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}
