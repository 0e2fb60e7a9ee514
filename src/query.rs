// Query pipeline: derive an ordered view from the task collection

use crate::models::{Category, Priority, Task};
use chrono::{Duration, NaiveDate};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Completion-status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
    /// Not completed, has a due date, and it is strictly before today.
    /// A task due today is never overdue.
    Overdue,
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Completed => write!(f, "completed"),
            StatusFilter::Pending => write!(f, "pending"),
            StatusFilter::Overdue => write!(f, "overdue"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "completed" => Ok(StatusFilter::Completed),
            "pending" => Ok(StatusFilter::Pending),
            "overdue" => Ok(StatusFilter::Overdue),
            other => Err(format!(
                "unknown status filter: {} (expected all, completed, pending or overdue)",
                other
            )),
        }
    }
}

/// Sort order applied after filtering. All sorts are stable: ties keep the
/// relative order they had going in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Creation time, newest first.
    #[default]
    DateNew,
    /// Creation time, oldest first.
    DateOld,
    /// high before medium before low.
    Priority,
    /// Due date ascending; tasks without one go last.
    DueDate,
    /// Title, case-insensitive.
    Name,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::DateNew => write!(f, "date-new"),
            SortKey::DateOld => write!(f, "date-old"),
            SortKey::Priority => write!(f, "priority"),
            SortKey::DueDate => write!(f, "due-date"),
            SortKey::Name => write!(f, "name"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-new" => Ok(SortKey::DateNew),
            "date-old" => Ok(SortKey::DateOld),
            "priority" => Ok(SortKey::Priority),
            "due-date" => Ok(SortKey::DueDate),
            "name" => Ok(SortKey::Name),
            other => Err(format!(
                "unknown sort key: {} (expected date-new, date-old, priority, due-date or name)",
                other
            )),
        }
    }
}

/// A filter/sort query over the task collection.
///
/// `apply` is a pure function of (collection, query, today); it never touches
/// storage. `today` is passed in so callers and tests control the clock.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    /// Case-insensitive substring matched against title, description and
    /// tags; empty matches everything.
    pub search_term: String,
    /// `None` is a wildcard.
    pub category: Option<Category>,
    /// `None` is a wildcard.
    pub priority: Option<Priority>,
    pub status: StatusFilter,
    pub sort: SortKey,
}

impl TaskQuery {
    /// Derive the ordered view: filter with all predicates AND-combined,
    /// then sort.
    pub fn apply(&self, tasks: &[Task], today: NaiveDate) -> Vec<Task> {
        let needle = self.search_term.to_lowercase();
        let mut view: Vec<Task> = tasks
            .iter()
            .filter(|t| self.matches(t, &needle, today))
            .cloned()
            .collect();
        sort_view(&mut view, self.sort);
        view
    }

    fn matches(&self, task: &Task, needle: &str, today: NaiveDate) -> bool {
        if !needle.is_empty() {
            let hit = task.title.to_lowercase().contains(needle)
                || task.description.to_lowercase().contains(needle)
                || task.tags.iter().any(|tag| tag.to_lowercase().contains(needle));
            if !hit {
                return false;
            }
        }

        if let Some(category) = self.category
            && task.category != category
        {
            return false;
        }

        if let Some(priority) = self.priority
            && task.priority != priority
        {
            return false;
        }

        match self.status {
            StatusFilter::All => true,
            StatusFilter::Completed => task.completed,
            StatusFilter::Pending => !task.completed,
            StatusFilter::Overdue => !task.completed && is_overdue(task.due_date, today),
        }
    }
}

fn sort_view(view: &mut [Task], sort: SortKey) {
    match sort {
        SortKey::DateNew => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::DateOld => view.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::Priority => view.sort_by(|a, b| a.priority.rank().cmp(&b.priority.rank())),
        SortKey::DueDate => view.sort_by(|a, b| match (a.due_date, b.due_date) {
            // Dateless tasks go after every dated one; two dateless tasks
            // keep their relative order
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(&b),
        }),
        SortKey::Name => view.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase())),
    }
}

/// Past its due date, at date granularity. Due today is not overdue.
pub fn is_overdue(due_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    due_date.is_some_and(|d| d < today)
}

/// Badge shown next to a task's due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueBadge {
    Today,
    Tomorrow,
    Overdue,
    /// A future date beyond tomorrow.
    Upcoming(NaiveDate),
}

/// Derived display value for the task's due date; `None` when it has none.
pub fn due_badge(task: &Task, today: NaiveDate) -> Option<DueBadge> {
    let due = task.due_date?;
    if due == today {
        Some(DueBadge::Today)
    } else if due == today + Duration::days(1) {
        Some(DueBadge::Tomorrow)
    } else if due < today {
        Some(DueBadge::Overdue)
    } else {
        Some(DueBadge::Upcoming(due))
    }
}

/// Subtask completion percentage, rounded; 0 when there are no subtasks.
pub fn subtask_progress(task: &Task) -> u32 {
    if task.subtasks.is_empty() {
        return 0;
    }
    let done = task.subtasks.iter().filter(|s| s.completed).count();
    ((done as f64 / task.subtasks.len() as f64) * 100.0).round() as u32
}

/// Collection-level statistics for the stats display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Rounded percentage; 0 for an empty collection.
    pub completion_rate: u32,
}

impl Stats {
    pub fn collect(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let completion_rate = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        };
        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate,
        }
    }
}

/// Task count per category, in [`Category::ALL`] order.
pub fn category_counts(tasks: &[Task]) -> [(Category, usize); 4] {
    Category::ALL.map(|category| {
        let count = tasks.iter().filter(|t| t.category == category).count();
        (category, count)
    })
}
