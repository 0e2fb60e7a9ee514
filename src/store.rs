// Task store: owns the canonical collection and the durable medium

use crate::error::{Result, StoreError};
use crate::models::{Category, Priority, Subtask, SubtaskDraft, Task, TaskDraft};
use crate::storage::{DARK_MODE_KEY, Storage, TASKS_KEY};
use chrono::{Duration, Local, Utc};
use tracing::{debug, info, warn};

/// Owns the canonical task collection; sole reader and writer of the
/// underlying storage.
///
/// Every mutating operation persists before returning. Queries over the
/// collection live in [`TaskQuery`](crate::query::TaskQuery), which only
/// reads.
pub struct TaskStore {
    storage: Box<dyn Storage>,
    tasks: Vec<Task>,
    next_id: i64,
}

impl TaskStore {
    /// Open a store over the given medium, loading whatever it holds.
    ///
    /// Missing or unparsable stored data is replaced with seed tasks; this
    /// never fails on bad content, only on storage I/O.
    pub fn open(storage: Box<dyn Storage>) -> Result<Self> {
        let mut store = Self {
            storage,
            tasks: Vec::new(),
            next_id: now_ms(),
        };
        store.load()?;
        Ok(store)
    }

    /// The current collection, most recently created first.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    /// Validate the draft, assign a fresh id and creation timestamp, and
    /// insert the new task at the front of the collection.
    pub fn create(&mut self, draft: TaskDraft) -> Result<Task> {
        let title = validated_title(&draft)?;
        let subtasks = self.materialize_subtasks(draft.subtasks);

        let task = Task {
            id: self.fresh_id(),
            title,
            description: draft.description,
            category: draft.category,
            priority: draft.priority,
            due_date: draft.due_date,
            time: draft.time,
            tags: draft.tags,
            reminder: draft.reminder,
            completed: false,
            subtasks,
            created_at: Utc::now(),
        };

        debug!(id = task.id, title = %task.title, "creating task");
        self.tasks.insert(0, task.clone());
        self.persist()?;
        Ok(task)
    }

    /// Replace all mutable fields of the task with the draft's values.
    ///
    /// `id`, `created_at` and the current `completed` state are preserved.
    pub fn update(&mut self, id: i64, draft: TaskDraft) -> Result<Task> {
        let title = validated_title(&draft)?;
        let index = self.position(id)?;
        let subtasks = self.materialize_subtasks(draft.subtasks);

        let task = &mut self.tasks[index];
        task.title = title;
        task.description = draft.description;
        task.category = draft.category;
        task.priority = draft.priority;
        task.due_date = draft.due_date;
        task.time = draft.time;
        task.tags = draft.tags;
        task.reminder = draft.reminder;
        task.subtasks = subtasks;

        let updated = task.clone();
        debug!(id, "updated task");
        self.persist()?;
        Ok(updated)
    }

    /// Remove the task from the collection.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        let index = self.position(id)?;
        self.tasks.remove(index);
        debug!(id, "deleted task");
        self.persist()
    }

    /// Flip the task's `completed` flag.
    pub fn toggle_completion(&mut self, id: i64) -> Result<Task> {
        let index = self.position(id)?;
        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        let updated = task.clone();
        debug!(id, completed = updated.completed, "toggled task");
        self.persist()?;
        Ok(updated)
    }

    /// Flip the named subtask's `completed` flag. The parent's own
    /// `completed` state is left alone.
    pub fn toggle_subtask(&mut self, task_id: i64, subtask_id: i64) -> Result<Task> {
        let index = self.position(task_id)?;
        let task = &mut self.tasks[index];
        let subtask = task
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or(StoreError::SubtaskNotFound(task_id, subtask_id))?;
        subtask.completed = !subtask.completed;

        let updated = task.clone();
        debug!(task_id, subtask_id, "toggled subtask");
        self.persist()?;
        Ok(updated)
    }

    /// Read the collection back from storage.
    ///
    /// A missing `tasks` key means a fresh session; an unparsable payload is
    /// treated as corrupt. Both fall back to seed tasks, which are persisted
    /// immediately so the next load sees real data.
    pub fn load(&mut self) -> Result<()> {
        let stored = match self.storage.get(TASKS_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<Task>>(&raw) {
                Ok(tasks) => Some(tasks),
                Err(e) => {
                    warn!(error = %e, "stored tasks unparsable, falling back to seed data");
                    None
                }
            },
            None => None,
        };

        self.next_id = now_ms();
        match stored {
            Some(tasks) => {
                // Keep the id counter ahead of everything already persisted
                let max_id = tasks
                    .iter()
                    .flat_map(|t| std::iter::once(t.id).chain(t.subtasks.iter().map(|s| s.id)))
                    .max();
                if let Some(max) = max_id
                    && max >= self.next_id
                {
                    self.next_id = max + 1;
                }
                self.tasks = tasks;
            }
            None => {
                self.tasks = self.seed_tasks();
                self.persist()?;
            }
        }

        info!(count = self.tasks.len(), "loaded task collection");
        Ok(())
    }

    /// Write the full collection to storage.
    pub fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.tasks)?;
        self.storage.set(TASKS_KEY, &json)?;
        debug!(count = self.tasks.len(), "persisted task collection");
        Ok(())
    }

    /// Dark-mode preference, stored under its own key. Defaults to off.
    pub fn dark_mode(&self) -> Result<bool> {
        Ok(self.storage.get(DARK_MODE_KEY)?.as_deref() == Some("true"))
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<()> {
        self.storage.set(DARK_MODE_KEY, if enabled { "true" } else { "false" })
    }

    fn position(&self, id: i64) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Monotonic id counter, seeded from the epoch-millisecond clock and
    /// bumped past any id seen at load. Two creations in the same tick
    /// cannot collide.
    fn fresh_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn materialize_subtasks(&mut self, drafts: Vec<SubtaskDraft>) -> Vec<Subtask> {
        drafts
            .into_iter()
            .filter(|d| !d.title.trim().is_empty())
            .map(|d| Subtask {
                id: d.id.unwrap_or_else(|| self.fresh_id()),
                title: d.title,
                completed: d.completed,
            })
            .collect()
    }

    /// Starter tasks shown on a fresh (or corrupt) session.
    fn seed_tasks(&mut self) -> Vec<Task> {
        let today = Local::now().date_naive();
        let tomorrow = today + Duration::days(1);
        let now = Utc::now();

        let report_subtasks = vec![
            Subtask {
                id: self.fresh_id(),
                title: "Gather data".to_string(),
                completed: true,
            },
            Subtask {
                id: self.fresh_id(),
                title: "Create charts".to_string(),
                completed: false,
            },
            Subtask {
                id: self.fresh_id(),
                title: "Write summary".to_string(),
                completed: false,
            },
        ];

        vec![
            Task {
                id: self.fresh_id(),
                title: "Complete Project Report".to_string(),
                description: "Finish the quarterly project report and send to stakeholders"
                    .to_string(),
                category: Category::Work,
                priority: Priority::High,
                due_date: Some(tomorrow),
                time: Some("14:00".to_string()),
                tags: vec!["work".to_string(), "urgent".to_string(), "report".to_string()],
                reminder: true,
                completed: false,
                subtasks: report_subtasks,
                created_at: now,
            },
            Task {
                id: self.fresh_id(),
                title: "Buy Groceries".to_string(),
                description: "Milk, bread, eggs, vegetables".to_string(),
                category: Category::Shopping,
                priority: Priority::Medium,
                due_date: None,
                time: None,
                tags: vec!["shopping".to_string(), "grocery".to_string()],
                reminder: false,
                completed: false,
                subtasks: Vec::new(),
                created_at: now,
            },
            Task {
                id: self.fresh_id(),
                title: "Morning Workout".to_string(),
                description: "30 minutes running + stretching".to_string(),
                category: Category::Health,
                priority: Priority::Medium,
                due_date: Some(today),
                time: Some("06:00".to_string()),
                tags: vec!["health".to_string(), "fitness".to_string()],
                reminder: true,
                completed: true,
                subtasks: Vec::new(),
                created_at: now,
            },
        ]
    }
}

fn validated_title(draft: &TaskDraft) -> Result<String> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(StoreError::Validation("task title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time before Unix epoch")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Priority};
    use crate::storage::{FileStorage, MemoryStorage};
    use tempfile::TempDir;

    fn empty_store() -> TaskStore {
        // Start from an explicitly empty collection so tests don't see seeds
        let mut storage = MemoryStorage::new();
        storage.set(TASKS_KEY, "[]").unwrap();
        TaskStore::open(Box::new(storage)).unwrap()
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            ..TaskDraft::default()
        }
    }

    #[test]
    fn test_create_prepends_with_fresh_id() {
        let mut store = empty_store();

        let first = store.create(draft("First")).unwrap();
        let second = store.create(draft("Second")).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.list().len(), 2);
        // Most recently created sits at the front
        assert_eq!(store.list()[0].title, "Second");
        assert_eq!(store.list()[1].title, "First");
    }

    #[test]
    fn test_create_trims_title() {
        let mut store = empty_store();
        let task = store.create(draft("  Walk dog  ")).unwrap();
        assert_eq!(task.title, "Walk dog");
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let mut store = empty_store();

        for bad in ["", "   ", "\t\n"] {
            let err = store.create(draft(bad)).unwrap_err();
            assert!(matches!(err, StoreError::Validation(_)));
        }
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_create_assigns_fresh_subtask_ids() {
        let mut store = empty_store();

        let task = store
            .create(TaskDraft {
                title: "Pack".to_string(),
                subtasks: vec![
                    SubtaskDraft {
                        id: None,
                        title: "Clothes".to_string(),
                        completed: false,
                    },
                    SubtaskDraft {
                        id: None,
                        title: "Passport".to_string(),
                        completed: false,
                    },
                    SubtaskDraft {
                        id: None,
                        title: "   ".to_string(),
                        completed: false,
                    },
                ],
                ..TaskDraft::default()
            })
            .unwrap();

        // Blank subtask rows are dropped, like empty form inputs
        assert_eq!(task.subtasks.len(), 2);
        assert_ne!(task.subtasks[0].id, task.subtasks[1].id);
        assert_ne!(task.subtasks[0].id, task.id);
    }

    #[test]
    fn test_update_preserves_id_created_at_completed() {
        let mut store = empty_store();
        let created = store.create(draft("Original")).unwrap();
        store.toggle_completion(created.id).unwrap();

        let updated = store
            .update(
                created.id,
                TaskDraft {
                    title: "Renamed".to_string(),
                    description: "new body".to_string(),
                    category: Category::Health,
                    priority: Priority::Low,
                    ..TaskDraft::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.completed, "completed survives an edit");
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.category, Category::Health);
    }

    #[test]
    fn test_operations_on_missing_id_fail_without_mutation() {
        let mut store = empty_store();
        store.create(draft("Only task")).unwrap();
        let before = store.list().to_vec();

        assert!(matches!(store.update(999, draft("x")), Err(StoreError::NotFound(999))));
        assert!(matches!(store.delete(999), Err(StoreError::NotFound(999))));
        assert!(matches!(store.toggle_completion(999), Err(StoreError::NotFound(999))));
        assert!(matches!(store.toggle_subtask(999, 1), Err(StoreError::NotFound(999))));

        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_toggle_completion_flips_both_ways() {
        let mut store = empty_store();
        let task = store.create(draft("Flip me")).unwrap();

        assert!(store.toggle_completion(task.id).unwrap().completed);
        assert!(!store.toggle_completion(task.id).unwrap().completed);
    }

    #[test]
    fn test_toggle_subtask_leaves_parent_alone() {
        let mut store = empty_store();
        let task = store
            .create(TaskDraft {
                title: "Parent".to_string(),
                subtasks: vec![SubtaskDraft {
                    id: None,
                    title: "Child".to_string(),
                    completed: false,
                }],
                ..TaskDraft::default()
            })
            .unwrap();
        let subtask_id = task.subtasks[0].id;

        let updated = store.toggle_subtask(task.id, subtask_id).unwrap();
        assert!(updated.subtasks[0].completed);
        assert!(!updated.completed);

        // Missing subtask id on an existing task
        let err = store.toggle_subtask(task.id, 424242).unwrap_err();
        assert!(matches!(err, StoreError::SubtaskNotFound(_, 424242)));
    }

    #[test]
    fn test_delete_removes_task() {
        let mut store = empty_store();
        let keep = store.create(draft("Keep")).unwrap();
        let remove = store.create(draft("Remove")).unwrap();

        store.delete(remove.id).unwrap();
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].id, keep.id);
    }

    #[test]
    fn test_persist_load_round_trip_across_sessions() {
        let temp = TempDir::new().unwrap();

        let first_list = {
            let storage = FileStorage::open(temp.path()).unwrap();
            let mut store = TaskStore::open(Box::new(storage)).unwrap();
            store.create(draft("Survives restart")).unwrap();
            store.list().to_vec()
        };

        // Fresh session over the same directory
        let storage = FileStorage::open(temp.path()).unwrap();
        let store = TaskStore::open(Box::new(storage)).unwrap();
        assert_eq!(store.list(), first_list.as_slice());
    }

    #[test]
    fn test_fresh_session_gets_seed_tasks() {
        let store = TaskStore::open(Box::new(MemoryStorage::new())).unwrap();

        assert_eq!(store.list().len(), 3);
        assert_eq!(store.list()[0].title, "Complete Project Report");
        assert!(store.list().iter().any(|t| t.completed));
    }

    #[test]
    fn test_corrupt_payload_falls_back_to_seed_tasks() {
        let mut storage = MemoryStorage::new();
        storage.set(TASKS_KEY, "{not valid json").unwrap();

        let store = TaskStore::open(Box::new(storage)).unwrap();
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn test_id_counter_advances_past_loaded_ids() {
        let far_future = now_ms() + 1_000_000;
        let json = format!(
            r#"[{{"id":{},"title":"Old","category":"work","priority":"low",
                "completed":false,"createdAt":"2024-01-01T00:00:00Z"}}]"#,
            far_future
        );
        let mut storage = MemoryStorage::new();
        storage.set(TASKS_KEY, &json).unwrap();

        let mut store = TaskStore::open(Box::new(storage)).unwrap();
        let task = store.create(draft("New")).unwrap();
        assert!(task.id > far_future);
    }

    #[test]
    fn test_dark_mode_preference_round_trip() {
        let mut store = empty_store();
        assert!(!store.dark_mode().unwrap());

        store.set_dark_mode(true).unwrap();
        assert!(store.dark_mode().unwrap());

        store.set_dark_mode(false).unwrap();
        assert!(!store.dark_mode().unwrap());
    }

    #[test]
    fn test_now_ms() {
        let ts = now_ms();
        assert!(ts > 0);
        // Should be reasonable timestamp (after year 2020)
        assert!(ts > 1_600_000_000_000);
    }
}
