//! Example 01: Basic CRUD Operations
//!
//! This example demonstrates creating, updating, toggling and deleting tasks
//! with an in-memory storage medium.
//!
//! Run with: cargo run --example 01_basic_crud

use eyre::Result;
use todostore::{MemoryStorage, Priority, TaskDraft, TaskStore};

fn main() -> Result<()> {
    println!("TodoStore Basic CRUD Example");
    println!("============================\n");

    // Open a store over an in-memory medium (a fresh one seeds sample tasks)
    let mut store = TaskStore::open(Box::new(MemoryStorage::new()))?;
    println!("Store opened with {} seed task(s).\n", store.list().len());

    // CREATE: Add a new task
    println!("1. CREATE - Adding a new task...");
    let task = store.create(TaskDraft {
        title: "Water the plants".to_string(),
        description: "Balcony and kitchen".to_string(),
        priority: Priority::Low,
        tags: vec!["home".to_string()],
        ..TaskDraft::default()
    })?;
    println!("   Created task with id: {}\n", task.id);

    // UPDATE: Replace its fields
    println!("2. UPDATE - Renaming the task...");
    let updated = store.update(
        task.id,
        TaskDraft {
            title: "Water all the plants".to_string(),
            priority: Priority::Medium,
            ..TaskDraft::default()
        },
    )?;
    println!("   New title: {}", updated.title);
    println!("   createdAt unchanged: {}\n", updated.created_at == task.created_at);

    // TOGGLE: Mark it done
    println!("3. TOGGLE - Completing the task...");
    let done = store.toggle_completion(task.id)?;
    println!("   Completed: {}\n", done.completed);

    // LIST: Show the collection
    println!("4. LIST - Current collection (newest first):");
    for task in store.list() {
        let mark = if task.completed { "x" } else { " " };
        println!("   [{}] {} : {}", mark, task.id, task.title);
    }
    println!();

    // DELETE: Remove it again
    println!("5. DELETE - Removing the task...");
    store.delete(task.id)?;
    println!("   Remaining tasks: {}\n", store.list().len());

    println!("Example complete!");
    Ok(())
}
