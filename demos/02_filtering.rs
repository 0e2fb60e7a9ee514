//! Example 02: Filtering, Searching and Sorting
//!
//! This example builds a small collection and derives several views from it
//! with `TaskQuery`.
//!
//! Run with: cargo run --example 02_filtering

use chrono::{Duration, Local};
use eyre::Result;
use todostore::storage::TASKS_KEY;
use todostore::{
    Category, MemoryStorage, Priority, SortKey, Storage, StatusFilter, TaskDraft, TaskQuery,
    TaskStore, parse_tags,
};

fn main() -> Result<()> {
    println!("TodoStore Filtering Example");
    println!("===========================\n");

    // Start from an explicitly empty collection
    let mut storage = MemoryStorage::new();
    storage.set(TASKS_KEY, "[]")?;
    let mut store = TaskStore::open(Box::new(storage))?;

    let today = Local::now().date_naive();

    store.create(TaskDraft {
        title: "File expense report".to_string(),
        category: Category::Work,
        priority: Priority::High,
        due_date: Some(today - Duration::days(2)),
        tags: parse_tags("finance, urgent"),
        ..TaskDraft::default()
    })?;
    store.create(TaskDraft {
        title: "Weekly shop".to_string(),
        category: Category::Shopping,
        priority: Priority::Medium,
        due_date: Some(today + Duration::days(1)),
        tags: parse_tags("grocery"),
        ..TaskDraft::default()
    })?;
    let run = store.create(TaskDraft {
        title: "Evening run".to_string(),
        category: Category::Health,
        priority: Priority::Low,
        ..TaskDraft::default()
    })?;
    store.toggle_completion(run.id)?;

    println!("Collection has {} tasks.\n", store.list().len());

    // Search across title, description and tags
    println!("1. SEARCH - term 'grocery':");
    let query = TaskQuery {
        search_term: "grocery".to_string(),
        ..TaskQuery::default()
    };
    for task in query.apply(store.list(), today) {
        println!("   - {}", task.title);
    }
    println!();

    // Status filters
    println!("2. STATUS - overdue tasks only:");
    let query = TaskQuery {
        status: StatusFilter::Overdue,
        ..TaskQuery::default()
    };
    for task in query.apply(store.list(), today) {
        println!("   - {}", task.title);
    }
    println!();

    // Category filter combined with a sort
    println!("3. SORT - everything by priority:");
    let query = TaskQuery {
        sort: SortKey::Priority,
        ..TaskQuery::default()
    };
    for task in query.apply(store.list(), today) {
        println!("   - {} ({})", task.title, task.priority);
    }
    println!();

    // Due-date sort puts dateless tasks last
    println!("4. SORT - by due date (dateless last):");
    let query = TaskQuery {
        sort: SortKey::DueDate,
        ..TaskQuery::default()
    };
    for task in query.apply(store.list(), today) {
        match task.due_date {
            Some(date) => println!("   - {} (due {})", task.title, date),
            None => println!("   - {} (no due date)", task.title),
        }
    }
    println!();

    println!("Example complete!");
    Ok(())
}
