use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use eyre::Result;
use std::path::PathBuf;
use todostore::query::{category_counts, due_badge, subtask_progress};
use todostore::{
    Category, DueBadge, FileStorage, Priority, SortKey, Stats, StatusFilter, SubtaskDraft, Task,
    TaskDraft, TaskQuery, TaskStore, parse_tags,
};

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "Todostore CLI - track, filter and sort local to-do tasks")]
#[command(version)]
struct Cli {
    /// Path to the store directory (default: the per-user data directory)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new task
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "personal")]
        category: Category,
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Time of day, e.g. 14:00
        #[arg(long)]
        time: Option<String>,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long)]
        reminder: bool,
        /// Subtask title; repeat for several
        #[arg(long = "subtask")]
        subtasks: Vec<String>,
    },

    /// Show the task list, filtered and sorted
    List {
        /// Substring matched against title, description and tags
        #[arg(long, default_value = "")]
        search: String,
        /// Only this category (omit for all)
        #[arg(short, long)]
        category: Option<Category>,
        /// Only this priority (omit for all)
        #[arg(short, long)]
        priority: Option<Priority>,
        /// all, completed, pending or overdue
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// date-new, date-old, priority, due-date or name
        #[arg(long, default_value = "date-new")]
        sort: SortKey,
    },

    /// Replace a task's fields (completion state and creation time are kept)
    Edit {
        id: i64,
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "personal")]
        category: Category,
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long)]
        reminder: bool,
        #[arg(long = "subtask")]
        subtasks: Vec<String>,
    },

    /// Delete a task
    Delete { id: i64 },

    /// Toggle a task's completion
    Toggle { id: i64 },

    /// Toggle a subtask's completion
    Check { id: i64, subtask_id: i64 },

    /// Show collection statistics
    Stats,

    /// Set the color theme preference
    Theme {
        #[arg(value_enum)]
        mode: ThemeMode,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeMode {
    Dark,
    Light,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store_path = cli.store_path.unwrap_or_else(default_store_path);

    let storage = FileStorage::open(&store_path)?;
    let mut store = TaskStore::open(Box::new(storage))?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Add {
            title,
            description,
            category,
            priority,
            due,
            time,
            tags,
            reminder,
            subtasks,
        } => {
            let task = store.create(draft(
                title, description, category, priority, due, time, &tags, reminder, subtasks,
            ))?;
            println!("Task created successfully!");
            render_task(&task, today);
        }

        Commands::List {
            search,
            category,
            priority,
            status,
            sort,
        } => {
            let query = TaskQuery {
                search_term: search,
                category,
                priority,
                status,
                sort,
            };
            let view = query.apply(store.list(), today);
            if view.is_empty() {
                println!("No tasks match the current filters.");
            }
            for task in &view {
                render_task(task, today);
            }
        }

        Commands::Edit {
            id,
            title,
            description,
            category,
            priority,
            due,
            time,
            tags,
            reminder,
            subtasks,
        } => {
            let task = store.update(
                id,
                draft(title, description, category, priority, due, time, &tags, reminder, subtasks),
            )?;
            println!("Task updated successfully!");
            render_task(&task, today);
        }

        Commands::Delete { id } => {
            store.delete(id)?;
            println!("Task deleted!");
        }

        Commands::Toggle { id } => {
            let task = store.toggle_completion(id)?;
            render_task(&task, today);
        }

        Commands::Check { id, subtask_id } => {
            let task = store.toggle_subtask(id, subtask_id)?;
            render_task(&task, today);
        }

        Commands::Stats => {
            render_stats(store.list());
        }

        Commands::Theme { mode } => {
            let dark = matches!(mode, ThemeMode::Dark);
            store.set_dark_mode(dark)?;
            println!("Theme set to {}.", if dark { "dark" } else { "light" });
        }
    }

    Ok(())
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("todostore"))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[allow(clippy::too_many_arguments)]
fn draft(
    title: String,
    description: String,
    category: Category,
    priority: Priority,
    due: Option<NaiveDate>,
    time: Option<String>,
    tags: &str,
    reminder: bool,
    subtasks: Vec<String>,
) -> TaskDraft {
    TaskDraft {
        title,
        description,
        category,
        priority,
        due_date: due,
        time,
        tags: parse_tags(tags),
        reminder,
        subtasks: subtasks
            .into_iter()
            .map(|title| SubtaskDraft {
                id: None,
                title,
                completed: false,
            })
            .collect(),
    }
}

fn render_task(task: &Task, today: NaiveDate) {
    let checkbox = if task.completed { "[x]" } else { "[ ]" };
    let title = if task.completed {
        task.title.strikethrough().dimmed()
    } else {
        task.title.bold()
    };
    let priority = match task.priority {
        Priority::High => "high".red(),
        Priority::Medium => "medium".yellow(),
        Priority::Low => "low".green(),
    };

    let mut meta = vec![priority.to_string(), task.category.to_string()];
    if let Some(time) = &task.time {
        meta.push(time.clone());
    }
    if task.reminder {
        meta.push("reminder".to_string());
    }

    println!(
        "{} {} {}  ({})",
        checkbox,
        format!("#{}", task.id).dimmed(),
        title,
        meta.join(", ")
    );

    if !task.description.is_empty() {
        println!("      {}", task.description.dimmed());
    }

    if let Some(badge) = due_badge(task, today) {
        let label = match badge {
            DueBadge::Today => "due today".yellow(),
            DueBadge::Tomorrow => "due tomorrow".cyan(),
            DueBadge::Overdue => "overdue".red().bold(),
            DueBadge::Upcoming(date) => format!("due {}", date.format("%b %-d")).normal(),
        };
        println!("      {}", label);
    }

    if !task.tags.is_empty() {
        let tags: Vec<String> = task.tags.iter().map(|t| format!("#{}", t)).collect();
        println!("      {}", tags.join(" ").blue());
    }

    if !task.subtasks.is_empty() {
        let done = task.subtasks.iter().filter(|s| s.completed).count();
        println!(
            "      {}/{} subtasks ({}%)",
            done,
            task.subtasks.len(),
            subtask_progress(task)
        );
        for subtask in &task.subtasks {
            let mark = if subtask.completed { "[x]" } else { "[ ]" };
            println!("        {} {} {}", mark, format!("#{}", subtask.id).dimmed(), subtask.title);
        }
    }
}

fn render_stats(tasks: &[Task]) {
    let stats = Stats::collect(tasks);
    println!("Total tasks:     {}", stats.total);
    println!("Completed:       {}", stats.completed);
    println!("Pending:         {}", stats.pending);
    println!("Completion rate: {}%", stats.completion_rate);
    println!();
    for (category, count) in category_counts(tasks) {
        println!("{:<10} {}", category.to_string(), count);
    }
}
