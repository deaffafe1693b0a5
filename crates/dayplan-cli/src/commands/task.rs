//! Task backlog commands for CLI.

use clap::Subcommand;
use dayplan_core::storage::{PlannerDb, PlannerStore};
use dayplan_core::task::{Task, TaskStatus};

use crate::common::resolve_user;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Capture a new task into the inbox
    Add {
        /// Task content
        content: String,
        /// Importance 1-5 (default: 3)
        #[arg(long, default_value = "3")]
        importance: i32,
        /// Urgency 1-5 (default: 3)
        #[arg(long, default_value = "3")]
        urgency: i32,
        /// Estimated duration in minutes
        #[arg(long)]
        minutes: Option<i64>,
        /// User id (default: configured default user)
        #[arg(long)]
        user: Option<String>,
    },
    /// List the schedulable backlog
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
        /// User id (default: configured default user)
        #[arg(long)]
        user: Option<String>,
    },
    /// Move a task from the inbox into the active backlog
    Activate {
        /// Task ID
        id: String,
    },
    /// Mark a task as done
    Done {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        TaskAction::Add {
            content,
            importance,
            urgency,
            minutes,
            user,
        } => {
            let user = resolve_user(user);
            let mut task = Task::new(&user, &content, importance, urgency);
            task.estimated_minutes = minutes;
            db.create_task(&task)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { all, user } => {
            let user = resolve_user(user);
            let tasks = if all {
                db.list_tasks(&user)?
            } else {
                db.task_backlog(&user)?
            };
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Activate { id } => match db.set_task_status(&id, TaskStatus::Active)? {
            true => println!("Task activated: {id}"),
            false => println!("Task not found: {id}"),
        },
        TaskAction::Done { id } => match db.set_task_status(&id, TaskStatus::Done)? {
            true => println!("Task completed: {id}"),
            false => println!("Task not found: {id}"),
        },
    }
    Ok(())
}
