//! Plan generation and inspection commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use dayplan_core::storage::{PlannerDb, PlannerStore};
use dayplan_core::PlanningAgent;

use crate::common::{resolve_date, resolve_user};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Generate (or regenerate) the plan for a date
    Generate {
        /// Target date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// User id (default: configured default user)
        #[arg(long)]
        user: Option<String>,
    },
    /// Show the stored plan for a date
    Show {
        /// Target date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// User id (default: configured default user)
        #[arg(long)]
        user: Option<String>,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        PlanAction::Generate { date, user } => {
            let user = resolve_user(user);
            let date = resolve_date(date);
            let summary = PlanningAgent::new(&db).generate(&user, date)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        PlanAction::Show { date, user } => {
            let user = resolve_user(user);
            let date = resolve_date(date);
            match db.daily_plan(&user, date)? {
                Some(plan) => {
                    let items = db.plan_items(&plan.id)?;
                    println!("{}", serde_json::to_string_pretty(&plan)?);
                    println!("{}", serde_json::to_string_pretty(&items)?);
                }
                None => println!("No plan for {user} on {date}"),
            }
        }
    }
    Ok(())
}
