//! Daily mode commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use dayplan_core::mode::DailyMode;
use dayplan_core::storage::{PlannerDb, PlannerStore};
use dayplan_core::DayMode;

use crate::common::{resolve_date, resolve_user};

#[derive(Subcommand)]
pub enum ModeAction {
    /// Set the mode for a date
    Set {
        /// One of: full_rest, light_progress, strategic, high_performance, recovery
        mode: String,
        /// Target date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// User id (default: configured default user)
        #[arg(long)]
        user: Option<String>,
    },
    /// Show the mode for a date
    Show {
        /// Target date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// User id (default: configured default user)
        #[arg(long)]
        user: Option<String>,
    },
}

fn parse_mode(s: &str) -> Result<DayMode, String> {
    match s.to_uppercase().replace('-', "_").as_str() {
        "FULL_REST" => Ok(DayMode::FullRest),
        "LIGHT_PROGRESS" => Ok(DayMode::LightProgress),
        "STRATEGIC" => Ok(DayMode::Strategic),
        "HIGH_PERFORMANCE" => Ok(DayMode::HighPerformance),
        "RECOVERY" => Ok(DayMode::Recovery),
        other => Err(format!("unknown mode: {other}")),
    }
}

pub fn run(action: ModeAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        ModeAction::Set { mode, date, user } => {
            let user = resolve_user(user);
            let date = resolve_date(date);
            let mode = parse_mode(&mode)?;
            db.upsert_daily_mode(&DailyMode {
                user_id: user,
                date,
                mode,
                auto_generated: false,
            })?;
            println!("Mode for {date} set to {mode}");
        }
        ModeAction::Show { date, user } => {
            let user = resolve_user(user);
            let date = resolve_date(date);
            match db.daily_mode(&user, date)? {
                Some(daily) => println!("{}", serde_json::to_string_pretty(&daily)?),
                None => println!("No mode set for {user} on {date}"),
            }
        }
    }
    Ok(())
}
