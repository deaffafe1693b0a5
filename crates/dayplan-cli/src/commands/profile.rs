//! Day-structure profile commands for CLI.

use chrono::{NaiveTime, Weekday};
use clap::Subcommand;
use std::str::FromStr;
use dayplan_core::profile::{
    EatingPattern, NutritionProfile, ScheduleProfile, WeeklyScheduleEntry,
};
use dayplan_core::storage::{PlannerDb, PlannerStore};
use dayplan_core::Config;

use crate::common::resolve_user;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Set the sleep-window profile
    Schedule {
        /// Wake time (HH:MM, default: configured fallback)
        #[arg(long)]
        wake: Option<NaiveTime>,
        /// Sleep time (HH:MM, default: configured fallback)
        #[arg(long)]
        sleep: Option<NaiveTime>,
        /// Minimum daily rest in minutes
        #[arg(long, default_value = "0")]
        rest: i64,
        /// User id (default: configured default user)
        #[arg(long)]
        user: Option<String>,
    },
    /// Set one weekday's work structure
    Week {
        /// Weekday (mon..sun)
        day: String,
        /// Work start time (HH:MM)
        #[arg(long)]
        work_start: Option<NaiveTime>,
        /// Work end time (HH:MM)
        #[arg(long)]
        work_end: Option<NaiveTime>,
        /// Commute minutes each way
        #[arg(long, default_value = "0")]
        commute: i64,
        /// Midday rest minutes
        #[arg(long, default_value = "0")]
        siesta: i64,
        /// User id (default: configured default user)
        #[arg(long)]
        user: Option<String>,
    },
    /// Set the meal profile
    Nutrition {
        /// Eating pattern: normal or ramadan
        #[arg(long, default_value = "normal")]
        pattern: String,
        /// Breakfast time (HH:MM)
        #[arg(long)]
        breakfast: Option<NaiveTime>,
        /// Lunch time (HH:MM)
        #[arg(long)]
        lunch: Option<NaiveTime>,
        /// Dinner time (HH:MM)
        #[arg(long)]
        dinner: Option<NaiveTime>,
        /// Suhoor time (HH:MM)
        #[arg(long)]
        suhoor: Option<NaiveTime>,
        /// Iftar time (HH:MM)
        #[arg(long)]
        iftar: Option<NaiveTime>,
        /// User id (default: configured default user)
        #[arg(long)]
        user: Option<String>,
    },
    /// Show the stored profiles
    Show {
        /// User id (default: configured default user)
        #[arg(long)]
        user: Option<String>,
    },
}

fn parse_pattern(s: &str) -> Result<EatingPattern, String> {
    match s.to_uppercase().as_str() {
        "NORMAL" => Ok(EatingPattern::Normal),
        "RAMADAN" => Ok(EatingPattern::Ramadan),
        other => Err(format!("unknown eating pattern: {other}")),
    }
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;

    match action {
        ProfileAction::Schedule {
            wake,
            sleep,
            rest,
            user,
        } => {
            let user = resolve_user(user);
            let config = Config::load_or_default();
            let fallback = |s: &str| NaiveTime::parse_from_str(s, "%H:%M").ok();
            let profile = ScheduleProfile {
                user_id: user,
                wake_time: wake
                    .or_else(|| fallback(&config.wake_time))
                    .unwrap_or_else(|| dayplan_core::profile::default_wake()),
                sleep_time: sleep
                    .or_else(|| fallback(&config.sleep_time))
                    .unwrap_or_else(|| dayplan_core::profile::default_sleep()),
                minimum_rest_minutes: rest,
            };
            db.upsert_schedule_profile(&profile)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Week {
            day,
            work_start,
            work_end,
            commute,
            siesta,
            user,
        } => {
            let user = resolve_user(user);
            let day_of_week = Weekday::from_str(&day)
                .map_err(|_| format!("unknown weekday: {day}"))?;
            let entry = WeeklyScheduleEntry {
                user_id: user,
                day_of_week,
                work_start_time: work_start,
                work_end_time: work_end,
                commute_minutes: commute,
                midday_rest_minutes: siesta,
            };
            db.upsert_weekly_entry(&entry)?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        ProfileAction::Nutrition {
            pattern,
            breakfast,
            lunch,
            dinner,
            suhoor,
            iftar,
            user,
        } => {
            let user = resolve_user(user);
            let profile = NutritionProfile {
                user_id: user,
                eating_pattern: parse_pattern(&pattern)?,
                breakfast_time: breakfast,
                lunch_time: lunch,
                dinner_time: dinner,
                suhoor_time: suhoor,
                iftar_time: iftar,
            };
            db.upsert_nutrition_profile(&profile)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Show { user } => {
            let user = resolve_user(user);
            match db.schedule_profile(&user)? {
                Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
                None => println!("No schedule profile for {user} (defaults apply)"),
            }
            match db.nutrition_profile(&user)? {
                Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
                None => println!("No nutrition profile for {user} (defaults apply)"),
            }
        }
    }
    Ok(())
}
