//! Storage traits and implementations.
//!
//! The planning engine talks to storage through the [`PlannerStore`] trait;
//! a handle is constructed by the caller and passed in explicitly. There is
//! no process-wide client cache. [`PlannerDb`] is the bundled SQLite
//! implementation.

mod config;
pub mod migrations;
pub mod planner_db;

pub use config::Config;
pub use planner_db::PlannerDb;

use chrono::{NaiveDate, Weekday};
use std::path::PathBuf;

use crate::error::StorageError;
use crate::mode::DailyMode;
use crate::plan::{DailyPlan, PlanItem, PlanStatus};
use crate::profile::{NutritionProfile, ScheduleProfile, WeeklyScheduleEntry};
use crate::task::Task;

/// Returns `~/.config/dayplan[-dev]/` based on DAYPLAN_ENV.
///
/// Set DAYPLAN_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYPLAN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("dayplan-dev")
    } else {
        base_dir.join("dayplan")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Sink for task deferral updates.
///
/// Separate from [`PlannerStore`] so the packer only needs the one write it
/// performs. The method takes a slice so an implementation may batch;
/// the engine itself writes one task at a time, immediately, to keep
/// counters consistent across a crash.
pub trait DeferralStore {
    /// Persist deferral counters, escalated priorities, and the deferral
    /// timestamp for the given tasks.
    fn persist_deferrals(&self, tasks: &[Task]) -> Result<(), StorageError>;
}

/// Record storage consumed by the planning engine.
///
/// Single-row lookups may return `None`; the engine substitutes defaults.
pub trait PlannerStore: DeferralStore {
    fn schedule_profile(&self, user: &str) -> Result<Option<ScheduleProfile>, StorageError>;

    fn weekly_schedule_entry(
        &self,
        user: &str,
        day: Weekday,
    ) -> Result<Option<WeeklyScheduleEntry>, StorageError>;

    fn nutrition_profile(&self, user: &str) -> Result<Option<NutritionProfile>, StorageError>;

    fn daily_mode(&self, user: &str, date: NaiveDate) -> Result<Option<DailyMode>, StorageError>;

    /// Insert a mode row. Never overwrites an existing (user, date) row.
    fn insert_daily_mode(&self, mode: &DailyMode) -> Result<(), StorageError>;

    /// The schedulable backlog: INBOX and ACTIVE tasks for the user, in
    /// backlog order.
    fn task_backlog(&self, user: &str) -> Result<Vec<Task>, StorageError>;

    fn daily_plan(&self, user: &str, date: NaiveDate) -> Result<Option<DailyPlan>, StorageError>;

    fn insert_daily_plan(&self, plan: &DailyPlan) -> Result<(), StorageError>;

    /// Update a plan's status and strategic summary.
    fn update_plan_summary(
        &self,
        plan_id: &str,
        status: PlanStatus,
        summary: &str,
    ) -> Result<(), StorageError>;

    /// Remove every item of a plan.
    fn delete_plan_items(&self, plan_id: &str) -> Result<(), StorageError>;

    /// Bulk-insert items for a plan.
    fn insert_plan_items(&self, items: &[PlanItem]) -> Result<(), StorageError>;
}
