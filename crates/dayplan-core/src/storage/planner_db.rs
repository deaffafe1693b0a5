//! SQLite-based storage for profiles, tasks, modes, and plans.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::{data_dir, migrations, DeferralStore, PlannerStore};
use crate::error::StorageError;
use crate::mode::{DailyMode, DayMode};
use crate::plan::{BlockKind, DailyPlan, PlanItem, PlanItemStatus, PlanStatus};
use crate::profile::{EatingPattern, NutritionProfile, ScheduleProfile, WeeklyScheduleEntry};
use crate::task::{Task, TaskStatus};

// === Helper Functions ===

/// Parse task status from database string
fn parse_task_status(status_str: &str) -> TaskStatus {
    match status_str {
        "ACTIVE" => TaskStatus::Active,
        "DONE" => TaskStatus::Done,
        _ => TaskStatus::Inbox,
    }
}

/// Format task status for database storage
fn format_task_status(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Inbox => "INBOX",
        TaskStatus::Active => "ACTIVE",
        TaskStatus::Done => "DONE",
    }
}

/// Parse day mode from database string; unrecognized values fall back to
/// the strategic default.
fn parse_day_mode(mode_str: &str) -> DayMode {
    match mode_str {
        "FULL_REST" => DayMode::FullRest,
        "LIGHT_PROGRESS" => DayMode::LightProgress,
        "HIGH_PERFORMANCE" => DayMode::HighPerformance,
        "RECOVERY" => DayMode::Recovery,
        _ => DayMode::Strategic,
    }
}

/// Format day mode for database storage
fn format_day_mode(mode: DayMode) -> &'static str {
    match mode {
        DayMode::FullRest => "FULL_REST",
        DayMode::LightProgress => "LIGHT_PROGRESS",
        DayMode::Strategic => "STRATEGIC",
        DayMode::HighPerformance => "HIGH_PERFORMANCE",
        DayMode::Recovery => "RECOVERY",
    }
}

/// Parse plan status from database string
fn parse_plan_status(status_str: &str) -> PlanStatus {
    match status_str {
        "REVIEWED" => PlanStatus::Reviewed,
        "APPROVED" => PlanStatus::Approved,
        _ => PlanStatus::Generated,
    }
}

/// Format plan status for database storage
fn format_plan_status(status: PlanStatus) -> &'static str {
    match status {
        PlanStatus::Generated => "GENERATED",
        PlanStatus::Reviewed => "REVIEWED",
        PlanStatus::Approved => "APPROVED",
    }
}

/// Parse plan item status from database string
fn parse_item_status(status_str: &str) -> PlanItemStatus {
    match status_str {
        "COMPLETED" => PlanItemStatus::Completed,
        "SKIPPED" => PlanItemStatus::Skipped,
        _ => PlanItemStatus::Pending,
    }
}

/// Format plan item status for database storage
fn format_item_status(status: PlanItemStatus) -> &'static str {
    match status {
        PlanItemStatus::Pending => "PENDING",
        PlanItemStatus::Completed => "COMPLETED",
        PlanItemStatus::Skipped => "SKIPPED",
    }
}

/// Parse block kind from database string
fn parse_block_kind(kind_str: &str) -> BlockKind {
    match kind_str {
        "TASK" => BlockKind::Task,
        _ => BlockKind::Structural,
    }
}

/// Format block kind for database storage
fn format_block_kind(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Structural => "STRUCTURAL",
        BlockKind::Task => "TASK",
    }
}

/// Parse eating pattern from database string; unknown patterns read as
/// NORMAL.
fn parse_eating_pattern(pattern_str: &str) -> EatingPattern {
    match pattern_str {
        "RAMADAN" => EatingPattern::Ramadan,
        _ => EatingPattern::Normal,
    }
}

/// Format eating pattern for database storage
fn format_eating_pattern(pattern: EatingPattern) -> &'static str {
    match pattern {
        EatingPattern::Normal => "NORMAL",
        EatingPattern::Ramadan => "RAMADAN",
    }
}

/// Weekday stored as 0=Mon .. 6=Sun
fn format_weekday(day: Weekday) -> i64 {
    day.num_days_from_monday() as i64
}

fn parse_weekday(num: i64) -> Weekday {
    match num {
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        6 => Weekday::Sun,
        _ => Weekday::Mon,
    }
}

/// Parse a wall-clock time stored as HH:MM or HH:MM:SS
fn parse_time(time_str: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(time_str, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time_str, "%H:%M"))
        .ok()
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Parse a date stored as YYYY-MM-DD
fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Build a Task from a database row
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let status_str: String = row.get(3)?;
    let last_deferred: Option<String> = row.get(8)?;
    let created_at_str: String = row.get(10)?;

    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content: row.get(2)?,
        status: parse_task_status(&status_str),
        importance: row.get(4)?,
        urgency: row.get(5)?,
        estimated_minutes: row.get(6)?,
        deferred_count: row.get(7)?,
        last_deferred_at: last_deferred.as_deref().map(parse_datetime_fallback),
        forced_priority: row.get(9)?,
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

const TASK_COLUMNS: &str = "id, user_id, content, status, importance, urgency, estimated_minutes,
     deferred_count, last_deferred_at, forced_priority, created_at";

/// Build a PlanItem from a database row
fn row_to_plan_item(row: &rusqlite::Row) -> Result<PlanItem, rusqlite::Error> {
    let start_str: String = row.get(3)?;
    let end_str: String = row.get(4)?;
    let kind_str: String = row.get(5)?;
    let status_str: String = row.get(8)?;

    Ok(PlanItem {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        daily_plan_id: row.get(2)?,
        start_time: parse_datetime_fallback(&start_str),
        end_time: parse_datetime_fallback(&end_str),
        kind: parse_block_kind(&kind_str),
        task_id: row.get(6)?,
        label: row.get(7)?,
        status: parse_item_status(&status_str),
    })
}

/// Build a DailyPlan from a database row
fn row_to_daily_plan(row: &rusqlite::Row) -> Result<DailyPlan, rusqlite::Error> {
    let date_str: String = row.get(2)?;
    let status_str: String = row.get(3)?;
    let created_at_str: String = row.get(5)?;

    Ok(DailyPlan {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: parse_date(&date_str).unwrap_or_default(),
        status: parse_plan_status(&status_str),
        strategic_summary: row.get(4)?,
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

/// SQLite database for planner storage.
///
/// Stores day-structure profiles, the task backlog, daily modes, and
/// generated plans.
pub struct PlannerDb {
    conn: Connection,
}

impl PlannerDb {
    /// Open the planner database at `~/.config/dayplan/dayplan.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let dir = data_dir().map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Self::open_at(&dir.join("dayplan.db"))
    }

    /// Open a planner database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (tests, throwaway runs).
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        migrations::migrate(&self.conn)
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))
    }

    // === Task maintenance ===

    /// Insert a new task.
    pub fn create_task(&self, task: &Task) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO tasks (id, user_id, content, status, importance, urgency,
                 estimated_minutes, deferred_count, last_deferred_at, forced_priority, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                task.id,
                task.user_id,
                task.content,
                format_task_status(task.status),
                task.importance,
                task.urgency,
                task.estimated_minutes,
                task.deferred_count,
                task.last_deferred_at.map(|t| t.to_rfc3339()),
                task.forced_priority,
                task.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List every task of a user, newest first.
    pub fn list_tasks(&self, user: &str) -> Result<Vec<Task>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 ORDER BY created_at DESC"
        ))?;
        let tasks = stmt
            .query_map(params![user], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Fetch one task by id.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>, StorageError> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// Update a task's lifecycle status.
    pub fn set_task_status(&self, id: &str, status: TaskStatus) -> Result<bool, StorageError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = ?2 WHERE id = ?1",
            params![id, format_task_status(status)],
        )?;
        Ok(changed > 0)
    }

    // === Profile maintenance ===

    /// Insert or replace a user's sleep-window profile.
    pub fn upsert_schedule_profile(&self, profile: &ScheduleProfile) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO schedule_profiles
                 (user_id, wake_time, sleep_time, minimum_rest_minutes)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                profile.user_id,
                format_time(profile.wake_time),
                format_time(profile.sleep_time),
                profile.minimum_rest_minutes,
            ],
        )?;
        Ok(())
    }

    /// Insert or replace one weekday's work structure.
    pub fn upsert_weekly_entry(&self, entry: &WeeklyScheduleEntry) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO weekly_schedule
                 (user_id, day_of_week, work_start_time, work_end_time,
                  commute_minutes, midday_rest_minutes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.user_id,
                format_weekday(entry.day_of_week),
                entry.work_start_time.map(format_time),
                entry.work_end_time.map(format_time),
                entry.commute_minutes,
                entry.midday_rest_minutes,
            ],
        )?;
        Ok(())
    }

    /// Insert or replace a user's meal profile.
    pub fn upsert_nutrition_profile(
        &self,
        profile: &NutritionProfile,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO nutrition_profiles
                 (user_id, eating_pattern, breakfast_time, lunch_time, dinner_time,
                  suhoor_time, iftar_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                profile.user_id,
                format_eating_pattern(profile.eating_pattern),
                profile.breakfast_time.map(format_time),
                profile.lunch_time.map(format_time),
                profile.dinner_time.map(format_time),
                profile.suhoor_time.map(format_time),
                profile.iftar_time.map(format_time),
            ],
        )?;
        Ok(())
    }

    /// Insert or replace a day's mode (user-driven override).
    pub fn upsert_daily_mode(&self, mode: &DailyMode) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO daily_modes (user_id, date, mode, auto_generated)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                mode.user_id,
                format_date(mode.date),
                format_day_mode(mode.mode),
                mode.auto_generated,
            ],
        )?;
        Ok(())
    }

    // === Plan inspection ===

    /// List the items of a plan, in start-time order.
    pub fn plan_items(&self, plan_id: &str) -> Result<Vec<PlanItem>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, daily_plan_id, start_time, end_time, item_type,
                    task_id, label, status
             FROM plan_items WHERE daily_plan_id = ?1
             ORDER BY start_time ASC, id ASC",
        )?;
        let items = stmt
            .query_map(params![plan_id], row_to_plan_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }
}

impl DeferralStore for PlannerDb {
    fn persist_deferrals(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        for task in tasks {
            tx.execute(
                "UPDATE tasks
                 SET deferred_count = ?2, last_deferred_at = ?3, importance = ?4,
                     urgency = ?5, forced_priority = ?6
                 WHERE id = ?1",
                params![
                    task.id,
                    task.deferred_count,
                    task.last_deferred_at.map(|t| t.to_rfc3339()),
                    task.importance,
                    task.urgency,
                    task.forced_priority,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl PlannerStore for PlannerDb {
    fn schedule_profile(&self, user: &str) -> Result<Option<ScheduleProfile>, StorageError> {
        let profile = self
            .conn
            .query_row(
                "SELECT user_id, wake_time, sleep_time, minimum_rest_minutes
                 FROM schedule_profiles WHERE user_id = ?1",
                params![user],
                |row| {
                    let wake_str: String = row.get(1)?;
                    let sleep_str: String = row.get(2)?;
                    Ok((
                        row.get::<_, String>(0)?,
                        wake_str,
                        sleep_str,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        Ok(profile.map(|(user_id, wake_str, sleep_str, rest)| {
            let defaults = ScheduleProfile::defaults_for(&user_id);
            ScheduleProfile {
                user_id,
                wake_time: parse_time(&wake_str).unwrap_or(defaults.wake_time),
                sleep_time: parse_time(&sleep_str).unwrap_or(defaults.sleep_time),
                minimum_rest_minutes: rest,
            }
        }))
    }

    fn weekly_schedule_entry(
        &self,
        user: &str,
        day: Weekday,
    ) -> Result<Option<WeeklyScheduleEntry>, StorageError> {
        let entry = self
            .conn
            .query_row(
                "SELECT user_id, day_of_week, work_start_time, work_end_time,
                        commute_minutes, midday_rest_minutes
                 FROM weekly_schedule WHERE user_id = ?1 AND day_of_week = ?2",
                params![user, format_weekday(day)],
                |row| {
                    let start: Option<String> = row.get(2)?;
                    let end: Option<String> = row.get(3)?;
                    Ok(WeeklyScheduleEntry {
                        user_id: row.get(0)?,
                        day_of_week: parse_weekday(row.get(1)?),
                        work_start_time: start.as_deref().and_then(parse_time),
                        work_end_time: end.as_deref().and_then(parse_time),
                        commute_minutes: row.get(4)?,
                        midday_rest_minutes: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }

    fn nutrition_profile(&self, user: &str) -> Result<Option<NutritionProfile>, StorageError> {
        let profile = self
            .conn
            .query_row(
                "SELECT user_id, eating_pattern, breakfast_time, lunch_time, dinner_time,
                        suhoor_time, iftar_time
                 FROM nutrition_profiles WHERE user_id = ?1",
                params![user],
                |row| {
                    let pattern: String = row.get(1)?;
                    let breakfast: Option<String> = row.get(2)?;
                    let lunch: Option<String> = row.get(3)?;
                    let dinner: Option<String> = row.get(4)?;
                    let suhoor: Option<String> = row.get(5)?;
                    let iftar: Option<String> = row.get(6)?;
                    Ok(NutritionProfile {
                        user_id: row.get(0)?,
                        eating_pattern: parse_eating_pattern(&pattern),
                        breakfast_time: breakfast.as_deref().and_then(parse_time),
                        lunch_time: lunch.as_deref().and_then(parse_time),
                        dinner_time: dinner.as_deref().and_then(parse_time),
                        suhoor_time: suhoor.as_deref().and_then(parse_time),
                        iftar_time: iftar.as_deref().and_then(parse_time),
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    fn daily_mode(&self, user: &str, date: NaiveDate) -> Result<Option<DailyMode>, StorageError> {
        let mode = self
            .conn
            .query_row(
                "SELECT user_id, date, mode, auto_generated
                 FROM daily_modes WHERE user_id = ?1 AND date = ?2",
                params![user, format_date(date)],
                |row| {
                    let date_str: String = row.get(1)?;
                    let mode_str: String = row.get(2)?;
                    Ok((row.get::<_, String>(0)?, date_str, mode_str, row.get::<_, bool>(3)?))
                },
            )
            .optional()?;

        Ok(mode.map(|(user_id, date_str, mode_str, auto_generated)| DailyMode {
            user_id,
            date: parse_date(&date_str).unwrap_or(date),
            mode: parse_day_mode(&mode_str),
            auto_generated,
        }))
    }

    fn insert_daily_mode(&self, mode: &DailyMode) -> Result<(), StorageError> {
        // OR IGNORE keeps an existing (user, date) row authoritative.
        self.conn.execute(
            "INSERT OR IGNORE INTO daily_modes (user_id, date, mode, auto_generated)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                mode.user_id,
                format_date(mode.date),
                format_day_mode(mode.mode),
                mode.auto_generated,
            ],
        )?;
        Ok(())
    }

    fn task_backlog(&self, user: &str) -> Result<Vec<Task>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE user_id = ?1 AND status IN ('INBOX', 'ACTIVE')
             ORDER BY forced_priority DESC, importance DESC, urgency DESC, created_at ASC"
        ))?;
        let tasks = stmt
            .query_map(params![user], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn daily_plan(&self, user: &str, date: NaiveDate) -> Result<Option<DailyPlan>, StorageError> {
        let plan = self
            .conn
            .query_row(
                "SELECT id, user_id, date, status, strategic_summary, created_at
                 FROM daily_plans WHERE user_id = ?1 AND date = ?2",
                params![user, format_date(date)],
                row_to_daily_plan,
            )
            .optional()?;
        Ok(plan)
    }

    fn insert_daily_plan(&self, plan: &DailyPlan) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO daily_plans (id, user_id, date, status, strategic_summary, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                plan.id,
                plan.user_id,
                format_date(plan.date),
                format_plan_status(plan.status),
                plan.strategic_summary,
                plan.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update_plan_summary(
        &self,
        plan_id: &str,
        status: PlanStatus,
        summary: &str,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE daily_plans SET status = ?2, strategic_summary = ?3 WHERE id = ?1",
            params![plan_id, format_plan_status(status), summary],
        )?;
        Ok(())
    }

    fn delete_plan_items(&self, plan_id: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM plan_items WHERE daily_plan_id = ?1",
            params![plan_id],
        )?;
        Ok(())
    }

    fn insert_plan_items(&self, items: &[PlanItem]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO plan_items
                     (user_id, daily_plan_id, start_time, end_time, item_type,
                      task_id, label, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for item in items {
                stmt.execute(params![
                    item.user_id,
                    item.daily_plan_id,
                    item.start_time.to_rfc3339(),
                    item.end_time.to_rfc3339(),
                    format_block_kind(item.kind),
                    item.task_id,
                    item.label,
                    format_item_status(item.status),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
