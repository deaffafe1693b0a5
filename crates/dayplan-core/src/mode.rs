//! Daily operating modes and load factors.
//!
//! Each day runs under one mode that controls how much of the waking window
//! is eligible for task work. The mode row is created lazily the first time
//! a day is planned and is never overwritten once it exists for that date.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::storage::PlannerStore;

/// Awake windows shorter than this get the fatigue adjustment.
const FATIGUE_THRESHOLD_MINUTES: i64 = 6 * 60;

/// Multiplier applied to the load factor on short-sleep days.
const FATIGUE_MULTIPLIER: f64 = 0.7;

/// Operating mode for a single day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayMode {
    /// Rest day, almost no task work
    FullRest,
    /// Light forward progress
    LightProgress,
    /// Normal deep-work day
    Strategic,
    /// Maximum-output day
    HighPerformance,
    /// Recovery after overload or illness
    Recovery,
}

impl DayMode {
    /// Fraction of the awake window eligible for scheduled task work.
    pub fn load_factor(&self) -> f64 {
        match self {
            DayMode::FullRest => 0.2,
            DayMode::LightProgress => 0.5,
            DayMode::Strategic => 0.75,
            DayMode::HighPerformance => 0.9,
            DayMode::Recovery => 0.3,
        }
    }

    /// Default mode for a date with no explicit mode row.
    pub fn default_for(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayMode::LightProgress,
            _ => DayMode::Strategic,
        }
    }
}

impl Default for DayMode {
    fn default() -> Self {
        DayMode::Strategic
    }
}

impl std::fmt::Display for DayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DayMode::FullRest => "FULL_REST",
            DayMode::LightProgress => "LIGHT_PROGRESS",
            DayMode::Strategic => "STRATEGIC",
            DayMode::HighPerformance => "HIGH_PERFORMANCE",
            DayMode::Recovery => "RECOVERY",
        };
        f.write_str(s)
    }
}

/// Per-day mode row, one per (user, date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMode {
    pub user_id: String,
    pub date: NaiveDate,
    pub mode: DayMode,
    /// True when the row was created by the planner rather than the user.
    pub auto_generated: bool,
}

/// Look up the mode for (user, date), creating the weekday/weekend default
/// when no row exists yet. An existing row is never overwritten.
///
/// # Errors
/// Fatal when the row can neither be read nor created.
pub fn resolve_mode<S: PlannerStore>(store: &S, user: &str, date: NaiveDate) -> Result<DailyMode> {
    if let Some(existing) = store.daily_mode(user, date)? {
        return Ok(existing);
    }

    let auto = DailyMode {
        user_id: user.to_string(),
        date,
        mode: DayMode::default_for(date),
        auto_generated: true,
    };
    store.insert_daily_mode(&auto)?;

    store
        .daily_mode(user, date)?
        .ok_or_else(|| PlanError::ModeUnresolved {
            user: user.to_string(),
            date,
        })
}

/// Load factor for a mode over a concrete awake window, with the fatigue
/// adjustment for short nights applied.
pub fn effective_load_factor(mode: DayMode, awake_minutes: i64) -> f64 {
    let base = mode.load_factor();
    if awake_minutes < FATIGUE_THRESHOLD_MINUTES {
        base * FATIGUE_MULTIPLIER
    } else {
        base
    }
}
