//! Day-structure profiles.
//!
//! These rows describe the fixed shape of a user's day -- sleep window,
//! work hours, commute, meals. They are owned by external collaborators and
//! read-only to the planning engine; a missing row is not an error, the
//! engine substitutes defaults.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Fallback wake time when no schedule profile exists.
pub fn default_wake() -> NaiveTime {
    hm(8, 0)
}

/// Fallback sleep time when no schedule profile exists.
pub fn default_sleep() -> NaiveTime {
    hm(22, 0)
}

/// Wall-clock time from literal hour/minute values.
pub(crate) fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Long-lived sleep-window profile, one per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleProfile {
    pub user_id: String,
    pub wake_time: NaiveTime,
    pub sleep_time: NaiveTime,
    pub minimum_rest_minutes: i64,
}

impl ScheduleProfile {
    /// Profile used when the user has no stored row.
    pub fn defaults_for(user: &str) -> Self {
        Self {
            user_id: user.to_string(),
            wake_time: default_wake(),
            sleep_time: default_sleep(),
            minimum_rest_minutes: 0,
        }
    }
}

/// Work-day structure for one weekday, one per (user, weekday).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyScheduleEntry {
    pub user_id: String,
    pub day_of_week: Weekday,
    pub work_start_time: Option<NaiveTime>,
    pub work_end_time: Option<NaiveTime>,
    pub commute_minutes: i64,
    pub midday_rest_minutes: i64,
}

impl WeeklyScheduleEntry {
    /// The work window, when both ends are configured.
    pub fn work_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        match (self.work_start_time, self.work_end_time) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// Meal pattern for a user.
///
/// Stored values outside this vocabulary are read back as `Normal`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EatingPattern {
    Normal,
    Ramadan,
}

impl Default for EatingPattern {
    fn default() -> Self {
        EatingPattern::Normal
    }
}

/// Meal-time profile, one per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NutritionProfile {
    pub user_id: String,
    pub eating_pattern: EatingPattern,
    pub breakfast_time: Option<NaiveTime>,
    pub lunch_time: Option<NaiveTime>,
    pub dinner_time: Option<NaiveTime>,
    pub suhoor_time: Option<NaiveTime>,
    pub iftar_time: Option<NaiveTime>,
}

impl NutritionProfile {
    /// Profile used when the user has no stored row.
    pub fn defaults_for(user: &str) -> Self {
        Self {
            user_id: user.to_string(),
            eating_pattern: EatingPattern::Normal,
            breakfast_time: None,
            lunch_time: None,
            dinner_time: None,
            suhoor_time: None,
            iftar_time: None,
        }
    }
}
