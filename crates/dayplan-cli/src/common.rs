use chrono::{Local, NaiveDate};
use dayplan_core::Config;

/// User id from the flag, falling back to the configured default.
pub fn resolve_user(flag: Option<String>) -> String {
    flag.unwrap_or_else(|| Config::load_or_default().default_user)
}

/// Target date from the flag, falling back to today.
///
/// Date selection lives here on purpose; the core takes an explicit date.
pub fn resolve_date(flag: Option<NaiveDate>) -> NaiveDate {
    flag.unwrap_or_else(|| Local::now().date_naive())
}
