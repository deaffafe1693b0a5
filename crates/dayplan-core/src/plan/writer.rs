//! Plan persistence.
//!
//! Upserts the day's plan row, replaces its full item set, and writes the
//! strategic summary. Replacement is delete-then-insert with no diffing, so
//! a regenerated plan never mixes old and new items.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::mode::DayMode;
use crate::storage::PlannerStore;

use super::{Block, DailyPlan, PlanItem, PlanStatus};

/// Outcome of one planning run, JSON-serializable for callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanSummary {
    pub mode: DayMode,
    pub total_blocks: usize,
    pub used_minutes: i64,
    pub real_load_percent: i64,
}

/// Realized load as a whole percentage of the awake window.
fn load_percent(used_minutes: i64, total_awake_minutes: i64) -> i64 {
    if total_awake_minutes <= 0 {
        return 0;
    }
    (used_minutes as f64 / total_awake_minutes as f64 * 100.0).round() as i64
}

/// Persist the final block list as the day's plan.
///
/// Sorts `blocks` by start time, finds or creates the `DailyPlan` row for
/// (user, date), deletes every existing item of that plan, inserts the new
/// set, and stores the strategic summary on the plan row.
///
/// # Errors
/// Any storage failure here is fatal for the run.
pub fn persist_plan<S: PlannerStore>(
    store: &S,
    user: &str,
    date: NaiveDate,
    blocks: &mut Vec<Block>,
    mode: DayMode,
    used_minutes: i64,
    total_awake_minutes: i64,
) -> Result<PlanSummary> {
    blocks.sort_by_key(|b| b.start);

    let plan = match store.daily_plan(user, date)? {
        Some(existing) => existing,
        None => {
            let fresh = DailyPlan::new(user, date);
            store.insert_daily_plan(&fresh)?;
            store
                .daily_plan(user, date)?
                .ok_or_else(|| PlanError::PlanUnresolved {
                    user: user.to_string(),
                    date,
                })?
        }
    };

    store.delete_plan_items(&plan.id)?;

    let items: Vec<PlanItem> = blocks
        .iter()
        .map(|b| PlanItem::from_block(user, &plan.id, b))
        .collect();
    if !items.is_empty() {
        store.insert_plan_items(&items)?;
    }

    let percent = load_percent(used_minutes, total_awake_minutes);
    let summary_text = format!(
        "Day mode: {mode}\nTotal blocks: {}\nRealized load: {percent}%",
        blocks.len()
    );
    store.update_plan_summary(&plan.id, PlanStatus::Generated, &summary_text)?;

    Ok(PlanSummary {
        mode,
        total_blocks: blocks.len(),
        used_minutes,
        real_load_percent: percent,
    })
}
