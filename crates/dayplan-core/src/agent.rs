//! The planning agent.
//!
//! One invocation = one user = one date. The agent resolves the day's mode,
//! builds the fixed structure, finds the free intervals, packs the backlog
//! under the capacity budget, and persists the result, replacing any
//! previous plan for that date.
//!
//! The caller supplies the target date; nothing here infers "today" or
//! "tomorrow". Callers must also serialize runs per (user, date) -- the
//! plan rewrite is delete-then-insert, and two interleaved runs for the
//! same day can corrupt the stored plan. The agent itself takes no lock.

use chrono::{Datelike, NaiveDate, Utc};
use log::debug;

use crate::error::Result;
use crate::mode::{effective_load_factor, resolve_mode};
use crate::plan::{build_structural_blocks, day_window, find_gaps, pack_tasks, persist_plan, PlanSummary};
use crate::profile::{NutritionProfile, ScheduleProfile};
use crate::storage::PlannerStore;
use crate::task::sort_backlog;

/// Daily plan generator over an injected store handle.
pub struct PlanningAgent<'a, S: PlannerStore> {
    store: &'a S,
}

impl<'a, S: PlannerStore> PlanningAgent<'a, S> {
    /// Create an agent over a store handle owned by the caller.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Generate (or regenerate) the plan for one user and date.
    ///
    /// # Errors
    /// Fatal when the daily mode or plan row cannot be read or created, or
    /// when plan items cannot be written. Missing profile rows are not
    /// errors; defaults apply.
    pub fn generate(&self, user: &str, date: NaiveDate) -> Result<PlanSummary> {
        let daily_mode = resolve_mode(self.store, user, date)?;

        let profile = self
            .store
            .schedule_profile(user)?
            .unwrap_or_else(|| ScheduleProfile::defaults_for(user));
        let weekly = self.store.weekly_schedule_entry(user, date.weekday())?;
        let nutrition = self
            .store
            .nutrition_profile(user)?
            .unwrap_or_else(|| NutritionProfile::defaults_for(user));

        let (wake, sleep) = day_window(date, &profile);
        let total_awake_minutes = (sleep - wake).num_minutes();
        let load_factor = effective_load_factor(daily_mode.mode, total_awake_minutes);
        let budget_minutes = total_awake_minutes as f64 * load_factor;

        debug!(
            "planning {user} {date}: mode {}, {total_awake_minutes} min awake, budget {budget_minutes:.0} min",
            daily_mode.mode
        );

        let mut blocks = build_structural_blocks(
            date,
            &profile,
            weekly.as_ref(),
            &nutrition,
            daily_mode.mode,
        );
        let gaps = find_gaps(&blocks, wake, sleep);

        let mut backlog = self.store.task_backlog(user)?;
        sort_backlog(&mut backlog);

        let outcome = pack_tasks(self.store, &gaps, &mut backlog, budget_minutes, Utc::now());
        blocks.extend(outcome.blocks);

        persist_plan(
            self.store,
            user,
            date,
            &mut blocks,
            daily_mode.mode,
            outcome.used_minutes,
            total_awake_minutes,
        )
    }
}
