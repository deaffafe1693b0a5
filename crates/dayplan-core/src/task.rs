//! Backlog tasks and the deferral penalty.
//!
//! Tasks carry importance/urgency on a 1..=5 scale. A task that repeatedly
//! fails to fit into a day accumulates a deferral count; crossing the
//! 3 / 5 / 7 thresholds escalates importance, then urgency, then forces the
//! task ahead of everything else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Duration assumed for tasks without a usable estimate.
pub const DEFAULT_TASK_MINUTES: i64 = 60;

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    /// Captured but not yet triaged
    Inbox,
    /// Triaged and eligible for scheduling
    Active,
    /// Finished (terminal)
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Inbox
    }
}

/// A unit of backlog work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub status: TaskStatus,
    /// 1 (trivial) ..= 5 (critical)
    pub importance: i32,
    /// 1 (whenever) ..= 5 (now)
    pub urgency: i32,
    pub estimated_minutes: Option<i64>,
    /// Times this task failed to fit into a day's capacity
    pub deferred_count: i32,
    pub last_deferred_at: Option<DateTime<Utc>>,
    /// Set after repeated deferral; sorts ahead of everything else
    pub forced_priority: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a fresh inbox task.
    pub fn new(user_id: &str, content: &str, importance: i32, urgency: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            status: TaskStatus::Inbox,
            importance: importance.clamp(1, 5),
            urgency: urgency.clamp(1, 5),
            estimated_minutes: None,
            deferred_count: 0,
            last_deferred_at: None,
            forced_priority: false,
            created_at: Utc::now(),
        }
    }

    /// Minutes this task occupies when scheduled.
    ///
    /// Missing or non-positive estimates fall back to one hour.
    pub fn scheduling_minutes(&self) -> i64 {
        self.estimated_minutes
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_TASK_MINUTES)
    }

    /// Record one deferral and escalate priority at the thresholds.
    ///
    /// Importance and urgency never exceed 5; the forced flag never clears.
    pub fn apply_deferral(&mut self, now: DateTime<Utc>) {
        self.deferred_count += 1;
        self.last_deferred_at = Some(now);

        if self.deferred_count >= 3 && self.importance < 5 {
            self.importance += 1;
        }
        if self.deferred_count >= 5 && self.urgency < 5 {
            self.urgency += 1;
        }
        if self.deferred_count >= 7 {
            self.forced_priority = true;
        }
    }
}

/// Sort a backlog into scheduling order: forced-priority tasks first, then
/// by importance, then urgency, all descending. The sort is stable, so rows
/// that tie keep their backlog order.
pub fn sort_backlog(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        b.forced_priority
            .cmp(&a.forced_priority)
            .then(b.importance.cmp(&a.importance))
            .then(b.urgency.cmp(&a.urgency))
    });
}
