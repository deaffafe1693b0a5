//! Daily plan generation.
//!
//! This module provides:
//! - Block and plan item types
//! - Structural block construction from day-structure profiles
//! - Free-interval detection between structural blocks
//! - Greedy task packing under a capacity budget

mod gap;
mod scheduler;
mod structure;
mod writer;

pub use gap::{find_gaps, Gap};
pub use scheduler::{pack_tasks, PackOutcome};
pub use structure::{build_structural_blocks, day_window};
pub use writer::{persist_plan, PlanSummary};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of plan block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockKind {
    /// Fixed commitment (meal, work, commute, rest)
    Structural,
    /// Scheduled backlog task
    Task,
}

/// One time block of a generated plan.
///
/// Blocks only live in memory during a run; persistence happens through
/// [`PlanItem`]. Within one generated plan, blocks are mutually
/// non-overlapping and sorted by start time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub kind: BlockKind,
    pub task_id: Option<String>,
    pub label: Option<String>,
}

impl Block {
    /// Create a structural block.
    pub fn structural(start: DateTime<Utc>, end: DateTime<Utc>, label: &str) -> Self {
        Self {
            start,
            end,
            kind: BlockKind::Structural,
            task_id: None,
            label: Some(label.to_string()),
        }
    }

    /// Create a task block bound to a backlog task.
    pub fn task(start: DateTime<Utc>, end: DateTime<Utc>, task_id: &str) -> Self {
        Self {
            start,
            end,
            kind: BlockKind::Task,
            task_id: Some(task_id.to_string()),
            label: None,
        }
    }

    /// Get duration in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check whether this block overlaps another in time.
    pub fn overlaps(&self, other: &Block) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Status of a daily plan.
///
/// The planner only ever writes `Generated`; review and approval are owned
/// by external collaborators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanStatus {
    Generated,
    Reviewed,
    Approved,
}

/// Status of a single plan item.
///
/// Items are always inserted as `Pending`; transitions happen outside the
/// planner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanItemStatus {
    Pending,
    Completed,
    Skipped,
}

/// Plan header row, one per (user, date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPlan {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub status: PlanStatus,
    pub strategic_summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DailyPlan {
    /// Fresh plan row for a generation run.
    pub fn new(user_id: &str, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            date,
            status: PlanStatus::Generated,
            strategic_summary: None,
            created_at: Utc::now(),
        }
    }
}

/// Persisted projection of a [`Block`], scoped to one plan.
///
/// The full item set of a plan is deleted and replaced on every
/// regeneration; there is no incremental diffing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanItem {
    /// Row id, assigned by storage on insert.
    pub id: Option<i64>,
    pub user_id: String,
    pub daily_plan_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub kind: BlockKind,
    pub task_id: Option<String>,
    pub label: Option<String>,
    pub status: PlanItemStatus,
}

impl PlanItem {
    /// Project a block into a persistable item for the given plan.
    pub fn from_block(user_id: &str, daily_plan_id: &str, block: &Block) -> Self {
        Self {
            id: None,
            user_id: user_id.to_string(),
            daily_plan_id: daily_plan_id.to_string(),
            start_time: block.start,
            end_time: block.end,
            kind: block.kind,
            task_id: block.task_id.clone(),
            label: block.label.clone(),
            status: PlanItemStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 10, h, m, 0).unwrap()
    }

    #[test]
    fn block_overlap_detection() {
        let a = Block::structural(at(9, 0), at(10, 0), "Work");
        let b = Block::structural(at(9, 30), at(11, 0), "Lunch");
        let c = Block::structural(at(10, 0), at(11, 0), "Lunch");

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Touching blocks do not overlap
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn plan_item_projects_block_fields() {
        let block = Block::task(at(9, 0), at(10, 0), "task-1");
        let item = PlanItem::from_block("u1", "plan-1", &block);

        assert_eq!(item.daily_plan_id, "plan-1");
        assert_eq!(item.kind, BlockKind::Task);
        assert_eq!(item.task_id.as_deref(), Some("task-1"));
        assert_eq!(item.status, PlanItemStatus::Pending);
        assert!(item.id.is_none());
    }
}
