//! Greedy task packing under a capacity budget.
//!
//! Walks the prioritized backlog with a single monotonic cursor and packs
//! tasks into the day's free intervals front to back. A task that would
//! overrun the remaining gap stops that gap (no skip-ahead to smaller
//! tasks). A task that would overrun the day's capacity budget takes the
//! deferral penalty instead and the cursor moves past it; the penalty is
//! persisted immediately, best-effort, so a crash mid-run leaves
//! partial-but-consistent counters.

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};

use crate::storage::DeferralStore;
use crate::task::Task;

use super::{Block, Gap};

/// Result of one packing pass.
#[derive(Debug, Clone)]
pub struct PackOutcome {
    /// Task blocks, in placement order
    pub blocks: Vec<Block>,
    /// Minutes of capacity consumed
    pub used_minutes: i64,
    /// Tasks that took the deferral penalty this run
    pub deferred: usize,
}

/// Pack backlog tasks into the given gaps.
///
/// `backlog` must already be in scheduling order (see
/// [`crate::task::sort_backlog`]); `budget_minutes` is the day's capacity,
/// total awake minutes times the load factor. Deferral penalties are
/// written through `store` one task at a time; a failed write is logged and
/// does not stop the run.
pub fn pack_tasks<S: DeferralStore>(
    store: &S,
    gaps: &[Gap],
    backlog: &mut [Task],
    budget_minutes: f64,
    now: DateTime<Utc>,
) -> PackOutcome {
    let mut blocks = Vec::new();
    let mut used_minutes: i64 = 0;
    let mut deferred = 0;
    let mut cursor = 0;

    for gap in gaps {
        let mut pointer = gap.start;

        while cursor < backlog.len() && pointer < gap.end {
            let duration = backlog[cursor].scheduling_minutes();
            let candidate_end = pointer + Duration::minutes(duration);

            // Strict sequential packing: when the next task does not fit
            // the remaining gap, the gap is done.
            if candidate_end > gap.end {
                break;
            }

            if (used_minutes + duration) as f64 > budget_minutes {
                let task = &mut backlog[cursor];
                task.apply_deferral(now);
                if let Err(err) = store.persist_deferrals(std::slice::from_ref(task)) {
                    warn!("failed to persist deferral for task {}: {err}", task.id);
                }
                deferred += 1;
                cursor += 1;
                continue;
            }

            blocks.push(Block::task(pointer, candidate_end, &backlog[cursor].id));
            pointer = candidate_end;
            used_minutes += duration;
            cursor += 1;
        }
    }

    debug!(
        "packed {} task blocks, {used_minutes} min used, {deferred} deferred",
        blocks.len()
    );

    PackOutcome {
        blocks,
        used_minutes,
        deferred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use chrono::TimeZone;
    use std::cell::RefCell;

    struct RecordingSink {
        deferred_ids: RefCell<Vec<String>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                deferred_ids: RefCell::new(Vec::new()),
            }
        }
    }

    impl DeferralStore for RecordingSink {
        fn persist_deferrals(&self, tasks: &[Task]) -> Result<(), StorageError> {
            self.deferred_ids
                .borrow_mut()
                .extend(tasks.iter().map(|t| t.id.clone()));
            Ok(())
        }
    }

    struct FailingSink;

    impl DeferralStore for FailingSink {
        fn persist_deferrals(&self, _tasks: &[Task]) -> Result<(), StorageError> {
            Err(StorageError::QueryFailed("disk full".to_string()))
        }
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 10, h, m, 0).unwrap()
    }

    fn gap(start: DateTime<Utc>, end: DateTime<Utc>) -> Gap {
        Gap { start, end }
    }

    fn task_minutes(id: &str, minutes: i64) -> Task {
        let mut t = Task::new("u1", id, 3, 3);
        t.id = id.to_string();
        t.estimated_minutes = Some(minutes);
        t
    }

    #[test]
    fn packs_sequentially_from_gap_start() {
        // 840 awake minutes at the 0.75 load factor
        let sink = RecordingSink::new();
        let gaps = vec![gap(at(8, 0), at(22, 0))];
        let mut backlog = vec![
            task_minutes("t1", 60),
            task_minutes("t2", 60),
            task_minutes("t3", 60),
        ];

        let outcome = pack_tasks(&sink, &gaps, &mut backlog, 840.0 * 0.75, Utc::now());

        assert_eq!(outcome.used_minutes, 180);
        assert_eq!(outcome.deferred, 0);
        assert_eq!(outcome.blocks.len(), 3);
        assert_eq!(outcome.blocks[0].start, at(8, 0));
        assert_eq!(outcome.blocks[0].end, at(9, 0));
        assert_eq!(outcome.blocks[1].start, at(9, 0));
        assert_eq!(outcome.blocks[2].end, at(11, 0));
        assert!(sink.deferred_ids.borrow().is_empty());
    }

    #[test]
    fn budget_overrun_defers_and_keeps_trying() {
        // FULL_REST over an 08:00-22:00 day: budget 840 * 0.2 = 168 min.
        // Two fixed blocks leave gaps 8-10, 10:30-18, 18:30-22.
        let sink = RecordingSink::new();
        let gaps = vec![
            gap(at(8, 0), at(10, 0)),
            gap(at(10, 30), at(18, 0)),
            gap(at(18, 30), at(22, 0)),
        ];
        let mut backlog: Vec<Task> = (1..=5)
            .map(|i| task_minutes(&format!("t{i}"), 60))
            .collect();

        let outcome = pack_tasks(&sink, &gaps, &mut backlog, 840.0 * 0.2, Utc::now());

        // Two tasks fit (120 <= 168); the third would reach 180 > 168.
        assert_eq!(outcome.blocks.len(), 2);
        assert_eq!(outcome.used_minutes, 120);
        assert_eq!(outcome.deferred, 3);
        assert_eq!(backlog[2].deferred_count, 1);
        assert_eq!(
            sink.deferred_ids.borrow().as_slice(),
            &["t3".to_string(), "t4".to_string(), "t5".to_string()]
        );
    }

    #[test]
    fn oversized_task_stops_the_gap_without_skipping() {
        let sink = RecordingSink::new();
        let gaps = vec![gap(at(8, 0), at(9, 0)), gap(at(10, 0), at(13, 0))];
        let mut backlog = vec![task_minutes("big", 120), task_minutes("small", 30)];

        let outcome = pack_tasks(&sink, &gaps, &mut backlog, 1000.0, Utc::now());

        // The small task must not jump ahead of the big one inside the
        // first gap; both land in the second.
        assert_eq!(outcome.blocks.len(), 2);
        assert_eq!(outcome.blocks[0].task_id.as_deref(), Some("big"));
        assert_eq!(outcome.blocks[0].start, at(10, 0));
        assert_eq!(outcome.blocks[1].task_id.as_deref(), Some("small"));
        assert_eq!(outcome.blocks[1].start, at(12, 0));
        assert_eq!(backlog[0].deferred_count, 0);
    }

    #[test]
    fn capacity_never_exceeded() {
        let sink = RecordingSink::new();
        let gaps = vec![gap(at(8, 0), at(22, 0))];
        let mut backlog: Vec<Task> = (0..20)
            .map(|i| task_minutes(&format!("t{i}"), 45))
            .collect();
        let budget = 200.0;

        let outcome = pack_tasks(&sink, &gaps, &mut backlog, budget, Utc::now());

        assert!((outcome.used_minutes as f64) <= budget);
    }

    #[test]
    fn failed_deferral_write_does_not_stop_the_run() {
        let gaps = vec![gap(at(8, 0), at(22, 0))];
        let mut backlog = vec![task_minutes("t1", 60), task_minutes("t2", 60)];

        // Budget fits only the first task; the second defers, and its
        // write fails.
        let outcome = pack_tasks(&FailingSink, &gaps, &mut backlog, 60.0, Utc::now());

        assert_eq!(outcome.blocks.len(), 1);
        assert_eq!(outcome.deferred, 1);
        assert_eq!(backlog[1].deferred_count, 1);
    }

    #[test]
    fn zero_budget_schedules_nothing() {
        let sink = RecordingSink::new();
        let gaps = vec![gap(at(8, 0), at(22, 0))];
        let mut backlog = vec![task_minutes("t1", 60)];

        let outcome = pack_tasks(&sink, &gaps, &mut backlog, 0.0, Utc::now());

        assert!(outcome.blocks.is_empty());
        assert_eq!(outcome.used_minutes, 0);
        assert_eq!(backlog[0].deferred_count, 1);
    }

    #[test]
    fn empty_backlog_is_fine() {
        let sink = RecordingSink::new();
        let gaps = vec![gap(at(8, 0), at(22, 0))];
        let outcome = pack_tasks(&sink, &gaps, &mut [], 630.0, Utc::now());
        assert!(outcome.blocks.is_empty());
    }
}
