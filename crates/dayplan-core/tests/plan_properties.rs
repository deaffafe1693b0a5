//! Property tests for the planning invariants.
//!
//! For arbitrary day structures and backlogs, a generated plan must never
//! contain overlapping blocks, task blocks must stay inside the waking
//! window, and consumed capacity must respect the budget.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use dayplan_core::error::StorageError;
use dayplan_core::plan::{find_gaps, pack_tasks, Block};
use dayplan_core::storage::DeferralStore;
use dayplan_core::task::{sort_backlog, Task};

const DAY_MINUTES: i64 = 14 * 60; // 08:00 to 22:00

struct NullSink;

impl DeferralStore for NullSink {
    fn persist_deferrals(&self, _tasks: &[Task]) -> Result<(), StorageError> {
        Ok(())
    }
}

fn wake() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 10, 8, 0, 0).unwrap()
}

fn sleep() -> DateTime<Utc> {
    wake() + Duration::minutes(DAY_MINUTES)
}

/// Turn raw (start, duration) pairs into a sorted, non-overlapping set of
/// structural blocks inside the waking window.
fn disjoint_blocks(specs: &[(i64, i64)]) -> Vec<Block> {
    let mut sorted: Vec<(i64, i64)> = specs.to_vec();
    sorted.sort_by_key(|(start, _)| *start);

    let mut blocks = Vec::new();
    let mut cursor = 0i64;
    for (start, dur) in sorted {
        if start < cursor {
            continue;
        }
        let end = (start + dur).min(DAY_MINUTES);
        if end <= start {
            continue;
        }
        blocks.push(Block::structural(
            wake() + Duration::minutes(start),
            wake() + Duration::minutes(end),
            "fixed",
        ));
        cursor = end;
    }
    blocks
}

/// Arbitrary structural blocks, overlap allowed.
fn raw_blocks(specs: &[(i64, i64)]) -> Vec<Block> {
    let mut blocks: Vec<Block> = specs
        .iter()
        .map(|(start, dur)| {
            Block::structural(
                wake() + Duration::minutes(*start),
                wake() + Duration::minutes(start + dur),
                "fixed",
            )
        })
        .collect();
    blocks.sort_by_key(|b| b.start);
    blocks
}

fn backlog_from(minutes: &[i64]) -> Vec<Task> {
    minutes
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let mut t = Task::new("u1", &format!("t{i}"), ((i % 5) + 1) as i32, 3);
            t.estimated_minutes = Some(*m);
            t
        })
        .collect()
}

fn assert_no_overlap(blocks: &[Block]) -> Result<(), TestCaseError> {
    let mut sorted = blocks.to_vec();
    sorted.sort_by_key(|b| b.start);
    for pair in sorted.windows(2) {
        prop_assert!(
            !pair[0].overlaps(&pair[1]),
            "blocks overlap: {:?} / {:?}",
            pair[0],
            pair[1]
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn plans_over_disjoint_structure_never_overlap(
        specs in prop::collection::vec((0..DAY_MINUTES, 1..180i64), 0..6),
        minutes in prop::collection::vec(15..120i64, 0..12),
        load in 0.2f64..0.9,
    ) {
        let structure = disjoint_blocks(&specs);
        let gaps = find_gaps(&structure, wake(), sleep());

        let mut backlog = backlog_from(&minutes);
        sort_backlog(&mut backlog);

        let budget = DAY_MINUTES as f64 * load;
        let outcome = pack_tasks(&NullSink, &gaps, &mut backlog, budget, Utc::now());

        let mut all = structure;
        all.extend(outcome.blocks);
        assert_no_overlap(&all)?;

        prop_assert!((outcome.used_minutes as f64) <= budget);
    }

    #[test]
    fn task_blocks_stay_clear_of_any_structure(
        specs in prop::collection::vec((0..DAY_MINUTES, 1..240i64), 0..6),
        minutes in prop::collection::vec(15..120i64, 0..12),
    ) {
        // Overlapping structural input is allowed; the sweep must absorb
        // it so no task block ever intrudes into a fixed block.
        let structure = raw_blocks(&specs);
        let gaps = find_gaps(&structure, wake(), sleep());

        let mut backlog = backlog_from(&minutes);
        sort_backlog(&mut backlog);

        let outcome = pack_tasks(&NullSink, &gaps, &mut backlog, DAY_MINUTES as f64, Utc::now());

        for task_block in &outcome.blocks {
            prop_assert!(task_block.start >= wake());
            prop_assert!(task_block.end <= sleep());
            for fixed in &structure {
                prop_assert!(
                    !task_block.overlaps(fixed),
                    "task block {:?} intrudes into {:?}",
                    task_block,
                    fixed
                );
            }
        }
        assert_no_overlap(&outcome.blocks)?;
    }
}
