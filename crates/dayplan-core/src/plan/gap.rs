//! Free-interval detection between structural blocks.
//!
//! Sweeps the sorted structural blocks across the waking window and emits
//! the positive gaps: before the first block, between blocks, and after the
//! last one. Degenerate and negative intervals are skipped, not errored, so
//! overlapping structural input is silently absorbed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Block;

/// A free interval available for task placement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Gap {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Gap {
    /// Get duration in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check if this gap can fit a task of given duration.
    pub fn can_fit(&self, minutes: i64) -> bool {
        self.duration_minutes() >= minutes
    }
}

/// Find the free intervals of the waking window.
///
/// `blocks` must be sorted by start time. The sweep tracks the furthest
/// block end seen so far, so blocks that overlap or nest never resurface as
/// free time. With no blocks at all, the whole wake-to-sleep span is a
/// single gap.
pub fn find_gaps(blocks: &[Block], wake: DateTime<Utc>, sleep: DateTime<Utc>) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let mut last_end = wake;

    for block in blocks {
        if block.end <= last_end {
            continue;
        }
        if block.start >= sleep {
            break;
        }

        if block.start > last_end {
            gaps.push(Gap {
                start: last_end,
                end: block.start.min(sleep),
            });
        }

        last_end = block.end.min(sleep);
    }

    if last_end < sleep {
        gaps.push(Gap {
            start: last_end,
            end: sleep,
        });
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 10, h, m, 0).unwrap()
    }

    fn block(start: DateTime<Utc>, end: DateTime<Utc>) -> Block {
        Block::structural(start, end, "fixed")
    }

    #[test]
    fn empty_day_is_one_gap() {
        let gaps = find_gaps(&[], at(8, 0), at(22, 0));
        assert_eq!(gaps, vec![Gap { start: at(8, 0), end: at(22, 0) }]);
    }

    #[test]
    fn gaps_surround_blocks() {
        let blocks = vec![block(at(9, 0), at(10, 0)), block(at(12, 0), at(13, 0))];
        let gaps = find_gaps(&blocks, at(8, 0), at(22, 0));

        assert_eq!(
            gaps,
            vec![
                Gap { start: at(8, 0), end: at(9, 0) },
                Gap { start: at(10, 0), end: at(12, 0) },
                Gap { start: at(13, 0), end: at(22, 0) },
            ]
        );
    }

    #[test]
    fn adjacent_blocks_leave_no_gap() {
        let blocks = vec![block(at(9, 0), at(10, 0)), block(at(10, 0), at(11, 0))];
        let gaps = find_gaps(&blocks, at(9, 0), at(11, 0));
        assert!(gaps.is_empty());
    }

    #[test]
    fn overlapping_blocks_are_absorbed() {
        // The second block nests inside the first; the free time after it
        // must not reach back inside the first block.
        let blocks = vec![block(at(9, 0), at(12, 0)), block(at(10, 0), at(11, 0))];
        let gaps = find_gaps(&blocks, at(8, 0), at(14, 0));

        assert_eq!(
            gaps,
            vec![
                Gap { start: at(8, 0), end: at(9, 0) },
                Gap { start: at(12, 0), end: at(14, 0) },
            ]
        );
    }

    #[test]
    fn blocks_outside_the_window_are_clamped() {
        let blocks = vec![block(at(6, 0), at(9, 0)), block(at(21, 0), at(23, 0))];
        let gaps = find_gaps(&blocks, at(8, 0), at(22, 0));

        assert_eq!(gaps, vec![Gap { start: at(9, 0), end: at(21, 0) }]);
    }

    #[test]
    fn block_covering_whole_window_leaves_nothing() {
        let blocks = vec![block(at(7, 0), at(23, 0))];
        let gaps = find_gaps(&blocks, at(8, 0), at(22, 0));
        assert!(gaps.is_empty());
    }
}
