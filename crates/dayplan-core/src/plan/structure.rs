//! Structural block construction.
//!
//! Builds the day's fixed, immovable blocks -- work, commute, meals, rest --
//! from the user's day-structure profiles. The builder does not resolve
//! overlaps between structural blocks; messy profile data is absorbed later
//! by the gap sweep.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::mode::DayMode;
use crate::profile::{hm, EatingPattern, NutritionProfile, ScheduleProfile, WeeklyScheduleEntry};

use super::Block;

const BREAKFAST_MINUTES: i64 = 20;
const LUNCH_MINUTES: i64 = 60;
const DINNER_MINUTES: i64 = 40;
const SUHOOR_MINUTES: i64 = 30;
const IFTAR_MINUTES: i64 = 60;

/// Anchor for the midday rest block.
fn siesta_anchor() -> NaiveTime {
    hm(15, 30)
}

/// Place a wall-clock time on the target date.
fn at(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    date.and_time(time).and_utc()
}

/// Wake and sleep instants for a date.
///
/// A sleep time at or before the wake time is taken to mean the following
/// day (e.g. 23:00 to 07:00).
pub fn day_window(date: NaiveDate, profile: &ScheduleProfile) -> (DateTime<Utc>, DateTime<Utc>) {
    let wake = at(date, profile.wake_time);
    let mut sleep = at(date, profile.sleep_time);
    if sleep <= wake {
        sleep += Duration::days(1);
    }
    (wake, sleep)
}

/// Build the day's structural blocks, sorted by start time.
///
/// The sort is stable, so blocks that start together keep their insertion
/// order.
pub fn build_structural_blocks(
    date: NaiveDate,
    profile: &ScheduleProfile,
    weekly: Option<&WeeklyScheduleEntry>,
    nutrition: &NutritionProfile,
    mode: DayMode,
) -> Vec<Block> {
    let (wake, _) = day_window(date, profile);
    let mut blocks = Vec::new();

    if mode == DayMode::FullRest {
        blocks.push(Block::structural(
            at(date, hm(10, 0)),
            at(date, hm(10, 30)),
            "Light movement",
        ));
        blocks.push(Block::structural(
            at(date, hm(18, 0)),
            at(date, hm(18, 30)),
            "Family time",
        ));
    }

    let work_window = weekly.and_then(WeeklyScheduleEntry::work_window);

    if let Some((work_start, work_end)) = work_window {
        let start = at(date, work_start);
        let end = at(date, work_end);
        blocks.push(Block::structural(start, end, "Work"));

        let commute = weekly.map(|w| w.commute_minutes).unwrap_or(0);
        if commute > 0 {
            blocks.push(Block::structural(
                start - Duration::minutes(commute),
                start,
                "Commute",
            ));
            blocks.push(Block::structural(
                end,
                end + Duration::minutes(commute),
                "Commute",
            ));
        }
    }

    match nutrition.eating_pattern {
        EatingPattern::Normal => {
            // Breakfast ends at work start when there is a work day, else
            // two hours after waking.
            let breakfast_end = match work_window {
                Some((work_start, _)) => at(date, work_start),
                None => wake + Duration::hours(2),
            };
            blocks.push(Block::structural(
                breakfast_end - Duration::minutes(BREAKFAST_MINUTES),
                breakfast_end,
                "Breakfast",
            ));

            let lunch = at(date, nutrition.lunch_time.unwrap_or_else(|| hm(14, 0)));
            blocks.push(Block::structural(
                lunch,
                lunch + Duration::minutes(LUNCH_MINUTES),
                "Lunch",
            ));

            let dinner = at(date, nutrition.dinner_time.unwrap_or_else(|| hm(21, 0)));
            blocks.push(Block::structural(
                dinner,
                dinner + Duration::minutes(DINNER_MINUTES),
                "Dinner",
            ));
        }
        EatingPattern::Ramadan => {
            if let Some(suhoor) = nutrition.suhoor_time {
                let start = at(date, suhoor);
                blocks.push(Block::structural(
                    start,
                    start + Duration::minutes(SUHOOR_MINUTES),
                    "Suhoor",
                ));
            }
            if let Some(iftar) = nutrition.iftar_time {
                let start = at(date, iftar);
                blocks.push(Block::structural(
                    start,
                    start + Duration::minutes(IFTAR_MINUTES),
                    "Iftar",
                ));
            }
        }
    }

    let siesta = weekly.map(|w| w.midday_rest_minutes).unwrap_or(0);
    if siesta > 0 {
        let start = at(date, siesta_anchor());
        blocks.push(Block::structural(
            start,
            start + Duration::minutes(siesta),
            "Siesta",
        ));
    }

    blocks.sort_by_key(|b| b.start);
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn profile() -> ScheduleProfile {
        ScheduleProfile {
            user_id: "u1".to_string(),
            wake_time: hm(8, 0),
            sleep_time: hm(22, 0),
            minimum_rest_minutes: 0,
        }
    }

    fn date() -> NaiveDate {
        // A Monday
        NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
    }

    fn weekly(work: Option<(u32, u32, u32, u32)>, commute: i64, siesta: i64) -> WeeklyScheduleEntry {
        WeeklyScheduleEntry {
            user_id: "u1".to_string(),
            day_of_week: Weekday::Mon,
            work_start_time: work.map(|(h, m, _, _)| hm(h, m)),
            work_end_time: work.map(|(_, _, h, m)| hm(h, m)),
            commute_minutes: commute,
            midday_rest_minutes: siesta,
        }
    }

    fn labels(blocks: &[Block]) -> Vec<&str> {
        blocks
            .iter()
            .filter_map(|b| b.label.as_deref())
            .collect()
    }

    #[test]
    fn normal_day_has_three_meals() {
        let nutrition = NutritionProfile::defaults_for("u1");
        let blocks =
            build_structural_blocks(date(), &profile(), None, &nutrition, DayMode::Strategic);

        assert_eq!(labels(&blocks), vec!["Breakfast", "Lunch", "Dinner"]);

        // No work day: breakfast ends two hours after waking
        let breakfast = &blocks[0];
        assert_eq!(breakfast.end, date().and_time(hm(10, 0)).and_utc());
        assert_eq!(breakfast.duration_minutes(), 20);

        // Fallback meal anchors
        assert_eq!(blocks[1].start, date().and_time(hm(14, 0)).and_utc());
        assert_eq!(blocks[1].duration_minutes(), 60);
        assert_eq!(blocks[2].start, date().and_time(hm(21, 0)).and_utc());
        assert_eq!(blocks[2].duration_minutes(), 40);
    }

    #[test]
    fn work_day_adds_work_commute_and_anchors_breakfast() {
        let nutrition = NutritionProfile::defaults_for("u1");
        let entry = weekly(Some((9, 0, 17, 0)), 30, 0);
        let blocks = build_structural_blocks(
            date(),
            &profile(),
            Some(&entry),
            &nutrition,
            DayMode::Strategic,
        );

        assert_eq!(
            labels(&blocks),
            vec!["Commute", "Breakfast", "Work", "Lunch", "Commute", "Dinner"]
        );

        // Inbound commute sits immediately before work
        assert_eq!(blocks[0].start, date().and_time(hm(8, 30)).and_utc());
        assert_eq!(blocks[0].end, date().and_time(hm(9, 0)).and_utc());
        // Breakfast ends exactly at work start
        assert_eq!(blocks[1].end, date().and_time(hm(9, 0)).and_utc());
        assert_eq!(blocks[1].duration_minutes(), 20);
        // Outbound commute immediately after work
        assert_eq!(blocks[4].start, date().and_time(hm(17, 0)).and_utc());
        assert_eq!(blocks[4].duration_minutes(), 30);
    }

    #[test]
    fn ramadan_replaces_the_meal_set() {
        let nutrition = NutritionProfile {
            eating_pattern: EatingPattern::Ramadan,
            suhoor_time: Some(hm(5, 0)),
            iftar_time: Some(hm(19, 0)),
            ..NutritionProfile::defaults_for("u1")
        };
        let blocks =
            build_structural_blocks(date(), &profile(), None, &nutrition, DayMode::Strategic);

        assert_eq!(labels(&blocks), vec!["Suhoor", "Iftar"]);
        assert_eq!(blocks[0].duration_minutes(), 30);
        assert_eq!(blocks[1].duration_minutes(), 60);
    }

    #[test]
    fn ramadan_without_times_produces_no_meals() {
        let nutrition = NutritionProfile {
            eating_pattern: EatingPattern::Ramadan,
            ..NutritionProfile::defaults_for("u1")
        };
        let blocks =
            build_structural_blocks(date(), &profile(), None, &nutrition, DayMode::Strategic);
        assert!(blocks.is_empty());
    }

    #[test]
    fn siesta_sits_at_the_anchor() {
        let nutrition = NutritionProfile::defaults_for("u1");
        let entry = weekly(None, 0, 45);
        let blocks = build_structural_blocks(
            date(),
            &profile(),
            Some(&entry),
            &nutrition,
            DayMode::Strategic,
        );

        let siesta = blocks.iter().find(|b| b.label.as_deref() == Some("Siesta"));
        let siesta = siesta.expect("siesta block present");
        assert_eq!(siesta.start, date().and_time(hm(15, 30)).and_utc());
        assert_eq!(siesta.duration_minutes(), 45);
    }

    #[test]
    fn full_rest_adds_light_activity_blocks() {
        let nutrition = NutritionProfile::defaults_for("u1");
        let blocks =
            build_structural_blocks(date(), &profile(), None, &nutrition, DayMode::FullRest);

        let labels = labels(&blocks);
        assert!(labels.contains(&"Light movement"));
        assert!(labels.contains(&"Family time"));
    }

    #[test]
    fn builder_is_deterministic() {
        let nutrition = NutritionProfile::defaults_for("u1");
        let entry = weekly(Some((9, 0, 17, 0)), 20, 30);
        let a = build_structural_blocks(
            date(),
            &profile(),
            Some(&entry),
            &nutrition,
            DayMode::Strategic,
        );
        let b = build_structural_blocks(
            date(),
            &profile(),
            Some(&entry),
            &nutrition,
            DayMode::Strategic,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn cross_midnight_sleep_rolls_to_next_day() {
        let mut p = profile();
        p.wake_time = hm(23, 0);
        p.sleep_time = hm(7, 0);
        let (wake, sleep) = day_window(date(), &p);
        assert!(sleep > wake);
        assert_eq!((sleep - wake).num_minutes(), 8 * 60);
    }
}
