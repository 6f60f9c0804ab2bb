//! Watch streak detection: the longest run of consecutive UTC days with at
//! least one play.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::time;
use crate::types::PlayHistoryRecord;

/// Longest run of consecutive active days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WatchStreak {
    /// Number of distinct days in the run
    pub longest_streak: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Run ending today or yesterday (only set by [`detect_watch_streak_as_of`])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_streak: Option<u32>,
}

/// Distinct active days, ascending.
fn active_dates(records: &[PlayHistoryRecord]) -> Vec<NaiveDate> {
    records
        .iter()
        .filter_map(|r| time::or_skip(r, time::calendar_date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn is_next_day(prev: NaiveDate, date: NaiveDate) -> bool {
    (date - prev).num_days() == 1
}

/// Longest streak; `None` when there are no plays.
///
/// When two runs have the same length the earlier one wins.
pub fn detect_watch_streak(records: &[PlayHistoryRecord]) -> Option<WatchStreak> {
    let dates = active_dates(records);
    let first = *dates.first()?;

    let mut longest = (1u32, first, first);
    let mut run_len = 1u32;
    let mut run_start = first;

    for pair in dates.windows(2) {
        let (prev, date) = (pair[0], pair[1]);
        if is_next_day(prev, date) {
            run_len += 1;
        } else {
            run_len = 1;
            run_start = date;
        }
        if run_len > longest.0 {
            longest = (run_len, run_start, date);
        }
    }

    Some(WatchStreak {
        longest_streak: longest.0,
        start_date: longest.1,
        end_date: longest.2,
        current_streak: None,
    })
}

/// Longest streak plus the streak still alive on `today`.
///
/// A streak is alive if its last active day is `today` or the day before;
/// otherwise the current streak is 0.
pub fn detect_watch_streak_as_of(
    records: &[PlayHistoryRecord],
    today: NaiveDate,
) -> Option<WatchStreak> {
    let mut streak = detect_watch_streak(records)?;
    let dates = active_dates(records);

    let mut current = 0u32;
    if let Some(&last) = dates.last() {
        let days_ago = (today - last).num_days();
        if days_ago == 0 || days_ago == 1 {
            current = 1;
            for pair in dates.windows(2).rev() {
                if is_next_day(pair[0], pair[1]) {
                    current += 1;
                } else {
                    break;
                }
            }
        }
    }

    streak.current_streak = Some(current);
    Some(streak)
}
