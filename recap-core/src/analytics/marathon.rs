//! Marathon day: the single UTC day with the most watch time.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::time;
use crate::types::{secs_to_minutes, MediaType, PlayHistoryRecord};

/// Maximum number of items listed for a marathon day.
pub const MARATHON_MAX_ITEMS: usize = 10;

/// The day with the most watch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MarathonDay {
    pub date: NaiveDate,
    pub minutes: u64,
    pub plays: u64,
    /// First items watched that day, chronological
    pub items: Vec<MarathonItem>,
}

/// One play within a marathon day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MarathonItem {
    pub title: String,
    pub grandparent_title: Option<String>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub viewed_at: i64,
}

impl From<&PlayHistoryRecord> for MarathonItem {
    fn from(record: &PlayHistoryRecord) -> Self {
        Self {
            title: record.title.clone(),
            grandparent_title: record.grandparent_title.clone(),
            media_type: record.media_type,
            viewed_at: record.viewed_at,
        }
    }
}

#[derive(Default)]
struct DayTotals<'a> {
    secs: u64,
    plays: u64,
    records: Vec<&'a PlayHistoryRecord>,
}

/// Day with the most accumulated minutes; ties go to the earliest date.
pub fn marathon_day(records: &[PlayHistoryRecord]) -> Option<MarathonDay> {
    let mut days: BTreeMap<NaiveDate, DayTotals<'_>> = BTreeMap::new();

    for record in records {
        let Some(date) = time::or_skip(record, time::calendar_date) else {
            continue;
        };
        let day = days.entry(date).or_default();
        day.secs += record.duration_secs();
        day.plays += 1;
        day.records.push(record);
    }

    let mut best: Option<(NaiveDate, DayTotals<'_>)> = None;
    for (date, totals) in days {
        let better = match &best {
            Some((_, b)) => secs_to_minutes(totals.secs) > secs_to_minutes(b.secs),
            None => true,
        };
        if better {
            best = Some((date, totals));
        }
    }

    let (date, mut totals) = best?;
    // Stable sort keeps input order for plays that started together
    totals.records.sort_by_key(|r| r.viewed_at);

    Some(MarathonDay {
        date,
        minutes: secs_to_minutes(totals.secs),
        plays: totals.plays,
        items: totals
            .records
            .into_iter()
            .take(MARATHON_MAX_ITEMS)
            .map(MarathonItem::from)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::record;

    // 2024-05-10T00:00:00Z
    const MAY_10: i64 = 1_715_299_200;
    const DAY: i64 = 86_400;

    #[test]
    fn test_empty_is_none() {
        assert_eq!(marathon_day(&[]), None);
    }

    #[test]
    fn test_out_of_range_timestamps_are_skipped() {
        let huge = record(1, i64::MAX, Some(36_000));
        assert_eq!(marathon_day(&[huge.clone()]), None);

        let day = marathon_day(&[huge, record(2, MAY_10, Some(600))]).unwrap();
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(day.minutes, 10);
        assert_eq!(day.plays, 1);
    }

    #[test]
    fn test_literal_scenario() {
        let records = vec![
            record(1, MAY_10 + 3600, Some(3600)),
            record(2, MAY_10 + 7200, Some(1800)),
            record(3, MAY_10 + 9000, Some(900)),
        ];
        let day = marathon_day(&records).unwrap();
        assert_eq!(day.minutes, 105);
        assert_eq!(day.plays, 3);
        assert_eq!(day.date.to_string(), "2024-05-10");
    }

    #[test]
    fn test_picks_most_minutes_not_most_plays() {
        let records = vec![
            record(1, MAY_10, Some(600)),
            record(2, MAY_10 + 60, Some(600)),
            record(3, MAY_10 + 120, Some(600)),
            record(4, MAY_10 + DAY, Some(7200)),
        ];
        let day = marathon_day(&records).unwrap();
        assert_eq!(day.plays, 1);
        assert_eq!(day.minutes, 120);
    }

    #[test]
    fn test_tie_goes_to_earliest_date() {
        let records = vec![
            record(1, MAY_10 + 2 * DAY, Some(600)),
            record(2, MAY_10, Some(600)),
        ];
        let day = marathon_day(&records).unwrap();
        assert_eq!(day.date.to_string(), "2024-05-10");
    }

    #[test]
    fn test_items_capped_and_chronological() {
        let records: Vec<_> = (0..15)
            .rev()
            .map(|i| record(i, MAY_10 + i * 600, Some(60)))
            .collect();
        let day = marathon_day(&records).unwrap();
        assert_eq!(day.plays, 15);
        assert_eq!(day.items.len(), MARATHON_MAX_ITEMS);
        assert_eq!(day.items[0].title, "Title 0");
        assert!(day.items.windows(2).all(|w| w[0].viewed_at <= w[1].viewed_at));
    }
}
