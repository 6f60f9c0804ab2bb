//! Calendar, content-type, and decade distributions.
//!
//! Every bucket accumulates seconds and converts to minutes once at the end,
//! so minutes never drift from per-record rounding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::time;
use crate::error::Result;
use crate::types::{secs_to_minutes, MediaType, PlayHistoryRecord};

/// Plays and minutes per month (index 0 = January).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonthlyDistribution {
    pub minutes: [u64; 12],
    pub plays: [u64; 12],
}

/// Plays and minutes per hour of day (UTC).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HourlyDistribution {
    pub minutes: [u64; 24],
    pub plays: [u64; 24],
}

/// Plays and minutes per weekday (index 0 = Sunday).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeekdayDistribution {
    pub minutes: [u64; 7],
    pub plays: [u64; 7],
}

/// Count and minutes for one content type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeBucket {
    pub count: u64,
    pub minutes: u64,
}

/// Plays split by the three known media types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentTypeBreakdown {
    pub movies: TypeBucket,
    pub episodes: TypeBucket,
    pub tracks: TypeBucket,
}

/// Plays of content released in one decade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecadeDistributionItem {
    /// e.g. "1980s"
    pub decade: String,
    pub count: u64,
    pub minutes: u64,
}

/// Index of the bucket with the most plays; ties go to the lowest index.
/// `None` when every bucket is empty.
fn busiest(plays: &[u64]) -> Option<usize> {
    plays
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .fold(None, |best: Option<(usize, u64)>, (i, &count)| match best {
            Some((_, b)) if b >= count => best,
            _ => Some((i, count)),
        })
        .map(|(i, _)| i)
}

impl MonthlyDistribution {
    /// Busiest month (0 = January).
    pub fn busiest_month(&self) -> Option<usize> {
        busiest(&self.plays)
    }
}

impl HourlyDistribution {
    /// Peak hour (0-23).
    pub fn peak_hour(&self) -> Option<usize> {
        busiest(&self.plays)
    }
}

impl WeekdayDistribution {
    /// Busiest day (0 = Sunday).
    pub fn busiest_day(&self) -> Option<usize> {
        busiest(&self.plays)
    }
}

/// Accumulate plays and seconds into `N` buckets chosen by `index`.
fn bucketize<const N: usize>(
    records: &[PlayHistoryRecord],
    index: impl Fn(i64) -> Result<usize>,
) -> ([u64; N], [u64; N]) {
    let mut plays = [0u64; N];
    let mut secs = [0u64; N];

    for record in records {
        let Some(i) = time::or_skip(record, &index) else {
            continue;
        };
        plays[i] += 1;
        secs[i] += record.duration_secs();
    }

    (secs.map(secs_to_minutes), plays)
}

pub fn monthly_distribution(records: &[PlayHistoryRecord]) -> MonthlyDistribution {
    let (minutes, plays) = bucketize::<12>(records, time::month_index);
    MonthlyDistribution { minutes, plays }
}

pub fn hourly_distribution(records: &[PlayHistoryRecord]) -> HourlyDistribution {
    let (minutes, plays) = bucketize::<24>(records, time::hour_index);
    HourlyDistribution { minutes, plays }
}

pub fn weekday_distribution(records: &[PlayHistoryRecord]) -> WeekdayDistribution {
    let (minutes, plays) = bucketize::<7>(records, time::weekday_index);
    WeekdayDistribution { minutes, plays }
}

/// Split plays into movies, episodes, and tracks.
///
/// Records of any other type are counted nowhere.
pub fn content_type_breakdown(records: &[PlayHistoryRecord]) -> ContentTypeBreakdown {
    // (count, seconds) per known type
    let mut totals = [(0u64, 0u64); 3];

    for record in records {
        let slot = match record.media_type {
            MediaType::Movie => 0,
            MediaType::Episode => 1,
            MediaType::Track => 2,
            MediaType::Other => continue,
        };
        totals[slot].0 += 1;
        totals[slot].1 += record.duration_secs();
    }

    let bucket = |(count, secs): (u64, u64)| TypeBucket {
        count,
        minutes: secs_to_minutes(secs),
    };

    ContentTypeBreakdown {
        movies: bucket(totals[0]),
        episodes: bucket(totals[1]),
        tracks: bucket(totals[2]),
    }
}

/// Plays grouped by release decade, ascending. Records without a release year are skipped.
pub fn decade_distribution(records: &[PlayHistoryRecord]) -> Vec<DecadeDistributionItem> {
    let mut decades: BTreeMap<i32, (u64, u64)> = BTreeMap::new();

    for record in records {
        let Some(year) = record.release_year else {
            continue;
        };
        let decade = year.div_euclid(10) * 10;
        let entry = decades.entry(decade).or_default();
        entry.0 += 1;
        entry.1 += record.duration_secs();
    }

    decades
        .into_iter()
        .map(|(decade, (count, secs))| DecadeDistributionItem {
            decade: format!("{}s", decade),
            count,
            minutes: secs_to_minutes(secs),
        })
        .collect()
}
