//! Watch time totals and top-N rankings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{secs_to_minutes, total_duration_secs, MediaType, PlayHistoryRecord};

/// Total watch time for a set of plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchTime {
    /// floor(sum of durations / 60)
    pub total_minutes: u64,
    /// Number of plays
    pub total_plays: u64,
}

/// One entry of a top-N list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RankedItem {
    /// 1-based, contiguous
    pub rank: u32,
    pub title: String,
    pub count: u64,
    pub thumb: Option<String>,
}

/// Reject a zero limit before any work is done.
pub(crate) fn ensure_limit(limit: usize, what: &str) -> Result<()> {
    if limit == 0 {
        return Err(Error::configuration(format!(
            "{} limit must be at least 1",
            what
        )));
    }
    Ok(())
}

/// Total minutes and play count.
pub fn watch_time(records: &[PlayHistoryRecord]) -> WatchTime {
    WatchTime {
        total_minutes: secs_to_minutes(total_duration_secs(records)),
        total_plays: records.len() as u64,
    }
}

#[derive(Default)]
struct Group {
    count: u64,
    thumb: Option<String>,
}

impl Group {
    fn add(&mut self, thumb: Option<&String>) {
        self.count += 1;
        if self.thumb.is_none() {
            self.thumb = thumb.cloned();
        }
    }
}

/// Sort by count descending, then key ascending; assign ranks and truncate.
fn rank_groups(groups: HashMap<String, Group>, limit: usize) -> Vec<RankedItem> {
    let mut entries: Vec<(String, Group)> = groups.into_iter().collect();
    entries.sort_by(|(a_key, a), (b_key, b)| b.count.cmp(&a.count).then_with(|| a_key.cmp(b_key)));

    entries
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (title, group))| RankedItem {
            rank: i as u32 + 1,
            title,
            count: group.count,
            thumb: group.thumb,
        })
        .collect()
}

/// Most-played movies, grouped by title.
pub fn top_movies(records: &[PlayHistoryRecord], limit: usize) -> Result<Vec<RankedItem>> {
    ensure_limit(limit, "top movies")?;

    let mut groups: HashMap<String, Group> = HashMap::new();
    for record in records.iter().filter(|r| r.media_type == MediaType::Movie) {
        groups
            .entry(record.title.clone())
            .or_default()
            .add(record.thumb.as_ref());
    }

    Ok(rank_groups(groups, limit))
}

/// Most-played shows, grouped by show title (episode title as fallback).
pub fn top_shows(records: &[PlayHistoryRecord], limit: usize) -> Result<Vec<RankedItem>> {
    ensure_limit(limit, "top shows")?;

    let mut groups: HashMap<String, Group> = HashMap::new();
    for record in records
        .iter()
        .filter(|r| r.media_type == MediaType::Episode)
    {
        let thumb = record.grandparent_thumb.as_ref().or(record.thumb.as_ref());
        groups
            .entry(record.show_title().to_string())
            .or_default()
            .add(thumb);
    }

    Ok(rank_groups(groups, limit))
}

/// Most-played genres. A play counts once for each of its tags.
pub fn top_genres(records: &[PlayHistoryRecord], limit: usize) -> Result<Vec<RankedItem>> {
    ensure_limit(limit, "top genres")?;

    let mut groups: HashMap<String, Group> = HashMap::new();
    for record in records {
        for tag in record.genre_tags() {
            groups.entry(tag).or_default().add(None);
        }
    }

    Ok(rank_groups(groups, limit))
}

/// Accounts with the most plays.
///
/// `names` maps account ids to display names; unknown accounts are listed by id.
pub fn top_viewers(
    records: &[PlayHistoryRecord],
    names: &HashMap<i64, String>,
    limit: usize,
) -> Result<Vec<RankedItem>> {
    ensure_limit(limit, "top viewers")?;

    let mut groups: HashMap<String, Group> = HashMap::new();
    for record in records {
        let name = names
            .get(&record.account_id)
            .cloned()
            .unwrap_or_else(|| record.account_id.to_string());
        groups.entry(name).or_default().add(None);
    }

    Ok(rank_groups(groups, limit))
}
