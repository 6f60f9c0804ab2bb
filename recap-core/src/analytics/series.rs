//! Series completion tracking.
//!
//! Progress is collected in two stages: [`collect_series_progress`] gathers the
//! unique episodes watched per show, then [`series_completion`] joins that with
//! episode totals from library metadata.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::ranking::ensure_limit;
use crate::error::Result;
use crate::types::{MediaType, PlayHistoryRecord};

/// Completion progress for one show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeriesCompletionItem {
    pub show: String,
    pub thumb: Option<String>,
    /// Show rating key, or the show title when no key was recorded
    pub series_id: String,
    /// Distinct episodes watched
    pub watched_episodes: u32,
    pub total_episodes: u32,
    /// 0-100
    pub percent_complete: u32,
}

/// Unique episodes watched for one show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesProgress {
    pub series_id: String,
    pub show: String,
    pub thumb: Option<String>,
    pub episodes: HashSet<String>,
}

/// Group episode plays by show, keeping only distinct episodes.
pub fn collect_series_progress(records: &[PlayHistoryRecord]) -> HashMap<String, SeriesProgress> {
    let mut shows: HashMap<String, SeriesProgress> = HashMap::new();

    for record in records
        .iter()
        .filter(|r| r.media_type == MediaType::Episode)
    {
        let series_id = record
            .grandparent_rating_key
            .clone()
            .unwrap_or_else(|| record.show_title().to_string());

        let progress = shows
            .entry(series_id.clone())
            .or_insert_with(|| SeriesProgress {
                series_id,
                show: record.show_title().to_string(),
                thumb: None,
                episodes: HashSet::new(),
            });
        if progress.thumb.is_none() {
            progress.thumb = record.grandparent_thumb.clone();
        }
        progress.episodes.insert(record.rating_key.clone());
    }

    shows
}

/// Join watched episodes with library totals (keyed by series id).
///
/// Shows missing from `totals` are treated as complete. Sorted by watched
/// episodes descending, then show title, then series id.
pub fn series_completion(
    progress: HashMap<String, SeriesProgress>,
    totals: &HashMap<String, u32>,
    limit: usize,
) -> Result<Vec<SeriesCompletionItem>> {
    ensure_limit(limit, "series completion")?;

    let mut items: Vec<SeriesCompletionItem> = progress
        .into_values()
        .map(|p| {
            let watched = p.episodes.len() as u32;
            let total = totals.get(&p.series_id).copied().unwrap_or(watched);
            SeriesCompletionItem {
                percent_complete: percent_complete(watched, total),
                show: p.show,
                thumb: p.thumb,
                series_id: p.series_id,
                watched_episodes: watched,
                total_episodes: total,
            }
        })
        .collect();

    items.sort_by(|a, b| {
        b.watched_episodes
            .cmp(&a.watched_episodes)
            .then_with(|| a.show.cmp(&b.show))
            .then_with(|| a.series_id.cmp(&b.series_id))
    });
    items.truncate(limit);

    Ok(items)
}

/// round(100 * watched / total), clamped to 0-100.
fn percent_complete(watched: u32, total: u32) -> u32 {
    if total == 0 {
        return 100;
    }
    let pct = (watched as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u32
}
