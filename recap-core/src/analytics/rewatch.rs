//! Rewatch detection: items played two or more times.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ranking::ensure_limit;
use crate::error::Result;
use crate::types::{MediaType, PlayHistoryRecord};

/// Default number of rewatched items to report.
pub const DEFAULT_REWATCH_LIMIT: usize = 10;

/// An item that was played more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RewatchItem {
    pub title: String,
    pub thumb: Option<String>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Total plays of this item (at least 2)
    pub rewatch_count: u64,
}

/// Items with two or more plays, most-played first.
///
/// Title, thumb, and type come from the earliest play of each item. Items
/// sharing a title are ordered by rating key.
pub fn detect_rewatches(records: &[PlayHistoryRecord], limit: usize) -> Result<Vec<RewatchItem>> {
    ensure_limit(limit, "rewatch")?;

    let mut groups: HashMap<&str, (&PlayHistoryRecord, u64)> = HashMap::new();
    for record in records {
        groups
            .entry(record.rating_key.as_str())
            .and_modify(|(first, count)| {
                *count += 1;
                if record.viewed_at < first.viewed_at {
                    *first = record;
                }
            })
            .or_insert((record, 1));
    }

    let mut ranked: Vec<(&str, RewatchItem)> = groups
        .into_iter()
        .filter(|(_, (_, count))| *count >= 2)
        .map(|(key, (first, count))| {
            let item = RewatchItem {
                title: first.title.clone(),
                thumb: first.thumb.clone(),
                media_type: first.media_type,
                rewatch_count: count,
            };
            (key, item)
        })
        .collect();

    ranked.sort_by(|(a_key, a), (b_key, b)| {
        b.rewatch_count
            .cmp(&a.rewatch_count)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a_key.cmp(b_key))
    });

    let items = ranked
        .into_iter()
        .take(limit)
        .map(|(_, item)| item)
        .collect();

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{episode, movie};

    #[test]
    fn test_single_plays_do_not_qualify() {
        let records = vec![movie(1, "Heat", 0), movie(2, "Alien", 0)];
        assert!(detect_rewatches(&records, DEFAULT_REWATCH_LIMIT)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_counts_and_order() {
        let records = vec![
            movie(1, "Heat", 0),
            movie(2, "Heat", 10),
            movie(3, "Alien", 0),
            movie(4, "Alien", 10),
            movie(5, "Alien", 20),
            episode(6, "The Wire", "e1", 0),
            episode(7, "The Wire", "e1", 10),
        ];
        let items = detect_rewatches(&records, DEFAULT_REWATCH_LIMIT).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "Alien");
        assert_eq!(items[0].rewatch_count, 3);
        // Two-play ties are ordered by title
        assert_eq!(items[1].title, "Heat");
        assert_eq!(items[2].media_type, MediaType::Episode);
        assert!(items.iter().all(|i| i.rewatch_count >= 2));
    }

    #[test]
    fn test_representative_is_earliest_play() {
        let mut later = movie(1, "Heat", 100);
        later.title = "Heat (Director's Cut)".to_string();
        let earlier = movie(2, "Heat", 5);
        let items = detect_rewatches(&[later, earlier], 10).unwrap();
        assert_eq!(items[0].title, "Heat");
    }

    #[test]
    fn test_same_title_ties_ordered_by_rating_key() {
        let records: Vec<PlayHistoryRecord> = ["p6", "p2", "p4", "p1", "p5", "p3"]
            .iter()
            .enumerate()
            .flat_map(|(i, key)| {
                let i = i as i64 * 2;
                [episode(i, "Show", key, i * 100), episode(i + 1, "Show", key, i * 100 + 50)]
            })
            .map(|mut r| {
                r.title = "Pilot".to_string();
                r.thumb = Some(format!("/thumb/{}", r.rating_key));
                r
            })
            .collect();

        for _ in 0..20 {
            let top = detect_rewatches(&records, 1).unwrap();
            assert_eq!(top[0].thumb.as_deref(), Some("/thumb/p1"));
        }

        let thumbs: Vec<String> = detect_rewatches(&records, 10)
            .unwrap()
            .into_iter()
            .filter_map(|i| i.thumb)
            .collect();
        assert_eq!(
            thumbs,
            ["p1", "p2", "p3", "p4", "p5", "p6"].map(|k| format!("/thumb/{}", k))
        );
    }

    #[test]
    fn test_limit() {
        let records = vec![
            movie(1, "A", 0),
            movie(2, "A", 0),
            movie(3, "B", 0),
            movie(4, "B", 0),
        ];
        assert_eq!(detect_rewatches(&records, 1).unwrap().len(), 1);
        assert!(detect_rewatches(&records, 0).unwrap_err().is_configuration());
    }
}
