//! Core domain types for recap
//!
//! These types represent the normalized play history that every calculator
//! consumes. Records are supplied by the caller, already filtered to the
//! scope (one account or the whole server) and year being summarized.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Play** | One history entry: a single viewing/listening of one item |
//! | **Rating key** | Stable identity of a media item (movie, episode, track) |
//! | **Grandparent** | The show an episode belongs to (or the artist of a track) |
//! | **Parent** | The season an episode belongs to (or the album of a track) |
//! | **Account** | The viewer who produced the play |

use serde::{Deserialize, Serialize};

// ============================================
// Media Type
// ============================================

/// Kind of media a play refers to.
///
/// Unknown strings decode to [`MediaType::Other`] so a single unexpected
/// record never fails a whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Episode,
    Track,
    #[serde(other)]
    Other,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Episode => "episode",
            MediaType::Track => "track",
            MediaType::Other => "other",
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "episode" => Ok(MediaType::Episode),
            "track" => Ok(MediaType::Track),
            "other" => Ok(MediaType::Other),
            _ => Err(format!("unknown media type: {}", s)),
        }
    }
}

// ============================================
// Play History
// ============================================

/// One normalized playback event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayHistoryRecord {
    /// Unique key of this history entry
    pub history_key: i64,
    /// Identity of the played item
    pub rating_key: String,
    /// Item title (movie title, episode title, track title)
    pub title: String,
    /// Media kind
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// When playback started (Unix seconds, UTC)
    pub viewed_at: i64,
    /// Viewer account
    pub account_id: i64,
    /// Library the item lives in
    pub library_section_id: i64,
    /// Item duration in seconds
    #[serde(default)]
    pub duration: Option<i64>,
    /// Show title for episodes
    #[serde(default)]
    pub grandparent_title: Option<String>,
    /// Show identity for episodes
    #[serde(default)]
    pub grandparent_rating_key: Option<String>,
    /// Season title for episodes
    #[serde(default)]
    pub parent_title: Option<String>,
    /// JSON-encoded array of genre tags, e.g. `["Drama","Crime"]`
    #[serde(default)]
    pub genres: Option<String>,
    /// Release year of the item
    #[serde(default)]
    pub release_year: Option<i32>,
    /// Item artwork path
    #[serde(default)]
    pub thumb: Option<String>,
    /// Show artwork path
    #[serde(default)]
    pub grandparent_thumb: Option<String>,
}

impl PlayHistoryRecord {
    /// Duration in seconds, treating missing or negative values as zero.
    pub fn duration_secs(&self) -> u64 {
        match self.duration {
            Some(secs) if secs > 0 => secs as u64,
            Some(secs) if secs < 0 => {
                tracing::debug!(
                    history_key = self.history_key,
                    duration = secs,
                    "Ignoring negative duration"
                );
                0
            }
            _ => 0,
        }
    }

    /// Show title for grouping, falling back to the item title.
    pub fn show_title(&self) -> &str {
        self.grandparent_title.as_deref().unwrap_or(&self.title)
    }

    /// Decode the embedded genres JSON.
    ///
    /// Malformed JSON, non-array values, and non-string or empty tags are
    /// dropped; the result is empty rather than an error.
    pub fn genre_tags(&self) -> Vec<String> {
        let Some(raw) = self.genres.as_deref() else {
            return Vec::new();
        };

        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(
                    history_key = self.history_key,
                    error = %e,
                    "Skipping malformed genres"
                );
                return Vec::new();
            }
        };

        match value {
            serde_json::Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(tag) if !tag.trim().is_empty() => Some(tag),
                    _ => None,
                })
                .collect(),
            _ => {
                tracing::debug!(
                    history_key = self.history_key,
                    "Skipping non-array genres"
                );
                Vec::new()
            }
        }
    }
}

/// Sum of durations in seconds, missing durations counted as zero.
pub fn total_duration_secs<'a, I>(records: I) -> u64
where
    I: IntoIterator<Item = &'a PlayHistoryRecord>,
{
    records.into_iter().map(|r| r.duration_secs()).sum()
}

/// Convert accumulated seconds to whole minutes (floor).
pub fn secs_to_minutes(secs: u64) -> u64 {
    secs / 60
}
