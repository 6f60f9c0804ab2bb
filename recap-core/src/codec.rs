//! Canonical encoding of stats payloads.
//!
//! The compact JSON produced by [`serialize`] is the durable cache payload, so
//! its field names and shapes are stable. Every decoder validates shape (no
//! unknown fields, fixed-length distribution arrays) and value invariants, and
//! `parse_*(serialize(x)) == x` for every valid `x`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::analytics::wrapped::{ServerStats, Stats, UserStats};
use crate::analytics::{
    BingeSession, MarathonDay, RankedItem, RewatchItem, SeriesCompletionItem, MARATHON_MAX_ITEMS,
};
use crate::error::{Error, ParseCause, Result};
use crate::types::PlayHistoryRecord;

const USER_TARGET: &str = "user stats";
const SERVER_TARGET: &str = "server stats";
const STATS_TARGET: &str = "stats";

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::UserStats {}
    impl Sealed for super::ServerStats {}
    impl Sealed for super::Stats {}
}

/// A value with a canonical wire encoding.
pub trait Payload: Serialize + sealed::Sealed {}

impl Payload for UserStats {}
impl Payload for ServerStats {}
impl Payload for Stats {}

/// Encode a stats value as canonical compact JSON.
pub fn serialize<P: Payload>(stats: &P) -> Result<String> {
    Ok(serde_json::to_string(stats)?)
}

/// Decode and validate a single-viewer payload.
pub fn parse_user_stats(text: &str) -> Result<UserStats> {
    let value = parse_value(text, USER_TARGET)?;
    user_from_value(value, USER_TARGET)
}

/// Decode and validate a server-wide payload.
pub fn parse_server_stats(text: &str) -> Result<ServerStats> {
    let value = parse_value(text, SERVER_TARGET)?;
    server_from_value(value, SERVER_TARGET)
}

/// Decode either payload, choosing the variant by its discriminant field.
///
/// `userId` selects [`Stats::User`], otherwise `totalUsers` selects
/// [`Stats::Server`]. Non-objects and objects with neither field are rejected.
pub fn parse_stats(text: &str) -> Result<Stats> {
    let value = parse_value(text, STATS_TARGET)?;

    let object = match &value {
        Value::Object(map) => map,
        other => {
            return Err(Error::parse(
                STATS_TARGET,
                ParseCause::NotAnObject(json_kind(other)),
            ))
        }
    };

    if object.contains_key("userId") {
        user_from_value(value, STATS_TARGET).map(Stats::User)
    } else if object.contains_key("totalUsers") {
        server_from_value(value, STATS_TARGET).map(Stats::Server)
    } else {
        Err(Error::parse(STATS_TARGET, ParseCause::MissingDiscriminant))
    }
}

/// Stable fingerprint for caching a report outside the engine.
///
/// Covers the scope label, the year, and the history keys of the input plus
/// the fields that feed the calculators, so any new or edited play changes it.
pub fn cache_key(scope: &str, year: i32, records: &[PlayHistoryRecord]) -> Result<String> {
    let mut sorted: Vec<&PlayHistoryRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.history_key);

    let mut hasher = Sha256::new();
    hasher.update(scope.as_bytes());
    hasher.update([0u8]);
    hasher.update(year.to_le_bytes());
    for record in sorted {
        hasher.update(serde_json::to_vec(record)?);
        hasher.update([b'\n']);
    }

    Ok(hex::encode(hasher.finalize()))
}

fn parse_value(text: &str, target: &'static str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| Error::parse(target, ParseCause::Syntax(e)))
}

fn from_value<T: DeserializeOwned>(value: Value, target: &'static str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::parse(target, ParseCause::Shape(e)))
}

fn user_from_value(value: Value, target: &'static str) -> Result<UserStats> {
    let stats: UserStats = from_value(value, target)?;
    validate_user(&stats).map_err(|msg| Error::parse(target, ParseCause::Invariant(msg)))?;
    Ok(stats)
}

fn server_from_value(value: Value, target: &'static str) -> Result<ServerStats> {
    let stats: ServerStats = from_value(value, target)?;
    validate_server(&stats).map_err(|msg| Error::parse(target, ParseCause::Invariant(msg)))?;
    Ok(stats)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================
// Invariants
// ============================================

type Check = std::result::Result<(), String>;

fn check_ranked(field: &str, items: &[RankedItem]) -> Check {
    for (i, item) in items.iter().enumerate() {
        if item.rank as usize != i + 1 {
            return Err(format!(
                "{}[{}] has rank {}, expected {}",
                field,
                i,
                item.rank,
                i + 1
            ));
        }
    }
    Ok(())
}

fn check_binge(binge: Option<&BingeSession>) -> Check {
    match binge {
        Some(b) if b.end_time < b.start_time => {
            Err("longestBinge ends before it starts".to_string())
        }
        Some(b) if b.plays == 0 => Err("longestBinge has no plays".to_string()),
        _ => Ok(()),
    }
}

fn check_marathon(day: Option<&MarathonDay>) -> Check {
    match day {
        Some(d) if d.items.len() > MARATHON_MAX_ITEMS => Err(format!(
            "marathonDay lists {} items, at most {} allowed",
            d.items.len(),
            MARATHON_MAX_ITEMS
        )),
        _ => Ok(()),
    }
}

fn check_rewatches(items: &[RewatchItem]) -> Check {
    match items.iter().find(|i| i.rewatch_count < 2) {
        Some(item) => Err(format!(
            "rewatch '{}' has count {}, expected at least 2",
            item.title, item.rewatch_count
        )),
        None => Ok(()),
    }
}

fn check_series(items: &[SeriesCompletionItem]) -> Check {
    match items.iter().find(|i| i.percent_complete > 100) {
        Some(item) => Err(format!(
            "series '{}' is {}% complete",
            item.show, item.percent_complete
        )),
        None => Ok(()),
    }
}

fn check_percentile(value: f64) -> Check {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("percentileRank {} is outside 0-100", value))
    }
}

fn validate_user(stats: &UserStats) -> Check {
    check_ranked("topMovies", &stats.top_movies)?;
    check_ranked("topShows", &stats.top_shows)?;
    check_ranked("topGenres", &stats.top_genres)?;
    check_binge(stats.longest_binge.as_ref())?;
    check_marathon(stats.marathon_day.as_ref())?;
    check_rewatches(&stats.rewatches)?;
    check_series(&stats.series_completion)?;
    check_percentile(stats.percentile_rank)?;
    if let Some(streak) = &stats.watch_streak {
        if streak.longest_streak == 0 || streak.end_date < streak.start_date {
            return Err("watchStreak is empty or reversed".to_string());
        }
    }
    Ok(())
}

fn validate_server(stats: &ServerStats) -> Check {
    check_ranked("topMovies", &stats.top_movies)?;
    check_ranked("topShows", &stats.top_shows)?;
    check_ranked("topGenres", &stats.top_genres)?;
    check_ranked("topViewers", &stats.top_viewers)?;
    check_binge(stats.longest_binge.as_ref())?;
    check_marathon(stats.marathon_day.as_ref())?;
    check_rewatches(&stats.rewatches)?;
    Ok(())
}
