//! Wrapped - Year in Review
//!
//! Assembles every calculator into one immutable statistics value, either for a
//! single viewer ([`UserStats`]) or for the whole server ([`ServerStats`]).

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::binge::{detect_longest_binge, BingeSession};
use super::comparison::{year_comparison, YearComparison};
use super::distribution::{
    content_type_breakdown, decade_distribution, hourly_distribution, monthly_distribution,
    weekday_distribution, ContentTypeBreakdown, DecadeDistributionItem, HourlyDistribution,
    MonthlyDistribution, WeekdayDistribution,
};
use super::marathon::{marathon_day, MarathonDay};
use super::percentile::percentile_rank;
use super::ranking::{
    ensure_limit, top_genres, top_movies, top_shows, top_viewers, watch_time, RankedItem,
};
use super::rewatch::{detect_rewatches, RewatchItem, DEFAULT_REWATCH_LIMIT};
use super::series::{collect_series_progress, series_completion, SeriesCompletionItem};
use super::streak::{detect_watch_streak, detect_watch_streak_as_of, WatchStreak};
use super::time;
use crate::error::Result;
use crate::types::PlayHistoryRecord;

/// Configuration for wrapped generation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WrappedConfig {
    /// Number of top movies to include
    #[serde(default = "default_top_count")]
    pub top_movies_count: usize,
    /// Number of top shows to include
    #[serde(default = "default_top_count")]
    pub top_shows_count: usize,
    /// Number of top genres to include
    #[serde(default = "default_top_count")]
    pub top_genres_count: usize,
    /// Number of top viewers to include (server scope)
    #[serde(default = "default_top_count")]
    pub top_viewers_count: usize,
    /// Number of rewatched items to include
    #[serde(default = "default_rewatch_count")]
    pub rewatch_count: usize,
    /// Number of shows in the series completion list
    #[serde(default = "default_top_count")]
    pub series_count: usize,
}

fn default_top_count() -> usize {
    10
}

fn default_rewatch_count() -> usize {
    DEFAULT_REWATCH_LIMIT
}

impl Default for WrappedConfig {
    fn default() -> Self {
        Self {
            top_movies_count: default_top_count(),
            top_shows_count: default_top_count(),
            top_genres_count: default_top_count(),
            top_viewers_count: default_top_count(),
            rewatch_count: default_rewatch_count(),
            series_count: default_top_count(),
        }
    }
}

impl WrappedConfig {
    /// Reject any zero limit.
    pub fn validate(&self) -> Result<()> {
        ensure_limit(self.top_movies_count, "top movies")?;
        ensure_limit(self.top_shows_count, "top shows")?;
        ensure_limit(self.top_genres_count, "top genres")?;
        ensure_limit(self.top_viewers_count, "top viewers")?;
        ensure_limit(self.rewatch_count, "rewatch")?;
        ensure_limit(self.series_count, "series completion")?;
        Ok(())
    }
}

/// Inputs beyond the record slice needed for a single viewer's report.
#[derive(Debug, Clone, Default)]
pub struct UserScope {
    pub user_id: i64,
    pub year: i32,
    /// Total minutes of every viewer in the cohort, used for percentile rank
    pub cohort_minutes: Vec<u64>,
    /// The viewer's total minutes for the previous year
    pub last_year_minutes: u64,
    /// Episode counts per series id, from library metadata
    pub episode_totals: HashMap<String, u32>,
    /// Reference date for the current streak; `None` leaves it unset
    pub as_of: Option<NaiveDate>,
}

impl UserScope {
    pub fn new(user_id: i64, year: i32) -> Self {
        Self {
            user_id,
            year,
            ..Default::default()
        }
    }
}

/// Inputs beyond the record slice needed for a server-wide report.
#[derive(Debug, Clone, Default)]
pub struct ServerScope {
    pub year: i32,
    /// Server total minutes for the previous year
    pub last_year_minutes: u64,
    /// Display names per account id
    pub account_names: HashMap<i64, String>,
}

impl ServerScope {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Default::default()
        }
    }
}

/// Year in review for one viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserStats {
    pub user_id: i64,
    pub year: i32,
    pub total_minutes: u64,
    pub total_plays: u64,
    pub top_movies: Vec<RankedItem>,
    pub top_shows: Vec<RankedItem>,
    pub top_genres: Vec<RankedItem>,
    pub monthly_distribution: MonthlyDistribution,
    pub hourly_distribution: HourlyDistribution,
    pub weekday_distribution: WeekdayDistribution,
    pub content_types: ContentTypeBreakdown,
    pub decade_distribution: Vec<DecadeDistributionItem>,
    pub longest_binge: Option<BingeSession>,
    pub watch_streak: Option<WatchStreak>,
    pub marathon_day: Option<MarathonDay>,
    pub rewatches: Vec<RewatchItem>,
    pub series_completion: Vec<SeriesCompletionItem>,
    /// Share of the cohort with strictly less watch time, 0-100
    pub percentile_rank: f64,
    pub year_comparison: Option<YearComparison>,
}

/// Year in review for the whole server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerStats {
    pub year: i32,
    /// Distinct accounts with at least one play
    pub total_users: u64,
    pub total_minutes: u64,
    pub total_plays: u64,
    pub top_movies: Vec<RankedItem>,
    pub top_shows: Vec<RankedItem>,
    pub top_genres: Vec<RankedItem>,
    pub top_viewers: Vec<RankedItem>,
    pub monthly_distribution: MonthlyDistribution,
    pub hourly_distribution: HourlyDistribution,
    pub weekday_distribution: WeekdayDistribution,
    pub content_types: ContentTypeBreakdown,
    pub decade_distribution: Vec<DecadeDistributionItem>,
    pub longest_binge: Option<BingeSession>,
    pub marathon_day: Option<MarathonDay>,
    pub rewatches: Vec<RewatchItem>,
    pub year_comparison: Option<YearComparison>,
}

/// Either kind of report.
///
/// The variant is fixed at construction and survives serialization: user
/// payloads always carry `userId`, server payloads always carry `totalUsers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Stats {
    User(UserStats),
    Server(ServerStats),
}

impl Stats {
    pub fn year(&self) -> i32 {
        match self {
            Stats::User(s) => s.year,
            Stats::Server(s) => s.year,
        }
    }

    pub fn total_minutes(&self) -> u64 {
        match self {
            Stats::User(s) => s.total_minutes,
            Stats::Server(s) => s.total_minutes,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Stats::User(_) => "user",
            Stats::Server(_) => "server",
        }
    }
}

impl From<UserStats> for Stats {
    fn from(stats: UserStats) -> Self {
        Stats::User(stats)
    }
}

impl From<ServerStats> for Stats {
    fn from(stats: ServerStats) -> Self {
        Stats::Server(stats)
    }
}

fn log_out_of_year(records: &[PlayHistoryRecord], year: i32) -> Result<()> {
    let (start, end) = time::year_bounds(year)?;
    let outside = records
        .iter()
        .filter(|r| r.viewed_at < start || r.viewed_at > end)
        .count();
    if outside > 0 {
        tracing::debug!(year, outside, "Records outside the report year");
    }
    Ok(())
}

/// Generate the year in review for one viewer.
///
/// `records` must already be filtered to the viewer and year.
pub fn generate_user_stats(
    records: &[PlayHistoryRecord],
    scope: &UserScope,
    config: &WrappedConfig,
) -> Result<UserStats> {
    config.validate()?;
    log_out_of_year(records, scope.year)?;

    let totals = watch_time(records);
    let watch_streak = match scope.as_of {
        Some(today) => detect_watch_streak_as_of(records, today),
        None => detect_watch_streak(records),
    };
    let series = series_completion(
        collect_series_progress(records),
        &scope.episode_totals,
        config.series_count,
    )?;

    let stats = UserStats {
        user_id: scope.user_id,
        year: scope.year,
        total_minutes: totals.total_minutes,
        total_plays: totals.total_plays,
        top_movies: top_movies(records, config.top_movies_count)?,
        top_shows: top_shows(records, config.top_shows_count)?,
        top_genres: top_genres(records, config.top_genres_count)?,
        monthly_distribution: monthly_distribution(records),
        hourly_distribution: hourly_distribution(records),
        weekday_distribution: weekday_distribution(records),
        content_types: content_type_breakdown(records),
        decade_distribution: decade_distribution(records),
        longest_binge: detect_longest_binge(records),
        watch_streak,
        marathon_day: marathon_day(records),
        rewatches: detect_rewatches(records, config.rewatch_count)?,
        series_completion: series,
        percentile_rank: percentile_rank(totals.total_minutes, &scope.cohort_minutes),
        year_comparison: year_comparison(totals.total_minutes, scope.last_year_minutes),
    };

    tracing::info!(
        user_id = stats.user_id,
        year = stats.year,
        plays = stats.total_plays,
        minutes = stats.total_minutes,
        "Generated user stats"
    );

    Ok(stats)
}

/// Generate the year in review for the whole server.
///
/// `records` must already be filtered to the year.
pub fn generate_server_stats(
    records: &[PlayHistoryRecord],
    scope: &ServerScope,
    config: &WrappedConfig,
) -> Result<ServerStats> {
    config.validate()?;
    log_out_of_year(records, scope.year)?;

    let totals = watch_time(records);
    let total_users = records
        .iter()
        .map(|r| r.account_id)
        .collect::<HashSet<_>>()
        .len() as u64;

    let stats = ServerStats {
        year: scope.year,
        total_users,
        total_minutes: totals.total_minutes,
        total_plays: totals.total_plays,
        top_movies: top_movies(records, config.top_movies_count)?,
        top_shows: top_shows(records, config.top_shows_count)?,
        top_genres: top_genres(records, config.top_genres_count)?,
        top_viewers: top_viewers(records, &scope.account_names, config.top_viewers_count)?,
        monthly_distribution: monthly_distribution(records),
        hourly_distribution: hourly_distribution(records),
        weekday_distribution: weekday_distribution(records),
        content_types: content_type_breakdown(records),
        decade_distribution: decade_distribution(records),
        longest_binge: detect_longest_binge(records),
        marathon_day: marathon_day(records),
        rewatches: detect_rewatches(records, config.rewatch_count)?,
        year_comparison: year_comparison(totals.total_minutes, scope.last_year_minutes),
    };

    tracing::info!(
        year = stats.year,
        users = stats.total_users,
        plays = stats.total_plays,
        minutes = stats.total_minutes,
        "Generated server stats"
    );

    Ok(stats)
}

/// Total minutes per account, for building a percentile cohort.
pub fn minutes_by_account(records: &[PlayHistoryRecord]) -> HashMap<i64, u64> {
    let mut secs: HashMap<i64, u64> = HashMap::new();
    for record in records {
        *secs.entry(record.account_id).or_default() += record.duration_secs();
    }
    secs.into_iter()
        .map(|(account, s)| (account, crate::types::secs_to_minutes(s)))
        .collect()
}
