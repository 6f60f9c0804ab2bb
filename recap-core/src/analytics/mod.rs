//! Analytics module for recap
//!
//! Pure calculators over a slice of [`PlayHistoryRecord`](crate::PlayHistoryRecord)s:
//! - Watch time totals and top-N rankings
//! - Monthly, hourly, weekday, content-type, and decade distributions
//! - Binge sessions, watch streaks, and marathon days
//! - Rewatches and series completion
//! - Percentile rank and year-over-year comparison
//! - Wrapped (year in review) assembly
//!
//! Every calculator is a free function with no shared state. Calendar math is
//! UTC-only (see [`time`]).

pub mod binge;
pub mod comparison;
pub mod distribution;
pub mod marathon;
pub mod percentile;
pub mod ranking;
pub mod rewatch;
pub mod series;
pub mod streak;
pub mod time;
pub mod wrapped;

pub use binge::{detect_all_binge_sessions, detect_longest_binge, BingeSession, BINGE_GAP_SECS};
pub use comparison::{year_comparison, YearComparison};
pub use distribution::{
    content_type_breakdown, decade_distribution, hourly_distribution, monthly_distribution,
    weekday_distribution, ContentTypeBreakdown, DecadeDistributionItem, HourlyDistribution,
    MonthlyDistribution, TypeBucket, WeekdayDistribution,
};
pub use marathon::{marathon_day, MarathonDay, MarathonItem, MARATHON_MAX_ITEMS};
pub use percentile::percentile_rank;
pub use ranking::{top_genres, top_movies, top_shows, top_viewers, watch_time, RankedItem, WatchTime};
pub use rewatch::{detect_rewatches, RewatchItem, DEFAULT_REWATCH_LIMIT};
pub use series::{collect_series_progress, series_completion, SeriesCompletionItem, SeriesProgress};
pub use streak::{detect_watch_streak, detect_watch_streak_as_of, WatchStreak};
pub use wrapped::{
    generate_server_stats, generate_user_stats, minutes_by_account, ServerScope, ServerStats,
    Stats, UserScope, UserStats, WrappedConfig,
};
