//! # recap-core
//!
//! Core library for recap - a "year in review" statistics engine for media
//! playback history.
//!
//! This library provides:
//! - Domain types for play history records
//! - Pure calculators (rankings, distributions, binges, streaks, marathons,
//!   rewatches, series completion, percentile rank, year-over-year change)
//! - Assembly of per-viewer and server-wide reports
//! - A canonical, validated JSON encoding for those reports
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! The engine performs no I/O. Callers load and filter records, hand the
//! slice to [`analytics::generate_user_stats`] or
//! [`analytics::generate_server_stats`], and store the text produced by
//! [`codec::serialize`] wherever they cache reports.
//!
//! ## Example
//!
//! ```rust,no_run
//! use recap_core::analytics::{generate_user_stats, UserScope, WrappedConfig};
//! use recap_core::codec;
//!
//! let records = Vec::new();
//! let stats = generate_user_stats(&records, &UserScope::new(1, 2024), &WrappedConfig::default())
//!     .expect("valid config");
//! let text = codec::serialize(&stats).expect("serializable");
//! assert_eq!(codec::parse_user_stats(&text).unwrap(), stats);
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{ServerStats, Stats, UserStats, WrappedConfig};
pub use config::Config;
pub use error::{Error, ParseCause, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;
