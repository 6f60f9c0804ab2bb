//! recap-wrapped - Year in Review CLI
//!
//! Generate a "wrapped"-style summary of media play history for one viewer or
//! for the whole server.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::Parser;
use recap_core::analytics::{
    generate_server_stats, generate_user_stats, minutes_by_account, time, watch_time,
    ContentTypeBreakdown, DecadeDistributionItem, HourlyDistribution, MarathonDay,
    MonthlyDistribution, RankedItem, ServerScope, ServerStats, UserScope, UserStats,
    WeekdayDistribution, YearComparison,
};
use recap_core::format::{day_name, duration_display, hour_display, month_name, plural, short_date};
use recap_core::{codec, Config, PlayHistoryRecord, Stats};

#[derive(Parser, Debug)]
#[command(name = "recap-wrapped")]
#[command(about = "Recap Wrapped - Your Year in Review")]
#[command(version)]
struct Args {
    /// JSON file containing an array of play history records
    #[arg(long, required_unless_present = "validate")]
    records: Option<PathBuf>,

    /// Year to generate wrapped for (default: current year)
    #[arg(long)]
    year: Option<i32>,

    /// Account id to summarize (default: the whole server)
    #[arg(long)]
    user: Option<i64>,

    /// JSON object mapping series ids to total episode counts
    #[arg(long)]
    episode_totals: Option<PathBuf>,

    /// JSON object mapping account ids to display names
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Export format (md = markdown, json = canonical JSON)
    #[arg(long)]
    export: Option<String>,

    /// Validate a stored stats payload instead of generating one
    #[arg(long, conflicts_with = "records")]
    validate: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = recap_core::logging::init(&config.logging).ok();

    if let Some(path) = &args.validate {
        return validate_payload(path);
    }

    let records_path = args
        .records
        .as_deref()
        .context("--records is required")?;
    let records = load_records(records_path)?;

    let today = Utc::now().date_naive();
    let year = args.year.unwrap_or_else(|| today.year());
    let previous_year = year
        .checked_sub(1)
        .with_context(|| format!("year {} is out of range", year))?;
    let this_year = filter_year(&records, year)?;
    let last_year = filter_year(&records, previous_year)?;

    tracing::info!(
        year,
        records = records.len(),
        in_year = this_year.len(),
        "Loaded play history"
    );

    let stats: Stats = match args.user {
        Some(user_id) => {
            let own: Vec<PlayHistoryRecord> = this_year
                .iter()
                .filter(|r| r.account_id == user_id)
                .cloned()
                .collect();
            let own_last_year: Vec<PlayHistoryRecord> = last_year
                .into_iter()
                .filter(|r| r.account_id == user_id)
                .collect();

            let scope = UserScope {
                cohort_minutes: minutes_by_account(&this_year).into_values().collect(),
                last_year_minutes: watch_time(&own_last_year).total_minutes,
                episode_totals: match &args.episode_totals {
                    Some(path) => load_episode_totals(path)?,
                    None => HashMap::new(),
                },
                as_of: (year == today.year()).then_some(today),
                ..UserScope::new(user_id, year)
            };
            generate_user_stats(&own, &scope, &config.wrapped)
                .context("failed to generate user stats")?
                .into()
        }
        None => {
            let scope = ServerScope {
                last_year_minutes: watch_time(&last_year).total_minutes,
                account_names: match &args.accounts {
                    Some(path) => load_account_names(path)?,
                    None => HashMap::new(),
                },
                ..ServerScope::new(year)
            };
            generate_server_stats(&this_year, &scope, &config.wrapped)
                .context("failed to generate server stats")?
                .into()
        }
    };

    match args.export.as_deref() {
        Some("json") => println!("{}", codec::serialize(&stats)?),
        Some("md") => print_markdown(&stats),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&stats),
    }

    Ok(())
}

// ============================================
// Input
// ============================================

fn load_records(path: &Path) -> Result<Vec<PlayHistoryRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read records file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse records file {}", path.display()))
}

fn load_episode_totals(path: &Path) -> Result<HashMap<String, u32>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read episode totals {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse episode totals {}", path.display()))
}

fn load_account_names(path: &Path) -> Result<HashMap<i64, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read accounts {}", path.display()))?;
    let raw: HashMap<String, String> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse accounts {}", path.display()))?;

    raw.into_iter()
        .map(|(id, name)| -> Result<(i64, String)> {
            let id: i64 = id
                .parse()
                .with_context(|| format!("invalid account id '{}'", id))?;
            Ok((id, name))
        })
        .collect()
}

fn filter_year(records: &[PlayHistoryRecord], year: i32) -> Result<Vec<PlayHistoryRecord>> {
    let mut kept = Vec::new();
    for record in records {
        if time::in_year(record.viewed_at, year)? {
            kept.push(record.clone());
        }
    }
    Ok(kept)
}

fn validate_payload(path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read payload {}", path.display()))?;
    let stats = codec::parse_stats(&content)
        .with_context(|| format!("invalid stats payload {}", path.display()))?;
    println!(
        "valid {} stats for {} ({})",
        stats.kind(),
        stats.year(),
        duration_display(stats.total_minutes())
    );
    Ok(())
}

// ============================================
// Terminal output
// ============================================

fn print_terminal(stats: &Stats) {
    let title = match stats {
        Stats::User(s) => format!("YOUR {} WRAPPED", s.year),
        Stats::Server(s) => format!("SERVER WRAPPED {}", s.year),
    };

    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    match stats {
        Stats::User(s) => print_user_terminal(s),
        Stats::Server(s) => print_server_terminal(s),
    }
}

fn print_user_terminal(stats: &UserStats) {
    if stats.total_plays == 0 {
        println!("  No plays found for this year.");
        println!();
        return;
    }

    println!("THE NUMBERS");
    println!(
        "   Plays:    {:<12} Watch time: {}",
        stats.total_plays,
        duration_display(stats.total_minutes)
    );
    println!(
        "   You watched more than {:.0}% of viewers",
        stats.percentile_rank
    );
    print_comparison_terminal(stats.year_comparison.as_ref());
    println!();

    print_ranked_terminal("TOP MOVIES", &stats.top_movies);
    print_ranked_terminal("TOP SHOWS", &stats.top_shows);
    print_ranked_terminal("TOP GENRES", &stats.top_genres);
    print_patterns_terminal(
        &stats.monthly_distribution,
        &stats.hourly_distribution,
        &stats.weekday_distribution,
        stats.marathon_day.as_ref(),
    );

    if let Some(binge) = &stats.longest_binge {
        println!("LONGEST BINGE");
        println!(
            "   {} in {}",
            plural(binge.plays, "play"),
            duration_display(binge.total_minutes)
        );
        println!();
    }

    if let Some(streak) = &stats.watch_streak {
        println!("STREAKS");
        println!(
            "   Longest:  {} ({} - {})",
            plural(streak.longest_streak as u64, "day"),
            short_date(streak.start_date),
            short_date(streak.end_date)
        );
        if let Some(current) = streak.current_streak {
            println!("   Current:  {}", plural(current as u64, "day"));
        }
        println!();
    }

    if !stats.rewatches.is_empty() {
        println!("REWATCHED");
        for item in stats.rewatches.iter().take(5) {
            println!("   {} - {} times", item.title, item.rewatch_count);
        }
        println!();
    }

    if !stats.series_completion.is_empty() {
        println!("SERIES PROGRESS");
        for item in stats.series_completion.iter().take(5) {
            println!(
                "   {:<30} {:>4}/{:<4} {:>3}%",
                item.show, item.watched_episodes, item.total_episodes, item.percent_complete
            );
        }
        println!();
    }

    print_content_terminal(&stats.content_types, &stats.decade_distribution);
}

fn print_server_terminal(stats: &ServerStats) {
    if stats.total_plays == 0 {
        println!("  No plays found for this year.");
        println!();
        return;
    }

    println!("THE NUMBERS");
    println!(
        "   Plays:    {:<12} Watch time: {}",
        stats.total_plays,
        duration_display(stats.total_minutes)
    );
    println!("   Viewers:  {}", stats.total_users);
    print_comparison_terminal(stats.year_comparison.as_ref());
    println!();

    print_ranked_terminal("TOP VIEWERS", &stats.top_viewers);
    print_ranked_terminal("TOP MOVIES", &stats.top_movies);
    print_ranked_terminal("TOP SHOWS", &stats.top_shows);
    print_ranked_terminal("TOP GENRES", &stats.top_genres);
    print_patterns_terminal(
        &stats.monthly_distribution,
        &stats.hourly_distribution,
        &stats.weekday_distribution,
        stats.marathon_day.as_ref(),
    );
    print_content_terminal(&stats.content_types, &stats.decade_distribution);
}

fn print_comparison_terminal(comparison: Option<&YearComparison>) {
    if let Some(c) = comparison {
        println!(
            "   vs last year: {} ({} -> {})",
            c.format_delta(),
            duration_display(c.last_year),
            duration_display(c.this_year)
        );
    }
}

fn print_ranked_terminal(heading: &str, items: &[RankedItem]) {
    if items.is_empty() {
        return;
    }
    println!("{}", heading);
    for item in items.iter().take(5) {
        println!("   {:>2}. {:<36} {:>6}", item.rank, item.title, item.count);
    }
    println!();
}

fn print_patterns_terminal(
    monthly: &MonthlyDistribution,
    hourly: &HourlyDistribution,
    weekday: &WeekdayDistribution,
    marathon: Option<&MarathonDay>,
) {
    println!("TIME PATTERNS");
    if let Some(month) = monthly.busiest_month() {
        println!("   Busiest month: {}", month_name(month));
    }
    if let Some(hour) = hourly.peak_hour() {
        println!("   Peak hour:     {}", hour_display(hour));
    }
    if let Some(day) = weekday.busiest_day() {
        println!("   Busiest day:   {}", day_name(day));
    }
    if let Some(day) = marathon {
        println!(
            "   Marathon:      {} - {} across {}",
            short_date(day.date),
            duration_display(day.minutes),
            plural(day.plays, "play")
        );
    }
    println!();
}

fn print_content_terminal(types: &ContentTypeBreakdown, decades: &[DecadeDistributionItem]) {
    println!("CONTENT");
    println!(
        "   Movies: {}  │  Episodes: {}  │  Tracks: {}",
        types.movies.count, types.episodes.count, types.tracks.count
    );
    if let Some(top) = decades.iter().max_by_key(|d| d.count) {
        println!("   Favorite decade: {}", top.decade);
    }
    println!();
}

// ============================================
// Markdown output
// ============================================

fn print_markdown(stats: &Stats) {
    match stats {
        Stats::User(s) => {
            println!("# {} Wrapped", s.year);
            println!();
            if s.total_plays == 0 {
                println!("*No plays found for this year.*");
                return;
            }
            println!("## Summary");
            println!();
            println!("| Metric | Value |");
            println!("|--------|-------|");
            println!("| Plays | {} |", s.total_plays);
            println!("| Watch Time | {} |", duration_display(s.total_minutes));
            println!("| Percentile | {:.1} |", s.percentile_rank);
            if let Some(c) = &s.year_comparison {
                println!("| vs Last Year | {} |", c.format_delta());
            }
            if let Some(streak) = &s.watch_streak {
                println!(
                    "| Longest Streak | {} |",
                    plural(streak.longest_streak as u64, "day")
                );
            }
            println!();
            print_ranked_markdown("Top Movies", &s.top_movies);
            print_ranked_markdown("Top Shows", &s.top_shows);
            print_ranked_markdown("Top Genres", &s.top_genres);
        }
        Stats::Server(s) => {
            println!("# Server Wrapped {}", s.year);
            println!();
            if s.total_plays == 0 {
                println!("*No plays found for this year.*");
                return;
            }
            println!("## Summary");
            println!();
            println!("| Metric | Value |");
            println!("|--------|-------|");
            println!("| Plays | {} |", s.total_plays);
            println!("| Watch Time | {} |", duration_display(s.total_minutes));
            println!("| Viewers | {} |", s.total_users);
            if let Some(c) = &s.year_comparison {
                println!("| vs Last Year | {} |", c.format_delta());
            }
            println!();
            print_ranked_markdown("Top Viewers", &s.top_viewers);
            print_ranked_markdown("Top Movies", &s.top_movies);
            print_ranked_markdown("Top Shows", &s.top_shows);
            print_ranked_markdown("Top Genres", &s.top_genres);
        }
    }

    println!("---");
    println!("*Generated by recap-wrapped*");
}

fn print_ranked_markdown(heading: &str, items: &[RankedItem]) {
    if items.is_empty() {
        return;
    }
    println!("## {}", heading);
    println!();
    for item in items {
        println!("{}. **{}** - {}", item.rank, item.title, plural(item.count, "play"));
    }
    println!();
}
