//! Percentile rank within a cohort.

/// Share of the cohort strictly below `value`, as 0-100.
///
/// Ties do not count as "below": the cohort maximum of `n` members scores
/// `(n - 1) / n * 100`, never 100. An empty cohort scores 0.
pub fn percentile_rank(value: u64, cohort: &[u64]) -> f64 {
    if cohort.is_empty() {
        return 0.0;
    }
    let below = cohort.iter().filter(|&&c| c < value).count();
    below as f64 / cohort.len() as f64 * 100.0
}
