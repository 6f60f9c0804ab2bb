//! Year-over-year watch time comparison.

use serde::{Deserialize, Serialize};

/// Watch minutes this year against last year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct YearComparison {
    pub this_year: u64,
    pub last_year: u64,
    /// Rounded to one decimal place
    pub percent_change: f64,
}

impl YearComparison {
    /// Format the change for display (e.g. "+23.5%" or "-15%").
    pub fn format_delta(&self) -> String {
        // -0.0 would otherwise print as "+-0%"
        let change = if self.percent_change == 0.0 {
            0.0
        } else {
            self.percent_change
        };
        if change >= 0.0 {
            format!("+{}%", change)
        } else {
            format!("{}%", change)
        }
    }
}

/// Compare two minute totals.
///
/// Returns `None` when both years are empty. Growth from an empty last year
/// is reported as 100%.
pub fn year_comparison(this_year: u64, last_year: u64) -> Option<YearComparison> {
    if this_year == 0 && last_year == 0 {
        return None;
    }

    let percent_change = if last_year == 0 {
        100.0
    } else {
        let raw = (this_year as f64 - last_year as f64) / last_year as f64 * 100.0;
        let rounded = (raw * 10.0).round() / 10.0;
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    };

    Some(YearComparison {
        this_year,
        last_year,
        percent_change,
    })
}
