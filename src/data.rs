use chrono::NaiveDate;
use serde::Deserialize;

/// Scalar metrics for the dashboard header. The feed regenerates this
/// wholesale; we never merge, only replace.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub avg_monthly_return: f64,
    pub total_managed: f64,
    pub accounts_in_profit: u32,
    pub total_accounts: u32,
    pub win_rate: f64,
    pub risk_score: f64,
    pub consistency_score: f64,
}

/// One observation day of the cumulative growth series.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GrowthPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonthlyReturn {
    pub month: String,
    #[serde(rename = "return")]
    pub pct: f64,
}

/// Everything one load cycle produces.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub summary: DashboardSummary,
    pub growth: Vec<GrowthPoint>,
    pub monthly: Vec<MonthlyReturn>,
}

/// Trailing window applied to the growth chart. Session-only UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectedPeriod {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
    All,
}

impl SelectedPeriod {
    /// Window length in days, `None` for the unbounded view.
    pub fn days(self) -> Option<usize> {
        match self {
            SelectedPeriod::Week => Some(7),
            SelectedPeriod::Month => Some(30),
            SelectedPeriod::Quarter => Some(90),
            SelectedPeriod::Year => Some(365),
            SelectedPeriod::All => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SelectedPeriod::Week => "7D",
            SelectedPeriod::Month => "30D",
            SelectedPeriod::Quarter => "90D",
            SelectedPeriod::Year => "1Y",
            SelectedPeriod::All => "ALL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "7" | "7d" | "week" => Some(SelectedPeriod::Week),
            "30" | "30d" | "month" => Some(SelectedPeriod::Month),
            "90" | "90d" | "quarter" => Some(SelectedPeriod::Quarter),
            "365" | "1y" | "year" => Some(SelectedPeriod::Year),
            "all" => Some(SelectedPeriod::All),
            _ => None,
        }
    }
}

/// Returns the trailing slice of `series` covered by `period`: the most
/// recent `min(N, len)` entries for a numeric window, the whole series for
/// `All`. The series is expected to be in ascending date order.
pub fn trailing_window(series: &[GrowthPoint], period: SelectedPeriod) -> &[GrowthPoint] {
    match period.days() {
        Some(days) => {
            let start = series.len().saturating_sub(days);
            &series[start..]
        }
        None => series,
    }
}

/// Short axis label, e.g. "Jan 5".
pub fn short_date_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}
