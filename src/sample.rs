use chrono::{Days, Local};
use rand::Rng;

use crate::data::{Dashboard, DashboardSummary, GrowthPoint, MonthlyReturn};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Sample dataset shown when the real feed is unavailable. Shape is
/// deterministic (180 daily points ending today, 12 monthly entries), the
/// series content is randomly generated each call.
pub fn sample_dashboard() -> Dashboard {
    Dashboard {
        summary: sample_summary(),
        growth: sample_growth(),
        monthly: sample_monthly(),
    }
}

fn sample_summary() -> DashboardSummary {
    DashboardSummary {
        avg_monthly_return: 5.8,
        total_managed: 152_430.0,
        accounts_in_profit: 12,
        total_accounts: 13,
        win_rate: 84.5,
        risk_score: 92.0,
        consistency_score: 94.7,
    }
}

/// Multiplicative random walk with slight upward drift: daily change is
/// uniform in [-0.675%, +0.825%].
fn sample_growth() -> Vec<GrowthPoint> {
    let mut rng = rand::thread_rng();
    let today = Local::now().date_naive();
    let mut value = 10_000.0_f64;

    (0..180u64)
        .rev()
        .map(|days_ago| {
            let change = (rng.gen::<f64>() - 0.45) * 0.015;
            value *= 1.0 + change;
            GrowthPoint {
                date: today.checked_sub_days(Days::new(days_ago)).unwrap_or(today),
                value: value.round(),
            }
        })
        .collect()
}

fn sample_monthly() -> Vec<MonthlyReturn> {
    let mut rng = rand::thread_rng();
    MONTH_LABELS
        .iter()
        .map(|month| MonthlyReturn {
            month: month.to_string(),
            pct: (rng.gen_range(3.5f64..7.5) * 10.0).round() / 10.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_walk_has_180_ascending_days_ending_today() {
        let growth = sample_growth();
        assert_eq!(growth.len(), 180);
        assert!(growth.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(growth.last().unwrap().date, Local::now().date_naive());
        assert!(growth.iter().all(|p| p.value > 0.0));
    }

    #[test]
    fn monthly_returns_cover_a_year_within_bounds() {
        let monthly = sample_monthly();
        assert_eq!(monthly.len(), 12);
        assert_eq!(monthly[0].month, "Jan");
        assert!(monthly.iter().all(|m| (3.5..=7.5).contains(&m.pct)));
    }

    #[test]
    fn sample_summary_matches_the_demo_account() {
        let summary = sample_summary();
        assert_eq!(summary.total_managed, 152_430.0);
        assert_eq!(summary.accounts_in_profit, 12);
        assert!(summary.accounts_in_profit <= summary.total_accounts);
    }
}
