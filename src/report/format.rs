//! Narrative and table formatting for the generated report.

use crate::domain::{MetricsSummary, MonthlyTable, SalesForecast};

/// The narrative paragraph shown above the charts, interpolating the three
/// report scalars and the forecast horizon.
pub fn format_narrative(metrics: &MetricsSummary, horizon: usize) -> String {
    format!(
        "This report analyzes your retail business performance based on the uploaded data. \
         The total sales amount to ${}, with a total profit of ${}, \
         resulting in an average profit margin of {}. \
         The sales forecast graph predicts future sales trends for the next {horizon} months, \
         while the profit trends graph shows historical profit and profit margin changes over time.",
        fmt_money(metrics.total_sales),
        fmt_money(metrics.total_profit),
        fmt_percent(metrics.avg_profit_margin),
    )
}

/// Generic description shown when no monthly table could be produced.
pub fn format_fallback_narrative() -> String {
    "This report provides an analysis of your retail business performance, \
     including key sales and profit metrics, sales forecasts, and profit trends. \
     Upload your retail data file in CSV or Excel format with date, sales, and profit columns \
     (profit is optional and assumed as 20% of sales if missing)."
        .to_string()
}

/// Placeholder shown in place of the forecast chart when fitting failed.
pub fn format_forecast_placeholder(reason: &str) -> String {
    format!("Sales forecast unavailable: {reason}")
}

/// Format the full text report (resolution metadata + metrics + tables).
pub fn format_run_summary(
    monthly: &MonthlyTable,
    metrics: &MetricsSummary,
    forecast: Option<&SalesForecast>,
) -> String {
    let mut out = String::new();

    out.push_str("=== pulse - Retail Performance Report ===\n");
    out.push_str(&format!("Date column  : {}\n", monthly.date_column));
    out.push_str(&format!("Sales column : {}\n", monthly.sales_column));
    out.push_str(&format!(
        "Profit column: {}\n",
        monthly
            .profit_column
            .as_deref()
            .unwrap_or("(none - assumed 20% of sales)")
    ));
    out.push_str(&format!(
        "Rows: {} read | {} used | {} dropped\n",
        monthly.rows_read,
        monthly.rows_used,
        monthly.dropped.len()
    ));

    out.push_str("\nKey performance metrics:\n");
    out.push_str(&format!("- Total sales         : ${}\n", fmt_money(metrics.total_sales)));
    out.push_str(&format!("- Total profit        : ${}\n", fmt_money(metrics.total_profit)));
    out.push_str(&format!(
        "- Avg profit margin   : {}\n",
        fmt_percent(metrics.avg_profit_margin)
    ));

    out.push_str("\nMonthly breakdown:\n");
    out.push_str(&format!(
        "{:<12} {:>14} {:>14} {:>10}\n",
        "month", "sales", "profit", "margin"
    ));
    for r in &monthly.records {
        out.push_str(&format!(
            "{:<12} {:>14} {:>14} {:>10}\n",
            r.month.to_string(),
            fmt_money(r.sales),
            fmt_money(r.profit),
            fmt_percent(r.profit_margin),
        ));
    }

    match forecast {
        Some(f) => {
            out.push_str(&format!(
                "\nSales forecast ({}, next {} months):\n",
                f.model.kind.display_name(),
                f.horizon
            ));
            out.push_str(&format!("{:<12} {:>14}\n", "month", "forecast"));
            let future_from = f.points.len().saturating_sub(f.horizon);
            for (i, p) in f.points.iter().enumerate() {
                let marker = if i >= future_from { " *" } else { "" };
                out.push_str(&format!(
                    "{:<12} {:>14}{marker}\n",
                    p.ds.to_string(),
                    fmt_money(p.yhat)
                ));
            }
            out.push_str("(* projected)\n");
        }
        None => {
            out.push('\n');
            out.push_str("Sales forecast unavailable for this dataset.\n");
        }
    }

    if !monthly.dropped.is_empty() {
        out.push_str("\nDropped rows:\n");
        for d in &monthly.dropped {
            out.push_str(&format!("- line {}: {}\n", d.line, d.message));
        }
    }

    out
}

/// Format a dollar amount with thousands separators and two decimals.
pub fn fmt_money(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let raw = format!("{:.2}", value.abs());
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((&raw, "00"));

    let mut grouped = String::new();
    for (idx, ch) in int_part.chars().rev().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let grouped: String = grouped.chars().rev().collect();
    format!("{sign}{grouped}.{frac_part}")
}

/// Format a profit margin as a percentage; `None` renders as "n/a".
pub fn fmt_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        _ => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MonthlyRecord, MonthlyTable};
    use chrono::NaiveDate;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(fmt_money(0.0), "0.00");
        assert_eq!(fmt_money(1234.5), "1,234.50");
        assert_eq!(fmt_money(1_234_567.891), "1,234,567.89");
        assert_eq!(fmt_money(-9876.0), "-9,876.00");
    }

    #[test]
    fn percent_handles_undefined() {
        assert_eq!(fmt_percent(Some(0.25)), "25.00%");
        assert_eq!(fmt_percent(None), "n/a");
        assert_eq!(fmt_percent(Some(f64::NAN)), "n/a");
    }

    #[test]
    fn narrative_interpolates_all_three_scalars() {
        let metrics = MetricsSummary {
            total_sales: 400.0,
            total_profit: 110.0,
            avg_profit_margin: Some(0.25),
        };
        let text = format_narrative(&metrics, 3);
        assert!(text.contains("$400.00"));
        assert!(text.contains("$110.00"));
        assert!(text.contains("25.00%"));
        assert!(text.contains("next 3 months"));
    }

    #[test]
    fn run_summary_mentions_synthesized_profit() {
        let monthly = MonthlyTable {
            records: vec![MonthlyRecord {
                month: NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
                sales: 100.0,
                profit: 20.0,
                profit_margin: Some(0.2),
            }],
            date_column: "OrderDate".to_string(),
            sales_column: "Sales".to_string(),
            profit_column: None,
            rows_read: 1,
            rows_used: 1,
            dropped: vec![],
        };
        let metrics = MetricsSummary {
            total_sales: 100.0,
            total_profit: 20.0,
            avg_profit_margin: Some(0.2),
        };
        let text = format_run_summary(&monthly, &metrics, None);
        assert!(text.contains("assumed 20% of sales"));
        assert!(text.contains("Sales forecast unavailable"));
        assert!(text.contains("OrderDate"));
    }
}
