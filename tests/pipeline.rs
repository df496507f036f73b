//! End-to-end pipeline test: raw CSV in, finished report artifacts out.

use std::io::Write;
use std::path::PathBuf;

use retail_pulse::app::pipeline::run_report;
use retail_pulse::domain::ReportConfig;

fn write_temp(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("retail-pulse-e2e-{}-{name}", std::process::id()));
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    path
}

#[test]
fn csv_to_full_report() {
    // Extra columns with overlapping meanings; the sales column is matched by
    // the "sales" substring (Revenue does not qualify), and the explicit
    // Profit column overrides the 20% rule.
    let csv = "\
OrderDate,Revenue,Sales,Profit
2023-01-05,500,100,30
2023-01-20,500,100,30
2023-02-10,900,220,44
2023-03-15,950,240,60
not-a-date,999,999,999
";
    let input = write_temp("report.csv", csv);
    let monthly_out = std::env::temp_dir().join(format!(
        "retail-pulse-e2e-{}-monthly.csv",
        std::process::id()
    ));
    let report_out =
        std::env::temp_dir().join(format!("retail-pulse-e2e-{}-report.json", std::process::id()));

    let config = ReportConfig {
        input: input.clone(),
        sheet: None,
        horizon: 3,
        export_monthly: Some(monthly_out.clone()),
        export_report: Some(report_out.clone()),
    };

    let run = run_report(&config, |_| {}).unwrap();

    // Column inference.
    assert_eq!(run.monthly.date_column, "OrderDate");
    assert_eq!(run.monthly.sales_column, "Sales");
    assert_eq!(run.monthly.profit_column.as_deref(), Some("Profit"));

    // Row accounting: the bad date row is dropped and recorded.
    assert_eq!(run.monthly.rows_read, 5);
    assert_eq!(run.monthly.rows_used, 4);
    assert_eq!(run.monthly.dropped.len(), 1);
    assert_eq!(run.monthly.dropped[0].line, 6);

    // Three monthly buckets in ascending order, keyed by month end.
    assert_eq!(run.monthly.records.len(), 3);
    assert_eq!(run.monthly.records[0].month.to_string(), "2023-01-31");
    assert_eq!(run.monthly.records[0].sales, 200.0);
    assert_eq!(run.monthly.records[0].profit, 60.0);
    assert_eq!(run.monthly.records[2].month.to_string(), "2023-03-31");

    // Metrics.
    assert_eq!(run.metrics.total_sales, 660.0);
    assert_eq!(run.metrics.total_profit, 164.0);
    let margin = run.metrics.avg_profit_margin.unwrap();
    // Mean of per-month ratios, not total-over-total.
    let expected = (0.3 + 0.2 + 0.25) / 3.0;
    assert!((margin - expected).abs() < 1e-12);

    // Forecast covers every observed month plus the horizon.
    let forecast = run.forecast.as_ref().unwrap();
    assert_eq!(forecast.points.len(), 6);
    assert_eq!(forecast.points[5].ds.to_string(), "2023-06-30");

    // Narrative mentions the headline numbers.
    assert!(run.narrative.contains("$660.00"));
    assert!(run.narrative.contains("$164.00"));

    // Exports exist and parse.
    retail_pulse::io::write_monthly_csv(&monthly_out, &run.monthly).unwrap();
    retail_pulse::io::write_report_json(&report_out, &run.to_report_file(&config)).unwrap();

    let monthly_text = std::fs::read_to_string(&monthly_out).unwrap();
    assert!(monthly_text.lines().count() == 4); // header + 3 months

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_out).unwrap()).unwrap();
    assert_eq!(json["tool"], "retail-pulse");
    assert_eq!(json["monthly"].as_array().unwrap().len(), 3);
    assert_eq!(json["forecast"]["points"].as_array().unwrap().len(), 6);

    std::fs::remove_file(&input).ok();
    std::fs::remove_file(&monthly_out).ok();
    std::fs::remove_file(&report_out).ok();
}

#[test]
fn missing_sales_column_is_an_input_error() {
    let input = write_temp("no-sales.csv", "Date,Qty\n2023-01-05,3\n");
    let config = ReportConfig::new(input.clone());

    let err = run_report(&config, |_| {}).unwrap_err();
    std::fs::remove_file(&input).ok();

    assert_eq!(err.exit_code(), 2);
}
