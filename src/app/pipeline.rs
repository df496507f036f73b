//! Shared report pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> preprocess -> metrics + forecast -> narrative
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use log::{debug, warn};

use crate::domain::{
    MetricsSummary, MonthlyTable, ReportConfig, ReportFile, SalesForecast, Stage,
};
use crate::error::{ReportError, Result};

/// All computed outputs of a single report run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub monthly: MonthlyTable,
    pub metrics: MetricsSummary,
    /// `None` when fitting failed for a degenerate series; the reason is in
    /// `forecast_note` and the presenter shows a placeholder instead of the
    /// forecast chart.
    pub forecast: Option<SalesForecast>,
    pub forecast_note: Option<String>,
    pub narrative: String,
}

impl RunOutput {
    /// Snapshot of the run for the JSON export.
    pub fn to_report_file(&self, config: &ReportConfig) -> ReportFile {
        ReportFile {
            tool: "retail-pulse".to_string(),
            source: config.input.clone(),
            metrics: self.metrics.clone(),
            monthly: self.monthly.records.clone(),
            forecast: self.forecast.clone(),
        }
    }
}

/// Execute the full report pipeline.
///
/// `progress` is called at each fixed checkpoint; the percentages are
/// cosmetic stage markers, not a measure of remaining work. All stage
/// errors propagate except `ForecastUnavailable`, which degrades to a
/// report without a forecast.
pub fn run_report(config: &ReportConfig, mut progress: impl FnMut(Stage)) -> Result<RunOutput> {
    progress(Stage::Loading);
    let raw = crate::io::load_table(&config.input, config.sheet.as_deref())?;

    let monthly = crate::prep::preprocess(&raw)?;

    progress(Stage::Metrics);
    let metrics = crate::metrics::calculate_metrics(&monthly.records);

    progress(Stage::Forecast);
    let (forecast, forecast_note) =
        match crate::forecast::build_forecast(&monthly.records, config.horizon) {
            Ok(f) => (Some(f), None),
            Err(ReportError::ForecastUnavailable(reason)) => {
                warn!("forecast unavailable: {reason}");
                (None, Some(reason))
            }
            Err(e) => return Err(e),
        };

    progress(Stage::Charts);
    let narrative = crate::report::format_narrative(&metrics, config.horizon);

    debug!(
        "report ready: {} months, forecast={}",
        monthly.records.len(),
        forecast.is_some()
    );

    Ok(RunOutput {
        monthly,
        metrics,
        forecast,
        forecast_note,
        narrative,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_csv(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "retail-pulse-{}-{name}",
            std::process::id()
        ));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn degenerate_series_degrades_to_report_without_forecast() {
        let path = write_csv(
            "one-month.csv",
            "Date,Sales\n2023-01-05,100\n2023-01-20,50\n",
        );
        let config = ReportConfig::new(path.clone());

        let run = run_report(&config, |_| {}).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(run.forecast.is_none());
        assert!(run.forecast_note.is_some());
        assert_eq!(run.metrics.total_sales, 150.0);
        assert!(run.narrative.contains("$150.00"));
    }

    #[test]
    fn progress_checkpoints_fire_in_stage_order() {
        let path = write_csv(
            "stages.csv",
            "Date,Sales\n2023-01-05,100\n2023-02-05,110\n2023-03-05,120\n",
        );
        let config = ReportConfig::new(path.clone());

        let mut seen = Vec::new();
        run_report(&config, |stage| seen.push(stage.percent())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(seen, vec![20, 50, 75, 100]);
    }

    #[test]
    fn schema_errors_propagate_unchanged() {
        let path = write_csv("no-date.csv", "Region,Sales\neast,100\n");
        let config = ReportConfig::new(path.clone());

        let err = run_report(&config, |_| {}).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, ReportError::NoDateColumn));
    }
}
