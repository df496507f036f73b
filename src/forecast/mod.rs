//! Sales forecasting over the monthly series.
//!
//! Contract: fit an additive model capturing trend (and seasonality when the
//! history supports it) on monthly sales, then predict every historical month
//! plus a fixed number of future month-ends. The forecast is a convenience
//! projection, not a statement about model internals.
//!
//! Selection:
//! - the pure trend model is always fitted
//! - the seasonal model joins the candidate set once at least two full
//!   yearly cycles are observed (month effects are unidentifiable below that)
//! - the winner is the candidate with the lowest BIC
//!
//! Degenerate input (fewer than 2 observations) is a `ForecastUnavailable`
//! condition the presenter must handle, never a panic.

use chrono::Datelike;
use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::domain::{
    month_end_after, month_index, ForecastPoint, ForecastQuality, MonthlyRecord, SalesForecast,
    TrendModel, TrendModelKind,
};
use crate::error::{ReportError, Result};

pub mod model;

pub use model::{fill_design_row, predict};

/// Minimum history length (months) before the seasonal model is considered.
const SEASONAL_MIN_MONTHS: usize = 24;

/// Guard against `ln(0)` when a model fits the history exactly.
const SSE_FLOOR: f64 = 1e-12;

/// Fit the forecast model and project `horizon` months past the last
/// observation.
///
/// The returned points cover every historical month plus the horizon, in
/// date order, so `points.len() == records.len() + horizon`.
pub fn build_forecast(records: &[MonthlyRecord], horizon: usize) -> Result<SalesForecast> {
    let n = records.len();
    if n < 2 {
        return Err(ReportError::ForecastUnavailable(format!(
            "the model needs at least 2 monthly observations, got {n}"
        )));
    }

    let base = month_index(records[0].month);
    let offsets: Vec<f64> = records
        .iter()
        .map(|r| (month_index(r.month) - base) as f64)
        .collect();
    let months: Vec<u32> = records.iter().map(|r| r.month.month()).collect();
    let y: Vec<f64> = records.iter().map(|r| r.sales).collect();

    let mut candidates = vec![TrendModelKind::Trend];
    if n >= SEASONAL_MIN_MONTHS {
        candidates.push(TrendModelKind::Seasonal);
    }

    let mut best: Option<TrendModel> = None;
    for kind in candidates {
        match fit_kind(kind, &offsets, &months, &y) {
            Some(fit) => {
                let better = best
                    .as_ref()
                    .map(|b| fit.quality.bic < b.quality.bic)
                    .unwrap_or(true);
                if better {
                    best = Some(fit);
                }
            }
            None => {
                debug!("forecast candidate {} failed to solve", kind.display_name());
            }
        }
    }

    let model = best.ok_or_else(|| {
        ReportError::ForecastUnavailable("the trend regression could not be solved".to_string())
    })?;

    debug!(
        "forecast model: {} (rmse={:.3}, bic={:.3})",
        model.kind.display_name(),
        model.quality.rmse,
        model.quality.bic
    );

    let last = records[n - 1].month;
    let mut points = Vec::with_capacity(n + horizon);
    for (i, r) in records.iter().enumerate() {
        points.push(ForecastPoint {
            ds: r.month,
            yhat: predict(model.kind, offsets[i], months[i], &model.betas),
        });
    }
    for k in 1..=horizon {
        let ds = month_end_after(last, k as u32);
        let t = (month_index(ds) - base) as f64;
        points.push(ForecastPoint {
            ds,
            yhat: predict(model.kind, t, ds.month(), &model.betas),
        });
    }

    Ok(SalesForecast {
        points,
        model,
        horizon,
    })
}

fn fit_kind(kind: TrendModelKind, offsets: &[f64], months: &[u32], y: &[f64]) -> Option<TrendModel> {
    let n = y.len();
    let p = kind.beta_len();

    let mut design = DMatrix::zeros(n, p);
    let mut row = vec![0.0; p];
    for i in 0..n {
        fill_design_row(kind, offsets[i], months[i], &mut row);
        for (j, v) in row.iter().enumerate() {
            design[(i, j)] = *v;
        }
    }
    let target = DVector::from_row_slice(y);

    let beta = crate::math::solve_least_squares(&design, &target)?;
    let betas: Vec<f64> = beta.iter().copied().collect();

    let mut sse = 0.0;
    for i in 0..n {
        let resid = y[i] - predict(kind, offsets[i], months[i], &betas);
        sse += resid * resid;
    }
    if !sse.is_finite() {
        return None;
    }

    let nf = n as f64;
    let rmse = (sse / nf).sqrt();
    let bic = nf * (sse / nf).max(SSE_FLOOR).ln() + p as f64 * nf.ln();

    Some(TrendModel {
        kind,
        betas,
        quality: ForecastQuality { sse, rmse, bic, n },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::month_end_of;

    fn monthly(from_y: i32, from_m: u32, sales: &[f64]) -> Vec<MonthlyRecord> {
        let start = NaiveDate::from_ymd_opt(from_y, from_m, 1).unwrap();
        sales
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let month = month_end_of(
                    start
                        .checked_add_months(chrono::Months::new(i as u32))
                        .unwrap(),
                );
                MonthlyRecord {
                    month,
                    sales: s,
                    profit: s * 0.2,
                    profit_margin: Some(0.2),
                }
            })
            .collect()
    }

    #[test]
    fn forecast_length_is_history_plus_horizon() {
        let records = monthly(2023, 1, &[100.0, 110.0, 120.0, 130.0]);
        let forecast = build_forecast(&records, 3).unwrap();
        assert_eq!(forecast.points.len(), 7);
        assert_eq!(forecast.horizon, 3);
    }

    #[test]
    fn single_point_input_is_forecast_unavailable() {
        let records = monthly(2023, 1, &[100.0]);
        let err = build_forecast(&records, 3).unwrap_err();
        assert!(matches!(err, ReportError::ForecastUnavailable(_)));
    }

    #[test]
    fn empty_input_is_forecast_unavailable() {
        let err = build_forecast(&[], 3).unwrap_err();
        assert!(matches!(err, ReportError::ForecastUnavailable(_)));
    }

    #[test]
    fn linear_history_extrapolates_the_line() {
        // y = 100 + 10t
        let sales: Vec<f64> = (0..6).map(|t| 100.0 + 10.0 * t as f64).collect();
        let records = monthly(2023, 1, &sales);
        let forecast = build_forecast(&records, 3).unwrap();

        assert_eq!(forecast.model.kind, TrendModelKind::Trend);
        // Future months continue the line: t = 6, 7, 8.
        let future = &forecast.points[6..];
        for (k, point) in future.iter().enumerate() {
            let expected = 100.0 + 10.0 * (6 + k) as f64;
            assert!(
                (point.yhat - expected).abs() < 1e-6,
                "t={k}: {} vs {expected}",
                point.yhat
            );
        }
        // Future dates are consecutive month-ends.
        assert_eq!(future[0].ds, NaiveDate::from_ymd_opt(2023, 7, 31).unwrap());
        assert_eq!(future[2].ds, NaiveDate::from_ymd_opt(2023, 9, 30).unwrap());
    }

    #[test]
    fn seasonal_model_wins_on_long_seasonal_history() {
        // Three years of trending sales with a December spike.
        let sales: Vec<f64> = (0..36)
            .map(|t| {
                let month = (t % 12) + 1;
                let spike = if month == 12 { 50.0 } else { 0.0 };
                200.0 + 2.0 * t as f64 + spike
            })
            .collect();
        let records = monthly(2021, 1, &sales);
        let forecast = build_forecast(&records, 3).unwrap();

        assert_eq!(forecast.model.kind, TrendModelKind::Seasonal);
        assert_eq!(forecast.points.len(), 39);

        // The history ends in December 2023; the first projected December is
        // 12 months out, so check the in-sample December fit instead picks up
        // the spike relative to November.
        let december = &forecast.points[35];
        let november = &forecast.points[34];
        assert!(december.yhat - november.yhat > 40.0);
    }

    #[test]
    fn zero_filled_months_count_as_observations() {
        // The preprocessor materializes empty calendar months as zero-sales
        // records; those zeros must pull the fitted trend down like any
        // other observation.
        let records = vec![
            MonthlyRecord {
                month: NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
                sales: 100.0,
                profit: 20.0,
                profit_margin: Some(0.2),
            },
            MonthlyRecord {
                month: NaiveDate::from_ymd_opt(2023, 2, 28).unwrap(),
                sales: 0.0,
                profit: 0.0,
                profit_margin: None,
            },
            MonthlyRecord {
                month: NaiveDate::from_ymd_opt(2023, 3, 31).unwrap(),
                sales: 140.0,
                profit: 28.0,
                profit_margin: Some(0.2),
            },
        ];
        let forecast = build_forecast(&records, 3).unwrap();
        assert_eq!(forecast.points.len(), 6);

        // OLS through (0,100), (1,0), (2,140) is y = 60 + 20t, so April
        // projects to 120; ignoring the zero month would give 160.
        let april = &forecast.points[3];
        assert_eq!(april.ds, NaiveDate::from_ymd_opt(2023, 4, 30).unwrap());
        assert!((april.yhat - 120.0).abs() < 1e-6, "{}", april.yhat);
    }
}
