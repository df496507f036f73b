//! Preprocessing: column inference, typing, and monthly aggregation.
//!
//! This module turns an untrusted `RawTable` into a clean monthly series that
//! is safe to chart and forecast.
//!
//! Policy (all of it deliberate, none of it configurable):
//!
//! - **Column inference** picks the first column whose name contains a target
//!   substring ("date" / "sales" / "profit", case-insensitive) in original
//!   column order. First-match tie-break semantics are load-bearing.
//! - **Date parsing** accepts `YYYY-MM-DD` only. Rows whose date fails to
//!   parse are dropped from the working set. This silent row loss is the
//!   documented behavior, not a bug; each drop is recorded with its line
//!   number so the report can say what happened.
//! - **Profit synthesis**: when no profit column exists, profit is assumed to
//!   be exactly 20% of sales per row.
//! - **Aggregation** buckets rows by the month-end of the parsed date,
//!   summing sales and profit, then derives `profit_margin = profit / sales`
//!   per bucket. The output is a regular calendar range: months between the
//!   first and last observation with no rows become explicit zero-sales
//!   buckets. A zero-sales month has an undefined margin (`None`); we never
//!   fabricate a ratio.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;

use crate::domain::{
    month_end_after, month_end_of, month_index, MonthlyRecord, MonthlyTable, RawTable, RowError,
};
use crate::error::{ReportError, Result};

/// Assumed profit share of sales when the data carries no profit column.
///
/// A documented estimation policy, not a fallback error.
pub const ASSUMED_PROFIT_RATIO: f64 = 0.2;

/// Date format accepted by the preprocessor.
const DATE_FMT: &str = "%Y-%m-%d";

/// Infer columns, type rows, and aggregate into the monthly table.
///
/// Errors are all-or-nothing: on `NoDateColumn` / `NoSalesColumn` / `NoData`
/// the caller gets no partial monthly table.
pub fn preprocess(table: &RawTable) -> Result<MonthlyTable> {
    let date_idx = table.find_column("date").ok_or(ReportError::NoDateColumn)?;
    let sales_idx = table.find_column("sales").ok_or(ReportError::NoSalesColumn)?;
    let profit_idx = table.find_column("profit");

    let date_column = table.headers[date_idx].clone();
    let sales_column = table.headers[sales_idx].clone();
    let profit_column = profit_idx.map(|i| table.headers[i].clone());

    let profit_name = profit_column.clone().unwrap_or_default();
    let mut buckets: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    let mut dropped = Vec::new();
    let mut rows_used = 0usize;

    for (idx, _) in table.rows.iter().enumerate() {
        // Header is line 1, so data rows are 1-based from line 2.
        let line = idx + 2;

        let date = match parse_row_date(table, idx, date_idx) {
            Ok(d) => d,
            Err(message) => {
                dropped.push(RowError { line, message });
                continue;
            }
        };

        let sales = match parse_row_number(table, idx, sales_idx, &sales_column) {
            Ok(v) => v,
            Err(message) => {
                dropped.push(RowError { line, message });
                continue;
            }
        };

        let profit = match profit_idx {
            Some(col) => match parse_row_number(table, idx, col, &profit_name) {
                Ok(v) => v,
                Err(message) => {
                    dropped.push(RowError { line, message });
                    continue;
                }
            },
            None => sales * ASSUMED_PROFIT_RATIO,
        };

        rows_used += 1;
        let bucket = buckets.entry(month_end_of(date)).or_insert((0.0, 0.0));
        bucket.0 += sales;
        bucket.1 += profit;
    }

    if rows_used == 0 {
        return Err(ReportError::NoData);
    }

    // Walk the full first..=last month range so calendar gaps materialize as
    // zero-sales buckets; the grouping is over months, not over rows.
    // `rows_used > 0` guarantees the bucket map is non-empty here.
    let first = buckets.keys().next().copied().unwrap_or_default();
    let last = buckets.keys().next_back().copied().unwrap_or_default();
    let span = (month_index(last) - month_index(first)).max(0) as u32;

    let mut records = Vec::with_capacity(span as usize + 1);
    for k in 0..=span {
        let month = month_end_after(first, k);
        let (sales, profit) = buckets.get(&month).copied().unwrap_or((0.0, 0.0));
        records.push(MonthlyRecord {
            month,
            sales,
            profit,
            profit_margin: if sales == 0.0 { None } else { Some(profit / sales) },
        });
    }

    debug!(
        "preprocessed: date='{date_column}' sales='{sales_column}' profit={} | {} rows in, {} used, {} months",
        profit_column.as_deref().unwrap_or("(synthesized 20%)"),
        table.rows.len(),
        rows_used,
        records.len()
    );

    Ok(MonthlyTable {
        records,
        date_column,
        sales_column,
        profit_column,
        rows_read: table.rows.len(),
        rows_used,
        dropped,
    })
}

fn parse_row_date(table: &RawTable, row: usize, col: usize) -> std::result::Result<NaiveDate, String> {
    let raw = table.cell(row, col).unwrap_or("").trim();
    NaiveDate::parse_from_str(raw, DATE_FMT)
        .map_err(|_| format!("Unparseable date '{raw}' (expected YYYY-MM-DD); row dropped."))
}

fn parse_row_number(
    table: &RawTable,
    row: usize,
    col: usize,
    column: &str,
) -> std::result::Result<f64, String> {
    let raw = table.cell(row, col).unwrap_or("").trim();
    // Spreadsheet exports often format numbers with thousands separators.
    let cleaned = raw.replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid numeric value '{raw}' in '{column}'; row dropped.")),
    }
}
