//! FRED `fredgraph.csv` download and normalization.
//!
//! The endpoint returns two columns — a date and a value — with a header row
//! we discard. FRED's convention for "no data" is a `.` cell; such rows are
//! expected missingness, not an error, and are dropped silently.

use chrono::NaiveDate;
use reqwest::blocking::Client;

use crate::domain::SeriesTable;
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://fred.stlouisfed.org/graph/fredgraph.csv";

/// Environment override for the download endpoint (useful for mirrors and
/// integration tests against a local server).
const BASE_URL_ENV: &str = "FREDGRAPH_BASE_URL";

pub struct FredGraphClient {
    client: Client,
    base_url: String,
}

impl FredGraphClient {
    /// Build a client using the default endpoint, honoring `.env` and the
    /// `FREDGRAPH_BASE_URL` override.
    pub fn new() -> Self {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Download and normalize one series.
    ///
    /// The returned table is sorted ascending by date, has unique dates, and
    /// contains no missing values.
    pub fn fetch_series(&self, series_id: &str) -> Result<SeriesTable, AppError> {
        let series_id = series_id.trim();
        if series_id.is_empty() {
            return Err(AppError::invalid("Series id must not be empty."));
        }

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("id", series_id)])
            .send()
            .map_err(|e| AppError::runtime(format!("Request for series {series_id} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "Request for series {series_id} failed with status {}.",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::runtime(format!("Failed to read response for {series_id}: {e}")))?;

        parse_fredgraph_csv(series_id, &body)
    }
}

impl Default for FredGraphClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse fredgraph CSV text into a normalized series.
///
/// Rows whose value cell does not parse as a finite number are dropped; a
/// date cell that does not parse is a malformed response and fails the fetch.
pub fn parse_fredgraph_csv(series_id: &str, body: &str) -> Result<SeriesTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut rows: Vec<(NaiveDate, f64)> = Vec::new();
    for result in reader.records() {
        let record = result
            .map_err(|e| AppError::runtime(format!("Malformed CSV for {series_id}: {e}")))?;

        let Some(date_cell) = record.get(0).map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };

        let value = match record.get(1).and_then(parse_value) {
            Some(v) => v,
            None => continue,
        };

        let date = NaiveDate::parse_from_str(date_cell, "%Y-%m-%d").map_err(|e| {
            AppError::runtime(format!("Invalid date '{date_cell}' for {series_id}: {e}"))
        })?;

        rows.push((date, value));
    }

    let table = SeriesTable::from_raw(series_id, rows);
    if table.is_empty() {
        return Err(AppError::no_data(format!(
            "No observations returned for series {series_id}."
        )));
    }

    Ok(table)
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_drops_missing_rows() {
        let body = "DATE,GDP\n2020-01-01,100.5\n2020-04-01,.\n2020-07-01,101.25\n";
        let table = parse_fredgraph_csv("GDP", body).unwrap();

        assert_eq!(table.id, "GDP");
        assert_eq!(table.len(), 2);
        assert!((table.obs[0].value - 100.5).abs() < 1e-12);
        assert!((table.obs[1].value - 101.25).abs() < 1e-12);
    }

    #[test]
    fn output_is_strictly_ascending() {
        let body = "DATE,X\n2021-01-01,3\n2019-01-01,1\n2020-01-01,2\n";
        let table = parse_fredgraph_csv("X", body).unwrap();

        for pair in table.obs.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn all_missing_is_no_data() {
        let body = "DATE,X\n2020-01-01,.\n2020-02-01,.\n";
        let err = parse_fredgraph_csv("X", body).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn bad_date_is_malformed_content() {
        let body = "DATE,X\nnot-a-date,1.0\n";
        let err = parse_fredgraph_csv("X", body).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn non_numeric_values_are_dropped_not_fatal() {
        let body = "DATE,X\n2020-01-01,n/a\n2020-02-01,5.0\n";
        let table = parse_fredgraph_csv("X", body).unwrap();
        assert_eq!(table.len(), 1);
        assert!((table.obs[0].value - 5.0).abs() < 1e-12);
    }
}
