//! Histogram export writers.
//!
//! This module provides writers for the bins of a [`Distribution`]:
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - one JSON document with title and bins - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - one JSON object per bin - requires `json-output` feature
//!
//! Bin edges are written as RFC 3339 dates in the histogram's offset.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> chathisto::Result<()> {
//! use chathisto::config::HistogramConfig;
//! use chathisto::histogram::Distribution;
//! use chathisto::output::{to_csv, write_json};
//!
//! let distribution = Distribution::from_timestamps(&[1609495200, 1609495800], 2)?;
//! let config = HistogramConfig::new();
//!
//! write_json(&distribution, "bins.json", &config)?;
//! let csv = to_csv(&distribution)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```
//!
//! [`Distribution`]: crate::histogram::Distribution

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};

#[cfg(any(feature = "csv-output", feature = "json-output"))]
use chrono::{DateTime, FixedOffset, SecondsFormat};
#[cfg(any(feature = "csv-output", feature = "json-output"))]
use serde::Serialize;

#[cfg(any(feature = "csv-output", feature = "json-output"))]
use crate::histogram::Histogram;

/// One bin as written by every export format.
#[cfg(any(feature = "csv-output", feature = "json-output"))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct BinRow {
    pub start: String,
    pub end: String,
    pub count: usize,
    pub density: Option<f64>,
}

#[cfg(any(feature = "csv-output", feature = "json-output"))]
pub(crate) fn bin_rows(histogram: &Histogram) -> Vec<BinRow> {
    histogram
        .bins()
        .iter()
        .map(|bin| BinRow {
            start: edge_rfc3339(bin.start, histogram.offset()),
            end: edge_rfc3339(bin.end, histogram.offset()),
            count: bin.count,
            density: bin.density.map(round_density),
        })
        .collect()
}

/// Formats epoch seconds as RFC 3339, falling back to the raw number.
#[cfg(any(feature = "csv-output", feature = "json-output"))]
pub(crate) fn rfc3339(seconds: i64, offset: FixedOffset) -> String {
    DateTime::from_timestamp(seconds, 0).map_or_else(
        || seconds.to_string(),
        |utc| {
            utc.with_timezone(&offset)
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        },
    )
}

/// Formats a fractional bin edge as RFC 3339 with millisecond precision.
///
/// Whole seconds are written without a fraction.
#[cfg(any(feature = "csv-output", feature = "json-output"))]
pub(crate) fn edge_rfc3339(seconds: f64, offset: FixedOffset) -> String {
    let millis = (seconds * 1000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return seconds.to_string();
    }
    DateTime::from_timestamp_millis(millis as i64).map_or_else(
        || seconds.to_string(),
        |utc| {
            utc.with_timezone(&offset)
                .to_rfc3339_opts(SecondsFormat::AutoSi, true)
        },
    )
}

#[cfg(any(feature = "csv-output", feature = "json-output"))]
fn round_density(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(all(test, any(feature = "csv-output", feature = "json-output")))]
mod tests {
    use super::*;
    use crate::histogram::Distribution;

    #[test]
    fn test_rfc3339_utc_and_offset() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(rfc3339(1609495200, utc), "2021-01-01T10:00:00Z");

        let cest = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(rfc3339(1609495200, cest), "2021-01-01T12:00:00+02:00");

        assert_eq!(rfc3339(i64::MAX, utc), i64::MAX.to_string());
    }

    #[test]
    fn test_edge_rfc3339_keeps_fractions() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(edge_rfc3339(1609495200.0, utc), "2021-01-01T10:00:00Z");
        assert_eq!(edge_rfc3339(1609495200.6667, utc), "2021-01-01T10:00:00.667Z");
        assert_eq!(edge_rfc3339(1609495200.5, utc), "2021-01-01T10:00:00.500Z");
    }

    #[test]
    fn test_short_span_rows_are_distinct() {
        // 900 bins over ten minutes: each bin is 2/3 of a second wide
        let distribution = Distribution::from_timestamps(&[1609495200, 1609495800], 900).unwrap();
        let rows = bin_rows(distribution.histogram().unwrap());
        assert_eq!(rows.len(), 900);
        assert_eq!(rows[1].start, "2021-01-01T10:00:00.667Z");
        assert!(rows.windows(2).all(|w| w[0].start != w[1].start));
        assert!(rows.iter().all(|r| r.start != r.end));
        assert_eq!(rows[899].end, "2021-01-01T10:10:00Z");
    }

    #[test]
    fn test_bin_rows() {
        let distribution = Distribution::from_timestamps(&[1609495200, 1609495800], 2).unwrap();
        let rows = bin_rows(distribution.histogram().unwrap());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].start, "2021-01-01T10:00:00Z");
        assert_eq!(rows[0].end, "2021-01-01T10:05:00Z");
        assert_eq!(rows[1].end, "2021-01-01T10:10:00Z");
        assert_eq!(rows.iter().map(|r| r.count).sum::<usize>(), 2);
    }
}
