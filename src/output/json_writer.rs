//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::config::HistogramConfig;
use crate::error::Result;
use crate::histogram::Distribution;
use crate::output::{BinRow, bin_rows, rfc3339};

/// Whole-document shape. Everything but `total` and `bins` is omitted for
/// an empty distribution.
#[derive(Serialize)]
struct JsonHistogram {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<JsonRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bin_width_seconds: Option<f64>,
    bins: Vec<BinRow>,
}

#[derive(Serialize)]
struct JsonRange {
    first: String,
    last: String,
    min: String,
    max: String,
}

impl JsonHistogram {
    fn from_distribution(distribution: &Distribution, config: &HistogramConfig) -> Self {
        let Some(histogram) = distribution.histogram() else {
            return Self {
                title: None,
                total: 0,
                range: None,
                bin_width_seconds: None,
                bins: Vec::new(),
            };
        };

        let offset = histogram.offset();
        Self {
            title: Some(histogram.title(&config.display_format)),
            total: histogram.total(),
            range: Some(JsonRange {
                first: rfc3339(histogram.first(), offset),
                last: rfc3339(histogram.last(), offset),
                min: rfc3339(histogram.min(), offset),
                max: rfc3339(histogram.max(), offset),
            }),
            bin_width_seconds: Some(histogram.bin_width()),
            bins: bin_rows(histogram),
        }
    }
}

/// Writes the histogram to a JSON file.
///
/// # Format
/// ```json
/// {
///   "title": "# messages from Jan 01, 2021 to Jan 01, 2021:\n3",
///   "total": 3,
///   "range": {"first": "...", "last": "...", "min": "...", "max": "..."},
///   "bin_width_seconds": 300.0,
///   "bins": [{"start": "2021-01-01T10:00:00Z", "end": "...", "count": 1, "density": 0.93}]
/// }
/// ```
pub fn write_json(
    distribution: &Distribution,
    output_path: impl AsRef<Path>,
    config: &HistogramConfig,
) -> Result<()> {
    let json = to_json(distribution, config)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts the histogram to a JSON string.
///
/// Same format as [`write_json`], but returns a String instead of writing
/// to a file.
pub fn to_json(distribution: &Distribution, config: &HistogramConfig) -> Result<String> {
    let document = JsonHistogram::from_distribution(distribution, config);
    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::NamedTempFile;

    #[test]
    fn test_to_json_basic() {
        let distribution =
            Distribution::from_timestamps(&[1609495200, 1609495500, 1609495800], 2).unwrap();
        let json = to_json(&distribution, &HistogramConfig::new()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total"], 3);
        assert_eq!(
            value["title"],
            "# messages from Jan 01, 2021 to Jan 01, 2021:\n3"
        );
        assert_eq!(value["range"]["min"], "2021-01-01T10:00:00Z");
        assert_eq!(value["range"]["max"], "2021-01-01T10:10:00Z");
        assert_eq!(value["bin_width_seconds"], 300.0);

        let bins = value["bins"].as_array().unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0]["count"], 1);
        assert_eq!(bins[1]["count"], 2);
        assert!(bins[0]["density"].is_number());
    }

    #[test]
    fn test_to_json_no_data() {
        let json = to_json(&Distribution::NoData, &HistogramConfig::new()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!({"total": 0, "bins": []}));
    }

    #[test]
    fn test_to_json_null_density() {
        let distribution = Distribution::from_timestamps(&[5, 5], 1).unwrap();
        let json = to_json(&distribution, &HistogramConfig::new()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert!(value["bins"][0]["density"].is_null());
    }

    #[test]
    fn test_write_json_file() {
        let distribution = Distribution::from_timestamps(&[0, 3600], 4).unwrap();
        let temp_file = NamedTempFile::new().unwrap();
        let config = HistogramConfig::new().with_date_format("%Y-%m-%d %H:%M").unwrap();

        write_json(&distribution, temp_file.path(), &config).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            value["title"],
            "# messages from 1970-01-01 00:00 to 1970-01-01 01:00:\n2"
        );
        assert_eq!(value["bins"].as_array().unwrap().len(), 4);
    }
}
