//! Export format types for histogram bins.
//!
//! Library-first format types that don't depend on CLI frameworks.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> chathisto::Result<()> {
//! use chathisto::config::HistogramConfig;
//! use chathisto::format::{OutputFormat, to_format_string};
//! use chathisto::histogram::Distribution;
//!
//! let distribution = Distribution::from_timestamps(&[1609495200, 1609495800], 2)?;
//!
//! let format = OutputFormat::from_path("bins.jsonl")?;
//! assert_eq!(format, OutputFormat::Jsonl);
//!
//! let jsonl = to_format_string(&distribution, format, &HistogramConfig::new())?;
//! assert_eq!(jsonl.lines().count(), 2);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::HistogramConfig;
use crate::error::ChathistoError;
use crate::histogram::Distribution;

/// Export format for histogram bins.
///
/// - [`Csv`](OutputFormat::Csv) - spreadsheet friendly, one row per bin
/// - [`Json`](OutputFormat::Json) - one document with title, range and bins
/// - [`Jsonl`](OutputFormat::Jsonl) - one JSON object per bin
///
/// # Example
///
/// ```rust
/// use chathisto::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("jsonl").unwrap();
/// assert_eq!(format, OutputFormat::Jsonl);
/// assert_eq!(format.extension(), "jsonl");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// CSV with semicolon delimiter (default)
    #[default]
    Csv,

    /// Single JSON document
    Json,

    /// JSON Lines - one JSON object per bin
    ///
    /// Also known as NDJSON.
    Jsonl,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    ///
    /// # Example
    ///
    /// ```rust
    /// use chathisto::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Csv.extension(), "csv");
    /// assert_eq!(OutputFormat::Json.extension(), "json");
    /// assert_eq!(OutputFormat::Jsonl.extension(), "jsonl");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "json", "jsonl", "ndjson"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Csv, OutputFormat::Json, OutputFormat::Jsonl]
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Json => "application/json",
            OutputFormat::Jsonl => "application/x-ndjson",
        }
    }

    /// Detects format from a file path based on extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chathisto::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("bins.JSON").unwrap(), OutputFormat::Json);
    /// assert!(OutputFormat::from_path("bins.txt").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ChathistoError::InvalidFormat`] for a missing or unknown
    /// extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ChathistoError> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(ChathistoError::invalid_format(
                "output",
                format!("Unknown file extension: '.{ext}'. Expected one of: csv, json, jsonl"),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

fn feature_required(format: OutputFormat) -> ChathistoError {
    ChathistoError::invalid_format(
        "output",
        format!(
            "Output format {format} requires the '{}' feature to be enabled",
            match format {
                OutputFormat::Csv => "csv-output",
                OutputFormat::Json | OutputFormat::Jsonl => "json-output",
            }
        ),
    )
}

/// Writes histogram bins to a file in the specified format.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
#[allow(unused_variables)]
pub fn write_to_format(
    distribution: &Distribution,
    path: impl AsRef<Path>,
    format: OutputFormat,
    config: &HistogramConfig,
) -> Result<(), ChathistoError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::output::write_csv(distribution, path),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::output::write_json(distribution, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::output::write_jsonl(distribution, path),
        #[allow(unreachable_patterns)]
        _ => Err(feature_required(format)),
    }
}

/// Converts histogram bins to a string in the specified format.
#[allow(unused_variables)]
pub fn to_format_string(
    distribution: &Distribution,
    format: OutputFormat,
    config: &HistogramConfig,
) -> Result<String, ChathistoError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::output::to_csv(distribution),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::output::to_json(distribution, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::output::to_jsonl(distribution),
        #[allow(unreachable_patterns)]
        _ => Err(feature_required(format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("csv").unwrap(), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str("jsonl").unwrap(),
            OutputFormat::Jsonl
        );
        assert_eq!(
            OutputFormat::from_str("ndjson").unwrap(),
            OutputFormat::Jsonl
        );
        assert_eq!(OutputFormat::from_str("CSV").unwrap(), OutputFormat::Csv);
        assert!(OutputFormat::from_str("png").is_err());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::Csv.to_string(), "CSV");
        assert_eq!(OutputFormat::Json.to_string(), "JSON");
        assert_eq!(OutputFormat::Jsonl.to_string(), "JSONL");
    }

    #[test]
    fn test_format_mime_type() {
        assert_eq!(OutputFormat::Csv.mime_type(), "text/csv");
        assert_eq!(OutputFormat::Jsonl.mime_type(), "application/x-ndjson");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            OutputFormat::from_path("bins.csv").unwrap(),
            OutputFormat::Csv
        );
        assert_eq!(
            OutputFormat::from_path("out/bins.ndjson").unwrap(),
            OutputFormat::Jsonl
        );
        assert_eq!(
            OutputFormat::from_path("/path/to/file.JSON").unwrap(),
            OutputFormat::Json
        );
        let err = OutputFormat::from_path("bins").unwrap_err();
        assert!(err.to_string().contains("Unknown file extension"));
    }

    #[test]
    fn test_format_all() {
        let all = OutputFormat::all();
        assert_eq!(all.len(), 3);
        assert!(all.contains(&OutputFormat::Json));
    }

    #[test]
    fn test_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Csv);
    }

    #[test]
    fn test_format_serde() {
        let json = serde_json::to_string(&OutputFormat::Jsonl).unwrap();
        assert_eq!(json, "\"jsonl\"");

        let parsed: OutputFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(parsed, OutputFormat::Csv);
    }

    #[cfg(all(feature = "csv-output", feature = "json-output"))]
    #[test]
    fn test_to_format_string_dispatch() {
        let distribution = Distribution::from_timestamps(&[0, 60], 2).unwrap();
        let config = HistogramConfig::new();

        let csv = to_format_string(&distribution, OutputFormat::Csv, &config).unwrap();
        assert!(csv.starts_with("BinStart;"));

        let json = to_format_string(&distribution, OutputFormat::Json, &config).unwrap();
        assert!(json.contains("\"total\": 2"));

        let jsonl = to_format_string(&distribution, OutputFormat::Jsonl, &config).unwrap();
        assert_eq!(jsonl.lines().count(), 2);
    }
}
