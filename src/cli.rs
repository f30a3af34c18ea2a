//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`] - export format options
//!
//! [`Args`] also knows how to turn its flags into the library's
//! configuration types, so the binary stays a thin driver:
//!
//! ```rust
//! use chathisto::cli::Args;
//! use clap::Parser;
//!
//! let args = Args::parse_from(["chathisto", "exports/", "--bins", "120", "--utc-offset", "+02:00"]);
//! let config = args.histogram_config()?;
//! assert_eq!(config.bin_count, 120);
//! assert_eq!(args.offset()?.local_minus_utc(), 7200);
//! # Ok::<(), chathisto::ChathistoError>(())
//! ```

use std::path::PathBuf;

use chrono::{FixedOffset, Local, Offset, Utc};
use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{ChartConfig, FragmentConfig, HistogramConfig};
use crate::error::Result;
use crate::message::{DEFAULT_DISPLAY_FORMAT, parse_utc_offset};

/// Plot the message activity of a Telegram HTML chat export as a time
/// histogram.
#[derive(Parser, Debug, Clone)]
#[command(name = "chathisto")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chathisto ChatExport_2021-01-15
    chathisto . --bins 200 --date-format \"%Y-%m-%d\"
    chathisto exports/ --utc-offset +02:00 -o bins.json
    chathisto exports/ --no-chart -o bins.csv")]
pub struct Args {
    /// Directory containing messages.html, messages2.html, ...
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Number of time buckets
    #[arg(short, long, default_value_t = 900, value_name = "N")]
    pub bins: usize,

    /// strftime template for the title and axis dates
    #[arg(long, default_value = DEFAULT_DISPLAY_FORMAT, value_name = "FMT")]
    pub date_format: String,

    /// Fragment filename prefix
    #[arg(long, default_value = "messages", value_name = "P")]
    pub prefix: String,

    /// Fragment filename suffix
    #[arg(long, default_value = ".html", value_name = "S")]
    pub suffix: String,

    /// Offset the export's timestamps were written in (e.g. +02:00)
    #[arg(long, value_name = "OFFSET", conflicts_with = "local_time", allow_hyphen_values = true)]
    pub utc_offset: Option<String>,

    /// Interpret timestamps in this machine's current UTC offset
    #[arg(long)]
    pub local_time: bool,

    /// Export the bins to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Export format (default: from the output extension, else csv)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Chart width in columns
    #[arg(long, default_value_t = 80, value_name = "COLS")]
    pub width: usize,

    /// Chart height in rows
    #[arg(long, default_value_t = 16, value_name = "ROWS")]
    pub height: usize,

    /// Don't draw the terminal chart
    #[arg(long)]
    pub no_chart: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Returns the fragment filename pattern configuration.
    pub fn fragment_config(&self) -> FragmentConfig {
        FragmentConfig::new()
            .with_prefix(&self.prefix)
            .with_suffix(&self.suffix)
    }

    /// Returns the validated histogram configuration.
    pub fn histogram_config(&self) -> Result<HistogramConfig> {
        let config = HistogramConfig::new()
            .with_bin_count(self.bins)
            .with_date_format(&self.date_format)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the validated chart size.
    pub fn chart_config(&self) -> Result<ChartConfig> {
        let config = ChartConfig::new()
            .with_width(self.width)
            .with_height(self.height);
        config.validate()?;
        Ok(config)
    }

    /// Returns the offset timestamps are interpreted in.
    ///
    /// `--local-time` is resolved once, at the time of the call.
    pub fn offset(&self) -> Result<FixedOffset> {
        if let Some(offset) = &self.utc_offset {
            return parse_utc_offset(offset);
        }
        if self.local_time {
            return Ok(Local::now().offset().fix());
        }
        Ok(Utc.fix())
    }

    /// Returns the export target and its format, if exporting.
    ///
    /// An explicit `--format` wins; otherwise the extension decides, and an
    /// unrecognized extension falls back to CSV.
    pub fn export(&self) -> Option<(PathBuf, crate::format::OutputFormat)> {
        let path = self.output.clone()?;
        let format = match self.format {
            Some(format) => format.into(),
            None => crate::format::OutputFormat::from_path(&path).unwrap_or_default(),
        };
        Some((path, format))
    }

    /// Returns the default `env_logger` filter for the verbosity level.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Export format options.
///
/// # Example
///
/// ```rust
/// use chathisto::cli::OutputFormat;
///
/// let format = OutputFormat::Jsonl;
/// assert_eq!(format.extension(), "jsonl");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV with semicolon delimiter
    #[default]
    Csv,

    /// Single JSON document with title and bins
    Json,

    /// JSON Lines - one bin per line
    #[value(alias = "ndjson")]
    Jsonl,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        crate::format::OutputFormat::from(*self).extension()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&crate::format::OutputFormat::from(*self), f)
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}
