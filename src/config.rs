//! Configuration types for discovery, extraction and presentation.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies. The binary maps its flags onto
//! these.
//!
//! - [`FragmentConfig`] - fragment filename pattern
//! - [`ExtractorConfig`] - where timestamps live in the markup
//! - [`HistogramConfig`] - bin count and date rendering
//! - [`ChartConfig`] - terminal chart size
//!
//! # Example
//!
//! ```rust
//! use chathisto::config::{FragmentConfig, HistogramConfig};
//!
//! let fragments = FragmentConfig::new().with_prefix("messages").with_suffix(".html");
//! let histogram = HistogramConfig::new().with_bin_count(120).with_date_format("%Y-%m")?;
//! # Ok::<(), chathisto::ChathistoError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ChathistoError, Result};
use crate::message::DisplayFormat;

/// Fragment filename pattern: `<prefix><optional digits><suffix>`.
///
/// Telegram Desktop splits large exports into `messages.html`,
/// `messages2.html`, `messages3.html`, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentConfig {
    /// Literal text before the digits (default: `messages`)
    pub prefix: String,

    /// Literal text after the digits (default: `.html`)
    pub suffix: String,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            prefix: "messages".to_string(),
            suffix: ".html".to_string(),
        }
    }
}

impl FragmentConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filename prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the filename suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

/// Where message timestamps live in a fragment's markup.
///
/// The defaults match Telegram Desktop's HTML export:
///
/// ```html
/// <div class="body">
///   <div class="pull_right date details" title="29.05.2019 11:26:30">11:26</div>
///   ...
/// </div>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// CSS selector for message body containers (default: `div.body`)
    pub container_selector: String,

    /// CSS selector, relative to a container, for the element carrying the
    /// timestamp (default: `div.pull_right.date.details`)
    pub timestamp_selector: String,

    /// Attribute holding the timestamp text (default: `title`)
    pub timestamp_attribute: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            container_selector: "div.body".to_string(),
            timestamp_selector: "div.pull_right.date.details".to_string(),
            timestamp_attribute: "title".to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the container selector.
    #[must_use]
    pub fn with_container_selector(mut self, selector: impl Into<String>) -> Self {
        self.container_selector = selector.into();
        self
    }

    /// Sets the timestamp element selector.
    #[must_use]
    pub fn with_timestamp_selector(mut self, selector: impl Into<String>) -> Self {
        self.timestamp_selector = selector.into();
        self
    }

    /// Sets the timestamp attribute name.
    #[must_use]
    pub fn with_timestamp_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.timestamp_attribute = attribute.into();
        self
    }
}

/// Histogram parameters handed to presenters.
///
/// The core accepts these but does not interpret them; binning and
/// rendering do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramConfig {
    /// Number of equal-width time buckets (default: 900)
    pub bin_count: usize,

    /// Template for axis labels and the title (default: `%b %d, %Y`)
    pub display_format: DisplayFormat,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            bin_count: 900,
            display_format: DisplayFormat::default(),
        }
    }
}

impl HistogramConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of buckets.
    #[must_use]
    pub fn with_bin_count(mut self, bins: usize) -> Self {
        self.bin_count = bins;
        self
    }

    /// Sets the date template.
    ///
    /// # Errors
    ///
    /// Returns [`ChathistoError::InvalidConfig`] if the template is malformed.
    pub fn with_date_format(mut self, template: &str) -> Result<Self> {
        self.display_format = DisplayFormat::new(template)?;
        Ok(self)
    }

    /// Checks values that can't be rejected at the type level.
    pub fn validate(&self) -> Result<()> {
        check_bin_count(self.bin_count)
    }
}

/// Largest accepted number of histogram buckets.
pub const MAX_BIN_COUNT: usize = 1_000_000;

/// Rejects bucket counts outside `1..=MAX_BIN_COUNT`.
pub(crate) fn check_bin_count(bins: usize) -> Result<()> {
    match bins {
        0 => Err(ChathistoError::invalid_config("bin count must be at least 1")),
        n if n > MAX_BIN_COUNT => Err(ChathistoError::invalid_config(format!(
            "bin count {n} exceeds the maximum of {MAX_BIN_COUNT}"
        ))),
        _ => Ok(()),
    }
}

/// Terminal chart dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Maximum number of columns for bars (default: 80)
    pub width: usize,

    /// Number of rows for the tallest bar (default: 16)
    pub height: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 16,
        }
    }
}

impl ChartConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chart width in columns.
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Sets the chart height in rows.
    #[must_use]
    pub fn with_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    /// Checks that the chart has room to draw.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ChathistoError::invalid_config(format!(
                "chart size {}x{} is empty",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
