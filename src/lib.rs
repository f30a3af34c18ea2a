//! # chathisto
//!
//! A Rust library for turning Telegram Desktop HTML chat exports into a time
//! histogram of message activity.
//!
//! ## Overview
//!
//! Telegram splits large HTML exports into numbered fragments
//! (`messages.html`, `messages2.html`, ..., `messages44.html`). chathisto
//! orders them by their number, pulls the send time of every text message
//! out of the markup, and bins the resulting time axis.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chathisto::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let timeline = TimelineBuilder::new(DirectorySource::new("ChatExport_2021-01-15")).build()?;
//!
//!     let config = HistogramConfig::new();
//!     let distribution = Distribution::from_timeline(&timeline, &config)?;
//!
//!     TextPresenter::new(std::io::stdout()).present(&distribution, &config)?;
//!     write_json(&distribution, "bins.json", &config)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`fragment`] - fragment filename ordinals, ordering and sources
//! - [`extractor`] - timestamp extraction from fragment markup
//! - [`message`] - [`MessageRecord`], [`DisplayFormat`], UTC offsets
//! - [`timeline`] - [`TimelineBuilder`](timeline::TimelineBuilder), the ingestion pipeline
//! - [`histogram`] - [`Distribution`](histogram::Distribution) binning and density
//! - [`present`] - terminal chart rendering
//! - [`output`], [`format`] - CSV / JSON / JSONL export of the bins
//! - [`config`] - configuration types
//! - [`progress`] - per-fragment progress callbacks
//! - [`error`] - unified error types ([`ChathistoError`], [`Result`])
//! - [`prelude`] - convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod format;
pub mod fragment;
pub mod histogram;
pub mod message;
pub mod output;
pub mod present;
pub mod progress;
pub mod timeline;

// Re-export the main types at the crate root for convenience
pub use error::{ChathistoError, Result};
pub use message::{DisplayFormat, MessageRecord};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chathisto::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{DisplayFormat, MessageRecord};

    pub use crate::error::{ChathistoError, Result};

    pub use crate::config::{ChartConfig, ExtractorConfig, FragmentConfig, HistogramConfig};

    pub use crate::fragment::{
        DirectorySource, Fragment, FragmentPattern, FragmentSource, MemorySource,
        locate_fragments,
    };

    pub use crate::extractor::MarkupExtractor;
    pub use crate::timeline::{Timeline, TimelineBuilder};

    pub use crate::histogram::{Bin, Distribution, Histogram};
    pub use crate::present::{HistogramPresenter, TextPresenter};

    pub use crate::format::OutputFormat;

    #[cfg(feature = "csv-output")]
    pub use crate::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::output::{to_json, to_jsonl, write_json, write_jsonl};
}
