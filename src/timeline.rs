//! Timeline assembly across fragments.
//!
//! [`TimelineBuilder`] drives the whole ingestion pipeline: it lists the
//! source, orders the fragments by ordinal, extracts each one in turn and
//! concatenates the records. The result is a [`Timeline`] ordered by
//! fragment ordinal, then document order.
//!
//! # Example
//!
//! ```rust
//! use chathisto::fragment::MemorySource;
//! use chathisto::timeline::TimelineBuilder;
//!
//! let page = |ts: &str| {
//!     format!(r#"<div class="body"><div class="pull_right date details" title="{ts}"></div></div>"#)
//! };
//!
//! let source = MemorySource::new()
//!     .with_fragment("messages2.html", page("01.01.2021 10:10:00"))
//!     .with_fragment("messages.html", page("01.01.2021 10:00:00"));
//!
//! let timeline = TimelineBuilder::new(source).build()?;
//! assert_eq!(timeline.epoch_seconds(), [1609495200, 1609495800]);
//! # Ok::<(), chathisto::ChathistoError>(())
//! ```

use chrono::{DateTime, FixedOffset};
use log::{debug, info};
use serde::Serialize;

use crate::error::Result;
use crate::extractor::MarkupExtractor;
use crate::fragment::{FragmentPattern, FragmentSource, locate_fragments};
use crate::message::MessageRecord;
use crate::progress::{Progress, ProgressCallback};

/// Per-fragment extraction counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentSummary {
    /// Fragment file name
    pub name: String,
    /// Ordinal the fragment was sorted by
    pub ordinal: u64,
    /// Records extracted
    pub messages: usize,
    /// Containers skipped as non-text entries
    pub skipped: usize,
}

/// Every record of an export, in fragment-ordinal then document order.
#[derive(Debug, Clone)]
pub struct Timeline {
    records: Vec<MessageRecord>,
    fragments: Vec<FragmentSummary>,
    offset: FixedOffset,
}

impl Timeline {
    /// Returns the records in timeline order.
    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    /// Consumes the timeline, returning its records.
    pub fn into_records(self) -> Vec<MessageRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the numeric time axis, one entry per record, in timeline
    /// order.
    pub fn epoch_seconds(&self) -> Vec<i64> {
        self.records.iter().map(MessageRecord::epoch_seconds).collect()
    }

    pub fn first(&self) -> Option<&MessageRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&MessageRecord> {
        self.records.last()
    }

    /// Returns one summary per fragment, in processing order.
    pub fn fragments(&self) -> &[FragmentSummary] {
        &self.fragments
    }

    /// Returns the number of skipped containers across all fragments.
    pub fn skipped(&self) -> usize {
        self.fragments.iter().map(|f| f.skipped).sum()
    }

    /// Returns the offset naive timestamps were interpreted in.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Returns the earliest and latest instants.
    ///
    /// These can differ from [`first`](Self::first) and
    /// [`last`](Self::last) when fragment numbering doesn't follow
    /// conversation time.
    pub fn date_range(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let earliest = self.records.iter().min_by_key(|r| r.epoch_seconds())?;
        let latest = self.records.iter().max_by_key(|r| r.epoch_seconds())?;
        Some((earliest.timestamp(), latest.timestamp()))
    }
}

/// Builds a [`Timeline`] from a fragment source.
pub struct TimelineBuilder<S> {
    source: S,
    pattern: FragmentPattern,
    extractor: MarkupExtractor,
    progress: Option<ProgressCallback>,
}

impl<S: FragmentSource> TimelineBuilder<S> {
    /// Creates a builder with the Telegram defaults.
    pub fn new(source: S) -> Self {
        Self {
            source,
            pattern: FragmentPattern::default(),
            extractor: MarkupExtractor::new(),
            progress: None,
        }
    }

    /// Sets the fragment filename pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: FragmentPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Replaces the extractor, including its offset.
    #[must_use]
    pub fn with_extractor(mut self, extractor: MarkupExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Sets the offset naive timestamps are interpreted in.
    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.extractor = self.extractor.with_offset(offset);
        self
    }

    /// Sets a callback fired after each fragment.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Returns the source fragments are read from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Reads and extracts every fragment.
    ///
    /// An empty source produces an empty timeline.
    ///
    /// # Errors
    ///
    /// Stops at the first failure: the source can't be listed, a fragment
    /// can't be read or decoded, or a timestamp is malformed. Timestamp
    /// errors name the fragment they came from.
    pub fn build(&self) -> Result<Timeline> {
        let fragments = locate_fragments(self.source.entries()?, &self.pattern);
        let total = fragments.len();
        info!("Found {total} fragments");

        let mut records = Vec::new();
        let mut summaries = Vec::with_capacity(total);

        for (index, fragment) in fragments.into_iter().enumerate() {
            let location = self.source.location(&fragment.name);
            let bytes = self.source.read(&fragment.name)?;
            let parsed = self.extractor.parse_bytes(&bytes, &location)?;
            debug!("{}: {} containers", fragment.name, parsed.container_count());

            let before = records.len();
            let mut messages = parsed.messages();
            for item in messages.by_ref() {
                let record = item.map_err(|e| e.in_fragment(&location.display().to_string()))?;
                records.push(record);
            }

            let summary = FragmentSummary {
                messages: records.len() - before,
                skipped: messages.skipped(),
                name: fragment.name,
                ordinal: fragment.ordinal,
            };
            info!(
                "{} (#{}): {} messages, {} skipped",
                summary.name, summary.ordinal, summary.messages, summary.skipped
            );

            if let Some(callback) = &self.progress {
                callback(
                    Progress::new(index + 1, total, records.len()).with_fragment(&summary.name),
                );
            }
            summaries.push(summary);
        }

        Ok(Timeline {
            records,
            fragments: summaries,
            offset: self.extractor.offset(),
        })
    }
}
