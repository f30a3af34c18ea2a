//! Timestamp extraction from Telegram HTML export fragments.
//!
//! A Telegram Desktop export page is a flat list of message blocks:
//!
//! ```html
//! <div class="message service" id="message-1">
//!   <div class="body details">29 May 2019</div>
//! </div>
//! <div class="message default clearfix" id="message1">
//!   <div class="pull_left userpic_wrap">...</div>
//!   <div class="body">
//!     <div class="pull_right date details" title="29.05.2019 11:26:30">11:26</div>
//!     <div class="from_name">Alice</div>
//!     <div class="text">Hello</div>
//!   </div>
//! </div>
//! ```
//!
//! Every container matching `div.body` is a candidate. Containers without a
//! timestamp element (service notices, forwarded blocks, placeholders) are
//! not text messages and are skipped. A timestamp element whose attribute
//! doesn't parse is export-format drift and is reported as an error.
//!
//! # Example
//!
//! ```rust
//! use chathisto::extractor::MarkupExtractor;
//!
//! let html = r#"<div class="body">
//!   <div class="pull_right date details" title="01.01.2021 10:00:00">10:00</div>
//! </div>
//! <div class="body details">1 January 2021</div>"#;
//!
//! let extractor = MarkupExtractor::new();
//! let fragment = extractor.parse(html);
//! let mut messages = fragment.messages();
//!
//! let record = messages.next().unwrap()?;
//! assert_eq!(record.raw(), "01.01.2021 10:00:00");
//! assert!(messages.next().is_none());
//! assert_eq!(messages.skipped(), 1);
//! # Ok::<(), chathisto::ChathistoError>(())
//! ```

use std::path::Path;

use chrono::{FixedOffset, Offset, Utc};
use log::{debug, trace};
use scraper::html::Select;
use scraper::{ElementRef, Html, Selector};

use crate::config::ExtractorConfig;
use crate::error::{ChathistoError, Result};
use crate::message::MessageRecord;

/// Finds message containers and their timestamps in fragment markup.
///
/// Selectors are compiled once at construction and reused for every
/// fragment.
#[derive(Debug, Clone)]
pub struct MarkupExtractor {
    config: ExtractorConfig,
    container: Selector,
    timestamp: Selector,
    offset: FixedOffset,
}

impl MarkupExtractor {
    /// Creates an extractor for Telegram Desktop's HTML layout.
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default()).expect("default selectors are valid")
    }

    /// Creates an extractor for a custom layout.
    ///
    /// # Errors
    ///
    /// Returns [`ChathistoError::InvalidConfig`] if either selector is not
    /// valid CSS or the attribute name is empty.
    pub fn with_config(config: ExtractorConfig) -> Result<Self> {
        let container = compile_selector(&config.container_selector)?;
        let timestamp = compile_selector(&config.timestamp_selector)?;
        if config.timestamp_attribute.trim().is_empty() {
            return Err(ChathistoError::invalid_config("timestamp attribute name is empty"));
        }

        Ok(Self {
            config,
            container,
            timestamp,
            offset: Utc.fix(),
        })
    }

    /// Sets the offset naive timestamps are interpreted in.
    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Returns the configuration this extractor was built from.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Returns the offset naive timestamps are interpreted in.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Parses fragment markup.
    ///
    /// The HTML parser recovers from malformed markup the way browsers do,
    /// so this never fails; recovered errors are logged at `trace` level.
    pub fn parse(&self, content: &str) -> ParsedFragment<'_> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let document = Html::parse_document(content);

        if !document.errors.is_empty() {
            debug!("Recovered from {} markup errors", document.errors.len());
            for error in &document.errors {
                trace!("markup: {error}");
            }
        }

        ParsedFragment {
            extractor: self,
            document,
        }
    }

    /// Decodes and parses a fragment's raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ChathistoError::UnreadableFragment`] naming `location` if
    /// the bytes are not UTF-8 text.
    pub fn parse_bytes(&self, bytes: &[u8], location: &Path) -> Result<ParsedFragment<'_>> {
        let content = std::str::from_utf8(bytes).map_err(|e| {
            ChathistoError::unreadable(location, format!("not valid UTF-8 text ({e})"))
        })?;
        Ok(self.parse(content))
    }

    /// Extracts every record from `content`, stopping at the first
    /// malformed timestamp.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chathisto::extractor::MarkupExtractor;
    ///
    /// let records = MarkupExtractor::new().extract_str("<p>no messages here</p>")?;
    /// assert!(records.is_empty());
    /// # Ok::<(), chathisto::ChathistoError>(())
    /// ```
    pub fn extract_str(&self, content: &str) -> Result<Vec<MessageRecord>> {
        self.parse(content).messages().collect()
    }
}

impl Default for MarkupExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn compile_selector(source: &str) -> Result<Selector> {
    Selector::parse(source).map_err(|e| {
        ChathistoError::invalid_config(format!("'{source}' is not a valid CSS selector: {e:?}"))
    })
}

/// One parsed fragment document.
pub struct ParsedFragment<'e> {
    extractor: &'e MarkupExtractor,
    document: Html,
}

impl ParsedFragment<'_> {
    /// Returns a lazy iterator over the fragment's records in document
    /// order.
    pub fn messages(&self) -> Messages<'_> {
        Messages {
            containers: self.document.select(&self.extractor.container),
            timestamp: &self.extractor.timestamp,
            attribute: &self.extractor.config.timestamp_attribute,
            offset: self.extractor.offset,
            yielded: 0,
            skipped: 0,
        }
    }

    /// Returns the number of containers, text messages or not.
    pub fn container_count(&self) -> usize {
        self.document.select(&self.extractor.container).count()
    }

    /// Returns the number of markup errors the parser recovered from.
    pub fn markup_errors(&self) -> usize {
        self.document.errors.len()
    }
}

/// Iterator over a fragment's records.
///
/// Yields `Ok` for every container with a well-formed timestamp and `Err`
/// for a timestamp that doesn't parse. Containers with no timestamp are
/// skipped and counted.
pub struct Messages<'a> {
    containers: Select<'a, 'a>,
    timestamp: &'a Selector,
    attribute: &'a str,
    offset: FixedOffset,
    yielded: usize,
    skipped: usize,
}

impl Messages<'_> {
    /// Returns how many containers were skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns how many items were yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }
}

impl Iterator for Messages<'_> {
    type Item = Result<MessageRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let container = self.containers.next()?;
            match timestamp_text(container, self.timestamp, self.attribute) {
                Some(raw) => {
                    self.yielded += 1;
                    return Some(MessageRecord::parse_with_offset(raw, self.offset));
                }
                None => {
                    self.skipped += 1;
                    trace!(
                        "Skipping container without timestamp (class=\"{}\")",
                        container.value().attr("class").unwrap_or_default()
                    );
                }
            }
        }
    }
}

/// Looks up the timestamp attribute inside one container.
///
/// `None` means the container is not a text message: the element or the
/// attribute is missing, or the attribute is blank.
fn timestamp_text<'a>(
    container: ElementRef<'a>,
    selector: &Selector,
    attribute: &str,
) -> Option<&'a str> {
    container
        .select(selector)
        .next()?
        .value()
        .attr(attribute)
        .filter(|value| !value.trim().is_empty())
}
