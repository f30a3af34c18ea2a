//! Timestamp records recovered from export fragments.
//!
//! This module provides [`MessageRecord`], one parsed message timestamp, and
//! [`DisplayFormat`], the validated strftime template used to render dates
//! for titles and axis labels.
//!
//! # Overview
//!
//! Telegram HTML exports carry the send time of each message in a `title`
//! attribute shaped `DD.MM.YYYY HH:MM:SS`. Newer exports append the zone,
//! `DD.MM.YYYY HH:MM:SS UTC+02:00`. The calendar fields are naive; they are
//! interpreted in one fixed offset for the whole run (UTC unless configured
//! otherwise), and a zone suffix overrides that offset for its record.
//!
//! # Examples
//!
//! ```
//! use chathisto::MessageRecord;
//!
//! let record = MessageRecord::parse("29.05.2019 11:26:30")?;
//! assert_eq!(record.epoch_seconds(), 1559129190);
//! assert_eq!(record.readable_date(), "May 29, 2019");
//! # Ok::<(), chathisto::ChathistoError>(())
//! ```
//!
//! Anything else is a format error, never a silent skip:
//!
//! ```
//! use chathisto::MessageRecord;
//!
//! let err = MessageRecord::parse("2021-01-01 10:00:00").unwrap_err();
//! assert!(err.is_timestamp());
//! ```

use std::fmt;
use std::sync::LazyLock;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ChathistoError, Result};

/// Layout of the timestamp attribute, as a chrono format string.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Default template for human-readable dates, e.g. `May 29, 2019`.
pub const DEFAULT_DISPLAY_FORMAT: &str = "%b %d, %Y";

static TIMESTAMP_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}\.\d{2}\.\d{4} \d{2}:\d{2}:\d{2})(?: UTC([+-])(\d{2}):(\d{2}))?$")
        .expect("timestamp pattern is valid")
});

static OFFSET_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:UTC)?([+-])(\d{2}):?(\d{2})$").expect("offset pattern is valid")
});

/// One message's send time.
///
/// Created during extraction from one markup element and immutable
/// afterwards. Keeps the raw attribute text next to the parsed instant so
/// that error reports and debug output can show exactly what the export
/// contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRecord {
    /// The attribute value, trimmed.
    raw: String,

    /// Calendar fields pinned to the offset they were interpreted in.
    timestamp: DateTime<FixedOffset>,
}

impl MessageRecord {
    /// Parses a timestamp, interpreting the calendar fields as UTC.
    ///
    /// # Errors
    ///
    /// Returns [`ChathistoError::Timestamp`] unless the input is exactly
    /// `DD.MM.YYYY HH:MM:SS` (optionally followed by ` UTC±HH:MM`) and names
    /// a real calendar instant.
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_with_offset(input, Utc.fix())
    }

    /// Parses a timestamp, interpreting the calendar fields in `offset`.
    ///
    /// An explicit ` UTC±HH:MM` suffix in the input takes precedence over
    /// `offset`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chathisto::MessageRecord;
    /// use chrono::FixedOffset;
    ///
    /// let cest = FixedOffset::east_opt(2 * 3600).unwrap();
    /// let record = MessageRecord::parse_with_offset("29.05.2019 11:26:30", cest)?;
    /// assert_eq!(record.epoch_seconds(), 1559121990);
    /// # Ok::<(), chathisto::ChathistoError>(())
    /// ```
    pub fn parse_with_offset(input: &str, offset: FixedOffset) -> Result<Self> {
        let trimmed = input.trim();
        let caps = TIMESTAMP_SHAPE
            .captures(trimmed)
            .ok_or_else(|| ChathistoError::timestamp(trimmed))?;

        let naive = NaiveDateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT)
            .map_err(|_| ChathistoError::timestamp(trimmed))?;

        let offset = match (caps.get(2), caps.get(3), caps.get(4)) {
            (Some(sign), Some(hours), Some(minutes)) => {
                offset_from_parts(sign.as_str(), hours.as_str(), minutes.as_str())
                    .ok_or_else(|| ChathistoError::timestamp(trimmed))?
            }
            _ => offset,
        };

        let timestamp = naive
            .and_local_timezone(offset)
            .single()
            .ok_or_else(|| ChathistoError::timestamp(trimmed))?;

        Ok(Self {
            raw: trimmed.to_string(),
            timestamp,
        })
    }

    /// Returns the attribute text this record was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the calendar date and time as written in the export.
    pub fn datetime(&self) -> NaiveDateTime {
        self.timestamp.naive_local()
    }

    /// Returns the offset the calendar fields were interpreted in.
    pub fn offset(&self) -> FixedOffset {
        *self.timestamp.offset()
    }

    /// Returns the absolute instant.
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Returns seconds since the Unix epoch.
    pub fn epoch_seconds(&self) -> i64 {
        self.timestamp.timestamp()
    }

    /// Renders the date with the given template.
    pub fn display(&self, format: &DisplayFormat) -> String {
        format.render(&self.timestamp)
    }

    /// Renders the date with [`DEFAULT_DISPLAY_FORMAT`].
    pub fn readable_date(&self) -> String {
        self.display(&DisplayFormat::default())
    }
}

impl fmt::Display for MessageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A strftime template that is known to render.
///
/// Validation happens once, at construction, so that rendering titles and
/// axis labels later can never fail halfway through a chart.
///
/// # Example
///
/// ```rust
/// use chathisto::DisplayFormat;
///
/// let format = DisplayFormat::new("%Y-%m-%d")?;
/// assert_eq!(format.as_str(), "%Y-%m-%d");
///
/// assert!(DisplayFormat::new("%Y-%Q").is_err());
/// # Ok::<(), chathisto::ChathistoError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayFormat(String);

impl DisplayFormat {
    /// Validates and wraps a strftime template.
    ///
    /// # Errors
    ///
    /// Returns [`ChathistoError::InvalidConfig`] if the template contains an
    /// unknown or truncated specifier.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if StrftimeItems::new(&template).any(|item| matches!(item, Item::Error)) {
            return Err(ChathistoError::invalid_config(format!(
                "'{template}' is not a valid date format"
            )));
        }
        Ok(Self(template))
    }

    /// Returns the template text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Renders an instant with this template.
    ///
    /// The template was checked at construction, so rendering cannot fail.
    pub fn render(&self, timestamp: &DateTime<FixedOffset>) -> String {
        timestamp.format(&self.0).to_string()
    }

    /// Renders epoch seconds as seen from `offset`.
    ///
    /// Returns `None` for values outside chrono's representable range.
    pub fn render_epoch(&self, seconds: i64, offset: FixedOffset) -> Option<String> {
        DateTime::from_timestamp(seconds, 0).map(|utc| self.render(&utc.with_timezone(&offset)))
    }
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self(DEFAULT_DISPLAY_FORMAT.to_string())
    }
}

impl TryFrom<String> for DisplayFormat {
    type Error = ChathistoError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DisplayFormat> for String {
    fn from(format: DisplayFormat) -> String {
        format.0
    }
}

impl std::str::FromStr for DisplayFormat {
    type Err = ChathistoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses a UTC offset such as `+02:00`, `-0530`, `UTC+03:00` or `Z`.
///
/// # Example
///
/// ```rust
/// use chathisto::message::parse_utc_offset;
///
/// let offset = parse_utc_offset("+02:00")?;
/// assert_eq!(offset.local_minus_utc(), 7200);
/// # Ok::<(), chathisto::ChathistoError>(())
/// ```
pub fn parse_utc_offset(input: &str) -> Result<FixedOffset> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    OFFSET_SHAPE
        .captures(trimmed)
        .and_then(|caps| offset_from_parts(&caps[1], &caps[2], &caps[3]))
        .ok_or_else(|| {
            ChathistoError::invalid_config(format!(
                "'{trimmed}' is not a UTC offset (expected e.g. +02:00)"
            ))
        })
}

fn offset_from_parts(sign: &str, hours: &str, minutes: &str) -> Option<FixedOffset> {
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    let seconds = hours * 3600 + minutes * 60;
    if sign == "-" {
        FixedOffset::west_opt(seconds)
    } else {
        FixedOffset::east_opt(seconds)
    }
}
