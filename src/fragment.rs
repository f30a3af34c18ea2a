//! Fragment discovery and ordering.
//!
//! Telegram Desktop splits a large export into numbered files:
//! `messages.html`, `messages2.html`, ..., `messages44.html`. The numbers
//! are the only ordering signal. Directory listings come back in arbitrary
//! order, and a lexicographic sort puts `messages10.html` before
//! `messages2.html`, so both would silently scramble the timeline.
//!
//! - [`FragmentPattern`] maps a filename to its ordinal key
//! - [`locate_fragments`] filters and orders a listing by that key
//! - [`FragmentSource`] abstracts where listings and contents come from
//!   ([`DirectorySource`], [`MemorySource`])
//!
//! # Example
//!
//! ```rust
//! use chathisto::fragment::{FragmentPattern, locate_fragments};
//!
//! let pattern = FragmentPattern::default();
//! let ordered = locate_fragments(["messages44.html", "messages.html", "messages2.html"], &pattern);
//!
//! let names: Vec<_> = ordered.iter().map(|f| f.name.as_str()).collect();
//! assert_eq!(names, ["messages.html", "messages2.html", "messages44.html"]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use regex::Regex;

use crate::config::FragmentConfig;
use crate::error::{ChathistoError, Result};

/// Recognizes fragment filenames and extracts their ordinal key.
///
/// A filename matches when it is exactly the prefix, then zero or more
/// decimal digits, then the suffix. The bare `prefix + suffix` name is the
/// first fragment and has ordinal 1.
#[derive(Debug, Clone)]
pub struct FragmentPattern {
    config: FragmentConfig,
    regex: Regex,
}

impl FragmentPattern {
    /// Builds a pattern from a prefix/suffix configuration.
    ///
    /// Prefix and suffix are matched literally, so `.html` does not match
    /// `xhtml`.
    pub fn new(config: FragmentConfig) -> Self {
        let source = format!(
            r"^{}(\d*){}$",
            regex::escape(&config.prefix),
            regex::escape(&config.suffix)
        );
        let regex = Regex::new(&source).expect("escaped fragment pattern is valid");
        Self { config, regex }
    }

    /// Returns the configuration this pattern was built from.
    pub fn config(&self) -> &FragmentConfig {
        &self.config
    }

    /// Returns the ordinal key of `name`, or `None` if it is not a fragment.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chathisto::fragment::FragmentPattern;
    ///
    /// let pattern = FragmentPattern::default();
    /// assert_eq!(pattern.ordinal("messages.html"), Some(1));
    /// assert_eq!(pattern.ordinal("messages17.html"), Some(17));
    /// assert_eq!(pattern.ordinal("photos/photo_1.jpg"), None);
    /// ```
    pub fn ordinal(&self, name: &str) -> Option<u64> {
        let caps = self.regex.captures(name)?;
        let digits = caps.get(1).map_or("", |m| m.as_str());
        if digits.is_empty() {
            return Some(1);
        }
        match digits.parse::<u64>() {
            Ok(n) => Some(n),
            Err(e) => {
                warn!("Ignoring {name}: fragment number {digits} is out of range ({e})");
                None
            }
        }
    }

    /// Returns `true` if `name` is a fragment filename.
    pub fn is_fragment(&self, name: &str) -> bool {
        self.ordinal(name).is_some()
    }
}

impl Default for FragmentPattern {
    fn default() -> Self {
        Self::new(FragmentConfig::default())
    }
}

/// A fragment filename with its ordinal key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Entry name as listed
    pub name: String,
    /// Sort key extracted from the name
    pub ordinal: u64,
}

/// Filters `entries` down to fragments and orders them by ordinal.
///
/// The sort is stable: entries sharing an ordinal keep their listing order.
/// An empty result is valid and yields an empty timeline downstream.
pub fn locate_fragments<I, S>(entries: I, pattern: &FragmentPattern) -> Vec<Fragment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut fragments: Vec<Fragment> = entries
        .into_iter()
        .filter_map(|entry| {
            let name = entry.as_ref();
            match pattern.ordinal(name) {
                Some(ordinal) => Some(Fragment {
                    name: name.to_string(),
                    ordinal,
                }),
                None => {
                    debug!("Skipping {name}: not a fragment");
                    None
                }
            }
        })
        .collect();

    fragments.sort_by_key(|f| f.ordinal);
    fragments
}

/// Supplies fragment listings and contents.
///
/// Keeps filesystem access out of the pipeline so the ordering and
/// extraction logic can be driven from memory in tests or embedded use.
pub trait FragmentSource {
    /// Lists candidate entry names, in whatever order the source has them.
    fn entries(&self) -> Result<Vec<String>>;

    /// Reads one entry's raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ChathistoError::UnreadableFragment`] if the entry can't be
    /// read.
    fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Returns a location for `name`, used in error messages.
    fn location(&self, name: &str) -> PathBuf {
        PathBuf::from(name)
    }
}

/// Reads fragments from a directory on disk.
///
/// # Example
///
/// ```rust,no_run
/// use chathisto::fragment::{DirectorySource, FragmentSource};
///
/// let source = DirectorySource::new("ChatExport_2021-01-15");
/// for name in source.entries()? {
///     println!("{name}");
/// }
/// # Ok::<(), chathisto::ChathistoError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the directory this source reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FragmentSource for DirectorySource {
    fn entries(&self) -> Result<Vec<String>> {
        let listing_error = |e: std::io::Error| ChathistoError::listing(&self.root, e);
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.root).map_err(listing_error)? {
            let entry = entry.map_err(listing_error)?;
            // follows symlinks; dangling links are not files
            if !entry.path().is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => debug!("Skipping non UTF-8 entry {}", raw.to_string_lossy()),
            }
        }

        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.location(name);
        fs::read(&path).map_err(|e| ChathistoError::unreadable(path, e.to_string()))
    }

    fn location(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// Serves fragments from memory.
///
/// Entries are listed in insertion order, which makes it easy to simulate
/// an unfavourable directory listing.
///
/// # Example
///
/// ```rust
/// use chathisto::fragment::{FragmentSource, MemorySource};
///
/// let source = MemorySource::new()
///     .with_fragment("messages2.html", "<html></html>")
///     .with_fragment("messages.html", "<html></html>");
///
/// assert_eq!(source.entries()?, ["messages2.html", "messages.html"]);
/// # Ok::<(), chathisto::ChathistoError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    fragments: Vec<(String, Vec<u8>)>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    #[must_use]
    pub fn with_fragment(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.push(name, content);
        self
    }

    /// Adds an entry in place.
    pub fn push(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.fragments.push((name.into(), content.into()));
    }
}

impl FragmentSource for MemorySource {
    fn entries(&self) -> Result<Vec<String>> {
        Ok(self.fragments.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        self.fragments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| ChathistoError::unreadable(name, "no such fragment"))
    }
}
