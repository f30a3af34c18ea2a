//! Progress reporting for timeline building.
//!
//! Large exports are split into dozens of fragments. The timeline builder
//! pushes a [`Progress`] update after each one so callers can show where a
//! run is without polling.
//!
//! # Example
//!
//! ```rust
//! use chathisto::progress::{Progress, ProgressCallback};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     println!(
//!         "{}/{} fragments, {} messages",
//!         progress.fragments_processed, progress.total_fragments, progress.messages
//!     );
//! });
//!
//! for i in 0..3usize {
//!     callback(Progress::new(i + 1, 3, (i + 1) * 100).with_fragment(format!("messages{}.html", i + 1)));
//! }
//! ```

use std::sync::Arc;

/// Progress information for one timeline build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    /// Number of fragments fully processed.
    pub fragments_processed: usize,

    /// Number of fragments the locator found.
    pub total_fragments: usize,

    /// Number of records collected so far.
    pub messages: usize,

    /// Name of the fragment that was just processed.
    pub fragment: Option<String>,
}

impl Progress {
    /// Creates a new progress instance.
    pub fn new(fragments_processed: usize, total_fragments: usize, messages: usize) -> Self {
        Self {
            fragments_processed,
            total_fragments,
            messages,
            fragment: None,
        }
    }

    /// Names the fragment this update is about.
    #[must_use]
    pub fn with_fragment(mut self, name: impl Into<String>) -> Self {
        self.fragment = Some(name.into());
        self
    }

    /// Returns the progress as a percentage (0.0 - 100.0) of fragments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chathisto::progress::Progress;
    ///
    /// assert_eq!(Progress::new(1, 4, 10).percentage(), 25.0);
    /// assert_eq!(Progress::new(0, 0, 0).percentage(), 100.0);
    /// ```
    pub fn percentage(&self) -> f64 {
        if self.total_fragments == 0 {
            100.0
        } else {
            (self.fragments_processed as f64 / self.total_fragments as f64) * 100.0
        }
    }

    /// Returns whether every fragment has been processed.
    pub fn is_complete(&self) -> bool {
        self.fragments_processed >= self.total_fragments
    }

    /// Returns the number of fragments still to process.
    pub fn remaining(&self) -> usize {
        self.total_fragments.saturating_sub(self.fragments_processed)
    }
}

/// Callback type for receiving progress updates.
///
/// # Example
///
/// ```rust
/// use chathisto::progress::{Progress, ProgressCallback};
/// use std::sync::Arc;
///
/// let callback: ProgressCallback = Arc::new(|progress| {
///     println!("Collected {} messages", progress.messages);
/// });
///
/// callback(Progress::new(1, 2, 10));
/// ```
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Creates a progress callback that prints one line per fragment to stderr.
///
/// # Example
///
/// ```rust
/// use chathisto::progress::{stderr_progress, Progress};
///
/// let callback = stderr_progress();
/// // Prints "   [1/2] messages.html (120 messages)"
/// callback(Progress::new(1, 2, 120).with_fragment("messages.html"));
/// ```
pub fn stderr_progress() -> ProgressCallback {
    Arc::new(|progress| {
        eprintln!(
            "   [{}/{}] {} ({} messages)",
            progress.fragments_processed,
            progress.total_fragments,
            progress.fragment.as_deref().unwrap_or("?"),
            progress.messages
        );
    })
}
