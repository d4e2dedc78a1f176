//! Capture session options

use std::path::PathBuf;
use std::time::Duration;

/// Default wait after the initial load, for assets that arrive late
pub const DEFAULT_LOAD_SETTLE_MS: u64 = 5000;

/// Default wait after each advance
pub const DEFAULT_TRANSITION_SETTLE_MS: u64 = 0;

/// Default bound on any wait for a page event
pub const DEFAULT_EVENT_TIMEOUT_MS: u64 = 30000;

/// Width of the zero-padded sequence number in capture file names
pub const SEQUENCE_WIDTH: usize = 3;

/// Options for a capture session. Immutable once the session is built.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// URL of the deck
    pub slide_source: String,
    /// Prefix prepended verbatim to every capture file name
    pub output_prefix: String,
    /// Upper bound on captures (None = until the last slide)
    pub max_captures: Option<u32>,
    /// Wait after the initial load before configuring the deck
    pub load_settle: Duration,
    /// Wait after each URL change before capturing
    pub transition_settle: Duration,
    /// Longest wait for a page event when no timer is running
    pub event_timeout: Duration,
    /// Re-run highlight.js before every capture
    pub highlight_code: bool,
}

impl SessionOptions {
    /// Options for `slide_source` with defaults everywhere else
    pub fn new<S: Into<String>>(slide_source: S) -> Self {
        Self {
            slide_source: slide_source.into(),
            output_prefix: String::new(),
            max_captures: None,
            load_settle: Duration::from_millis(DEFAULT_LOAD_SETTLE_MS),
            transition_settle: Duration::from_millis(DEFAULT_TRANSITION_SETTLE_MS),
            event_timeout: Duration::from_millis(DEFAULT_EVENT_TIMEOUT_MS),
            highlight_code: true,
        }
    }

    /// Create a new options builder
    pub fn builder<S: Into<String>>(slide_source: S) -> SessionOptionsBuilder {
        SessionOptionsBuilder {
            options: Self::new(slide_source),
        }
    }

    /// File the capture with sequence number `sequence` is rendered to:
    /// `<prefix>slide-<sequence:03>.pdf`
    pub fn capture_path(&self, sequence: u32) -> PathBuf {
        PathBuf::from(capture_file_name(&self.output_prefix, sequence))
    }

    /// Whether `count` captures exhaust the capture bound
    pub fn reached_max(&self, count: u32) -> bool {
        self.max_captures.is_some_and(|max| count >= max)
    }
}

/// Builder for SessionOptions
pub struct SessionOptionsBuilder {
    options: SessionOptions,
}

impl SessionOptionsBuilder {
    /// Set the output prefix
    pub fn output_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.options.output_prefix = prefix.into();
        self
    }

    /// Bound the number of captures. Zero means unbounded.
    pub fn max_captures(mut self, max: Option<u32>) -> Self {
        self.options.max_captures = max.filter(|&n| n > 0);
        self
    }

    /// Set the post-load settle delay
    pub fn load_settle_ms(mut self, ms: u64) -> Self {
        self.options.load_settle = Duration::from_millis(ms);
        self
    }

    /// Set the post-advance settle delay
    pub fn transition_settle_ms(mut self, ms: u64) -> Self {
        self.options.transition_settle = Duration::from_millis(ms);
        self
    }

    /// Set the page event timeout
    pub fn event_timeout_ms(mut self, ms: u64) -> Self {
        self.options.event_timeout = Duration::from_millis(ms);
        self
    }

    /// Enable/disable code highlighting before captures
    pub fn highlight_code(mut self, enabled: bool) -> Self {
        self.options.highlight_code = enabled;
        self
    }

    /// Build the options
    pub fn build(self) -> SessionOptions {
        self.options
    }
}

/// `<prefix>slide-<sequence:03>.pdf`. Sequences of 1000 and above simply
/// get longer.
pub fn capture_file_name(prefix: &str, sequence: u32) -> String {
    format!(
        "{}slide-{:0width$}.pdf",
        prefix,
        sequence,
        width = SEQUENCE_WIDTH
    )
}
