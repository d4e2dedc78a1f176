//! Error types for deck capture
//!
//! This module provides the error hierarchy using `thiserror`. Every variant
//! is fatal for a capture run: the session terminates and no retry happens.

use crate::session::SessionState;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for deck capture operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration supplied before a session exists
    #[error("Configuration error: {0}")]
    Config(String),

    /// Browser-related errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Navigation errors
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Capture errors (PDF rendering, output files)
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Presentation framework errors
    #[error("Deck error: {0}")]
    Deck(#[from] DeckError),

    /// Capture session state machine errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),
}

/// Browser lifecycle and control errors
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Failed to launch browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Browser configuration error
    #[error("Invalid browser configuration: {0}")]
    ConfigError(String),

    /// Failed to create new page/tab
    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),

    /// Browser already closed
    #[error("Browser already closed")]
    AlreadyClosed,
}

/// Navigation errors
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Local slide path could not be resolved
    #[error("Invalid slide path {path}: {reason}")]
    InvalidPath {
        /// Path as given
        path: String,
        /// Why it could not be used
        reason: String,
    },

    /// Page load failed
    #[error("Page load failed: {0}")]
    LoadFailed(String),
}

/// Capture errors
#[derive(Error, Debug)]
pub enum CaptureError {
    /// PDF generation failed
    #[error("PDF generation failed: {0}")]
    PdfFailed(String),

    /// Rendered output could not be written
    #[error("Failed to write {path}: {reason}")]
    WriteFailed {
        /// Target file
        path: PathBuf,
        /// Underlying I/O failure
        reason: String,
    },
}

/// Presentation framework errors
#[derive(Error, Debug)]
pub enum DeckError {
    /// No usable Reveal object on the loaded page
    #[error("A Reveal object cannot be detected on {0}")]
    NotDetected(String),

    /// Script evaluation inside the page failed
    #[error("Script evaluation failed: {0}")]
    ScriptFailed(String),

    /// Script returned a value of the wrong shape
    #[error("Unexpected value from `{script}`: {value}")]
    UnexpectedValue {
        /// Script that was evaluated
        script: String,
        /// Value it produced
        value: String,
    },
}

/// Capture session errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// State machine refused a transition
    #[error("Illegal state transition: {from} -> {to}")]
    IllegalTransition {
        /// Current state
        from: SessionState,
        /// Requested state
        to: SessionState,
    },

    /// `run` called on a session that already left `Loading`
    #[error("Session already started (state: {0})")]
    AlreadyStarted(SessionState),

    /// The session stayed in one waiting state longer than the configured bound
    #[error("No progress within {waited_ms}ms while {state}")]
    EventTimeout {
        /// State the session was waiting in
        state: SessionState,
        /// How long it waited in that state
        waited_ms: u64,
    },

    /// The page host stopped delivering events
    #[error("Page host closed its event stream while {0}")]
    HostClosed(SessionState),
}

/// Result type alias for deck capture operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error from a string
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}
