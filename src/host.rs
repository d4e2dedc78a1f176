//! Page host capability contract
//!
//! The capture session never talks to a browser directly. It drives a
//! [`PageHost`]: something that can load a URL, evaluate script in the loaded
//! document, render the current state to a file, and report lifecycle events.
//! [`crate::browser::ChromePageHost`] is the CDP-backed implementation.

use crate::error::Result;
use serde_json::Value;
use std::path::Path;

/// Outcome of a page load request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The document finished loading
    Success,
    /// The load failed; the payload describes why
    Failure(String),
}

/// Lifecycle events emitted by a page host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A requested load finished (successfully or not)
    LoadFinished(LoadStatus),
    /// The document URL changed (navigation or in-document history change)
    UrlChanged(String),
    /// The page issued a resource request
    ResourceRequested(String),
    /// The page wrote to its console
    ConsoleMessage(String),
}

/// Capabilities the capture session needs from a page host.
///
/// The session owns its host exclusively and calls these one at a time.
/// `next_event` must be cancel-safe: the session races it against timers.
#[allow(async_fn_in_trait)]
pub trait PageHost {
    /// Start loading `url`. Completion is reported as [`HostEvent::LoadFinished`].
    async fn load(&mut self, url: &str) -> Result<()>;

    /// Evaluate a script expression in the page and return its JSON value.
    ///
    /// `undefined` results map to [`Value::Null`].
    async fn evaluate(&mut self, expression: &str) -> Result<Value>;

    /// Render the current visual state to `path`.
    async fn render(&mut self, path: &Path) -> Result<()>;

    /// Next pending event, or `None` once the host can deliver no more.
    async fn next_event(&mut self) -> Option<HostEvent>;

    /// Release the page and everything behind it.
    async fn close(&mut self) -> Result<()>;
}
