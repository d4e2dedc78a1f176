//! Scripted page host for driving capture sessions without a browser.

#![allow(dead_code)]

use deck_capture::error::{DeckError, Result};
use deck_capture::reveal::scripts;
use deck_capture::{HostEvent, LoadStatus, PageHost};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One call the session made into the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Load(String),
    Evaluate(String),
    Render(PathBuf),
    Close,
}

/// In-memory stand-in for a page showing a reveal.js deck
pub struct ScriptedDeck {
    /// Number of positions in the deck
    pub slides: u32,
    /// Current position
    pub position: u32,
    /// Whether `Reveal` exists on the page
    pub reveal_present: bool,
    /// Result reported for the load request
    pub load_status: LoadStatus,
    /// Deliver a second load-finished after the first
    pub duplicate_load: bool,
    /// Deliver a URL change ahead of the load-finished event
    pub early_url_change: bool,
    /// Announce each advance with a URL change
    pub url_changes: bool,
    /// Announce each advance with two URL changes
    pub duplicate_url_change: bool,
    /// Deliver a URL change right after the load-finished event
    pub url_change_after_load: bool,
    /// Emit a console message this often once the queue is empty
    pub idle_chatter: Option<Duration>,
    /// Resource requests emitted with every load and advance
    pub resources_per_page: u32,
    /// Never resolve `next_event` once the queue is empty
    pub hang_when_idle: bool,
    /// Elements still carrying the `fragment` class
    pub fragments: u64,
    /// Whether transitions have been switched off
    pub configured: bool,
    pub events: VecDeque<HostEvent>,
    pub calls: Vec<HostCall>,
    pub closed: bool,
}

impl ScriptedDeck {
    pub fn new(slides: u32) -> Self {
        Self {
            slides,
            position: 0,
            reveal_present: true,
            load_status: LoadStatus::Success,
            duplicate_load: false,
            early_url_change: false,
            url_changes: true,
            duplicate_url_change: false,
            url_change_after_load: false,
            idle_chatter: None,
            resources_per_page: 0,
            hang_when_idle: false,
            fragments: 4,
            configured: false,
            events: VecDeque::new(),
            calls: Vec::new(),
            closed: false,
        }
    }

    fn url(&self) -> String {
        format!("file:///deck/index.html#/{}", self.position)
    }

    fn request_resources(&mut self) {
        for i in 0..self.resources_per_page {
            self.events.push_back(HostEvent::ResourceRequested(format!(
                "file:///deck/img/{}-{}.png",
                self.position, i
            )));
        }
    }

    /// Paths passed to `render`, in call order
    pub fn rendered(&self) -> Vec<PathBuf> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Render(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of times `expression` was evaluated
    pub fn evaluations(&self, expression: &str) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::Evaluate(e) if e == expression))
            .count()
    }

    /// Whether any script at all was evaluated
    pub fn evaluated_anything(&self) -> bool {
        self.calls
            .iter()
            .any(|call| matches!(call, HostCall::Evaluate(_)))
    }

    /// Renders and advances only, in call order: `R` or `N`
    pub fn render_advance_trace(&self) -> String {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Render(_) => Some('R'),
                HostCall::Evaluate(e) if e == scripts::NEXT => Some('N'),
                _ => None,
            })
            .collect()
    }
}

impl PageHost for ScriptedDeck {
    async fn load(&mut self, url: &str) -> Result<()> {
        self.calls.push(HostCall::Load(url.to_string()));
        if self.early_url_change {
            self.events.push_back(HostEvent::UrlChanged(self.url()));
        }
        self.request_resources();
        self.events
            .push_back(HostEvent::LoadFinished(self.load_status.clone()));
        if self.url_change_after_load {
            self.events.push_back(HostEvent::UrlChanged(self.url()));
        }
        if self.duplicate_load {
            self.events
                .push_back(HostEvent::LoadFinished(LoadStatus::Success));
        }
        Ok(())
    }

    async fn evaluate(&mut self, expression: &str) -> Result<Value> {
        self.calls.push(HostCall::Evaluate(expression.to_string()));

        if expression == scripts::IS_PRESENT {
            return Ok(json!(self.reveal_present));
        }
        if !self.reveal_present {
            return Err(DeckError::ScriptFailed("ReferenceError: Reveal is not defined".into()).into());
        }

        if expression == scripts::INDICES {
            Ok(json!({ "h": self.position, "v": 0 }))
        } else if expression == scripts::NEXT {
            if self.position + 1 < self.slides {
                self.position += 1;
                self.request_resources();
                if self.url_changes {
                    self.events.push_back(HostEvent::UrlChanged(self.url()));
                }
                if self.duplicate_url_change {
                    self.events.push_back(HostEvent::UrlChanged(self.url()));
                }
            }
            Ok(Value::Null)
        } else if expression == scripts::IS_LAST {
            Ok(json!(self.position + 1 >= self.slides))
        } else if expression.starts_with(scripts::CONFIGURE_PREFIX) {
            self.configured = true;
            Ok(json!(true))
        } else if expression == scripts::STRIP_FRAGMENTS {
            let removed = self.fragments;
            self.fragments = 0;
            Ok(json!(removed))
        } else if expression == scripts::HIGHLIGHT {
            Ok(json!(false))
        } else {
            Err(DeckError::ScriptFailed(format!("unexpected script: {}", expression)).into())
        }
    }

    async fn render(&mut self, path: &Path) -> Result<()> {
        self.calls.push(HostCall::Render(path.to_path_buf()));
        if path.is_absolute() {
            std::fs::write(path, format!("%PDF-1.4 slide {}\n", self.position))?;
        }
        Ok(())
    }

    async fn next_event(&mut self) -> Option<HostEvent> {
        if let Some(event) = self.events.pop_front() {
            return Some(event);
        }
        if let Some(every) = self.idle_chatter {
            tokio::time::sleep(every).await;
            return Some(HostEvent::ConsoleMessage("polling".to_string()));
        }
        if self.hang_when_idle {
            return std::future::pending().await;
        }
        None
    }

    async fn close(&mut self) -> Result<()> {
        self.calls.push(HostCall::Close);
        self.closed = true;
        Ok(())
    }
}
