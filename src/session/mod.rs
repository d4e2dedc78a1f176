//! Capture controller
//!
//! A [`CaptureSession`] owns a [`PageHost`] for one traversal of a deck and
//! walks it through an explicit state machine:
//!
//! ```text
//! Loading ─▶ AwaitingFrameworkCheck ─▶ Settling ─▶ Configuring ─▶ Capturing
//!                                                                  │   ▲
//!                                                                  ▼   │
//!                                                           AwaitingAdvance
//! ```
//!
//! Every live state can move to `Terminated`. The session is single threaded
//! and event driven: host events are handled one at a time by a single
//! dispatch point, and the two settle delays are armed timers raced against
//! those events. Events that arrive while a timer runs are still processed,
//! in order, but cannot trigger a capture.
//!
//! The settle delays are fixed approximations of "the page is ready"; nothing
//! observes asset loading or transition completion directly.

mod options;
mod report;
mod state;

pub use options::{
    capture_file_name, SessionOptions, SessionOptionsBuilder, DEFAULT_EVENT_TIMEOUT_MS,
    DEFAULT_LOAD_SETTLE_MS, DEFAULT_TRANSITION_SETTLE_MS, SEQUENCE_WIDTH,
};
pub use report::{CaptureReport, CapturedSlide, StopReason};
pub use state::SessionState;

use crate::error::{DeckError, NavigationError, Result, SessionError};
use crate::host::{HostEvent, LoadStatus, PageHost};
use crate::reveal::RevealDeck;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, trace, warn};

/// Stand-in deadline for event timeouts too large to add to `Instant::now()`
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Which settle delay a timer represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    LoadSettle,
    TransitionSettle,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    kind: TimerKind,
    deadline: Instant,
}

enum Wake {
    Timer(TimerKind),
    Event(Option<HostEvent>),
    TimedOut,
}

/// One traversal of one deck
pub struct CaptureSession<H: PageHost> {
    host: H,
    options: SessionOptions,
    state: SessionState,
    timer: Option<Timer>,
    wait_deadline: Instant,
    capture_count: u32,
    pending_resources: u64,
    resource_requests: u64,
    captures: Vec<CapturedSlide>,
    stop_reason: Option<StopReason>,
    started_at: DateTime<Utc>,
}

impl<H: PageHost> CaptureSession<H> {
    /// Create a session that will drive `host`
    pub fn new(host: H, options: SessionOptions) -> Self {
        Self {
            host,
            options,
            state: SessionState::Loading,
            timer: None,
            wait_deadline: Instant::now(),
            capture_count: 0,
            pending_resources: 0,
            resource_requests: 0,
            captures: Vec::new(),
            stop_reason: None,
            started_at: Utc::now(),
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Files rendered so far
    pub fn capture_count(&self) -> u32 {
        self.capture_count
    }

    /// Resource requests since the last URL change. Diagnostic only.
    pub fn pending_resources(&self) -> u64 {
        self.pending_resources
    }

    /// Whether the page has reported its first load
    pub fn load_completed(&self) -> bool {
        self.state != SessionState::Loading
    }

    /// Session options
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// The page host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Run the session to completion.
    ///
    /// The host is closed on every exit path. Any error leaves the session in
    /// [`SessionState::Terminated`].
    #[instrument(skip(self), fields(source = %self.options.slide_source))]
    pub async fn run(&mut self) -> Result<CaptureReport> {
        if self.state != SessionState::Loading {
            return Err(SessionError::AlreadyStarted(self.state).into());
        }
        self.started_at = Utc::now();

        let outcome = self.drive().await;
        if let Err(ref e) = outcome {
            error!("Capture aborted after {} pages: {}", self.capture_count, e);
            self.terminate();
        }

        if let Err(e) = self.host.close().await {
            warn!("Failed to close page host: {}", e);
        }
        outcome
    }

    async fn drive(&mut self) -> Result<CaptureReport> {
        info!("Loading {}", self.options.slide_source);
        let source = self.options.slide_source.clone();
        self.restart_wait();
        self.host.load(&source).await?;

        while !self.state.is_terminal() {
            let wake = match self.timer {
                Some(timer) => {
                    tokio::select! {
                        biased;
                        Some(event) = self.host.next_event() => Wake::Event(Some(event)),
                        _ = tokio::time::sleep_until(timer.deadline) => Wake::Timer(timer.kind),
                    }
                }
                // Only a state change moves the deadline; unrelated events do not
                None => {
                    let deadline = self.wait_deadline;
                    tokio::select! {
                        biased;
                        event = self.host.next_event() => Wake::Event(event),
                        _ = tokio::time::sleep_until(deadline) => Wake::TimedOut,
                    }
                }
            };

            match wake {
                Wake::Timer(kind) => {
                    self.timer = None;
                    self.on_timer(kind).await?;
                }
                Wake::Event(Some(event)) => self.dispatch(event).await?,
                Wake::Event(None) => return Err(SessionError::HostClosed(self.state).into()),
                Wake::TimedOut => {
                    return Err(SessionError::EventTimeout {
                        state: self.state,
                        waited_ms: u64::try_from(self.options.event_timeout.as_millis())
                            .unwrap_or(u64::MAX),
                    }
                    .into())
                }
            }
        }

        Ok(self.report())
    }

    async fn dispatch(&mut self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::LoadFinished(status) => self.on_load_finished(status).await,
            HostEvent::UrlChanged(url) => {
                self.on_url_changed(&url);
                Ok(())
            }
            HostEvent::ResourceRequested(url) => {
                self.pending_resources += 1;
                self.resource_requests += 1;
                trace!(pending = self.pending_resources, "Resource requested: {}", url);
                Ok(())
            }
            HostEvent::ConsoleMessage(message) => {
                debug!("CONSOLE: {}", message);
                Ok(())
            }
        }
    }

    async fn on_load_finished(&mut self, status: LoadStatus) -> Result<()> {
        if self.load_completed() {
            warn!("Second load detected ({:?}), ignoring", status);
            return Ok(());
        }

        if let LoadStatus::Failure(reason) = status {
            return Err(NavigationError::LoadFailed(format!(
                "error loading {}: {}",
                self.options.slide_source, reason
            ))
            .into());
        }
        info!("Loaded {}", self.options.slide_source);

        self.transition(SessionState::AwaitingFrameworkCheck)?;
        if !RevealDeck::is_present(&mut self.host).await? {
            return Err(DeckError::NotDetected(self.options.slide_source.clone()).into());
        }

        self.transition(SessionState::Settling)?;
        info!(
            "Waiting {}ms after initial load",
            self.options.load_settle.as_millis()
        );
        self.arm(TimerKind::LoadSettle, self.options.load_settle);
        Ok(())
    }

    fn on_url_changed(&mut self, url: &str) {
        self.pending_resources = 0;

        if self.capture_count == 0 {
            debug!("URL changed before first capture, ignoring: {}", url);
            return;
        }
        if self.state != SessionState::AwaitingAdvance || self.timer.is_some() {
            debug!("URL changed while {}, ignoring: {}", self.state, url);
            return;
        }

        debug!("Advanced to {}", url);
        self.arm(TimerKind::TransitionSettle, self.options.transition_settle);
    }

    async fn on_timer(&mut self, kind: TimerKind) -> Result<()> {
        match kind {
            TimerKind::LoadSettle => {
                self.transition(SessionState::Configuring)?;
                RevealDeck::disable_animations(&mut self.host).await?;
                self.transition(SessionState::Capturing)?;
            }
            TimerKind::TransitionSettle => self.transition(SessionState::Capturing)?,
        }
        self.capture().await
    }

    /// Render the current position, then either stop or ask for the next one.
    async fn capture(&mut self) -> Result<()> {
        let indices = match RevealDeck::indices(&mut self.host).await {
            Ok(indices) => Some(indices),
            Err(e) => {
                warn!("Could not read slide indices: {}", e);
                None
            }
        };

        if self.options.highlight_code {
            if let Err(e) = RevealDeck::highlight_code(&mut self.host).await {
                debug!("Code highlighting skipped: {}", e);
            }
        }

        let sequence = self.capture_count;
        let path = self.options.capture_path(sequence);
        self.host.render(&path).await?;
        self.capture_count += 1;
        self.captures.push(CapturedSlide {
            sequence,
            path,
            indices,
        });

        match indices {
            Some(at) => info!("Captured {} pages (slide {})", self.capture_count, at),
            None => info!("Captured {} pages", self.capture_count),
        }

        if let Some(reason) = self.stop_condition().await? {
            debug!("Stopping: {:?}", reason);
            self.stop_reason = Some(reason);
            return self.transition(SessionState::Terminated);
        }

        self.transition(SessionState::AwaitingAdvance)?;
        RevealDeck::next(&mut self.host).await
    }

    async fn stop_condition(&mut self) -> Result<Option<StopReason>> {
        if self.options.reached_max(self.capture_count) {
            return Ok(Some(StopReason::MaxCaptures));
        }
        if RevealDeck::is_last_slide(&mut self.host).await? {
            return Ok(Some(StopReason::LastSlide));
        }
        Ok(None)
    }

    fn arm(&mut self, kind: TimerKind, delay: Duration) {
        self.timer = Some(Timer {
            kind,
            deadline: Instant::now() + delay,
        });
    }

    fn transition(&mut self, next: SessionState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(SessionError::IllegalTransition {
                from: self.state,
                to: next,
            }
            .into());
        }
        debug!("State: {} -> {}", self.state, next);
        self.state = next;
        self.restart_wait();
        Ok(())
    }

    fn restart_wait(&mut self) {
        let now = Instant::now();
        self.wait_deadline = now
            .checked_add(self.options.event_timeout)
            .unwrap_or_else(|| now + FAR_FUTURE);
    }

    fn terminate(&mut self) {
        self.timer = None;
        self.state = SessionState::Terminated;
    }

    fn report(&self) -> CaptureReport {
        CaptureReport {
            source: self.options.slide_source.clone(),
            output_prefix: self.options.output_prefix.clone(),
            captures: self.captures.clone(),
            stop_reason: self.stop_reason.unwrap_or(StopReason::LastSlide),
            resource_requests: self.resource_requests,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}
