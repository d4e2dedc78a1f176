//! Deck Capture - reveal.js slide decks to numbered PDF pages
//!
//! This crate loads a reveal.js presentation in headless Chromium, switches
//! off its transitions and fragment animations, then renders every slide to
//! its own PDF file while stepping the deck forward.
//!
//! # Architecture
//!
//! ```text
//! CLI ──▶ CaptureSession ──▶ PageHost (ChromePageHost, CDP)
//!              │                    │
//!              ▼                    ▼
//!         RevealDeck ──────▶ evaluate / render / events
//!              │
//!              ▼
//!   slide-000.pdf, slide-001.pdf, ...
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use deck_capture::browser::{BrowserConfig, ChromePageHost, PdfOptions, SlideSource};
//! use deck_capture::session::{CaptureSession, SessionOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = SlideSource::resolve("talk/index.html")?;
//!     let host = ChromePageHost::launch(BrowserConfig::default(), PdfOptions::default()).await?;
//!
//!     let options = SessionOptions::builder(source.to_string())
//!         .output_prefix("build/")
//!         .build();
//!     let report = CaptureSession::new(host, options).run().await?;
//!
//!     println!("Captured {} slides", report.capture_count());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod browser;
pub mod error;
pub mod host;
pub mod reveal;
pub mod session;

// Re-exports for convenience
pub use error::{Error, Result};
pub use host::{HostEvent, LoadStatus, PageHost};
pub use session::{CaptureReport, CaptureSession, SessionOptions, SessionState};
