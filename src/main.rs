//! Deck Capture CLI
//!
//! Renders every slide of a reveal.js deck to `<prefix>slide-NNN.pdf`.

use anyhow::Context;
use clap::Parser;
use deck_capture::browser::{BrowserConfig, ChromePageHost, PaperFormat, PdfOptions, SlideSource};
use deck_capture::session::{
    CaptureSession, SessionOptions, DEFAULT_EVENT_TIMEOUT_MS, DEFAULT_LOAD_SETTLE_MS,
    DEFAULT_TRANSITION_SETTLE_MS,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Capture a reveal.js deck to one PDF per slide
#[derive(Parser, Debug)]
#[command(name = "deck-capture")]
#[command(version)]
#[command(about = "Capture a reveal.js deck to one PDF file per slide")]
struct Args {
    /// URL or local path of the deck
    slides: String,

    /// Prefix prepended to every output file name (e.g. "build/")
    #[arg(default_value = "")]
    output_prefix: String,

    /// Stop after this many captures (0 = until the last slide)
    #[arg(short = 'n', long, default_value_t = 0)]
    max_captures: u32,

    /// Milliseconds to wait after each slide change before capturing
    #[arg(long, default_value_t = DEFAULT_TRANSITION_SETTLE_MS)]
    transition_wait: u64,

    /// Milliseconds to wait after the initial load before configuring the deck
    #[arg(long, default_value_t = DEFAULT_LOAD_SETTLE_MS)]
    settle_wait: u64,

    /// Milliseconds to wait for any page event or navigation
    #[arg(long, default_value_t = DEFAULT_EVENT_TIMEOUT_MS)]
    timeout: u64,

    /// Path to Chrome/Chromium executable
    #[arg(long)]
    chrome_path: Option<String>,

    /// Disable the Chromium sandbox
    #[arg(long)]
    no_sandbox: bool,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Viewport width
    #[arg(long, default_value_t = 1600)]
    width: u32,

    /// Viewport height
    #[arg(long, default_value_t = 1200)]
    height: u32,

    /// Paper format (a3, a4, letter, legal)
    #[arg(long, default_value = "a4")]
    paper: PaperFormat,

    /// Portrait pages instead of landscape
    #[arg(long)]
    portrait: bool,

    /// Do not re-run highlight.js before each capture
    #[arg(long)]
    no_highlight: bool,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let source = SlideSource::resolve(&args.slides)
        .with_context(|| format!("cannot use '{}' as slide source", args.slides))?;

    let options = SessionOptions::builder(source.to_string())
        .output_prefix(args.output_prefix)
        .max_captures(Some(args.max_captures))
        .load_settle_ms(args.settle_wait)
        .transition_settle_ms(args.transition_wait)
        .event_timeout_ms(args.timeout)
        .highlight_code(!args.no_highlight)
        .build();
    tracing::info!("Capturing with options {:?}", options);

    let mut browser = BrowserConfig::builder()
        .headless(!args.headful)
        .sandbox(!args.no_sandbox)
        .viewport(args.width, args.height)
        .timeout_ms(args.timeout);
    if let Some(path) = args.chrome_path {
        browser = browser.chrome_path(path);
    }

    let pdf = PdfOptions {
        paper: args.paper,
        landscape: !args.portrait,
        ..PdfOptions::default()
    };

    let host = ChromePageHost::launch(browser.build(), pdf)
        .await
        .context("failed to start browser")?;
    let mut session = CaptureSession::new(host, options);
    let report = session.run().await?;

    tracing::info!(
        "Done: {} pages captured ({:?})",
        report.capture_count(),
        report.stop_reason
    );

    if let Some(path) = args.manifest {
        report
            .write_json(&path)
            .await
            .with_context(|| format!("failed to write manifest {}", path.display()))?;
        tracing::info!("Manifest written to {}", path.display());
    }

    Ok(())
}
