//! PDF rendering of the current page state

use crate::browser::PageHandle;
use crate::error::{CaptureError, Result};
use chromiumoxide::cdp::browser_protocol::emulation::SetEmulatedMediaParams;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Paper sizes, in inches (portrait)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaperFormat {
    /// ISO A3
    A3,
    /// ISO A4
    #[default]
    A4,
    /// US Letter
    Letter,
    /// US Legal
    Legal,
}

impl PaperFormat {
    /// `(width, height)` in inches, portrait orientation
    pub fn size_inches(self) -> (f64, f64) {
        match self {
            PaperFormat::A3 => (11.69, 16.54),
            PaperFormat::A4 => (8.27, 11.69),
            PaperFormat::Letter => (8.5, 11.0),
            PaperFormat::Legal => (8.5, 14.0),
        }
    }
}

impl std::str::FromStr for PaperFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a3" => Ok(PaperFormat::A3),
            "a4" => Ok(PaperFormat::A4),
            "letter" => Ok(PaperFormat::Letter),
            "legal" => Ok(PaperFormat::Legal),
            other => Err(format!(
                "unknown paper format '{}' (expected a3, a4, letter or legal)",
                other
            )),
        }
    }
}

/// Options for PDF rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfOptions {
    /// Paper size
    #[serde(default)]
    pub paper: PaperFormat,
    /// Landscape orientation
    #[serde(default = "default_true")]
    pub landscape: bool,
    /// Print background graphics
    #[serde(default = "default_true")]
    pub print_background: bool,
    /// Render with `screen` media so the PDF shows what is on screen
    #[serde(default = "default_true")]
    pub emulate_screen: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            paper: PaperFormat::A4,
            landscape: true,
            print_background: true,
            emulate_screen: true,
        }
    }
}

impl PdfOptions {
    fn params(&self) -> PrintToPdfParams {
        let (width, height) = self.paper.size_inches();
        PrintToPdfParams::builder()
            .landscape(self.landscape)
            .print_background(self.print_background)
            .paper_width(width)
            .paper_height(height)
            .margin_top(0.0)
            .margin_bottom(0.0)
            .margin_left(0.0)
            .margin_right(0.0)
            .build()
    }
}

/// Renders pages to PDF files
pub struct PagePrinter;

impl PagePrinter {
    /// Switch the page to `screen` media when requested
    #[instrument(skip(page))]
    pub async fn prepare(page: &PageHandle, options: &PdfOptions) -> Result<()> {
        if options.emulate_screen {
            page.page
                .execute(SetEmulatedMediaParams::builder().media("screen").build())
                .await?;
            debug!("Emulating screen media");
        }
        Ok(())
    }

    /// Print the current page state to `path`. Returns the bytes written.
    #[instrument(skip(page))]
    pub async fn print_to_file(page: &PageHandle, path: &Path, options: &PdfOptions) -> Result<usize> {
        let data = page
            .page
            .pdf(options.params())
            .await
            .map_err(|e| CaptureError::PdfFailed(e.to_string()))?;

        let write_failed = |e: std::io::Error| CaptureError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(write_failed)?;
        }
        tokio::fs::write(path, &data).await.map_err(write_failed)?;

        debug!("PDF written to {}: {} bytes", path.display(), data.len());
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_options_default() {
        let opts = PdfOptions::default();
        assert_eq!(opts.paper, PaperFormat::A4);
        assert!(opts.landscape);
        assert!(opts.print_background);
        assert!(opts.emulate_screen);
    }

    #[test]
    fn test_pdf_params() {
        let params = PdfOptions::default().params();
        assert_eq!(params.landscape, Some(true));
        assert_eq!(params.paper_width, Some(8.27));
        assert_eq!(params.paper_height, Some(11.69));
        assert_eq!(params.margin_top, Some(0.0));
    }

    #[test]
    fn test_paper_format_parse() {
        assert_eq!("A4".parse::<PaperFormat>().unwrap(), PaperFormat::A4);
        assert_eq!("letter".parse::<PaperFormat>().unwrap(), PaperFormat::Letter);
        assert!("tabloid".parse::<PaperFormat>().is_err());
    }

    #[test]
    fn test_pdf_options_deserialize_defaults() {
        let opts: PdfOptions = serde_json::from_str(r#"{"paper": "letter"}"#).unwrap();
        assert_eq!(opts.paper, PaperFormat::Letter);
        assert!(opts.landscape);
        assert!(opts.emulate_screen);
    }
}
