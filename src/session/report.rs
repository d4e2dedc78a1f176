//! Capture run summary

use crate::error::{CaptureError, Result};
use crate::reveal::SlideIndices;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Why a session stopped capturing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The capture bound was reached
    MaxCaptures,
    /// The deck reported its last position
    LastSlide,
}

/// One rendered file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedSlide {
    /// Sequence number used in the file name
    pub sequence: u32,
    /// Rendered file
    pub path: PathBuf,
    /// Deck position at capture time, if it could be read
    pub indices: Option<SlideIndices>,
}

/// Summary of a finished session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureReport {
    /// Deck URL
    pub source: String,
    /// Output prefix
    pub output_prefix: String,
    /// Files rendered, in order
    pub captures: Vec<CapturedSlide>,
    /// Why capturing stopped
    pub stop_reason: StopReason,
    /// Resource requests seen over the whole run
    pub resource_requests: u64,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// When the session finished
    pub finished_at: DateTime<Utc>,
}

impl CaptureReport {
    /// Number of rendered files
    pub fn capture_count(&self) -> usize {
        self.captures.len()
    }

    /// Rendered paths in order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.captures.iter().map(|c| c.path.as_path())
    }

    /// Write the report as pretty JSON
    pub async fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| CaptureError::WriteFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> CaptureReport {
        let now = Utc::now();
        CaptureReport {
            source: "file:///deck.html".to_string(),
            output_prefix: String::new(),
            captures: vec![
                CapturedSlide {
                    sequence: 0,
                    path: PathBuf::from("slide-000.pdf"),
                    indices: Some(SlideIndices { h: 0, v: 0, f: None }),
                },
                CapturedSlide {
                    sequence: 1,
                    path: PathBuf::from("slide-001.pdf"),
                    indices: None,
                },
            ],
            stop_reason: StopReason::LastSlide,
            resource_requests: 12,
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn test_report_accessors() {
        let report = report();
        assert_eq!(report.capture_count(), 2);
        let paths: Vec<_> = report.paths().collect();
        assert_eq!(paths, vec![Path::new("slide-000.pdf"), Path::new("slide-001.pdf")]);
    }

    #[test]
    fn test_report_serialization() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["stop_reason"], "last_slide");
        assert_eq!(json["captures"][0]["indices"]["h"], 0);
        assert!(json["captures"][1]["indices"].is_null());
    }

    #[tokio::test]
    async fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        report().write_json(&path).await.unwrap();

        let written: CaptureReport =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written.capture_count(), 2);
        assert_eq!(written.resource_requests, 12);
    }
}
