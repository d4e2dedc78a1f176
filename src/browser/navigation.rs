//! Slide source resolution
//!
//! Decks are given either as a URL or as a local file path. Paths are
//! canonicalised and turned into `file://` URLs before the browser sees them.

use crate::error::{Error, NavigationError, Result};
use std::path::Path;
use url::Url;

/// Longest URL accepted for navigation
pub const MAX_URL_LENGTH: usize = 2048;

const SCHEMES: [&str; 3] = ["http", "https", "file"];

/// URL validation utilities
pub struct UrlValidator;

impl UrlValidator {
    /// Validate a URL for navigation
    pub fn validate(url: &str) -> std::result::Result<Url, String> {
        if url.is_empty() {
            return Err("URL cannot be empty".to_string());
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(format!(
                "URL exceeds maximum length of {} characters",
                MAX_URL_LENGTH
            ));
        }

        let parsed = Url::parse(url).map_err(|e| format!("{}: {}", url, e))?;
        if !SCHEMES.contains(&parsed.scheme()) {
            return Err(format!(
                "URL must start with http://, https://, or file://: {}",
                url
            ));
        }

        Ok(parsed)
    }

    /// Whether `input` carries a URL scheme we navigate to
    pub fn has_scheme(input: &str) -> bool {
        let lower = input.to_ascii_lowercase();
        SCHEMES
            .iter()
            .any(|scheme| lower.starts_with(&format!("{}://", scheme)))
    }
}

/// A deck location resolved to a navigable URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideSource {
    url: Url,
}

impl SlideSource {
    /// Resolve a URL or a local path
    pub fn resolve(input: &str) -> Result<Self> {
        let input = input.trim();
        if UrlValidator::has_scheme(input) {
            let url = UrlValidator::validate(input).map_err(NavigationError::InvalidUrl)?;
            return Ok(Self { url });
        }
        if input.is_empty() {
            return Err(Error::config("slide source is required"));
        }
        Self::from_path(Path::new(input))
    }

    /// Resolve a local file
    pub fn from_path(path: &Path) -> Result<Self> {
        let invalid = |reason: String| NavigationError::InvalidPath {
            path: path.display().to_string(),
            reason,
        };

        let absolute = path.canonicalize().map_err(|e| invalid(e.to_string()))?;
        if !absolute.is_file() {
            return Err(invalid("not a file".to_string()).into());
        }

        let url = Url::from_file_path(&absolute)
            .map_err(|_| invalid("cannot be expressed as a file:// URL".to_string()))?;
        Ok(Self { url })
    }

    /// The URL to navigate to
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Whether the deck is a local file
    pub fn is_local(&self) -> bool {
        self.url.scheme() == "file"
    }
}

impl std::fmt::Display for SlideSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str())
    }
}
