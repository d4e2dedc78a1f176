//! reveal.js capability wrappers
//!
//! The deck is reached only through script evaluation on the page host.
//! Each wrapper evaluates one fixed expression and decodes its result.

use crate::error::{DeckError, Result};
use crate::host::PageHost;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

/// Page scripts evaluated against the deck
pub mod scripts {
    /// True when a usable `Reveal` object is present
    pub const IS_PRESENT: &str = "typeof Reveal === 'object' && Reveal !== null \
        && typeof Reveal.next === 'function' \
        && typeof Reveal.isLastSlide === 'function' \
        && typeof Reveal.getIndices === 'function' \
        && typeof Reveal.configure === 'function'";

    /// Current `{h, v, f}` position
    pub const INDICES: &str = "Reveal.getIndices()";

    /// Advance to the next position
    pub const NEXT: &str = "Reveal.next()";

    /// Whether the current position is the last one
    pub const IS_LAST: &str = "Reveal.isLastSlide()";

    /// Prefix of every configure call; the options object follows as JSON
    pub const CONFIGURE_PREFIX: &str = "Reveal.configure(";

    /// Removes the `fragment` class everywhere and returns how many were removed
    pub const STRIP_FRAGMENTS: &str = r#"
        (function() {
            var fragments = document.getElementsByClassName('fragment');
            var removed = fragments.length;
            for (var f = fragments.length - 1; f >= 0; f--) {
                fragments[f].classList.remove('fragment');
            }
            return removed;
        })()
    "#;

    /// Re-runs highlight.js if the deck ships it
    pub const HIGHLIGHT: &str = r#"
        (function() {
            if (typeof hljs !== 'object' || hljs === null) {
                return false;
            }
            if (typeof hljs.highlightAll === 'function') {
                hljs.highlightAll();
            } else if (typeof hljs.initHighlighting === 'function') {
                hljs.initHighlighting();
            } else {
                return false;
            }
            return true;
        })()
    "#;
}

/// Position of the deck as reported by `Reveal.getIndices()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideIndices {
    /// Horizontal index
    pub h: u32,
    /// Vertical index
    #[serde(default)]
    pub v: u32,
    /// Fragment index, when the slide has fragments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f: Option<i32>,
}

impl std::fmt::Display for SlideIndices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.h, self.v)
    }
}

/// Options passed to `Reveal.configure`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealConfig {
    /// Show navigation controls
    pub controls: bool,
    /// Slide transition style
    pub transition: String,
    /// Background transition style
    pub background_transition: String,
    /// Push each position into browser history, which changes the URL
    pub history: bool,
}

impl RevealConfig {
    /// Configuration used before capturing: no controls, no animation,
    /// and a URL change on every advance.
    pub fn capture() -> Self {
        Self {
            controls: false,
            transition: "none".to_string(),
            background_transition: "none".to_string(),
            history: true,
        }
    }

    /// Script applying this configuration
    pub fn script(&self) -> Result<String> {
        Ok(format!(
            "{}{}); true",
            scripts::CONFIGURE_PREFIX,
            serde_json::to_string(self)?
        ))
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self::capture()
    }
}

/// Capability wrappers over a reveal.js deck
pub struct RevealDeck;

impl RevealDeck {
    /// Whether the framework is present on the loaded page
    #[instrument(skip(host))]
    pub async fn is_present<H: PageHost>(host: &mut H) -> Result<bool> {
        let value = host.evaluate(scripts::IS_PRESENT).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Current position
    pub async fn indices<H: PageHost>(host: &mut H) -> Result<SlideIndices> {
        let value = host.evaluate(scripts::INDICES).await?;
        serde_json::from_value(value.clone()).map_err(|_| {
            DeckError::UnexpectedValue {
                script: scripts::INDICES.to_string(),
                value: value.to_string(),
            }
            .into()
        })
    }

    /// Request the next position. The deck changes asynchronously.
    pub async fn next<H: PageHost>(host: &mut H) -> Result<()> {
        host.evaluate(scripts::NEXT).await?;
        Ok(())
    }

    /// Whether the current position is the last one
    pub async fn is_last_slide<H: PageHost>(host: &mut H) -> Result<bool> {
        let value = host.evaluate(scripts::IS_LAST).await?;
        expect_bool(scripts::IS_LAST, value)
    }

    /// Apply `config` deck-wide
    #[instrument(skip(host))]
    pub async fn configure<H: PageHost>(host: &mut H, config: &RevealConfig) -> Result<()> {
        host.evaluate(&config.script()?).await?;
        Ok(())
    }

    /// Remove every fragment marker. Returns the number removed; running
    /// it again on a stripped document removes nothing.
    pub async fn strip_fragments<H: PageHost>(host: &mut H) -> Result<u64> {
        let value = host.evaluate(scripts::STRIP_FRAGMENTS).await?;
        value.as_u64().ok_or_else(|| {
            DeckError::UnexpectedValue {
                script: "strip fragments".to_string(),
                value: value.to_string(),
            }
            .into()
        })
    }

    /// Disable transitions and fragment animations
    #[instrument(skip(host))]
    pub async fn disable_animations<H: PageHost>(host: &mut H) -> Result<u64> {
        Self::configure(host, &RevealConfig::capture()).await?;
        let removed = Self::strip_fragments(host).await?;
        debug!("Removed {} fragment markers", removed);
        Ok(removed)
    }

    /// Re-run code highlighting. Returns false when highlight.js is absent.
    pub async fn highlight_code<H: PageHost>(host: &mut H) -> Result<bool> {
        let value = host.evaluate(scripts::HIGHLIGHT).await?;
        Ok(value.as_bool().unwrap_or(false))
    }
}

fn expect_bool(script: &str, value: Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| {
        DeckError::UnexpectedValue {
            script: script.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_capture_config_script() {
        let script = RevealConfig::capture().script().unwrap();
        assert!(script.starts_with(scripts::CONFIGURE_PREFIX));
        assert!(script.contains(r#""controls":false"#));
        assert!(script.contains(r#""transition":"none""#));
        assert!(script.contains(r#""backgroundTransition":"none""#));
        assert!(script.contains(r#""history":true"#));
    }

    #[test]
    fn test_indices_without_fragment() {
        let indices: SlideIndices = serde_json::from_value(json!({"h": 3, "v": 1})).unwrap();
        assert_eq!(indices.h, 3);
        assert_eq!(indices.v, 1);
        assert!(indices.f.is_none());
        assert_eq!(indices.to_string(), "3/1");
    }

    #[test]
    fn test_indices_with_fragment() {
        let indices: SlideIndices =
            serde_json::from_value(json!({"h": 0, "v": 0, "f": -1})).unwrap();
        assert_eq!(indices.f, Some(-1));
    }

    #[test]
    fn test_expect_bool() {
        assert!(expect_bool(scripts::IS_LAST, json!(true)).unwrap());
        assert!(expect_bool(scripts::IS_LAST, Value::Null).is_err());
    }
}
