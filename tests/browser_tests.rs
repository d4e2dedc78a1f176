//! Browser module tests
//!
//! These verify the browser configuration, PDF options, and slide source
//! resolution. Launching Chromium itself needs a local Chrome/Chromium and is
//! not covered here.

use deck_capture::browser::{BrowserConfig, PaperFormat, PdfOptions, SlideSource};
use deck_capture::error::{Error, NavigationError};
use deck_capture::reveal::RevealConfig;

#[test]
fn test_browser_config_default() {
    let config = BrowserConfig::default();
    assert!(config.headless);
    assert_eq!(config.width, 1600);
    assert_eq!(config.height, 1200);
    assert!(config.sandbox);
    assert_eq!(config.timeout_ms, 30000);
    assert!(config.chrome_path.is_none());
    assert!(config.extra_args.is_empty());
}

#[test]
fn test_browser_config_builder() {
    let config = BrowserConfig::builder()
        .headless(false)
        .viewport(1920, 1080)
        .sandbox(false)
        .timeout_ms(10000)
        .arg("--disable-gpu")
        .arg("--no-first-run")
        .build();

    assert!(!config.headless);
    assert_eq!(config.width, 1920);
    assert_eq!(config.height, 1080);
    assert!(!config.sandbox);
    assert_eq!(config.timeout_ms, 10000);
    assert_eq!(config.extra_args.len(), 2);
}

#[test]
fn test_paper_format_serialization() {
    let formats = [
        (PaperFormat::A3, "\"a3\""),
        (PaperFormat::A4, "\"a4\""),
        (PaperFormat::Letter, "\"letter\""),
        (PaperFormat::Legal, "\"legal\""),
    ];

    for (format, expected) in formats {
        assert_eq!(serde_json::to_string(&format).unwrap(), expected);
    }
}

#[test]
fn test_paper_sizes_are_portrait() {
    for format in [
        PaperFormat::A3,
        PaperFormat::A4,
        PaperFormat::Letter,
        PaperFormat::Legal,
    ] {
        let (width, height) = format.size_inches();
        assert!(width < height, "{:?} should be portrait", format);
    }
}

#[test]
fn test_pdf_options_roundtrip() {
    let opts = PdfOptions {
        paper: PaperFormat::Letter,
        landscape: false,
        print_background: true,
        emulate_screen: false,
    };

    let json = serde_json::to_string(&opts).unwrap();
    let back: PdfOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back.paper, PaperFormat::Letter);
    assert!(!back.landscape);
    assert!(!back.emulate_screen);
}

#[test]
fn test_slide_source_keeps_fragment() {
    let source = SlideSource::resolve("https://example.com/talk/#/2/1").unwrap();
    assert_eq!(source.url().fragment(), Some("/2/1"));
}

#[test]
fn test_slide_source_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let deck = dir.path().join("deck.html");
    std::fs::write(&deck, "<div class=\"reveal\"></div>").unwrap();

    let source = SlideSource::from_path(&deck).unwrap();
    assert!(source.is_local());
    assert_eq!(
        source.url().to_file_path().unwrap(),
        deck.canonicalize().unwrap()
    );
}

#[test]
fn test_slide_source_rejects_malformed_url() {
    let err = SlideSource::resolve("https://").unwrap_err();
    assert!(matches!(
        err,
        Error::Navigation(NavigationError::InvalidUrl(_))
    ));
}

#[test]
fn test_reveal_config_json_shape() {
    let json = serde_json::to_value(RevealConfig::capture()).unwrap();
    assert_eq!(json["controls"], false);
    assert_eq!(json["transition"], "none");
    assert_eq!(json["backgroundTransition"], "none");
    assert_eq!(json["history"], true);
}
