//! Browser automation module
//!
//! This module provides the Chromium side of a capture run through
//! ChromiumOxide: lifecycle management, slide source resolution, PDF
//! rendering, and the CDP-backed [`PageHost`](crate::host::PageHost).

pub mod capture;
pub mod controller;
pub mod navigation;
pub mod page_host;

pub use capture::{PagePrinter, PaperFormat, PdfOptions};
pub use controller::{BrowserConfig, BrowserConfigBuilder, BrowserController, PageHandle};
pub use navigation::{SlideSource, UrlValidator};
pub use page_host::ChromePageHost;
