//! CDP-backed page host
//!
//! Translates chromiumoxide page events into [`HostEvent`]s on a channel and
//! exposes evaluate/render on a single exclusively owned page.

use crate::browser::capture::{PagePrinter, PdfOptions};
use crate::browser::controller::{BrowserConfig, BrowserController, PageHandle};
use crate::error::{BrowserError, DeckError, Result};
use crate::host::{HostEvent, LoadStatus, PageHost};
use chromiumoxide::cdp::browser_protocol::network::EventRequestWillBeSent;
use chromiumoxide::cdp::browser_protocol::page::{
    EventFrameNavigated, EventNavigatedWithinDocument,
};
use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Page host driving one Chromium page
pub struct ChromePageHost {
    controller: Option<BrowserController>,
    page: PageHandle,
    pdf: PdfOptions,
    timeout_ms: u64,
    sender: mpsc::UnboundedSender<HostEvent>,
    events: mpsc::UnboundedReceiver<HostEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl ChromePageHost {
    /// Launch a browser and open the page the session will own
    #[instrument(skip(config, pdf))]
    pub async fn launch(config: BrowserConfig, pdf: PdfOptions) -> Result<Self> {
        let timeout_ms = config.timeout_ms;
        let controller = BrowserController::with_config(config).await?;

        let page = match Self::open_page(&controller, &pdf).await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = controller.close().await {
                    warn!("Failed to close browser after setup error: {}", close_err);
                }
                return Err(e);
            }
        };

        let (sender, events) = mpsc::unbounded_channel();
        let mut host = Self {
            controller: Some(controller),
            page,
            pdf,
            timeout_ms,
            sender,
            events,
            tasks: Vec::new(),
        };

        if let Err(e) = host.listen().await {
            if let Err(close_err) = host.close().await {
                warn!("Failed to close browser after setup error: {}", close_err);
            }
            return Err(e);
        }
        Ok(host)
    }

    async fn open_page(controller: &BrowserController, pdf: &PdfOptions) -> Result<PageHandle> {
        let page = controller.new_page().await?;
        PagePrinter::prepare(&page, pdf).await?;
        Ok(page)
    }

    /// Forward page events to the session channel
    async fn listen(&mut self) -> Result<()> {
        let page: Page = self.page.inner().clone();
        let main_frame = page.mainframe().await?;

        let mut navigated = page.event_listener::<EventFrameNavigated>().await?;
        let tx = self.sender.clone();
        self.tasks.push(tokio::spawn(async move {
            while let Some(event) = navigated.next().await {
                if event.frame.parent_id.is_some() {
                    continue;
                }
                if tx.send(HostEvent::UrlChanged(event.frame.url.clone())).is_err() {
                    break;
                }
            }
        }));

        let mut in_document = page.event_listener::<EventNavigatedWithinDocument>().await?;
        let tx = self.sender.clone();
        self.tasks.push(tokio::spawn(async move {
            while let Some(event) = in_document.next().await {
                if main_frame.as_ref().is_some_and(|id| *id != event.frame_id) {
                    continue;
                }
                if tx.send(HostEvent::UrlChanged(event.url.clone())).is_err() {
                    break;
                }
            }
        }));

        let mut requests = page.event_listener::<EventRequestWillBeSent>().await?;
        let tx = self.sender.clone();
        self.tasks.push(tokio::spawn(async move {
            while let Some(event) = requests.next().await {
                if tx
                    .send(HostEvent::ResourceRequested(event.request.url.clone()))
                    .is_err()
                {
                    break;
                }
            }
        }));

        let mut console = page.event_listener::<EventConsoleApiCalled>().await?;
        let tx = self.sender.clone();
        self.tasks.push(tokio::spawn(async move {
            while let Some(event) = console.next().await {
                let text = event
                    .args
                    .iter()
                    .map(|arg| match (&arg.value, &arg.description) {
                        (Some(Value::String(s)), _) => s.clone(),
                        (Some(value), _) => value.to_string(),
                        (None, Some(description)) => description.clone(),
                        (None, None) => String::new(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                if tx.send(HostEvent::ConsoleMessage(text)).is_err() {
                    break;
                }
            }
        }));

        debug!("Listening to page events");
        Ok(())
    }
}

impl PageHost for ChromePageHost {
    async fn load(&mut self, url: &str) -> Result<()> {
        let page = self.page.inner().clone();
        let tx = self.sender.clone();
        let url = url.to_string();
        let timeout_ms = self.timeout_ms;

        self.tasks.push(tokio::spawn(async move {
            let status =
                match tokio::time::timeout(Duration::from_millis(timeout_ms), page.goto(url.as_str()))
                    .await
                {
                    Ok(Ok(_)) => LoadStatus::Success,
                    Ok(Err(e)) => LoadStatus::Failure(e.to_string()),
                    Err(_) => LoadStatus::Failure(format!("timed out after {}ms", timeout_ms)),
                };
            let _ = tx.send(HostEvent::LoadFinished(status));
        }));
        Ok(())
    }

    async fn evaluate(&mut self, expression: &str) -> Result<Value> {
        let result = self
            .page
            .inner()
            .evaluate(expression)
            .await
            .map_err(|e| DeckError::ScriptFailed(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn render(&mut self, path: &Path) -> Result<()> {
        PagePrinter::print_to_file(&self.page, path, &self.pdf).await?;
        Ok(())
    }

    async fn next_event(&mut self) -> Option<HostEvent> {
        self.events.recv().await
    }

    async fn close(&mut self) -> Result<()> {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        let controller = self.controller.take().ok_or(BrowserError::AlreadyClosed)?;
        controller.close().await?;
        info!("Page host closed");
        Ok(())
    }
}
