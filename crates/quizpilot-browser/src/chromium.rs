//! Chromium-backed quiz browser.
//!
//! Drives a real quiz page over the DevTools protocol: poll-waits for the
//! configured selectors, reads option texts, clicks by trimmed text match,
//! and checks the success indicator after the configured settle time.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use quizpilot_core::error::BrowserError;
use quizpilot_core::traits::QuizBrowser;

use crate::config::{QuizConfig, Selectors};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// [`QuizBrowser`] over a Chromium instance.
pub struct ChromiumQuizBrowser {
    /// Keeps the Chromium child alive; dropping it kills the process.
    _browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    selectors: Selectors,
    result_wait: Duration,
    advance_wait: Duration,
    element_timeout: Duration,
}

impl ChromiumQuizBrowser {
    /// Launch Chromium, open the quiz URL, and wait for the first question
    /// to render.
    pub async fn launch(config: &QuizConfig) -> Result<Self, BrowserError> {
        let mut builder = BrowserConfig::builder();
        builder = if config.headless {
            builder.new_headless_mode()
        } else {
            builder.with_head()
        };
        let browser_config = builder.build().map_err(BrowserError::Navigation)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        // The CDP event stream must be drained for the connection to make
        // progress.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::info!(url = %config.quiz_url, "opening quiz page");
        let page = browser
            .new_page(config.quiz_url.as_str())
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        let driver = Self {
            _browser: browser,
            page,
            handler_task,
            selectors: config.selectors.clone(),
            result_wait: Duration::from_millis(config.result_wait_ms),
            advance_wait: Duration::from_millis(config.advance_wait_ms),
            element_timeout: Duration::from_millis(config.element_timeout_ms),
        };
        driver.wait_for(&driver.selectors.question).await?;
        Ok(driver)
    }

    /// Poll until `selector` matches, or time out.
    async fn wait_for(&self, selector: &str) -> Result<Element, BrowserError> {
        let deadline = Instant::now() + self.element_timeout;
        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout {
                    selector: selector.to_string(),
                    waited_ms: self.element_timeout.as_millis() as u64,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn element_text(element: &Element) -> Result<String, BrowserError> {
        let text = element
            .inner_text()
            .await
            .map_err(transport)?
            .unwrap_or_default();
        Ok(text.trim().to_string())
    }

    async fn is_visible(&self, selector: &str) -> bool {
        self.page.find_element(selector).await.is_ok()
    }
}

impl Drop for ChromiumQuizBrowser {
    fn drop(&mut self) {
        // The Browser's own drop kills the Chromium child; the event loop
        // task has nothing left to drain.
        self.handler_task.abort();
    }
}

fn transport(err: chromiumoxide::error::CdpError) -> BrowserError {
    BrowserError::Transport(err.to_string())
}

#[async_trait]
impl QuizBrowser for ChromiumQuizBrowser {
    async fn question_text(&self) -> Result<String, BrowserError> {
        let element = self.wait_for(&self.selectors.question).await?;
        Self::element_text(&element).await
    }

    async fn option_texts(&self) -> Result<Vec<String>, BrowserError> {
        let elements = self
            .page
            .find_elements(&self.selectors.option)
            .await
            .map_err(transport)?;
        let mut texts = Vec::with_capacity(elements.len());
        for element in &elements {
            texts.push(Self::element_text(element).await?);
        }
        Ok(texts)
    }

    async fn select_option(&self, text: &str) -> Result<(), BrowserError> {
        let elements = self
            .page
            .find_elements(&self.selectors.option)
            .await
            .map_err(transport)?;
        for element in elements {
            if Self::element_text(&element).await? == text.trim() {
                element.click().await.map_err(transport)?;
                return Ok(());
            }
        }
        Err(BrowserError::OptionNotFound {
            option: text.to_string(),
        })
    }

    async fn await_outcome(&self) -> Result<bool, BrowserError> {
        sleep(self.result_wait).await;
        Ok(self.is_visible(&self.selectors.success).await)
    }

    async fn advance(&self) -> Result<(), BrowserError> {
        sleep(self.advance_wait).await;
        if let Ok(next) = self.page.find_element(&self.selectors.next).await {
            next.click().await.map_err(transport)?;
        }
        sleep(self.advance_wait).await;
        Ok(())
    }

    async fn restart(&self) -> Result<(), BrowserError> {
        tracing::debug!("reloading quiz page");
        self.page.reload().await.map_err(transport)?;
        self.wait_for(&self.selectors.question).await?;
        Ok(())
    }
}
