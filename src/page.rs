use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::page::Page as CrPage;

use crate::document::{FormDocument, RawCandidate};
use crate::element::Element;
use crate::error::{Error, Result};

/// Nearest heading before the context node, in document order.
const PRECEDING_HEADING_XPATH: &str = "preceding::*[@role='heading'][1]";

/// Wrapper around a chromiumoxide Page, exposing the primitives a fill run needs.
pub struct Page {
    inner: CrPage,
    default_timeout: Duration,
}

impl Page {
    pub(crate) fn new(inner: CrPage, default_timeout: Duration) -> Self {
        Self { inner, default_timeout }
    }

    /// Returns a reference to the underlying chromiumoxide Page.
    pub fn inner(&self) -> &CrPage {
        &self.inner
    }

    /// Get the current page title.
    pub async fn title(&self) -> Result<String> {
        let result = self
            .inner
            .evaluate("document.title")
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        match result.into_value::<String>() {
            Ok(title) => Ok(title),
            Err(_) => Ok(String::new()),
        }
    }

    /// Wait for an element matching the given CSS selector to appear in the DOM.
    /// Polls every 100ms up to the configured default timeout.
    pub async fn wait_for_selector(&self, selector: &str) -> Result<Element> {
        self.wait_for_selector_within(selector, self.default_timeout)
            .await
    }

    /// Like [`wait_for_selector`](Self::wait_for_selector) with an explicit bound.
    pub async fn wait_for_selector_within(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Element> {
        let interval = Duration::from_millis(100);
        let start = std::time::Instant::now();

        loop {
            match self.find_element(selector).await {
                Ok(el) => return Ok(el),
                Err(_) if start.elapsed() < timeout => {
                    tokio::time::sleep(interval).await;
                }
                Err(_) => {
                    return Err(Error::Timeout(format!(
                        "selector {} after {:?}",
                        selector, timeout
                    )));
                }
            }
        }
    }

    // ── Element Queries ─────────────────────────────────────────────

    /// Find an element matching the given CSS selector.
    pub async fn find_element(&self, selector: &str) -> Result<Element> {
        let el = self
            .inner
            .find_element(selector)
            .await
            .map_err(|e| Error::ElementNotFound(e.to_string()))?;
        Ok(Element::new(el))
    }

    /// Find all elements matching the given CSS selector, in document order.
    pub async fn find_elements(&self, selector: &str) -> Result<Vec<Element>> {
        let els = self
            .inner
            .find_elements(selector)
            .await
            .map_err(|e| Error::ElementNotFound(e.to_string()))?;
        Ok(els.into_iter().map(Element::new).collect())
    }
}

#[async_trait]
impl FormDocument for Page {
    type Handle = Element;

    async fn wait_until_ready(&self, selector: &str, timeout: Duration) -> Result<()> {
        self.wait_for_selector_within(selector, timeout).await?;
        Ok(())
    }

    async fn query_candidates(&self, selector: &str) -> Result<Vec<RawCandidate<Element>>> {
        let mut candidates = Vec::new();
        for handle in self.find_elements(selector).await? {
            let tag = handle.tag_name().await?;
            candidates.push(RawCandidate { tag, handle });
        }
        Ok(candidates)
    }

    async fn preceding_heading_text(&self, field: &Element) -> Result<Option<String>> {
        field.xpath_text(PRECEDING_HEADING_XPATH).await
    }

    async fn question_block_text(&self, field: &Element, marker: &str) -> Result<Option<String>> {
        let xpath = format!(
            "ancestor::div[contains(@class, {})][1]//span[normalize-space()]",
            xpath_literal(marker)
        );
        field.xpath_text(&xpath).await
    }

    async fn scroll_into_view(&self, field: &Element) -> Result<()> {
        field.scroll_into_view().await
    }

    async fn set_text_content(&self, field: &Element, value: &str) -> Result<()> {
        field.set_inner_text(value).await
    }

    async fn set_value(&self, field: &Element, value: &str) -> Result<()> {
        field.set_value(value).await
    }

    async fn dispatch_input_event(&self, field: &Element) -> Result<()> {
        field.dispatch_event("input").await
    }
}

/// Quote `s` as an XPath 1.0 string literal.
fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        format!("'{s}'")
    } else if !s.contains('"') {
        format!("\"{s}\"")
    } else {
        let parts: Vec<String> = s.split('\'').map(|p| format!("'{p}'")).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
