use chromiumoxide::element::Element as CrElement;

use crate::error::{Error, Result};

/// Wrapper around a chromiumoxide Element, providing a simplified API.
pub struct Element {
    inner: CrElement,
}

impl Element {
    pub(crate) fn new(inner: CrElement) -> Self {
        Self { inner }
    }

    /// Scroll this element into view.
    pub async fn scroll_into_view(&self) -> Result<()> {
        self.inner.scroll_into_view().await.map_err(Error::CdpError)?;
        Ok(())
    }

    /// Upper-case tag name, e.g. `INPUT`.
    pub async fn tag_name(&self) -> Result<String> {
        self.call_for_string("function() { return this.tagName; }")
            .await?
            .ok_or_else(|| Error::ElementNotFound("element has no tag name".into()))
    }

    /// Trimmed text of the first node `xpath` selects with this element as
    /// the context node.
    pub async fn xpath_text(&self, xpath: &str) -> Result<Option<String>> {
        let xpath_js = serde_json::to_string(xpath)?;
        let js = format!(
            r#"function() {{
                const hit = document.evaluate(
                    {xpath_js}, this, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null
                ).singleNodeValue;
                return hit ? (hit.innerText || hit.textContent || '').trim() : null;
            }}"#
        );
        self.call_for_string(js).await
    }

    /// Replace the rendered text of this element.
    pub async fn set_inner_text(&self, text: &str) -> Result<()> {
        let text_js = serde_json::to_string(text)?;
        self.call(format!("function() {{ this.innerText = {text_js}; }}"))
            .await
    }

    /// Assign the `value` property without firing any event.
    pub async fn set_value(&self, value: &str) -> Result<()> {
        let value_js = serde_json::to_string(value)?;
        self.call(format!("function() {{ this.value = {value_js}; }}"))
            .await
    }

    /// Dispatch a bubbling DOM event of the given type.
    pub async fn dispatch_event(&self, event_type: &str) -> Result<()> {
        let type_js = serde_json::to_string(event_type)?;
        self.call(format!(
            "function() {{ this.dispatchEvent(new Event({type_js}, {{ bubbles: true }})); }}"
        ))
        .await
    }

    async fn call(&self, function_declaration: String) -> Result<()> {
        let returns = self
            .inner
            .call_js_fn(function_declaration, false)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        if let Some(details) = returns.exception_details {
            return Err(Error::JsError(details.text));
        }
        Ok(())
    }

    async fn call_for_string(&self, function_declaration: impl Into<String>) -> Result<Option<String>> {
        let returns = self
            .inner
            .call_js_fn(function_declaration, false)
            .await
            .map_err(|e| Error::JsError(e.to_string()))?;
        if let Some(details) = returns.exception_details {
            return Err(Error::JsError(details.text));
        }
        match returns.result.value {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }
}
