use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// The element kinds a form field can have. Decided once, at discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    /// A `div[role="textbox"]` rich-text editor.
    DivTextbox,
    Input,
    Textarea,
}

impl FieldKind {
    /// Classify an element by its tag name; `None` for anything unfillable.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_uppercase().as_str() {
            "DIV" => Some(FieldKind::DivTextbox),
            "INPUT" => Some(FieldKind::Input),
            "TEXTAREA" => Some(FieldKind::Textarea),
            _ => None,
        }
    }
}

/// An element returned by [`FormDocument::query_candidates`], before classification.
pub struct RawCandidate<H> {
    pub tag: String,
    pub handle: H,
}

/// One element eligible to receive a value.
#[derive(Debug)]
pub struct CandidateField<H> {
    pub kind: FieldKind,
    /// Zero-based position among candidates, in document order.
    pub position: usize,
    pub filled: bool,
    pub handle: H,
}

/// The page being filled.
///
/// Implemented over a live Chrome tab by [`crate::Page`]. Every method is a
/// primitive; the decision logic stays in the label, match and write stages.
#[async_trait]
pub trait FormDocument: Send + Sync {
    /// Reference to one element of the document.
    type Handle: Send + Sync;

    /// Block until `selector` is present, or fail with `Error::Timeout`.
    async fn wait_until_ready(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Elements matching `selector`, in document order.
    async fn query_candidates(&self, selector: &str) -> Result<Vec<RawCandidate<Self::Handle>>>;

    /// Text of the nearest `role="heading"` element preceding `field`.
    async fn preceding_heading_text(&self, field: &Self::Handle) -> Result<Option<String>>;

    /// Text of the first text element inside the nearest ancestor whose
    /// class contains `marker`.
    async fn question_block_text(&self, field: &Self::Handle, marker: &str)
        -> Result<Option<String>>;

    async fn scroll_into_view(&self, field: &Self::Handle) -> Result<()>;

    /// Replace the rendered text of the element.
    async fn set_text_content(&self, field: &Self::Handle, value: &str) -> Result<()>;

    /// Assign the element's `value` property.
    async fn set_value(&self, field: &Self::Handle, value: &str) -> Result<()>;

    /// Dispatch a bubbling `input` event on the element.
    async fn dispatch_input_event(&self, field: &Self::Handle) -> Result<()>;
}
