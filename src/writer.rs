use std::time::Duration;

use crate::document::{CandidateField, FieldKind, FormDocument};
use crate::error::Result;

/// Writes values into fields the way a user typing would leave them.
#[derive(Debug, Clone)]
pub struct FieldWriter {
    pre_write_delay: Duration,
}

impl FieldWriter {
    pub fn new(pre_write_delay: Duration) -> Self {
        Self { pre_write_delay }
    }

    /// Scroll the field into view, wait for lazy rendering, then write.
    ///
    /// Rich-text boxes get their text replaced. Inputs and textareas get
    /// their `value` set followed by one bubbling `input` event so page
    /// listeners see the change.
    pub async fn write<D: FormDocument>(
        &self,
        doc: &D,
        field: &CandidateField<D::Handle>,
        value: &str,
    ) -> Result<()> {
        doc.scroll_into_view(&field.handle).await?;
        if !self.pre_write_delay.is_zero() {
            tokio::time::sleep(self.pre_write_delay).await;
        }

        match field.kind {
            FieldKind::DivTextbox => doc.set_text_content(&field.handle, value).await,
            FieldKind::Input | FieldKind::Textarea => {
                doc.set_value(&field.handle, value).await?;
                doc.dispatch_input_event(&field.handle).await
            }
        }
    }
}
