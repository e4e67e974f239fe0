use crate::config::FillConfig;
use crate::document::FormDocument;

/// One structural heuristic for finding a field's label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelStrategy {
    /// Nearest preceding `role="heading"` element in document order.
    PrecedingHeading,
    /// First text element inside the nearest ancestor carrying this class.
    QuestionBlock { marker: String },
}

impl LabelStrategy {
    /// Run the heuristic. Lookup failures and blank text both count as a miss.
    pub async fn apply<D: FormDocument>(&self, doc: &D, field: &D::Handle) -> Option<String> {
        let found = match self {
            LabelStrategy::PrecedingHeading => doc.preceding_heading_text(field).await,
            LabelStrategy::QuestionBlock { marker } => doc.question_block_text(field, marker).await,
        };
        match found {
            Ok(Some(text)) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(strategy = ?self, error = %e, "label lookup failed");
                None
            }
        }
    }
}

/// Derives a human-readable label for a field. Never fails.
#[derive(Debug, Clone)]
pub struct LabelExtractor {
    strategies: Vec<LabelStrategy>,
    unknown: String,
}

impl LabelExtractor {
    pub fn new(strategies: Vec<LabelStrategy>, unknown: impl Into<String>) -> Self {
        Self {
            strategies,
            unknown: unknown.into(),
        }
    }

    /// Heading first, then the question-block ancestor.
    pub fn from_config(config: &FillConfig) -> Self {
        Self::new(
            vec![
                LabelStrategy::PrecedingHeading,
                LabelStrategy::QuestionBlock {
                    marker: config.question_block_marker.clone(),
                },
            ],
            config.unknown_label.clone(),
        )
    }

    /// The first strategy to produce text wins; later ones are not tried.
    pub async fn extract<D: FormDocument>(&self, doc: &D, field: &D::Handle) -> String {
        for strategy in &self.strategies {
            if let Some(label) = strategy.apply(doc, field).await {
                return label;
            }
        }
        self.unknown.clone()
    }
}
