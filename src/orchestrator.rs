use std::fmt;

use serde::Serialize;

use crate::config::FillConfig;
use crate::document::{CandidateField, FieldKind, FormDocument};
use crate::embedding::EmbeddingEngine;
use crate::error::Result;
use crate::label::LabelExtractor;
use crate::matcher::Matcher;
use crate::profile::Profile;
use crate::writer::FieldWriter;

/// What happened to one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    Filled {
        key: String,
        value: String,
        confidence: f32,
    },
    /// Best match did not clear the threshold; nothing was written.
    NoConfidentMatch { best_key: String, confidence: f32 },
    /// The match was accepted but the DOM write raised.
    WriteFailed {
        key: String,
        confidence: f32,
        cause: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOutcome {
    pub position: usize,
    pub kind: FieldKind,
    pub label: String,
    #[serde(flatten)]
    pub decision: Decision,
}

impl FieldOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self.decision, Decision::Filled { .. })
    }
}

impl fmt::Display for FieldOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.decision {
            Decision::Filled {
                key,
                value,
                confidence,
            } => write!(
                f,
                "'{}' matched -> {key} = {value} ({confidence:.2})",
                self.label
            ),
            Decision::NoConfidentMatch {
                best_key,
                confidence,
            } => write!(
                f,
                "No confident match for '{}' (best: {best_key}, {confidence:.2})",
                self.label
            ),
            Decision::WriteFailed { cause, .. } => {
                write!(f, "Could not fill '{}': {cause}", self.label)
            }
        }
    }
}

/// Outcome of one run. Built as fields are decided.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FillReport {
    pub detected: usize,
    pub filled: usize,
    pub outcomes: Vec<FieldOutcome>,
}

impl FillReport {
    fn record(&mut self, outcome: FieldOutcome) {
        if outcome.is_filled() {
            self.filled += 1;
        }
        self.outcomes.push(outcome);
    }
}

impl fmt::Display for FillReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Filled {}/{} fields.", self.filled, self.detected)
    }
}

/// Drives scan, label, match and write over every candidate field, once
/// each, in document order. Never submits the form.
pub struct Orchestrator<E> {
    engine: E,
    config: FillConfig,
    labels: LabelExtractor,
    writer: FieldWriter,
}

impl<E: EmbeddingEngine> Orchestrator<E> {
    pub fn new(engine: E, config: FillConfig) -> Self {
        let labels = LabelExtractor::from_config(&config);
        let writer = FieldWriter::new(config.pre_write_delay);
        Self {
            engine,
            config,
            labels,
            writer,
        }
    }

    /// Replace the default heading/question-block label heuristics.
    pub fn with_label_extractor(mut self, labels: LabelExtractor) -> Self {
        self.labels = labels;
        self
    }

    pub async fn run<D: FormDocument>(&self, doc: &D, profile: &Profile) -> Result<FillReport> {
        self.run_with_progress(doc, profile, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_outcome` as each field is decided.
    ///
    /// Fails only when the page never becomes ready, discovery fails, or the
    /// embedding backend errors. Write failures are recorded per field.
    pub async fn run_with_progress<D, F>(
        &self,
        doc: &D,
        profile: &Profile,
        mut on_outcome: F,
    ) -> Result<FillReport>
    where
        D: FormDocument,
        F: FnMut(&FieldOutcome),
    {
        doc.wait_until_ready(&self.config.ready_selector, self.config.ready_timeout)
            .await?;

        let matcher = Matcher::new(&self.engine, profile)?;
        let mut fields = self.scan(doc).await?;
        tracing::info!(count = fields.len(), "detected candidate fields");

        let mut report = FillReport {
            detected: fields.len(),
            ..FillReport::default()
        };

        for field in &mut fields {
            let label = self.labels.extract(doc, &field.handle).await;
            let found = matcher.match_label(&label)?;

            let decision = if self.config.accepts(found.confidence) {
                let written = self.writer.write(doc, &*field, &found.value).await;
                match written {
                    Ok(()) => {
                        field.filled = true;
                        Decision::Filled {
                            key: found.key,
                            value: found.value,
                            confidence: found.confidence,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(position = field.position, %label, error = %e, "write failed");
                        Decision::WriteFailed {
                            key: found.key,
                            confidence: found.confidence,
                            cause: e.to_string(),
                        }
                    }
                }
            } else {
                Decision::NoConfidentMatch {
                    best_key: found.key,
                    confidence: found.confidence,
                }
            };

            let outcome = FieldOutcome {
                position: field.position,
                kind: field.kind,
                label,
                decision,
            };
            tracing::info!(position = outcome.position, "{outcome}");
            on_outcome(&outcome);
            report.record(outcome);
        }

        Ok(report)
    }

    async fn scan<D: FormDocument>(&self, doc: &D) -> Result<Vec<CandidateField<D::Handle>>> {
        let raw = doc.query_candidates(&self.config.candidate_selector).await?;
        let mut fields = Vec::with_capacity(raw.len());
        for candidate in raw {
            match FieldKind::from_tag(&candidate.tag) {
                Some(kind) => fields.push(CandidateField {
                    kind,
                    position: fields.len(),
                    filled: false,
                    handle: candidate.handle,
                }),
                None => tracing::debug!(tag = %candidate.tag, "skipping unsupported element"),
            }
        }
        Ok(fields)
    }
}
