pub mod browser;
pub mod config;
pub mod document;
pub mod element;
pub mod embedding;
pub mod error;
pub mod label;
pub mod matcher;
pub mod orchestrator;
pub mod page;
pub mod profile;
pub mod writer;

pub use browser::FormSession;
pub use config::{BrowserConfig, FillConfig};
pub use document::{CandidateField, FieldKind, FormDocument, RawCandidate};
pub use embedding::{similarity, Embedding, EmbeddingEngine, NgramEngine};
pub use error::{Error, Result};
pub use label::{LabelExtractor, LabelStrategy};
pub use matcher::{match_label, MatchResult, Matcher};
pub use orchestrator::{Decision, FieldOutcome, FillReport, Orchestrator};
pub use page::Page;
pub use profile::{Profile, ProfileStore};
pub use writer::FieldWriter;
