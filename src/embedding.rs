//! Text embeddings and cosine similarity.
//!
//! [`EmbeddingEngine`] is the seam for any semantic-embedding backend. Two
//! ship with the crate: [`NgramEngine`], a deterministic hashed word and
//! character-trigram model with no external assets, and `MiniLmEngine`
//! (default feature `fastembed`), which runs all-MiniLM-L6-v2 locally.

use crate::error::Result;

/// A dense text embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(data: Vec<f32>) -> Self {
        Self(data)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn norm(&self) -> f32 {
        self.0.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Cosine similarity; 0.0 when either vector has zero length.
    pub fn cosine(&self, other: &Self) -> f32 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        let dot: f32 = self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum();
        dot / denom
    }
}

/// Turns text into vectors. Implementations must be deterministic for a
/// fixed model and input, and `encode_many` must preserve input order.
///
/// Callers never pass empty text; label extraction substitutes a sentinel.
pub trait EmbeddingEngine {
    fn encode(&self, text: &str) -> Result<Embedding>;

    fn encode_many(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        texts.iter().map(|t| self.encode(t)).collect()
    }
}

impl<E: EmbeddingEngine + ?Sized> EmbeddingEngine for Box<E> {
    fn encode(&self, text: &str) -> Result<Embedding> {
        (**self).encode(text)
    }

    fn encode_many(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        (**self).encode_many(texts)
    }
}

impl<E: EmbeddingEngine + ?Sized> EmbeddingEngine for &E {
    fn encode(&self, text: &str) -> Result<Embedding> {
        (**self).encode(text)
    }

    fn encode_many(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        (**self).encode_many(texts)
    }
}

/// Cosine similarity of `query` against each candidate, in candidate order.
pub fn similarity(query: &Embedding, candidates: &[Embedding]) -> Vec<f32> {
    candidates.iter().map(|c| query.cosine(c)).collect()
}

// ── Hashed n-gram backend ──────────────────────────────────────────

const NGRAM_DIM: usize = 512;
const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Filler words that carry no meaning in a form question.
const STOPWORDS: &[&str] = &[
    "a", "an", "are", "do", "enter", "is", "my", "of", "please", "provide", "the", "what",
    "you", "your",
];

/// Bag of hashed words and character trigrams, L2-normalised.
///
/// Captures surface overlap ("Your full name" vs "Full Name") rather than
/// meaning; synonyms with no shared letters score near zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NgramEngine;

impl NgramEngine {
    pub fn new() -> Self {
        Self
    }

    fn tokens(text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let all: Vec<String> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        let kept: Vec<String> = all
            .iter()
            .filter(|t| !STOPWORDS.contains(&t.as_str()))
            .cloned()
            .collect();
        if kept.is_empty() {
            all
        } else {
            kept
        }
    }

    fn bucket(feature: &str) -> usize {
        (fnv1a(feature.as_bytes()) % NGRAM_DIM as u64) as usize
    }
}

impl EmbeddingEngine for NgramEngine {
    fn encode(&self, text: &str) -> Result<Embedding> {
        let mut v = vec![0.0f32; NGRAM_DIM];
        for token in Self::tokens(text) {
            v[Self::bucket(&format!("w:{token}"))] += WORD_WEIGHT;

            let padded: Vec<char> = format!("<{token}>").chars().collect();
            for gram in padded.windows(3) {
                let gram: String = gram.iter().collect();
                v[Self::bucket(&format!("c:{gram}"))] += TRIGRAM_WEIGHT;
            }
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(Embedding::new(v))
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

// ── all-MiniLM-L6-v2 backend ───────────────────────────────────────

#[cfg(feature = "fastembed")]
pub use minilm::MiniLmEngine;

#[cfg(feature = "fastembed")]
mod minilm {
    use std::sync::Mutex;

    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

    use super::{Embedding, EmbeddingEngine};
    use crate::error::{Error, Result};

    /// Sentence embeddings from all-MiniLM-L6-v2 (384 dimensions).
    ///
    /// The model is downloaded to the fastembed cache on first use.
    pub struct MiniLmEngine {
        model: Mutex<TextEmbedding>,
    }

    impl MiniLmEngine {
        pub fn new() -> Result<Self> {
            let model = TextEmbedding::try_new(
                InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
            )
            .map_err(|e| Error::Embedding(e.to_string()))?;
            tracing::info!("all-MiniLM-L6-v2 loaded");
            Ok(Self {
                model: Mutex::new(model),
            })
        }
    }

    impl EmbeddingEngine for MiniLmEngine {
        fn encode(&self, text: &str) -> Result<Embedding> {
            self.encode_many(&[text])?
                .pop()
                .ok_or_else(|| Error::Embedding("model returned no vector".into()))
        }

        fn encode_many(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            let mut model = self
                .model
                .lock()
                .map_err(|_| Error::Embedding("model mutex poisoned".into()))?;
            let vectors = model
                .embed(texts.to_vec(), None)
                .map_err(|e| Error::Embedding(e.to_string()))?;
            Ok(vectors.into_iter().map(Embedding::new).collect())
        }
    }
}

/// The best backend compiled into this build.
///
/// Falls back to [`NgramEngine`] when the MiniLM model cannot be loaded,
/// e.g. offline on first run.
pub fn default_engine() -> Box<dyn EmbeddingEngine> {
    #[cfg(feature = "fastembed")]
    {
        match MiniLmEngine::new() {
            Ok(engine) => Box::new(engine),
            Err(e) => {
                tracing::warn!(error = %e, "MiniLM unavailable, falling back to n-gram embeddings");
                Box::new(NgramEngine::new())
            }
        }
    }
    #[cfg(not(feature = "fastembed"))]
    {
        tracing::info!("using n-gram embeddings; build with the fastembed feature for MiniLM");
        Box::new(NgramEngine::new())
    }
}
