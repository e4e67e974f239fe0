use serde::Serialize;

use crate::embedding::{similarity, Embedding, EmbeddingEngine};
use crate::error::{Error, Result};
use crate::profile::Profile;

/// The best profile entry for one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub key: String,
    pub value: String,
    /// Cosine similarity clamped to [0, 1].
    pub confidence: f32,
}

/// Matches labels against a profile whose keys are encoded once up front.
///
/// Always returns its best guess; whether that guess is good enough is the
/// caller's call.
pub struct Matcher<'a, E: ?Sized> {
    engine: &'a E,
    profile: &'a Profile,
    key_vectors: Vec<Embedding>,
}

impl<'a, E: EmbeddingEngine + ?Sized> Matcher<'a, E> {
    pub fn new(engine: &'a E, profile: &'a Profile) -> Result<Self> {
        let keys: Vec<&str> = profile.keys().collect();
        let key_vectors = engine.encode_many(&keys)?;
        if key_vectors.len() != keys.len() {
            return Err(Error::Embedding(format!(
                "encoded {} vectors for {} keys",
                key_vectors.len(),
                keys.len()
            )));
        }
        Ok(Self {
            engine,
            profile,
            key_vectors,
        })
    }

    pub fn match_label(&self, label: &str) -> Result<MatchResult> {
        let query = self.engine.encode(label)?;
        let scores = similarity(&query, &self.key_vectors);

        // First maximum wins on ties.
        let (best, score) = scores
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, s)| match best {
                Some((_, top)) if !(s > top) => best,
                _ => Some((i, s)),
            })
            .ok_or_else(|| Error::Profile("profile has no entries".into()))?;

        let (key, value) = self
            .profile
            .entry(best)
            .ok_or_else(|| Error::Profile(format!("no profile entry at {best}")))?;

        Ok(MatchResult {
            key: key.to_string(),
            value: value.to_string(),
            confidence: if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) },
        })
    }
}

/// One-shot match that encodes the profile keys on every call.
pub fn match_label<E: EmbeddingEngine + ?Sized>(
    engine: &E,
    label: &str,
    profile: &Profile,
) -> Result<MatchResult> {
    Matcher::new(engine, profile)?.match_label(label)
}
