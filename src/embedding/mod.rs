//! Word-embedding provider abstraction.
//!
//! The projector only ever asks one question: "how similar are these two
//! words?" The answer comes from a pretrained embedding model on device; in
//! this crate the model is represented by a word -> vector table loaded from
//! a RON lexicon file, and tests inject small hand-built tables. Both go
//! through the same `EmbeddingProvider` capability trait so the projector
//! never knows which one it is talking to.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Capability interface consumed by the projector.
///
/// `similarity` is symmetric, returns a score in [-1, 1], and yields `None`
/// when either word is out of vocabulary. Unknown words are permanently
/// unknown for the lifetime of the static model; callers must not retry.
pub trait EmbeddingProvider: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> Option<f32>;

    /// Whether a word resolves at all (cheaper than a full similarity call).
    fn contains(&self, word: &str) -> bool;
}

/// Errors raised while loading or validating a lexicon file.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse lexicon RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("lexicon contains no vectors")]
    Empty,
    #[error("lexicon declares dimension 0")]
    ZeroDimension,
    #[error("vector for '{word}' has dimension {found}, expected {expected}")]
    DimensionMismatch {
        word: String,
        expected: usize,
        found: usize,
    },
}

/// On-disk lexicon format: a declared dimension and a word -> vector map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    pub dimension: usize,
    pub vectors: HashMap<String, Vec<f32>>,
}

/// Embedding provider backed by an in-memory word -> vector table.
///
/// Production loads the table from a lexicon file distilled out of the full
/// embedding model; tests build tiny tables by hand. Keys are stored
/// lowercase; lookups are expected to be lowercased by the caller.
#[derive(Debug, Clone, Default)]
pub struct FixedVectorProvider {
    vectors: HashMap<String, Vec<f32>>,
}

impl FixedVectorProvider {
    /// Build a provider from literal (word, vector) entries. Keys are
    /// lowercased; later duplicates overwrite earlier ones.
    pub fn new(entries: Vec<(&str, Vec<f32>)>) -> Self {
        Self {
            vectors: entries
                .into_iter()
                .map(|(w, v)| (w.to_lowercase(), v))
                .collect(),
        }
    }

    /// Validate a parsed lexicon and build a provider from it.
    pub fn from_lexicon(lexicon: Lexicon) -> Result<Self, LexiconError> {
        if lexicon.dimension == 0 {
            return Err(LexiconError::ZeroDimension);
        }
        if lexicon.vectors.is_empty() {
            return Err(LexiconError::Empty);
        }
        for (word, vector) in &lexicon.vectors {
            if vector.len() != lexicon.dimension {
                return Err(LexiconError::DimensionMismatch {
                    word: word.clone(),
                    expected: lexicon.dimension,
                    found: vector.len(),
                });
            }
        }
        Ok(Self {
            vectors: lexicon
                .vectors
                .into_iter()
                .map(|(w, v)| (w.to_lowercase(), v))
                .collect(),
        })
    }

    /// Parse a RON lexicon string (the FFI frontend passes file contents).
    pub fn from_ron_str(ron_str: &str) -> Result<Self, LexiconError> {
        let lexicon: Lexicon = ron::from_str(ron_str)?;
        Self::from_lexicon(lexicon)
    }

    /// Load and validate a lexicon file from disk.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.vectors.keys().map(String::as_str)
    }
}

impl EmbeddingProvider for FixedVectorProvider {
    fn similarity(&self, a: &str, b: &str) -> Option<f32> {
        let va = self.vectors.get(a)?;
        let vb = self.vectors.get(b)?;
        Some(cosine(va, vb))
    }

    fn contains(&self, word: &str) -> bool {
        self.vectors.contains_key(word)
    }
}

/// Cosine similarity between two vectors; 0.0 when either magnitude is
/// degenerate. Dimensions beyond the shorter vector are ignored.
fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0_f32;
    let mut mag_a = 0.0_f32;
    let mut mag_b = 0.0_f32;

    for (va, vb) in a.iter().zip(b.iter()) {
        dot += va * vb;
    }
    for va in a {
        mag_a += va * va;
    }
    for vb in b {
        mag_b += vb * vb;
    }

    let magnitude = mag_a.sqrt() * mag_b.sqrt();
    if magnitude < f32::EPSILON {
        return 0.0;
    }

    dot / magnitude
}
