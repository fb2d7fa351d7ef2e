//! The `embed(text) -> vector` seam between text and the classifier.

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::VectorizeError;

/// Deterministic mapping from text to a fixed-length dense vector.
///
/// Implementations must be safe to share across threads; the classifier
/// calls `embed` concurrently from the serving layer.
pub trait Vectorizer: Send + Sync {
    /// Identity of the vectorizer, recorded in trained artifacts.
    fn descriptor(&self) -> VectorizerDescriptor;

    /// Embed one text. The returned length always equals
    /// `self.descriptor().dimension`.
    fn embed(&self, text: &str) -> Result<Vec<f32>, VectorizeError>;
}

/// Name and output size of a vectorizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerDescriptor {
    pub name: String,
    pub dimension: usize,
}

impl fmt::Display for VectorizerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.dimension)
    }
}

/// Vectorizer backends selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VectorizerKind {
    /// Signed feature hashing of word unigrams and bigrams.
    Hashing,
    /// Pretrained MiniLM sentence embeddings (requires the `embeddings` feature).
    #[value(name = "minilm")]
    MiniLm,
}

impl FromStr for VectorizerKind {
    type Err = VectorizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hashing" => Ok(Self::Hashing),
            "minilm" => Ok(Self::MiniLm),
            other => Err(VectorizeError(format!("unknown vectorizer `{other}`"))),
        }
    }
}
