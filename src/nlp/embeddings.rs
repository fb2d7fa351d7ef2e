//! Pretrained sentence embeddings built on fastembed.

use std::sync::Arc;

use crate::{error::VectorizeError, nlp::vectorizer::Vectorizer};

#[cfg(feature = "embeddings")]
pub use minilm::MiniLmVectorizer;

/// Load the MiniLM embedder when the crate is built with `embeddings`.
#[cfg(feature = "embeddings")]
pub fn load_minilm() -> Result<Arc<dyn Vectorizer>, VectorizeError> {
    Ok(Arc::new(MiniLmVectorizer::try_new()?))
}

/// Fallback when fastembed is not compiled in.
#[cfg(not(feature = "embeddings"))]
pub fn load_minilm() -> Result<Arc<dyn Vectorizer>, VectorizeError> {
    Err(VectorizeError(
        "minilm vectorizer unavailable: rebuild with `--features embeddings`".into(),
    ))
}

#[cfg(feature = "embeddings")]
mod minilm {
    use fastembed::TextEmbedding;
    use parking_lot::Mutex;
    use tracing::debug;

    use crate::{
        error::VectorizeError,
        nlp::vectorizer::{Vectorizer, VectorizerDescriptor},
    };

    /// MiniLM sentence embedder. The ONNX session is not shared between
    /// concurrent callers, so access is serialised.
    pub struct MiniLmVectorizer {
        model: Mutex<TextEmbedding>,
        dimension: usize,
    }

    impl MiniLmVectorizer {
        pub fn try_new() -> Result<Self, VectorizeError> {
            let mut model = TextEmbedding::try_new(Default::default())
                .map_err(|e| VectorizeError(e.to_string()))?;
            let sample = model
                .embed(vec!["dimension check"], None)
                .map_err(|e| VectorizeError(e.to_string()))?;
            let dimension = sample
                .first()
                .map(Vec::len)
                .ok_or_else(|| VectorizeError("embedder returned no vectors".into()))?;
            debug!(dimension, "loaded MiniLM embedder");
            Ok(Self {
                model: Mutex::new(model),
                dimension,
            })
        }
    }

    impl Vectorizer for MiniLmVectorizer {
        fn descriptor(&self) -> VectorizerDescriptor {
            VectorizerDescriptor {
                name: "minilm".to_string(),
                dimension: self.dimension,
            }
        }

        fn embed(&self, text: &str) -> Result<Vec<f32>, VectorizeError> {
            let mut model = self.model.lock();
            let mut vectors = model
                .embed(vec![text], None)
                .map_err(|e| VectorizeError(e.to_string()))?;
            vectors
                .pop()
                .ok_or_else(|| VectorizeError("embedder returned no vectors".into()))
        }
    }
}
