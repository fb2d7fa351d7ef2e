//! Text vectorization backends feeding the intent classifier.

pub mod embeddings;
pub mod hashing;
pub mod vectorizer;

use std::sync::Arc;

use tracing::info;

pub use hashing::HashingVectorizer;
pub use vectorizer::{Vectorizer, VectorizerDescriptor, VectorizerKind};

use crate::error::VectorizeError;

/// Construct the configured vectorizer.
pub fn build_vectorizer(kind: VectorizerKind) -> Result<Arc<dyn Vectorizer>, VectorizeError> {
    let vectorizer: Arc<dyn Vectorizer> = match kind {
        VectorizerKind::Hashing => Arc::new(HashingVectorizer::default()),
        VectorizerKind::MiniLm => embeddings::load_minilm()?,
    };
    let descriptor = vectorizer.descriptor();
    info!(
        name = %descriptor.name,
        dimension = descriptor.dimension,
        "vectorizer ready"
    );
    Ok(vectorizer)
}
