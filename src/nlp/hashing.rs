//! Feature-hashing vectorizer: no model download, fully deterministic.

use unicode_segmentation::UnicodeSegmentation;

use crate::{
    error::VectorizeError,
    nlp::vectorizer::{Vectorizer, VectorizerDescriptor},
};

pub const DEFAULT_DIMENSION: usize = 1024;

/// Hashes lower-cased word unigrams and bigrams into a signed bucket vector,
/// then L2-normalises it.
#[derive(Debug, Clone)]
pub struct HashingVectorizer {
    dimension: usize,
}

impl HashingVectorizer {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn accumulate(&self, vector: &mut [f32], token: &str) {
        let hash = crc32fast::hash(token.as_bytes());
        let bucket = hash as usize % self.dimension;
        let sign = if hash & 0x8000_0000 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign;
    }
}

impl Default for HashingVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl Vectorizer for HashingVectorizer {
    fn descriptor(&self) -> VectorizerDescriptor {
        VectorizerDescriptor {
            name: "hashing".to_string(),
            dimension: self.dimension,
        }
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, VectorizeError> {
        if self.dimension == 0 {
            return Err(VectorizeError("hashing dimension must be positive".into()));
        }
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower.unicode_words().collect();

        let mut vector = vec![0.0_f32; self.dimension];
        for word in &words {
            self.accumulate(&mut vector, word);
        }
        for pair in words.windows(2) {
            self.accumulate(&mut vector, &format!("{} {}", pair[0], pair[1]));
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn output_has_configured_length_and_unit_norm() {
        let vectorizer = HashingVectorizer::new(64);
        let v = vectorizer.embed("Funded by the Wellcome Trust").unwrap();
        assert_eq!(v.len(), 64);
        assert!((dot(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let v = HashingVectorizer::default().embed("   ").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn case_does_not_change_embedding() {
        let vectorizer = HashingVectorizer::default();
        assert_eq!(
            vectorizer.embed("National Science Fund").unwrap(),
            vectorizer.embed("national science fund").unwrap()
        );
    }

    #[test]
    fn shared_words_increase_similarity() {
        let vectorizer = HashingVectorizer::default();
        let query = vectorizer.embed("grant from the national science fund").unwrap();
        let close = vectorizer.embed("the national science fund grant").unwrap();
        let far = vectorizer.embed("licensed under open access terms").unwrap();
        assert!(dot(&query, &close) > dot(&query, &far));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(HashingVectorizer::new(0).embed("text").is_err());
    }
}
