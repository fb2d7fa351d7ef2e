//! Runtime configuration utilities for funder-intent.

use std::{env, path::PathBuf};

use anyhow::Context;

use crate::{
    classifier,
    nlp::VectorizerKind,
    service::DEFAULT_MIN_NO_FUNDER_CONFIDENCE,
};

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// JSON document with the labeled training expressions.
    pub train_filepath: PathBuf,
    /// Location of the trained intent model.
    pub model_filepath: PathBuf,
    /// Vectorizer used for training and serving.
    pub vectorizer: VectorizerKind,
    /// Parallel fits during the grid search.
    pub search_workers: usize,
    /// `no_funder` confidence above which a candidate answer is rejected.
    pub min_no_funder_confidence: f64,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let train_filepath = lookup("FUNDER_TRAIN_FILEPATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/training_data.json"));
        let model_filepath = lookup("FUNDER_MODEL_FILEPATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/model.bin"));
        let vectorizer = lookup("FUNDER_VECTORIZER")
            .map(|v| v.parse::<VectorizerKind>())
            .transpose()
            .context("parsing FUNDER_VECTORIZER")?
            .unwrap_or(VectorizerKind::Hashing);
        let search_workers = lookup("FUNDER_SEARCH_WORKERS")
            .map(|v| v.parse::<usize>())
            .transpose()
            .context("parsing FUNDER_SEARCH_WORKERS")?
            .unwrap_or_else(|| classifier::TrainingConfig::default().workers);
        let min_no_funder_confidence = lookup("FUNDER_MIN_NO_FUNDER_CONFIDENCE")
            .map(|v| v.parse::<f64>())
            .transpose()
            .context("parsing FUNDER_MIN_NO_FUNDER_CONFIDENCE")?
            .unwrap_or(DEFAULT_MIN_NO_FUNDER_CONFIDENCE);

        Ok(Self {
            train_filepath,
            model_filepath,
            vectorizer,
            search_workers,
            min_no_funder_confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.model_filepath, PathBuf::from("./data/model.bin"));
        assert_eq!(settings.vectorizer, VectorizerKind::Hashing);
        assert_eq!(settings.search_workers, 8);
        assert_eq!(settings.min_no_funder_confidence, 0.75);
    }

    #[test]
    fn variables_override_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("FUNDER_MODEL_FILEPATH", "/srv/intent.bin"),
            ("FUNDER_VECTORIZER", "MiniLM"),
            ("FUNDER_SEARCH_WORKERS", "2"),
        ]);
        let settings = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(settings.model_filepath, PathBuf::from("/srv/intent.bin"));
        assert_eq!(settings.vectorizer, VectorizerKind::MiniLm);
        assert_eq!(settings.search_workers, 2);
    }

    #[test]
    fn malformed_number_is_reported() {
        let err = Settings::from_lookup(|k| (k == "FUNDER_SEARCH_WORKERS").then(|| "many".into()))
            .unwrap_err();
        assert!(err.to_string().contains("FUNDER_SEARCH_WORKERS"));
    }
}
