//! Bidirectional mapping between intent labels and class indices.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Label encoder fitted over the sorted set of unique intents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelEncoder {
    classes: IndexSet<String>,
}

impl LabelEncoder {
    pub fn fit<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut unique: Vec<&str> = labels.into_iter().collect();
        unique.sort_unstable();
        unique.dedup();
        Self {
            classes: unique.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn transform(&self, label: &str) -> Option<usize> {
        self.classes.get_index_of(label)
    }

    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get_index(index).map(String::as_str)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl From<Vec<String>> for LabelEncoder {
    fn from(classes: Vec<String>) -> Self {
        Self {
            classes: classes.into_iter().collect(),
        }
    }
}

impl From<LabelEncoder> for Vec<String> {
    fn from(encoder: LabelEncoder) -> Self {
        encoder.classes.into_iter().collect()
    }
}
