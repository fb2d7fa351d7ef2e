//! Funder intent classification for scholarly acknowledgement texts.
//!
//! Candidate funder answers found by an upstream question-answering pipeline
//! are passed through [`service::IntentService::predict`], which embeds the
//! surrounding context and decides whether it names a funder or is noise such
//! as an open-access statement.

pub mod api;
pub mod artifact;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod nlp;
pub mod service;

pub use classifier::{IntentClassifier, Prediction, TrainingConfig};
pub use data::LabeledExample;
pub use error::{ClassifierError, Result};
pub use service::{IntentService, PredictionResponse};
