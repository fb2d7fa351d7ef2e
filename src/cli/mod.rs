//! Command-line interface wiring for funder-intent.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::{
    config::Settings,
    nlp::{self, Vectorizer, VectorizerKind},
};

pub mod predict;
pub mod serve;
pub mod train;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Funder intent classifier", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Train(args) => train::run(args, settings).await,
            Commands::Predict(args) => predict::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Train the intent classifier and write the model artifact.
    Train(train::Args),
    /// Classify context texts with a trained model.
    Predict(predict::Args),
    /// Serve predictions over HTTP.
    Serve(serve::Args),
}

fn vectorizer_for(
    requested: Option<VectorizerKind>,
    settings: &Settings,
) -> Result<Arc<dyn Vectorizer>> {
    let kind = requested.unwrap_or(settings.vectorizer);
    nlp::build_vectorizer(kind).with_context(|| format!("building {kind:?} vectorizer"))
}
