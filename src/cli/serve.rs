//! CLI entry-point for serving the HTTP API.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    api::{self, AppState},
    config::Settings,
    nlp::VectorizerKind,
    service::IntentService,
};

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Port to bind (default 8080).
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
    /// Host address, defaults to localhost.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    /// Model artifact (defaults to FUNDER_MODEL_FILEPATH).
    #[arg(long)]
    pub model: Option<PathBuf>,
    /// Vectorizer override; must match the one used for training.
    #[arg(long, value_enum)]
    pub vectorizer: Option<VectorizerKind>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let model_path = args.model.unwrap_or_else(|| settings.model_filepath.clone());
    let vectorizer = super::vectorizer_for(args.vectorizer, &settings)?;
    let service = IntentService::load(&model_path, vectorizer)
        .with_context(|| format!("loading model {}", model_path.display()))?;
    let state = AppState {
        service,
        min_no_funder_confidence: settings.min_no_funder_confidence,
    };
    api::serve(state, args.host, args.port).await
}
