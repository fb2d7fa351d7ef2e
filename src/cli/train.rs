//! CLI entry-point for training the intent classifier.

use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use clap::Args as ClapArgs;
use tokio::sync::oneshot;
use tracing::{info, instrument, warn};

use crate::{
    artifact,
    classifier::{self, TrainingConfig, DEFAULT_SEED},
    config::Settings,
    data,
    nlp::VectorizerKind,
};

/// Args for the `train` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Training document (defaults to FUNDER_TRAIN_FILEPATH).
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// Where to write the model (defaults to FUNDER_MODEL_FILEPATH).
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Vectorizer override.
    #[arg(long, value_enum)]
    pub vectorizer: Option<VectorizerKind>,
    /// Parallel fits during the grid search.
    #[arg(long)]
    pub workers: Option<usize>,
    /// Seed of the validation shuffle.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
    /// Abort training after this many seconds; no model is written.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let data_path = args.data.unwrap_or_else(|| settings.train_filepath.clone());
    let model_path = args
        .output
        .unwrap_or_else(|| settings.model_filepath.clone());
    let vectorizer = super::vectorizer_for(args.vectorizer, &settings)?;
    let config = TrainingConfig {
        seed: args.seed,
        workers: args.workers.unwrap_or(settings.search_workers),
        ..TrainingConfig::default()
    };

    // Training runs on a plain thread so a timeout can abandon it. Only this
    // task writes the artifact, and only once the result arrived in time.
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let outcome = data::load_training_data(&data_path)
            .with_context(|| format!("loading {}", data_path.display()))
            .and_then(|examples| {
                classifier::train(vectorizer.as_ref(), &examples, &config).map_err(Into::into)
            });
        let _ = tx.send(outcome);
    });

    let received = match args.timeout_secs {
        Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), rx).await {
            Ok(received) => received,
            Err(_) => {
                warn!(timeout_secs = secs, "training timed out");
                bail!("training exceeded {secs}s; no model written");
            }
        },
        None => rx.await,
    };
    let classifier =
        received.map_err(|_| anyhow!("training thread exited without a result"))??;
    artifact::save(&classifier, &model_path)?;

    info!(path = %model_path.display(), "training complete");
    Ok(())
}
