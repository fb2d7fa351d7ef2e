//! CLI entry-point for classifying context texts.

use std::{
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    nlp::VectorizerKind,
    service::{IntentService, PredictionResponse},
};

/// Args for the `predict` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Text to classify. Omit to read `--input`.
    pub text: Option<String>,
    /// File with one context per line ("-" for stdin).
    #[arg(long, conflicts_with = "text")]
    pub input: Option<PathBuf>,
    /// Model artifact (defaults to FUNDER_MODEL_FILEPATH).
    #[arg(long)]
    pub model: Option<PathBuf>,
    /// Vectorizer override; must match the one used for training.
    #[arg(long, value_enum)]
    pub vectorizer: Option<VectorizerKind>,
    /// Reject threshold for `no_funder` predictions.
    #[arg(long)]
    pub min_no_funder_confidence: Option<f64>,
}

#[derive(Debug, Serialize)]
struct PredictionLine<'a> {
    text: &'a str,
    #[serde(flatten)]
    prediction: PredictionResponse,
    accepted: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let model_path = args
        .model
        .clone()
        .unwrap_or_else(|| settings.model_filepath.clone());
    let vectorizer = super::vectorizer_for(args.vectorizer, &settings)?;
    let service = IntentService::load(&model_path, vectorizer)
        .with_context(|| format!("loading model {}", model_path.display()))?;
    let threshold = args
        .min_no_funder_confidence
        .unwrap_or(settings.min_no_funder_confidence);

    let texts = match (&args.text, &args.input) {
        (Some(text), _) => vec![text.clone()],
        (None, Some(path)) => read_lines(path)?,
        (None, None) => bail!("provide a text argument or --input"),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for text in &texts {
        let prediction = service.predict(text)?;
        let accepted = prediction.accepts_funder(threshold);
        let line = PredictionLine {
            text,
            prediction,
            accepted,
        };
        serde_json::to_writer(&mut out, &line)?;
        writeln!(out)?;
    }
    info!(count = texts.len(), "classified texts");
    Ok(())
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let reader: Box<dyn BufRead> = if path.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        Box::new(BufReader::new(file))
    };
    let mut texts = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            texts.push(line);
        }
    }
    Ok(texts)
}
