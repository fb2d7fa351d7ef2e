//! Hyperparameter selection strategies.

use linfa::{
    traits::{Fit, Predict},
    Dataset,
};
use ndarray::{Array1, Axis, Ix1};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::{
    classifier::{
        metrics::weighted_f1,
        split::stratified_folds,
        svm::{LinearSvc, SvcParams},
    },
    error::{ClassifierError, Result},
};

/// Cross-validated score of one candidate configuration. A fold whose fit
/// failed scores NaN; `mean_score` averages the remaining folds and is NaN
/// when none succeeded.
#[derive(Debug, Clone)]
pub struct CandidateScore {
    pub params: SvcParams,
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
}

/// Winner of a search, refit on the full training data.
#[derive(Debug)]
pub struct SearchOutcome {
    pub model: LinearSvc,
    pub best_index: usize,
    pub scores: Vec<CandidateScore>,
}

/// Picks and fits the best classifier configuration for a dataset whose
/// targets index a label space of `n_classes` classes.
pub trait HyperparameterSearch: Send + Sync {
    fn search(&self, dataset: &Dataset<f64, usize, Ix1>, n_classes: usize) -> Result<SearchOutcome>;
}

/// Exhaustive search over candidates, scored by weighted F1 under stratified
/// k-fold cross-validation. Folds are evaluated in parallel on a bounded pool.
/// The search fails only when no fold of any candidate could be fitted.
#[derive(Debug, Clone)]
pub struct GridSearch {
    candidates: Vec<SvcParams>,
    folds: usize,
    workers: usize,
}

impl GridSearch {
    pub fn new(candidates: Vec<SvcParams>, folds: usize) -> Self {
        Self {
            candidates,
            folds,
            workers: 1,
        }
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn candidates(&self) -> &[SvcParams] {
        &self.candidates
    }

    fn score_fold(
        &self,
        params: &SvcParams,
        dataset: &Dataset<f64, usize, Ix1>,
        test: &[usize],
        n_classes: usize,
    ) -> Result<f64> {
        let train: Vec<usize> = (0..dataset.records.nrows())
            .filter(|idx| test.binary_search(idx).is_err())
            .collect();
        let model = params
            .clone()
            .with_classes(n_classes)
            .fit(&subset(dataset, &train))?;
        let holdout = subset(dataset, test);
        let predicted: Array1<usize> = model.predict(&holdout.records);
        Ok(weighted_f1(&holdout.targets.to_vec(), &predicted.to_vec()))
    }
}

impl Default for GridSearch {
    fn default() -> Self {
        Self::new(vec![SvcParams::new(150.0)], 2).workers(8)
    }
}

impl HyperparameterSearch for GridSearch {
    fn search(&self, dataset: &Dataset<f64, usize, Ix1>, n_classes: usize) -> Result<SearchOutcome> {
        if self.candidates.is_empty() {
            return Err(ClassifierError::Training("grid has no candidates".into()));
        }
        let n_samples = dataset.records.nrows();
        if self.folds < 2 || n_samples < self.folds {
            return Err(ClassifierError::Training(format!(
                "cannot run {}-fold cross-validation on {n_samples} samples",
                self.folds
            )));
        }

        let folds = stratified_folds(&dataset.targets.to_vec(), self.folds);
        let jobs: Vec<(usize, usize)> = (0..self.candidates.len())
            .flat_map(|c| (0..folds.len()).map(move |f| (c, f)))
            .collect();
        info!(
            candidates = self.candidates.len(),
            folds = self.folds,
            fits = jobs.len(),
            workers = self.workers,
            "fitting grid search"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| ClassifierError::Training(format!("worker pool: {e}")))?;
        let results: Vec<Result<f64>> = pool.install(|| {
            jobs.par_iter()
                .map(|&(c, f)| self.score_fold(&self.candidates[c], dataset, &folds[f], n_classes))
                .collect()
        });

        let mut fold_scores = vec![Vec::with_capacity(folds.len()); self.candidates.len()];
        for (&(c, f), result) in jobs.iter().zip(results) {
            let score = match result {
                Ok(score) => score,
                Err(err) => {
                    warn!(candidate = c, fold = f, error = %err, "fold fit failed; scoring NaN");
                    f64::NAN
                }
            };
            fold_scores[c].push(score);
        }
        let scores: Vec<CandidateScore> = self
            .candidates
            .iter()
            .zip(fold_scores)
            .map(|(params, fold_scores)| CandidateScore {
                params: params.clone(),
                mean_score: finite_mean(&fold_scores),
                fold_scores,
            })
            .collect();

        let mut best_index: Option<usize> = None;
        for (idx, score) in scores.iter().enumerate() {
            info!(
                candidate = idx,
                c = score.params.c,
                kernel = ?score.params.kernel,
                mean_f1 = score.mean_score,
                "cross-validated candidate"
            );
            if score.mean_score.is_nan() {
                continue;
            }
            match best_index {
                Some(best) if scores[best].mean_score >= score.mean_score => {}
                _ => best_index = Some(idx),
            }
        }
        let best_index = best_index.ok_or_else(|| {
            ClassifierError::Training("every cross-validation fit failed".into())
        })?;

        let model = self.candidates[best_index]
            .clone()
            .with_classes(n_classes)
            .fit(dataset)?;
        info!(best_index, mean_f1 = scores[best_index].mean_score, "refit best candidate");
        Ok(SearchOutcome {
            model,
            best_index,
            scores,
        })
    }
}

fn finite_mean(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        f64::NAN
    } else {
        finite.iter().sum::<f64>() / finite.len() as f64
    }
}

/// Rows of `dataset` at `indices`, in that order.
pub fn subset(dataset: &Dataset<f64, usize, Ix1>, indices: &[usize]) -> Dataset<f64, usize, Ix1> {
    Dataset::new(
        dataset.records.select(Axis(0), indices),
        dataset.targets.select(Axis(0), indices),
    )
}
