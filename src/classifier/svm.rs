//! Linear support-vector classifier with probability estimates.
//!
//! Multi-class problems are decomposed one-vs-rest into `linfa-svm` binary
//! machines. Each machine carries linfa's Platt calibration, and the
//! per-class probabilities are normalised to sum to one.

use linfa::{
    dataset::Pr,
    traits::{Fit, PredictInplace},
    DatasetBase,
};
use linfa_svm::Svm;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClassifierError, Result};

/// Kernel used by the classifier. Only the linear kernel is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kernel {
    Linear,
}

/// Per-class misclassification cost scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassWeight {
    /// Every sample costs `c`.
    Uniform,
    /// In the binary problem of class `k`, each side costs
    /// `c * n_samples / (2 * count_side)`.
    Balanced,
}

/// Hyperparameters for [`LinearSvc`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvcParams {
    pub c: f64,
    pub kernel: Kernel,
    pub class_weight: ClassWeight,
    /// Stopping tolerance of the SMO solver.
    pub tolerance: f64,
    /// Size of the class index space; classes absent from a training subset
    /// get no machine and never win.
    pub n_classes: Option<usize>,
}

impl SvcParams {
    pub fn new(c: f64) -> Self {
        Self {
            c,
            kernel: Kernel::Linear,
            class_weight: ClassWeight::Balanced,
            tolerance: 1e-3,
            n_classes: None,
        }
    }

    pub fn class_weight(mut self, class_weight: ClassWeight) -> Self {
        self.class_weight = class_weight;
        self
    }

    pub fn with_classes(mut self, n_classes: usize) -> Self {
        self.n_classes = Some(n_classes);
        self
    }

    fn check(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(ClassifierError::Training(format!(
                "cost parameter must be positive, got {}",
                self.c
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ClassifierError::Training(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    fn costs(&self, n_samples: usize, positives: usize) -> (f64, f64) {
        match self.class_weight {
            ClassWeight::Uniform => (self.c, self.c),
            ClassWeight::Balanced => {
                let scale = |count: usize| self.c * n_samples as f64 / (2.0 * count as f64);
                (scale(positives), scale(n_samples - positives))
            }
        }
    }

    fn fit_binary(&self, records: ArrayView2<'_, f64>, positives: Array1<bool>) -> Result<Svm<f64, Pr>> {
        let n_positive = positives.iter().filter(|p| **p).count();
        let (c_pos, c_neg) = self.costs(positives.len(), n_positive);
        let svm = match self.kernel {
            Kernel::Linear => Svm::<f64, Pr>::params()
                .linear_kernel()
                .pos_neg_weights(c_pos, c_neg)
                .eps(self.tolerance)
                .fit(&DatasetBase::new(records, positives.view())),
        };
        svm.map_err(|e| ClassifierError::Training(format!("svm solver: {e}")))
    }
}

impl Default for SvcParams {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Fitted multi-class linear SVC.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinearSvc {
    params: SvcParams,
    n_features: usize,
    separators: Vec<Option<Svm<f64, Pr>>>,
}

impl LinearSvc {
    pub fn params(&self) -> &SvcParams {
        &self.params
    }

    pub fn n_classes(&self) -> usize {
        self.separators.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// True when the model has a feature width and at least two fitted
    /// one-vs-rest machines.
    pub fn is_consistent(&self) -> bool {
        self.n_features > 0 && self.separators.iter().flatten().count() >= 2
    }

    /// Probability distribution over class indices for every row of `x`.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut out = Array2::zeros((x.nrows(), self.n_classes()));
        for (class, separator) in self.separators.iter().enumerate() {
            if let Some(svm) = separator {
                out.column_mut(class).assign(&positive_probability(svm, x));
            }
        }
        for mut row in out.rows_mut() {
            let total = row.sum();
            if total > 0.0 {
                row /= total;
            } else {
                row.fill(1.0 / row.len().max(1) as f64);
            }
        }
        out
    }

    /// Probability distribution over class indices for one sample.
    pub fn predict_proba_row(&self, x: ArrayView1<'_, f64>) -> Array1<f64> {
        let sample = x.to_owned().insert_axis(Axis(0));
        self.predict_proba(&sample).row(0).to_owned()
    }
}

fn positive_probability(svm: &Svm<f64, Pr>, x: &Array2<f64>) -> Array1<f64> {
    let mut out = <Svm<f64, Pr> as PredictInplace<Array2<f64>, Array1<Pr>>>::default_target(svm, x);
    svm.predict_inplace(x, &mut out);
    out.iter().map(|p| f64::from(**p)).collect()
}

impl PredictInplace<Array2<f64>, Array1<usize>> for LinearSvc {
    fn predict_inplace(&self, x: &Array2<f64>, y: &mut Array1<usize>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "the number of data points must match the number of output targets"
        );
        let proba = self.predict_proba(x);
        for (row, target) in proba.rows().into_iter().zip(y.iter_mut()) {
            *target = argmax(row);
        }
    }

    fn default_target(&self, x: &Array2<f64>) -> Array1<usize> {
        Array1::zeros(x.nrows())
    }
}

impl Fit<Array2<f64>, Array1<usize>, ClassifierError> for SvcParams {
    type Object = LinearSvc;

    fn fit(&self, dataset: &DatasetBase<Array2<f64>, Array1<usize>>) -> Result<LinearSvc> {
        self.check()?;
        let records = &dataset.records;
        let targets = &dataset.targets;
        if records.nrows() == 0 {
            return Err(ClassifierError::Training("empty training set".into()));
        }
        if records.nrows() != targets.len() {
            return Err(ClassifierError::Training(format!(
                "{} records but {} targets",
                records.nrows(),
                targets.len()
            )));
        }

        let observed = targets.iter().copied().max().map_or(0, |m| m + 1);
        let n_classes = self.n_classes.unwrap_or(0).max(observed);
        let mut counts = vec![0usize; n_classes];
        for &t in targets {
            counts[t] += 1;
        }
        let present = counts.iter().filter(|c| **c > 0).count();
        if present < 2 {
            return Err(ClassifierError::Training(format!(
                "at least two classes are required, found {present}"
            )));
        }

        let separators = (0..n_classes)
            .map(|class| {
                if counts[class] == 0 {
                    return Ok(None);
                }
                let positives = targets.mapv(|t| t == class);
                let svm = self.fit_binary(records.view(), positives)?;
                debug!(class, support = counts[class], "fitted one-vs-rest machine");
                Ok(Some(svm))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LinearSvc {
            params: self.clone(),
            n_features: records.ncols(),
            separators,
        })
    }
}

/// Index of the largest value; the lowest index wins ties and NaN never wins.
pub fn argmax(values: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (idx, &value) in values.iter().enumerate() {
        if value > best_value {
            best = idx;
            best_value = value;
        }
    }
    best
}
