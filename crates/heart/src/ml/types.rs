//! Training data, model contract and fit metrics.

use std::fmt;

/// `[length, hour, crowding]` for one corridor traversal.
pub type Features = [f64; 3];

pub const FEATURE_NAMES: [&str; 3] = ["length", "hour", "crowding"];

/// Feature rows with their simulated traversal times.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub features: Vec<Features>,
    pub targets: Vec<f64>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: Features, y: f64) {
        self.features.push(x);
        self.targets.push(y);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&Features, f64)> + '_ {
        self.features.iter().zip(self.targets.iter().copied())
    }

    pub(crate) fn select(&self, idx: &[usize]) -> Self {
        Self {
            features: idx.iter().map(|&i| self.features[i]).collect(),
            targets: idx.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}

/// Goodness of fit on one dataset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelMetrics {
    /// Mean absolute error, seconds.
    pub mae: f64,
    /// Root mean squared error, seconds.
    pub rmse: f64,
    pub r2: f64,
    /// Mean absolute percentage error, in percent.
    pub mape: f64,
}

impl ModelMetrics {
    pub fn from_predictions(truth: &[f64], predicted: &[f64]) -> Result<Self, MlError> {
        if truth.is_empty() {
            return Err(MlError::EmptyDataset);
        }
        if truth.len() != predicted.len() {
            return Err(MlError::invalid(format!(
                "{} targets but {} predictions",
                truth.len(),
                predicted.len()
            )));
        }
        let n = truth.len() as f64;
        let mean = truth.iter().sum::<f64>() / n;
        let (mut abs, mut sq, mut pct, mut tot) = (0.0, 0.0, 0.0, 0.0);
        for (&y, &p) in truth.iter().zip(predicted) {
            let err = y - p;
            abs += err.abs();
            sq += err * err;
            pct += err.abs() / y;
            tot += (y - mean) * (y - mean);
        }
        let r2 = if tot > 0.0 {
            1.0 - sq / tot
        } else if sq == 0.0 {
            1.0
        } else {
            0.0
        };
        Ok(Self {
            mae: abs / n,
            rmse: (sq / n).sqrt(),
            r2,
            mape: pct / n * 100.0,
        })
    }
}

impl fmt::Display for ModelMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MAE {:.3}s, RMSE {:.3}s, R² {:.3}, MAPE {:.1}%",
            self.mae, self.rmse, self.r2, self.mape
        )
    }
}

/// A regressor from corridor features to traversal time.
pub trait CostModel {
    fn name(&self) -> &'static str;

    fn train(&mut self, data: &Dataset) -> Result<(), MlError>;

    /// Raw model output; may be negative.
    fn predict(&self, x: &Features) -> Result<f64, MlError>;

    /// Traversal-time estimate, clamped at 0.
    fn estimate(&self, length: f64, hour: u8, crowding: f64) -> Result<f64, MlError> {
        Ok(self.predict(&[length, f64::from(hour), crowding])?.max(0.0))
    }

    /// Fit metrics of the clamped estimates on `data`.
    fn evaluate(&self, data: &Dataset) -> Result<ModelMetrics, MlError> {
        let predicted = data
            .features
            .iter()
            .map(|x| self.predict(x).map(|p| p.max(0.0)))
            .collect::<Result<Vec<_>, _>>()?;
        ModelMetrics::from_predictions(&data.targets, &predicted)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MlError {
    NotTrained { model: &'static str },
    EmptyDataset,
    TooFewSamples { needed: usize, got: usize },
    /// Normal equations have no unique solution.
    Singular,
    InvalidParams { reason: String },
}

impl MlError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotTrained { model } => write!(f, "{model}: model not trained"),
            Self::EmptyDataset => write!(f, "dataset is empty"),
            Self::TooFewSamples { needed, got } => {
                write!(f, "need at least {needed} samples, got {got}")
            }
            Self::Singular => write!(f, "least-squares system is singular"),
            Self::InvalidParams { reason } => write!(f, "invalid model params: {reason}"),
        }
    }
}

impl std::error::Error for MlError {}
