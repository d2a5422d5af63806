//! Ordinary least squares on `[1, length, hour, crowding]`.

use nalgebra::{DMatrix, DVector};

use super::types::{CostModel, Dataset, Features, MlError, FEATURE_NAMES};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearCoefficients {
    pub intercept: f64,
    pub length: f64,
    pub hour: f64,
    pub crowding: f64,
}

/// Linear regression solved through the normal equations `XᵀX β = Xᵀy`
/// with a Cholesky factorization.
#[derive(Clone, Debug, Default)]
pub struct LinearModel {
    coef: Option<LinearCoefficients>,
}

impl LinearModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until trained.
    pub fn coefficients(&self) -> Option<LinearCoefficients> {
        self.coef
    }
}

impl CostModel for LinearModel {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn train(&mut self, data: &Dataset) -> Result<(), MlError> {
        let n = data.len();
        if n == 0 {
            return Err(MlError::EmptyDataset);
        }
        let cols = 1 + FEATURE_NAMES.len();
        if n < cols {
            return Err(MlError::TooFewSamples { needed: cols, got: n });
        }
        let x = DMatrix::from_fn(n, cols, |i, j| {
            if j == 0 {
                1.0
            } else {
                data.features[i][j - 1]
            }
        });
        let y = DVector::from_column_slice(&data.targets);
        let xt = x.transpose();
        let xtx = &xt * &x;
        let sv = xtx.singular_values();
        if sv.min() <= sv.max() * 1e-12 {
            return Err(MlError::Singular);
        }
        let beta = xtx.cholesky().ok_or(MlError::Singular)?.solve(&(&xt * &y));
        self.coef = Some(LinearCoefficients {
            intercept: beta[0],
            length: beta[1],
            hour: beta[2],
            crowding: beta[3],
        });
        Ok(())
    }

    fn predict(&self, x: &Features) -> Result<f64, MlError> {
        let c = self.coef.ok_or(MlError::NotTrained { model: self.name() })?;
        Ok(c.intercept + c.length * x[0] + c.hour * x[1] + c.crowding * x[2])
    }
}
