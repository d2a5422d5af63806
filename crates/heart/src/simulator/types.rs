//! Simulator parameters and result types.

use std::fmt;
use std::str::FromStr;

/// How effective crowding `c ∈ [0, 1]` slows walking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CongestionModel {
    /// `1 + c`
    #[default]
    Linear,
    /// `1 + 2.5 c²`; mild until crowding gets high.
    Quadratic,
    /// `1` below 0.6, then linear up to `3` at `c = 1`.
    Threshold,
}

impl CongestionModel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
            Self::Threshold => "threshold",
        }
    }
}

impl fmt::Display for CongestionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CongestionModel {
    type Err = SimulatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "quadratic" => Ok(Self::Quadratic),
            "threshold" => Ok(Self::Threshold),
            other => Err(SimulatorError::invalid(format!(
                "unknown congestion model {other:?}"
            ))),
        }
    }
}

/// Simulator configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulatorParams {
    /// Free-flow walking speed in m/s.
    pub mean_speed: f64,
    pub congestion: CongestionModel,
    /// Chance that a random event (spill, trolley jam, …) slows a traversal.
    pub event_probability: f64,
    /// Uniform range of the event slowdown factor.
    pub event_magnitude: (f64, f64),
    /// Std of the multiplicative noise around 1.
    pub noise_std: f64,
}

impl Default for SimulatorParams {
    fn default() -> Self {
        Self {
            mean_speed: 1.4,
            congestion: CongestionModel::Linear,
            event_probability: 0.05,
            event_magnitude: (1.2, 2.0),
            noise_std: 0.06,
        }
    }
}

impl SimulatorParams {
    /// Deterministic variant: no events, no noise.
    pub fn noiseless(self) -> Self {
        Self {
            event_probability: 0.0,
            noise_std: 0.0,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), SimulatorError> {
        if !(self.mean_speed.is_finite() && self.mean_speed > 0.0) {
            return Err(SimulatorError::invalid("mean_speed must be finite and > 0"));
        }
        if !(0.0..=1.0).contains(&self.event_probability) {
            return Err(SimulatorError::invalid("event_probability must lie in [0, 1]"));
        }
        let (lo, hi) = self.event_magnitude;
        if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi) {
            return Err(SimulatorError::invalid(
                "event_magnitude must satisfy 0 < lo <= hi",
            ));
        }
        if !(self.noise_std.is_finite() && self.noise_std >= 0.0) {
            return Err(SimulatorError::invalid("noise_std must be finite and >= 0"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulatorError {
    InvalidParams { reason: String },
}

impl SimulatorError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid simulator params: {reason}"),
        }
    }
}

impl std::error::Error for SimulatorError {}

/// Summary of repeated traversal-time draws for one corridor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeStats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}
