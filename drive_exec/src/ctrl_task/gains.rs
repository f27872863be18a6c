//! Controller gains

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use drive_if::eqpt::drive::{MAX_OUTPUT, MIN_OUTPUT};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Gains and output limits of a closed-loop controller.
///
/// Names in parameter files follow the dashboard keys (`kP`, `kI`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlGains {
    /// Proportional gain
    #[serde(rename = "kP")]
    pub k_p: f64,

    /// Integral gain
    #[serde(rename = "kI", default)]
    pub k_i: f64,

    /// Derivative gain
    #[serde(rename = "kD", default)]
    pub k_d: f64,

    /// Feed-forward gain, applied to the target
    #[serde(rename = "kF", default)]
    pub k_f: f64,

    /// Lower limit of the controller output
    #[serde(rename = "minOutput", default = "default_min_output")]
    pub min_output: f64,

    /// Upper limit of the controller output
    #[serde(rename = "maxOutput", default = "default_max_output")]
    pub max_output: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum GainsError {
    #[error("Gain {0} must be finite, found {1}")]
    NonFiniteGain(&'static str, f64),

    #[error("Output limits [{0}, {1}] must be ordered and within [-1, 1]")]
    InvalidOutputLimits(f64, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ControlGains {
    /// A proportional only controller limited to the full output range.
    pub fn proportional(k_p: f64) -> Self {
        Self {
            k_p,
            k_i: 0.0,
            k_d: 0.0,
            k_f: 0.0,
            min_output: MIN_OUTPUT,
            max_output: MAX_OUTPUT,
        }
    }

    pub fn validate(&self) -> Result<(), GainsError> {
        let gains = [
            ("kP", self.k_p),
            ("kI", self.k_i),
            ("kD", self.k_d),
            ("kF", self.k_f),
        ];

        for &(name, gain) in gains.iter() {
            if !gain.is_finite() {
                return Err(GainsError::NonFiniteGain(name, gain));
            }
        }

        let (min, max) = (self.min_output, self.max_output);
        if !(MIN_OUTPUT <= min && min <= max && max <= MAX_OUTPUT) {
            return Err(GainsError::InvalidOutputLimits(min, max));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn default_min_output() -> f64 {
    MIN_OUTPUT
}

fn default_max_output() -> f64 {
    MAX_OUTPUT
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
