//! Closed-loop setpoints

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::unit_conv::UnitConverter;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A target position and the tolerance within which it counts as reached.
///
/// Both are in encoder revolutions. For turns the position is the
/// differential position of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Setpoint {
    /// Units: revolutions
    pub target_revs: f64,

    /// Allowed distance from the target, never negative. A margin of zero
    /// requires exact equality.
    ///
    /// Units: revolutions
    pub margin_revs: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SetpointError {
    #[error("Setpoint target must be finite, found {0}")]
    NonFiniteTarget(f64),

    #[error("Setpoint margin must be finite and non-negative, found {0}")]
    InvalidMargin(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Setpoint {
    pub fn new(target_revs: f64, margin_revs: f64) -> Result<Self, SetpointError> {
        let sp = Self {
            target_revs,
            margin_revs,
        };
        sp.validate()?;
        Ok(sp)
    }

    /// Build a setpoint from a distance and margin given in inches.
    pub fn from_inches(
        target_in: f64,
        margin_in: f64,
        conv: &UnitConverter,
    ) -> Result<Self, SetpointError> {
        Self::new(conv.inches_to_revs(target_in), conv.inches_to_revs(margin_in))
    }

    pub fn validate(&self) -> Result<(), SetpointError> {
        if !self.target_revs.is_finite() {
            return Err(SetpointError::NonFiniteTarget(self.target_revs));
        }
        if !(self.margin_revs.is_finite() && self.margin_revs >= 0.0) {
            return Err(SetpointError::InvalidMargin(self.margin_revs));
        }
        Ok(())
    }

    /// Signed distance from the measured position to the target.
    pub fn error(&self, measured_revs: f64) -> f64 {
        self.target_revs - measured_revs
    }

    /// True when `|measured - target| <= margin`.
    pub fn is_reached(&self, measured_revs: f64) -> bool {
        (measured_revs - self.target_revs).abs() <= self.margin_revs
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
