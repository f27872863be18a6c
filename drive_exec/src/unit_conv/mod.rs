//! # Unit conversion module
//!
//! Pure conversions between the actuators' native unit (output shaft
//! revolutions) and linear distance, and the deadzone filtering applied to
//! raw joystick axes before they become drive outputs.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod converter;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use converter::*;
pub use params::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors in the unit conversion configuration.
///
/// These are fatal at startup, as every derived distance would be meaningless.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GeometryError {
    #[error("Wheel diameter must be positive and finite, found {0} in")]
    InvalidWheelDiameter(f64),

    #[error("Gear ratio must be positive and finite, found {0}")]
    InvalidGearRatio(f64),

    #[error("Distance correction must be positive and finite, found {0}")]
    InvalidDistanceCorrection(f64),

    #[error("Deadzone threshold for the {0} side must be in [0, 1), found {1}")]
    InvalidDeadzone(&'static str, f64),
}
