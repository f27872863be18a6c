//! Parameters structure for unit conversion

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::GeometryError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for unit conversion, as loaded from `unit_conv.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    pub geometry: DriveGeometry,

    pub deadzone: Deadzone,
}

/// Physical geometry of the drivetrain.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct DriveGeometry {
    /// Diameter of the drive wheels.
    ///
    /// Units: inches
    pub wheel_diameter_in: f64,

    /// Number of actuator output shaft revolutions per wheel revolution.
    pub gear_ratio: f64,

    /// Empirical scale applied to the wheel circumference, accounting for
    /// tread compression and scrub. Applied identically in both conversion
    /// directions.
    #[serde(default = "default_distance_correction")]
    pub distance_correction: f64,
}

/// Joystick deadzone configuration.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Deadzone {
    /// If false the deadzone filter passes every value through unchanged.
    pub enabled: bool,

    /// Threshold for the left side axis.
    pub left: f64,

    /// Threshold for the right side axis.
    pub right: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveGeometry {
    /// Check the geometry describes a physically possible drivetrain.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(self.wheel_diameter_in.is_finite() && self.wheel_diameter_in > 0.0) {
            return Err(GeometryError::InvalidWheelDiameter(self.wheel_diameter_in));
        }
        if !(self.gear_ratio.is_finite() && self.gear_ratio > 0.0) {
            return Err(GeometryError::InvalidGearRatio(self.gear_ratio));
        }
        if !(self.distance_correction.is_finite() && self.distance_correction > 0.0) {
            return Err(GeometryError::InvalidDistanceCorrection(self.distance_correction));
        }

        Ok(())
    }

    /// Effective rolling circumference of a wheel.
    ///
    /// Units: inches
    pub fn circumference_in(&self) -> f64 {
        std::f64::consts::PI * self.wheel_diameter_in * self.distance_correction
    }
}

impl Deadzone {
    /// A deadzone which never filters anything.
    pub const DISABLED: Deadzone = Deadzone {
        enabled: false,
        left: 0.0,
        right: 0.0,
    };

    pub fn validate(&self) -> Result<(), GeometryError> {
        for &(name, threshold) in [("left", self.left), ("right", self.right)].iter() {
            if !(threshold.is_finite() && threshold >= 0.0 && threshold < 1.0) {
                return Err(GeometryError::InvalidDeadzone(name, threshold));
            }
        }

        Ok(())
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), GeometryError> {
        self.geometry.validate()?;
        self.deadzone.validate()
    }
}

fn default_distance_correction() -> f64 {
    1.0
}
