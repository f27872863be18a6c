//! Distance and joystick conversions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use drive_if::eqpt::drive::{DriveCommand, Side};

use super::{Deadzone, DriveGeometry, GeometryError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Converts between actuator revolutions and inches for one validated
/// drivetrain geometry.
///
/// Both conversion constants are derived from the same circumference and gear
/// ratio so that a distance commanded in inches and measured back in inches
/// never drift apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    geometry: DriveGeometry,

    /// Units: inches/revolution
    inches_per_rev: f64,

    /// Units: revolutions/inch
    revs_per_inch: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl UnitConverter {
    /// Create a converter, refusing invalid geometry.
    pub fn new(geometry: DriveGeometry) -> Result<Self, GeometryError> {
        geometry.validate()?;

        let circumference_in = geometry.circumference_in();

        Ok(Self {
            geometry,
            inches_per_rev: circumference_in / geometry.gear_ratio,
            revs_per_inch: geometry.gear_ratio / circumference_in,
        })
    }

    pub fn geometry(&self) -> &DriveGeometry {
        &self.geometry
    }

    /// Convert actuator revolutions to linear distance travelled.
    pub fn revs_to_inches(&self, revs: f64) -> f64 {
        revs * self.inches_per_rev
    }

    /// Convert linear distance to actuator revolutions.
    pub fn inches_to_revs(&self, inches: f64) -> f64 {
        inches * self.revs_per_inch
    }

    pub fn inches_per_rev(&self) -> f64 {
        self.inches_per_rev
    }

    pub fn revs_per_inch(&self) -> f64 {
        self.revs_per_inch
    }
}

impl Deadzone {
    /// Filter one side's axis value through that side's deadzone.
    pub fn apply(&self, side: Side, axis_value: f64) -> f64 {
        if !self.enabled {
            return axis_value;
        }

        let threshold = match side {
            Side::Left => self.left,
            Side::Right => self.right,
        };

        apply_deadzone(axis_value, threshold)
    }

    /// Filter a pair of tank axes into a drive command.
    pub fn filter_tank(&self, left_axis: f64, right_axis: f64) -> DriveCommand {
        DriveCommand::new(
            self.apply(Side::Left, left_axis),
            self.apply(Side::Right, right_axis),
        )
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Suppress axis values whose magnitude is below `threshold` to exactly zero.
///
/// Values at or above the threshold are returned unchanged, the remaining
/// range is not rescaled.
pub fn apply_deadzone(axis_value: f64, threshold: f64) -> f64 {
    if axis_value.abs() < threshold {
        0.0
    } else {
        axis_value
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
