//! Motor controller hardware seam

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::HwError;

// ---------------------------------------------------------------------------
// TYPES
// ---------------------------------------------------------------------------

/// Bus identifier of a motor controller.
pub type MotorId = u8;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Trait to provide a unified API for accessing drive motor controllers.
pub trait MotorController {

    /// The bus identifier of this controller.
    fn id(&self) -> MotorId;

    /// Set the normalised output of the motor.
    ///
    /// ## Arguments
    /// - `output` - The output to set, between -1.0 and 1.0. Callers are
    ///   responsible for limiting the output.
    fn set_output(&mut self, output: f64) -> Result<(), HwError>;

    /// Read the integrated encoder position of the motor's output shaft.
    ///
    /// Units: revolutions
    fn position_revs(&mut self) -> Result<f64, HwError>;

    /// Zero the integrated encoder position.
    fn reset_position(&mut self) -> Result<(), HwError>;
}
