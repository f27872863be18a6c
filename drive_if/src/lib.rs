//! # Drive interface crate.
//!
//! Provides the interface types shared between the drive control core and
//! its external collaborators: the operator input layer, the dashboard and
//! the drive equipment.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Operator input events (buttons, axes, dashboard writes, robot mode changes)
pub mod input;

/// Identifiers of the control tasks which can be scheduled
pub mod task;

/// Command definitions for equipment (like the drive actuators)
pub mod eqpt;
