//! # Drive library.
//!
//! This library allows other crates in the workspace to access items defined inside the drive
//! crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Autonomous routine - builds the routine task from its configured steps
pub mod auton;

/// Control tasks - the time-bounded actions which own the drive while active
pub mod ctrl_task;

/// Dashboard - live tunable gains and setpoints
pub mod dashboard;

/// Global data store for the executable
pub mod data_store;

/// Drive actuator - the only module touching the drive hardware
pub mod drive_act;

/// Input bindings - maps operator buttons and axes onto scheduler requests
pub mod input_bind;

/// Executable parameters
pub mod params;

/// Task scheduler - runs the active control task every cycle
pub mod task_sched;

/// Unit conversion - revolutions to distance and joystick deadzones
pub mod unit_conv;
