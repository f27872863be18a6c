//! # Task scheduler module
//!
//! The scheduler owns the drive actuator and every control task, and runs
//! the active task once per control cycle. It guarantees that:
//!
//! - At most one task owns the drive at a time, and at most one `execute` is
//!   made per cycle.
//! - When a task is replaced or cancelled it is ended (leaving the drive
//!   stopped) and the drive outputs zero for the rest of that cycle. The next
//!   task is only initialised on a later cycle.
//! - When no task is active the most recently scheduled task, or otherwise
//!   the default task, is initialised.
//! - While disabled no task runs and the drive is held stopped.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use state::*;

use drive_if::task::TaskId;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during scheduler operation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SchedError {
    #[error("Task {0} is registered more than once")]
    DuplicateTask(TaskId),

    #[error("Task {0} is not registered with the scheduler")]
    UnknownTask(TaskId),

    #[error("The scheduler has not been initialised")]
    NotInitialised,
}
