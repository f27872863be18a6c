//! # Input processor module
//!
//! The input processor handles every input event, from whichever source, and
//! routes it to the module concerned.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;

// Internal
use drive_if::input::InputEvent;
use drive_lib::{dashboard::TunableStore, data_store::DataStore, input_bind::InputBindings};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Process an input event.
///
/// Mutates the datastore to queue requests for the task scheduler.
pub(crate) fn exec(
    ds: &mut DataStore,
    bindings: &mut InputBindings,
    tunables: &TunableStore,
    event: &InputEvent,
) {
    match event {
        InputEvent::Button { .. } | InputEvent::Axis { .. } => {
            if let Some(req) = bindings.process(event) {
                ds.sched_requests.push(req);
            }
        }
        InputEvent::Tunable { key, value } => {
            if let Err(e) = tunables.set(key, *value) {
                warn!("Dashboard write of {} = {} rejected: {}", key, value, e);
                ds.num_rejected_tunables += 1;
            }
        }
        InputEvent::Mode { mode } => ds.set_mode(*mode),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
