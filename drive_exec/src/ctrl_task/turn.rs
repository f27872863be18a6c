//! Turn on the spot

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{info, trace};

use drive_if::{eqpt::drive::DriveCommand, task::TaskId};

use super::{closed_loop::ClosedLoop, ControlTask, Setpoint, TaskContext};
use crate::drive_act::PositionReading;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Turns on the spot by driving the sides in opposite directions until the
/// differential position is within the margin of the target.
///
/// A target of 42 revolutions is roughly a half turn on the robot's default
/// geometry. Positive targets turn clockwise (left side forwards).
#[derive(Debug, Clone)]
pub struct TurnToAngle {
    setpoint: Setpoint,
    ctrl: ClosedLoop,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TurnToAngle {
    pub fn new(setpoint: Setpoint, stale_window_cycles: u32) -> Self {
        Self {
            setpoint,
            ctrl: ClosedLoop::new(stale_window_cycles),
        }
    }
}

impl ControlTask for TurnToAngle {
    fn id(&self) -> TaskId {
        TaskId::TurnToAngle
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        ctx.actuator.reset_encoders();
        self.ctrl.reset();

        info!(
            "TurnToAngle to {:.3} rev (+/- {:.3} rev)",
            self.setpoint.target_revs, self.setpoint.margin_revs
        );
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        let measured = turn_position(ctx);
        let out = self.ctrl.step(
            measured,
            &self.setpoint,
            &ctx.tunables.turn_gains(),
            ctx.cycle_period_s,
        );

        trace!("TurnToAngle at {:.3} rev, output {:.4}", measured.revs, out);
        ctx.actuator.set_command(DriveCommand::spin(out));
    }

    fn is_finished(&self, ctx: &TaskContext<'_>) -> bool {
        self.ctrl.is_finished(turn_position(ctx), &self.setpoint)
    }

    fn end(&mut self, interrupted: bool, ctx: &mut TaskContext<'_>) {
        ctx.actuator.stop();
        info!(
            "TurnToAngle ended at {:.3} rev (interrupted: {})",
            turn_position(ctx).revs,
            interrupted
        );
    }

    fn aborted(&self) -> bool {
        self.ctrl.aborted()
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn turn_position(ctx: &TaskContext<'_>) -> PositionReading {
    let fb = ctx.actuator.feedback();

    PositionReading {
        revs: fb.differential_revs(),
        stale: fb.is_stale(),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
