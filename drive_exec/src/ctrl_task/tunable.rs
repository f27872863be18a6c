//! Drive to a distance set live on the dashboard

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{info, trace};

use drive_if::{eqpt::drive::DriveCommand, task::TaskId};

use super::{closed_loop::ClosedLoop, drive_dist::straight_position, ControlTask, TaskContext};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Same law as [`super::DriveToDistance`], but both the gains and the
/// setpoint are re-read from the dashboard snapshot on every cycle. Used to
/// tune the drive gains on the robot.
#[derive(Debug, Clone)]
pub struct TunableGainDrive {
    ctrl: ClosedLoop,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TunableGainDrive {
    pub fn new(stale_window_cycles: u32) -> Self {
        Self {
            ctrl: ClosedLoop::new(stale_window_cycles),
        }
    }
}

impl ControlTask for TunableGainDrive {
    fn id(&self) -> TaskId {
        TaskId::TunableGainDrive
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        ctx.actuator.reset_encoders();
        self.ctrl.reset();

        info!(
            "TunableGainDrive started with {:?}",
            ctx.tunables.gains
        );
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        let measured = straight_position(ctx);
        let out = self.ctrl.step(
            measured,
            &ctx.tunables.tunable_setpoint,
            &ctx.tunables.gains,
            ctx.cycle_period_s,
        );

        trace!("TunableGainDrive at {:.3} rev, output {:.4}", measured.revs, out);
        ctx.actuator.set_command(DriveCommand::straight(out));
    }

    fn is_finished(&self, ctx: &TaskContext<'_>) -> bool {
        self.ctrl
            .is_finished(straight_position(ctx), &ctx.tunables.tunable_setpoint)
    }

    fn end(&mut self, interrupted: bool, ctx: &mut TaskContext<'_>) {
        ctx.actuator.stop();
        info!("TunableGainDrive ended (interrupted: {})", interrupted);
    }

    fn aborted(&self) -> bool {
        self.ctrl.aborted()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        ctrl_task::{test_tunables, Setpoint},
        drive_act::{sim::SimDrive, test_params},
        input_bind::TankInputs,
    };
    use drive_if::eqpt::drive::Side;

    #[test]
    fn test_setpoint_read_every_cycle() {
        let (sim, mut act) = SimDrive::new(&test_params());
        let mut tunables = test_tunables();
        let mut task = TunableGainDrive::new(5);

        sim.set_side_position(Side::Left, 30.0);
        sim.set_side_position(Side::Right, 30.0);

        {
            let mut ctx = TaskContext {
                actuator: &mut act,
                tunables: &tunables,
                tank: TankInputs::default(),
                cycle_period_s: 0.02,
            };
            task.initialize(&mut ctx);

            sim.set_side_position(Side::Left, 30.0);
            sim.set_side_position(Side::Right, 30.0);
            ctx.actuator.refresh_feedback();
            task.execute(&mut ctx);
            assert!((ctx.actuator.last_command().left - 0.45).abs() < 1e-12);
            assert!(!task.is_finished(&ctx));
        }

        // Moving the target onto the current position finishes the task
        tunables.tunable_setpoint = Setpoint::new(31.0, 2.0).unwrap();
        tunables.gains.k_p = 0.1;

        let mut ctx = TaskContext {
            actuator: &mut act,
            tunables: &tunables,
            tank: TankInputs::default(),
            cycle_period_s: 0.02,
        };
        ctx.actuator.refresh_feedback();
        task.execute(&mut ctx);
        assert!((ctx.actuator.last_command().left - 0.1).abs() < 1e-12);
        assert!(task.is_finished(&ctx));
    }
}
