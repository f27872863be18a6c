//! Tank drive from the operator's joysticks

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, trace};

use drive_if::task::TaskId;

use super::{ControlTask, TaskContext};
use crate::unit_conv::Deadzone;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Maps the left axis onto the left side and the right axis onto the right
/// side, after the per-side deadzone. Never finishes by itself, so it is the
/// usual default task.
#[derive(Debug, Clone)]
pub struct TeleopDrive {
    deadzone: Deadzone,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TeleopDrive {
    pub fn new(deadzone: Deadzone) -> Self {
        Self { deadzone }
    }
}

impl ControlTask for TeleopDrive {
    fn id(&self) -> TaskId {
        TaskId::TeleopDrive
    }

    fn initialize(&mut self, _ctx: &mut TaskContext<'_>) {
        debug!("TeleopDrive started");
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        let cmd = self.deadzone.filter_tank(ctx.tank.left, ctx.tank.right);

        trace!("TeleopDrive output: {:?}", cmd);
        ctx.actuator.set_command(cmd);
    }

    fn is_finished(&self, _ctx: &TaskContext<'_>) -> bool {
        false
    }

    fn end(&mut self, interrupted: bool, ctx: &mut TaskContext<'_>) {
        ctx.actuator.stop();
        debug!("TeleopDrive ended (interrupted: {})", interrupted);
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        ctrl_task::test_tunables,
        drive_act::{sim::SimDrive, test_params},
        input_bind::TankInputs,
    };
    use drive_if::eqpt::drive::DriveCommand;

    #[test]
    fn test_tank_mapping() {
        let (sim, mut act) = SimDrive::new(&test_params());
        let tunables = test_tunables();
        let mut task = TeleopDrive::new(Deadzone {
            enabled: true,
            left: 0.15,
            right: 0.15,
        });

        let mut ctx = TaskContext {
            actuator: &mut act,
            tunables: &tunables,
            tank: TankInputs {
                left: 0.5,
                right: 0.1,
            },
            cycle_period_s: 0.02,
        };
        task.initialize(&mut ctx);
        task.execute(&mut ctx);

        assert_eq!(ctx.actuator.last_command(), DriveCommand::new(0.5, 0.0));
        assert!(!task.is_finished(&ctx));

        // Right side is inverted in hardware
        assert_eq!(sim.left()[0].output(), 0.5);
        assert_eq!(sim.right()[0].output(), 0.0);

        ctx.tank = TankInputs {
            left: -0.2,
            right: -1.0,
        };
        task.execute(&mut ctx);
        assert_eq!(ctx.actuator.last_command(), DriveCommand::new(-0.2, -1.0));
        assert_eq!(sim.right()[1].output(), 1.0);

        task.end(true, &mut ctx);
        assert_eq!(ctx.actuator.last_command(), DriveCommand::STOP);
    }
}
