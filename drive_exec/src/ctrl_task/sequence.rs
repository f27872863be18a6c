//! # Task sequences
//!
//! Runs a list of tasks one after the other as a single task, which is how
//! the autonomous routine is built. A child which finishes is ended on the
//! cycle it finishes, and the next child is initialised on the following
//! cycle, so consecutive children never share a cycle between `end` and
//! `initialize`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{info, warn};

use drive_if::task::TaskId;

use super::{ControlTask, TaskContext};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct TaskSequence {
    id: TaskId,

    steps: Vec<Box<dyn ControlTask>>,

    /// Index of the current step.
    current: usize,

    /// True if the current step has been initialised and not yet ended.
    step_running: bool,

    aborted: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TaskSequence {
    pub fn new(id: TaskId, steps: Vec<Box<dyn ControlTask>>) -> Self {
        Self {
            id,
            steps,
            current: 0,
            step_running: false,
            aborted: false,
        }
    }

    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    /// Index of the step currently running, or `None` between steps and once
    /// the sequence is done.
    pub fn current_step(&self) -> Option<usize> {
        if self.step_running {
            Some(self.current)
        } else {
            None
        }
    }
}

impl ControlTask for TaskSequence {
    fn id(&self) -> TaskId {
        self.id
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        self.current = 0;
        self.step_running = false;
        self.aborted = false;

        info!("{} started with {} steps", self.id, self.steps.len());

        if let Some(step) = self.steps.first_mut() {
            step.initialize(ctx);
            self.step_running = true;
        }
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        let step = match self.steps.get_mut(self.current) {
            Some(s) => s,
            None => {
                ctx.actuator.stop();
                return;
            }
        };

        if !self.step_running {
            info!("{} step {}: {}", self.id, self.current, step.id());
            step.initialize(ctx);
            self.step_running = true;
        }

        step.execute(ctx);

        if step.is_finished(ctx) {
            step.end(false, ctx);
            self.step_running = false;

            if step.aborted() {
                warn!(
                    "{} step {} ({}) aborted, abandoning the sequence",
                    self.id,
                    self.current,
                    step.id()
                );
                self.aborted = true;
                self.current = self.steps.len();
            } else {
                self.current += 1;
            }
        }
    }

    fn is_finished(&self, _ctx: &TaskContext<'_>) -> bool {
        self.current >= self.steps.len()
    }

    fn end(&mut self, interrupted: bool, ctx: &mut TaskContext<'_>) {
        if self.step_running {
            if let Some(step) = self.steps.get_mut(self.current) {
                step.end(interrupted, ctx);
            }
            self.step_running = false;
        }

        ctx.actuator.stop();
        info!("{} ended (interrupted: {})", self.id, interrupted);
    }

    fn aborted(&self) -> bool {
        self.aborted
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        ctrl_task::test_tunables,
        drive_act::{sim::SimDrive, test_params},
        input_bind::TankInputs,
    };
    use drive_if::eqpt::drive::DriveCommand;

    /// A task which finishes after a fixed number of executes, recording its
    /// lifecycle calls.
    struct Counted {
        name: &'static str,
        num_cycles: u32,
        done: u32,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl ControlTask for Counted {
        fn id(&self) -> TaskId {
            TaskId::DriveToDistance
        }

        fn initialize(&mut self, _ctx: &mut TaskContext<'_>) {
            self.done = 0;
            self.log.borrow_mut().push(format!("{} init", self.name));
        }

        fn execute(&mut self, ctx: &mut TaskContext<'_>) {
            self.done += 1;
            ctx.actuator.set_command(DriveCommand::straight(0.5));
            self.log.borrow_mut().push(format!("{} exec", self.name));
        }

        fn is_finished(&self, _ctx: &TaskContext<'_>) -> bool {
            self.done >= self.num_cycles
        }

        fn end(&mut self, interrupted: bool, ctx: &mut TaskContext<'_>) {
            ctx.actuator.stop();
            self.log
                .borrow_mut()
                .push(format!("{} end {}", self.name, interrupted));
        }
    }

    fn counted(
        name: &'static str,
        num_cycles: u32,
        log: &Rc<RefCell<Vec<String>>>,
    ) -> Box<dyn ControlTask> {
        Box::new(Counted {
            name,
            num_cycles,
            done: 0,
            log: log.clone(),
        })
    }

    #[test]
    fn test_sequence_order() {
        let (_sim, mut act) = SimDrive::new(&test_params());
        let tunables = test_tunables();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut seq = TaskSequence::new(
            TaskId::Autonomous,
            vec![counted("a", 2, &log), counted("b", 1, &log)],
        );
        let mut ctx = TaskContext {
            actuator: &mut act,
            tunables: &tunables,
            tank: TankInputs::default(),
            cycle_period_s: 0.02,
        };

        // One execute of the sequence per cycle, recording the cycle each
        // lifecycle call happens in
        seq.initialize(&mut ctx);
        let mut cycles = Vec::new();
        for cycle in 0..10 {
            log.borrow_mut().push(format!("cycle {}", cycle));
            seq.execute(&mut ctx);
            if seq.is_finished(&ctx) {
                seq.end(false, &mut ctx);
                break;
            }
            cycles.push(cycle);
        }

        assert_eq!(
            *log.borrow(),
            vec![
                "a init", "cycle 0", "a exec", "cycle 1", "a exec", "a end false", "cycle 2",
                "b init", "b exec", "b end false"
            ]
        );
        assert_eq!(cycles, vec![0, 1]);
        assert_eq!(ctx.actuator.last_command(), DriveCommand::STOP);
    }

    #[test]
    fn test_interrupt_current_step() {
        let (_sim, mut act) = SimDrive::new(&test_params());
        let tunables = test_tunables();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut seq = TaskSequence::new(
            TaskId::Autonomous,
            vec![counted("a", 5, &log), counted("b", 1, &log)],
        );
        let mut ctx = TaskContext {
            actuator: &mut act,
            tunables: &tunables,
            tank: TankInputs::default(),
            cycle_period_s: 0.02,
        };

        seq.initialize(&mut ctx);
        seq.execute(&mut ctx);
        assert_eq!(seq.current_step(), Some(0));
        assert_eq!(ctx.actuator.last_command(), DriveCommand::straight(0.5));

        seq.end(true, &mut ctx);
        assert_eq!(*log.borrow(), vec!["a init", "a exec", "a end true"]);
        assert_eq!(ctx.actuator.last_command(), DriveCommand::STOP);
    }

    #[test]
    fn test_empty_sequence() {
        let (_sim, mut act) = SimDrive::new(&test_params());
        let tunables = test_tunables();
        let mut seq = TaskSequence::new(TaskId::Autonomous, Vec::new());
        let mut ctx = TaskContext {
            actuator: &mut act,
            tunables: &tunables,
            tank: TankInputs::default(),
            cycle_period_s: 0.02,
        };

        seq.initialize(&mut ctx);
        assert!(seq.is_finished(&ctx));
        seq.execute(&mut ctx);
        assert_eq!(ctx.actuator.last_command(), DriveCommand::STOP);
    }
}
