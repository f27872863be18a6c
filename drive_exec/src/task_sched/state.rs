//! Implementation of the task scheduler

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::HashMap;

use log::{debug, info, trace, warn};
use serde::Serialize;

// Internal
use super::SchedError;
use crate::{
    ctrl_task::{ControlTask, TaskContext},
    dashboard::TunableValues,
    drive_act::{ActuatorFeedback, DriveActuator},
    input_bind::TankInputs,
};
use drive_if::{
    eqpt::drive::DriveCommand,
    task::{SchedRequest, TaskId},
};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The task scheduler.
pub struct TaskScheduler {
    /// The drive, lent to the active task for each call.
    actuator: DriveActuator,

    tasks: HashMap<TaskId, Box<dyn ControlTask>>,

    /// Task to run when no other task is active.
    default_task: Option<TaskId>,

    /// Task currently owning the drive.
    active: Option<TaskId>,

    /// Task to initialise once the drive is free.
    pending: Option<TaskId>,

    /// Units: seconds
    cycle_period_s: f64,

    initialised: bool,
}

/// Initialisation data for the scheduler.
pub struct InitData {
    /// Every task the scheduler can run. Identifiers must be unique.
    pub tasks: Vec<Box<dyn ControlTask>>,

    /// Task to run when no other task is active.
    pub default_task: Option<TaskId>,
}

/// Input data for one scheduler cycle.
#[derive(Debug, Clone)]
pub struct InputData {
    /// Requests made since the last cycle, in the order they were made.
    pub requests: Vec<SchedRequest>,

    /// If false no task may run.
    pub enabled: bool,

    /// Tank drive inputs sampled for this cycle.
    pub tank: TankInputs,

    /// Dashboard snapshot for this cycle.
    pub tunables: TunableValues,
}

/// What happened during one scheduler cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TickReport {
    /// Task initialised this cycle.
    pub initialized: Option<TaskId>,

    /// Task executed this cycle.
    pub executed: Option<TaskId>,

    /// Task ended this cycle.
    pub ended: Option<TaskEnd>,

    /// Task active at the end of the cycle.
    pub active: Option<TaskId>,

    /// Feedback sampled at the start of the cycle.
    pub feedback: ActuatorFeedback,
}

/// How a task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskEnd {
    pub task: TaskId,

    /// True if the task was cancelled, replaced or disabled rather than
    /// finishing by itself.
    pub interrupted: bool,

    /// True if the task gave up on its goal.
    pub aborted: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for TaskScheduler {
    type InitData = InitData;
    type InitError = SchedError;

    type InputData = InputData;
    type OutputData = DriveCommand;
    type StatusReport = TickReport;
    type ProcError = SchedError;

    /// Register the tasks and the default task.
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        for task in init_data.tasks {
            let id = task.id();
            if self.tasks.insert(id, task).is_some() {
                return Err(SchedError::DuplicateTask(id));
            }
        }

        if let Some(id) = init_data.default_task {
            if !self.tasks.contains_key(&id) {
                return Err(SchedError::UnknownTask(id));
            }
        }

        self.default_task = init_data.default_task;
        self.initialised = true;

        info!(
            "TaskScheduler initialised with {} tasks, default {:?}",
            self.tasks.len(),
            self.default_task
        );

        Ok(())
    }

    /// Run one control cycle, returning the command sent to the drive.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        if !self.initialised {
            return Err(SchedError::NotInitialised);
        }

        let mut report = TickReport {
            feedback: self.actuator.refresh_feedback(),
            ..TickReport::default()
        };

        let cancel_active = self.apply_requests(&input_data.requests);

        // Disabled, nothing runs
        if !input_data.enabled {
            self.pending = None;
            if let Some(id) = self.active {
                info!("Drive disabled, interrupting {}", id);
            }
            self.end_active(true, input_data, &mut report)?;
            self.actuator.stop();
            return Ok(self.finish_tick(report));
        }

        // Release the drive, the next task starts on the next cycle
        if self.active.is_some() && (cancel_active || self.pending.is_some()) {
            self.end_active(true, input_data, &mut report)?;
            self.actuator.stop();
            return Ok(self.finish_tick(report));
        }

        if self.active.is_none() {
            if let Some(id) = self.pending.take().or(self.default_task) {
                self.with_task(id, input_data, |t, ctx| t.initialize(ctx))?;
                info!("{} initialised", id);

                self.active = Some(id);
                report.initialized = Some(id);
            }
        }

        match self.active {
            Some(id) => {
                let finished = self.with_task(id, input_data, |t, ctx| {
                    t.execute(ctx);
                    t.is_finished(ctx)
                })?;
                report.executed = Some(id);

                if finished {
                    self.end_active(false, input_data, &mut report)?;
                }
            }
            None => {
                self.actuator.stop();
            }
        }

        Ok(self.finish_tick(report))
    }
}

impl TaskScheduler {
    /// Create a new scheduler owning the drive.
    ///
    /// Tasks are registered by [`State::init`].
    pub fn new(actuator: DriveActuator, cycle_period_s: f64) -> Self {
        Self {
            actuator,
            tasks: HashMap::new(),
            default_task: None,
            active: None,
            pending: None,
            cycle_period_s,
            initialised: false,
        }
    }

    /// End any active task and stop the drive.
    pub fn shutdown(&mut self, input_data: &InputData) -> Result<Option<TaskEnd>, SchedError> {
        let mut report = TickReport::default();
        self.pending = None;
        self.end_active(true, input_data, &mut report)?;
        self.actuator.stop();

        Ok(report.ended)
    }

    pub fn active_task(&self) -> Option<TaskId> {
        self.active
    }

    pub fn pending_task(&self) -> Option<TaskId> {
        self.pending
    }

    pub fn is_registered(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    pub fn actuator(&self) -> &DriveActuator {
        &self.actuator
    }

    /// Apply the requests in order, returning true if the active task is to
    /// be cancelled.
    fn apply_requests(&mut self, requests: &[SchedRequest]) -> bool {
        let mut cancel_active = false;

        for req in requests.iter() {
            match *req {
                SchedRequest::Schedule(id) => {
                    if !self.tasks.contains_key(&id) {
                        warn!("Ignoring request to schedule unknown task {}", id);
                    } else if self.active == Some(id) && !cancel_active {
                        debug!("{} is already active", id);
                        self.pending = None;
                    } else {
                        self.pending = Some(id);
                    }
                }
                SchedRequest::Cancel(id) => {
                    if self.pending == Some(id) {
                        self.pending = None;
                    }
                    if self.active == Some(id) {
                        cancel_active = true;
                    } else {
                        debug!("Ignoring cancel of inactive task {}", id);
                    }
                }
                SchedRequest::CancelAll => {
                    self.pending = None;
                    cancel_active = self.active.is_some();
                }
            }
        }

        cancel_active
    }

    /// End the active task if there is one.
    fn end_active(
        &mut self,
        interrupted: bool,
        input_data: &InputData,
        report: &mut TickReport,
    ) -> Result<(), SchedError> {
        let id = match self.active.take() {
            Some(id) => id,
            None => return Ok(()),
        };

        let aborted = self.with_task(id, input_data, |t, ctx| {
            t.end(interrupted, ctx);
            t.aborted()
        })?;

        if aborted {
            warn!("{} aborted", id);
        } else if interrupted {
            info!("{} interrupted", id);
        } else {
            info!("{} finished", id);
        }

        report.ended = Some(TaskEnd {
            task: id,
            interrupted,
            aborted,
        });

        Ok(())
    }

    /// Call `f` on a task with a context lending it the drive.
    fn with_task<R, F>(&mut self, id: TaskId, input_data: &InputData, f: F) -> Result<R, SchedError>
    where
        F: FnOnce(&mut dyn ControlTask, &mut TaskContext<'_>) -> R,
    {
        let task = self
            .tasks
            .get_mut(&id)
            .ok_or(SchedError::UnknownTask(id))?;

        let mut ctx = TaskContext {
            actuator: &mut self.actuator,
            tunables: &input_data.tunables,
            tank: input_data.tank,
            cycle_period_s: self.cycle_period_s,
        };

        Ok(f(task.as_mut(), &mut ctx))
    }

    fn finish_tick(&mut self, mut report: TickReport) -> (DriveCommand, TickReport) {
        report.active = self.active;

        let output = self.actuator.last_command();
        trace!("TaskScheduler tick: {:?}, output {:?}", report, output);

        (output, report)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
