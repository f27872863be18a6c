//! # Data Store

use log::{info, warn};

use drive_if::{
    eqpt::drive::DriveCommand,
    input::RobotMode,
    task::{SchedRequest, TaskId},
};

use crate::task_sched::TickReport;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Time since the start of the run, counted in cycles.
    ///
    /// Units: seconds
    pub sim_time_s: f64,

    // Robot mode
    /// Current operating mode of the robot.
    pub mode: RobotMode,

    /// Time the autonomous period started, if it is running.
    pub auton_start_s: Option<f64>,

    // TaskScheduler
    pub sched_requests: Vec<SchedRequest>,
    pub sched_output: DriveCommand,
    pub sched_report: TickReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Total number of cycle overruns
    pub num_cycle_overruns: u64,

    /// Number of dashboard writes which were rejected
    pub num_rejected_tunables: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_period_s: f64) {
        let cycle_frequency_hz = (1.0 / cycle_period_s).round().max(1.0) as u128;
        self.is_1_hz_cycle = self.num_cycles % cycle_frequency_hz == 0;

        self.sched_requests.clear();
        self.sim_time_s = (self.num_cycles as f64) * cycle_period_s;
    }

    /// Change the robot mode.
    ///
    /// Entering autonomous schedules the autonomous routine and starts the
    /// autonomous period. Entering teleop cancels the routine, so the default
    /// task takes over.
    pub fn set_mode(&mut self, mode: RobotMode) {
        if mode == self.mode {
            return;
        }

        info!("Robot mode changed from {:?} to {:?}", self.mode, mode);

        match mode {
            RobotMode::Autonomous => {
                self.sched_requests
                    .push(SchedRequest::Schedule(TaskId::Autonomous));
                self.auton_start_s = Some(self.sim_time_s);
            }
            RobotMode::Teleop => {
                self.sched_requests.push(SchedRequest::Cancel(TaskId::Autonomous));
                self.auton_start_s = None;
            }
            RobotMode::Disabled => {
                self.auton_start_s = None;
            }
        }

        self.mode = mode;
    }

    /// Record a cycle which finished within its period.
    pub fn record_cycle_on_time(&mut self) {
        self.num_consec_cycle_overruns = 0;
    }

    /// Record a cycle which overran its period by `overrun_s` seconds.
    pub fn record_cycle_overrun(&mut self, overrun_s: f64) {
        self.num_consec_cycle_overruns += 1;
        self.num_cycle_overruns += 1;

        warn!(
            "Cycle overran by {:.06} s ({} consecutive)",
            overrun_s, self.num_consec_cycle_overruns
        );
    }

    /// End the autonomous period if it has lasted `auton_duration_s`.
    ///
    /// Returns true if the period was ended on this call.
    pub fn check_auton_timeout(&mut self, auton_duration_s: f64) -> bool {
        match self.auton_start_s {
            Some(t0) if self.sim_time_s - t0 >= auton_duration_s => {
                info!("Autonomous period of {:.1} s is over", auton_duration_s);
                self.sched_requests.push(SchedRequest::Cancel(TaskId::Autonomous));
                self.auton_start_s = None;
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
