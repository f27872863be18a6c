//! Main drive executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Input event acquisition from the input script
//!         - Input event processing (bindings, dashboard, robot mode)
//!         - Task scheduler processing, which samples the drive feedback and
//!           runs the active control task
//!         - Simulated drive plant step
//!
//! # Modules
//!
//! All cyclic modules (e.g. `task_sched`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use drive_lib::{
    auton,
    ctrl_task::{
        self, ControlTask, DriveToDistance, TeleopDrive, TunableGainDrive, TurnToAngle,
    },
    dashboard::{TunableStore, TunableValues},
    data_store::DataStore,
    drive_act::{self, sim::SimDrive},
    input_bind::{self, InputBindings},
    params::DriveExecParams,
    task_sched::{self, TaskScheduler},
    unit_conv::{self, UnitConverter},
};

mod input_processor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use drive_if::task::TaskId;
use util::{
    host,
    logger::logger_init,
    module::State,
    script_interpreter::{PendingEvents, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("drive_exec", "sessions").wrap_err("Failed to create the session")?;

    // Load exec parameters, which include the logging configuration
    let exec_params: DriveExecParams =
        util::params::load("drive_exec.toml").wrap_err("Could not load exec params")?;

    // Initialise logger
    logger_init(&exec_params.log, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Drive Core Executable\n");
    info!(
        "Software root: {:?}",
        host::get_drive_core_sw_root().wrap_err("Failed to get the software root")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    exec_params
        .validate()
        .wrap_err("Invalid exec params")?;
    info!(
        "Cycle period {} s ({:.1} Hz)",
        exec_params.cycle_period_s,
        exec_params.cycle_frequency_hz()
    );

    // ---- LOAD PARAMETERS ----

    let unit_conv_params: unit_conv::Params =
        util::params::load("unit_conv.toml").wrap_err("Could not load unit_conv params")?;
    unit_conv_params
        .validate()
        .wrap_err("Invalid unit_conv params")?;

    let drive_act_params: drive_act::Params =
        util::params::load("drive_act.toml").wrap_err("Could not load drive_act params")?;
    drive_act_params
        .validate()
        .wrap_err("Invalid drive_act params")?;

    let ctrl_task_params: ctrl_task::Params =
        util::params::load("ctrl_task.toml").wrap_err("Could not load ctrl_task params")?;
    ctrl_task_params
        .validate()
        .wrap_err("Invalid ctrl_task params")?;

    let input_bind_params: input_bind::Params =
        util::params::load("input_bind.toml").wrap_err("Could not load input_bind params")?;

    info!("Parameters loaded");

    // ---- INITIALISE INPUT SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() != 2 {
        return Err(eyre!(
            "Expected one argument (the input script path), found {}",
            args.len() - 1
        ));
    }

    info!("Loading script from \"{}\"", &args[1]);

    let mut script = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

    info!(
        "Loaded script {:?} lasts {:.02} s and contains {} events\n",
        script.get_path(),
        script.get_duration(),
        script.get_num_events()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    let conv = UnitConverter::new(unit_conv_params.geometry)
        .wrap_err("Failed to initialise the UnitConverter")?;
    info!(
        "UnitConverter init complete, {:.4} in/rev",
        conv.inches_per_rev()
    );

    let tunables = TunableStore::new(TunableValues::from_params(&ctrl_task_params));

    let mut bindings =
        InputBindings::new(&input_bind_params).wrap_err("Failed to initialise InputBindings")?;
    info!("InputBindings init complete");

    let (sim, actuator) = SimDrive::new(&drive_act_params);
    info!("Simulated drive init complete");

    let window = ctrl_task_params.stale_window_cycles;
    let routine = auton::build_routine(&exec_params.auton_steps, &conv, window)
        .wrap_err("Failed to build the autonomous routine")?;
    info!("Autonomous routine has {} steps", routine.num_steps());

    let tasks: Vec<Box<dyn ControlTask>> = vec![
        Box::new(TeleopDrive::new(unit_conv_params.deadzone)),
        Box::new(DriveToDistance::new(ctrl_task_params.drive_setpoint, window)),
        Box::new(TurnToAngle::new(ctrl_task_params.turn_setpoint, window)),
        Box::new(TunableGainDrive::new(window)),
        Box::new(routine),
    ];

    let mut sched = TaskScheduler::new(actuator, exec_params.cycle_period_s);
    sched
        .init(task_sched::InitData {
            tasks,
            default_task: Some(exec_params.default_task),
        })
        .wrap_err("Failed to initialise the TaskScheduler")?;

    for task in bindings.bound_tasks() {
        if !sched.is_registered(task) {
            return Err(eyre!("A button is bound to {}, which is not a known task", task));
        }
    }
    info!("TaskScheduler init complete");

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(exec_params.cycle_period_s);

        // ---- INPUT PROCESSING ----

        match script.get_pending_events(ds.sim_time_s) {
            PendingEvents::None => (),
            PendingEvents::Some(events) => {
                for event in events.iter() {
                    input_processor::exec(&mut ds, &mut bindings, &tunables, event);
                }
            }
            // Exit if end of script reached
            PendingEvents::EndOfScript => {
                info!("End of input script reached, stopping");
                break;
            }
        }

        ds.check_auton_timeout(exec_params.auton_duration_s);

        // ---- CONTROL PROCESSING ----

        let sched_input = task_sched::InputData {
            requests: std::mem::take(&mut ds.sched_requests),
            enabled: ds.mode.is_enabled(),
            tank: bindings.tank_inputs(),
            tunables: tunables
                .snapshot()
                .wrap_err("Failed to read the dashboard")?,
        };

        let (output, report) = sched
            .proc(&sched_input)
            .wrap_err("Error during TaskScheduler processing")?;
        ds.sched_output = output;
        ds.sched_report = report;

        // Finishing autonomous early still ends the autonomous period
        if let Some(end) = report.ended {
            if end.task == TaskId::Autonomous {
                ds.auton_start_s = None;
            }
        }

        // ---- PLANT ----

        sim.step(exec_params.cycle_period_s);

        // ---- STATUS ----

        if ds.is_1_hz_cycle {
            info!(
                "{:?}: task {:?}, output ({:.3}, {:.3}), travelled {:.2} in",
                ds.mode,
                report.active,
                output.left,
                output.right,
                conv.revs_to_inches(report.feedback.mean_revs())
            );
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(exec_params.cycle_period_s).checked_sub(cycle_dur) {
            Some(d) => {
                ds.record_cycle_on_time();
                thread::sleep(d);
            }
            None => {
                ds.record_cycle_overrun(cycle_dur.as_secs_f64() - exec_params.cycle_period_s);
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    let shutdown_input = task_sched::InputData {
        requests: Vec::new(),
        enabled: false,
        tank: bindings.tank_inputs(),
        tunables: tunables
            .snapshot()
            .wrap_err("Failed to read the dashboard")?,
    };
    if let Some(end) = sched
        .shutdown(&shutdown_input)
        .wrap_err("Failed to shut down the TaskScheduler")?
    {
        info!("{} ended at shutdown", end.task);
    }

    info!(
        "Ran {} cycles ({} overran), {} drive hardware faults, {} rejected dashboard writes",
        ds.num_cycles,
        ds.num_cycle_overruns,
        sched.actuator().num_hw_faults(),
        ds.num_rejected_tunables
    );

    info!("End of execution");

    Ok(())
}
