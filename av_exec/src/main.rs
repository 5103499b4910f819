//! Main AV executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Load parameters and initialise logging
//!     - Initialise the controller and the simulated platform
//!     - Main loop:
//!         - Startup synchronisation sequence, until the lights come back on
//!         - AV control processing:
//!             - Line sensor and range sensor acquisition
//!             - Track position, drift correction, headway, ramp and phase processing
//!             - Wheel and indicator demands
//!         - Simulation step
//!         - Cycle management
//!
//! # Modules
//!
//! All modules (e.g. `av_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::info;
use std::thread;
use std::time::Instant;

// Internal
use av_lib::{
    exec::{AvExec, StepReport},
    params::AvExecParams,
    sim::SimPlatform,
};
use util::{logger::logger_init, session::Session};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("av_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Parameters are loaded before the logger since they configure it
    let params: AvExecParams = util::params::load("av_exec.toml")
        .wrap_err("Could not load exec params")?;

    // Initialise logger
    logger_init(&params.log, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("AV Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    params.validate().wrap_err("Invalid exec params")?;
    let cycle_period = params.cycle_period().wrap_err("Invalid cycle period")?;
    let cycle_frequency_hz = 1.0 / params.cycle_period_s;

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let sim = SimPlatform::new(params.sim.clone());

    let mut exec = AvExec::init(sim, &params.ctrl_params_file, &params.startup_params_file)
        .wrap_err("Failed to initialise the AV exec")?;

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        exec.ds.cycle_start(cycle_frequency_hz);

        // ---- PROCESSING ----

        let report = exec.step();

        if exec.ds.is_1_hz_cycle {
            match report {
                StepReport::Startup(state) => info!("Startup: {:?}", state),
                StepReport::Control { output, report } => info!(
                    "{:?} at {:.1} s: wheels ({:.1}, {:.1}) %, headway x{:.2}, ramp x{:.2}, \
                     bias {:?}, gap {:.1} cm",
                    report.phase,
                    report.mission_clock_s,
                    output.wheels.left_pct,
                    output.wheels.right_pct,
                    report.headway_mult,
                    report.ramp_factor,
                    report.drift_bias,
                    exec.platform().gap_cm()
                ),
            }
        }

        // ---- SIMULATION ----

        exec.platform_mut().advance(params.cycle_period_s);

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                exec.ds.cycle_end(None);
                thread::sleep(d);
            },
            None => exec.ds.cycle_end(Some(
                cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
            )),
        }

        if params.run_duration_s > 0.0 && exec.ds.elapsed_s >= params.run_duration_s {
            info!("Run duration of {:.1} s reached, stopping", params.run_duration_s);
            break;
        }
    }

    // ---- SHUTDOWN ----

    exec.shutdown();

    info!(
        "End of execution: {} cycles, {} overruns, {} collisions",
        exec.ds.num_cycles,
        exec.ds.num_cycle_overruns,
        exec.platform().num_collisions()
    );

    Ok(())
}
