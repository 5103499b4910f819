//! # Tick driver
//!
//! Runs the startup sequence then the AV controller against a [`Platform`], one step per cycle.
//! The driver owns all timing: the interval between steps is measured on the platform's wrapping
//! microsecond counter, and the controller's mission clock starts on the step the startup
//! sequence completes.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use comms_if::eqpt::{IndicatorDems, Platform, WheelDems};
use log::info;

// Internal
use crate::{
    av_ctrl::{self, AvCtrl, AvCtrlInitError},
    data_store::DataStore,
    startup_seq::{StartupParams, StartupSeq, StartupState},
};
use util::{module::State, params, time};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The tick driver.
pub struct AvExec<P: Platform> {
    platform: P,

    startup_params: StartupParams,
    startup: StartupSeq,

    /// Clock reading at the previous step, `None` before the first step.
    last_micros: Option<u32>,

    pub ds: DataStore,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// What happened during a step.
#[derive(Debug, Clone, Copy)]
pub enum StepReport {
    /// The startup sequence ran, the wheels are held stopped.
    Startup(StartupState),

    /// A control tick ran.
    Control {
        output: av_ctrl::OutputData,
        report: av_ctrl::StatusReport,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ExecInitError {
    #[error("Failed to initialise AvCtrl: {0}")]
    AvCtrlInitError(AvCtrlInitError),

    #[error("Could not load the startup sequence parameters: {0}")]
    StartupParamLoadError(params::LoadError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<P: Platform> AvExec<P> {
    /// Create a new driver from an already initialised controller.
    pub fn new(platform: P, av_ctrl: AvCtrl, startup_params: StartupParams) -> Self {
        Self {
            platform,
            startup: StartupSeq::new(&startup_params),
            startup_params,
            last_micros: None,
            ds: DataStore::new(av_ctrl),
        }
    }

    /// Create a new driver, loading the controller and startup sequence parameter files.
    pub fn init(
        platform: P,
        ctrl_params_file: &str,
        startup_params_file: &str
    ) -> Result<Self, ExecInitError> {
        let mut ctrl = AvCtrl::default();
        ctrl.init(ctrl_params_file.to_string())
            .map_err(ExecInitError::AvCtrlInitError)?;
        info!("AvCtrl init complete");

        let startup_params: StartupParams = params::load(startup_params_file)
            .map_err(ExecInitError::StartupParamLoadError)?;
        info!("Startup sequence parameters loaded");

        Ok(Self::new(platform, ctrl, startup_params))
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Run one step: either the startup sequence or a control tick.
    pub fn step(&mut self) -> StepReport {
        let now = self.platform.micros();
        let dt_s = match self.last_micros {
            Some(last) => time::secs_since(last, now),
            None => 0.0
        };
        self.last_micros = Some(now);
        self.ds.elapsed_s += dt_s;

        // ---- STARTUP ----

        if !self.startup.is_done() {
            let light = self.platform.read_light();
            let out = self.startup.step(&self.startup_params, self.ds.elapsed_s, light);

            self.platform.drive(&WheelDems::stop());
            if let Some(dems) = out.indicator {
                self.platform.set_colour(&dems);
            }
            if let Some(tone) = out.tone {
                self.platform.tone(tone);
            }

            return StepReport::Startup(self.startup.state());
        }

        // ---- CONTROL ----

        // The first control interval is measured from the step the startup sequence completed
        if !self.ds.ctrl_active {
            info!("Starting control loop at {:.3} s", self.ds.elapsed_s);
            self.ds.ctrl_active = true;
        }

        self.ds.av_ctrl_input = av_ctrl::InputData {
            line: self.platform.read_line(),
            headway_cm: self.platform.read_headway_cm(),
            dt_s,
        };

        let (output, report) = match self.ds.av_ctrl.proc(&self.ds.av_ctrl_input) {
            Ok(r) => r,
            Err(e) => match e {}
        };
        self.ds.av_ctrl_output = output;
        self.ds.av_ctrl_status_rpt = report;

        self.platform.drive(&output.wheels);
        self.platform.set_colour(&output.indicator);

        StepReport::Control { output, report }
    }

    /// Stop the wheels and switch the indicator off.
    pub fn shutdown(&mut self) {
        self.platform.drive(&WheelDems::stop());
        self.platform.set_colour(&IndicatorDems::off());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::{SimParams, SimPlatform};
    use crate::track_pos::LateralPosition;
    use comms_if::eqpt::Tone;

    const DT: f64 = 0.02;

    fn exec(sim_params: SimParams, startup_params: StartupParams) -> AvExec<SimPlatform> {
        let ctrl = AvCtrl::new(av_ctrl::Params::default()).unwrap();
        AvExec::new(SimPlatform::new(sim_params), ctrl, startup_params)
    }

    fn step(exec: &mut AvExec<SimPlatform>) -> StepReport {
        let r = exec.step();
        exec.platform_mut().advance(DT);
        r
    }

    #[test]
    fn test_startup_holds_wheels() {
        let sim_params = SimParams::default();
        let lights_on_at_s = sim_params.lights_on_at_s;
        let mut exec = exec(sim_params, StartupParams::default());

        while exec.platform().time_s() < lights_on_at_s - DT {
            match step(&mut exec) {
                StepReport::Startup(_) => (),
                r => panic!("Control ran before the lights came on: {:?}", r)
            }
            assert!(exec.platform().wheels().is_stopped());
        }

        // Lights back on, the sequence completes within a step or two
        let mut done = false;
        for _ in 0..3 {
            if let StepReport::Startup(StartupState::Done) = step(&mut exec) {
                done = true;
                break;
            }
        }
        assert!(done);

        let p = StartupParams::default();
        assert_eq!(exec.platform().indicator(), IndicatorDems::both(p.go_colour));
        let tones: Vec<Tone> = exec.platform().tones().to_vec();
        assert_eq!(tones, vec![p.ready_tone, p.lights_off_tone, p.go_tone]);

        // Next step is the first control tick, with the mission clock starting from the go step
        match step(&mut exec) {
            StepReport::Control { report, .. } => {
                assert!((report.mission_clock_s - DT).abs() < 1e-6);
            },
            r => panic!("Expected a control tick, got {:?}", r)
        }
    }

    #[test]
    fn test_disabled_startup_controls_immediately() {
        let mut exec = exec(
            SimParams::default(),
            StartupParams { enabled: false, ..StartupParams::default() }
        );

        match step(&mut exec) {
            StepReport::Control { output, report } => {
                assert_eq!(report.mission_clock_s, 0.0);
                assert_eq!(report.position, Some(LateralPosition::Centered));
                assert!(output.wheels.is_stopped());
            },
            r => panic!("Expected a control tick, got {:?}", r)
        }
    }

    #[test]
    fn test_clock_wrap() {
        let mut exec = exec(
            SimParams {
                clock_start_us: u32::MAX - 50_000,
                ..SimParams::default()
            },
            StartupParams { enabled: false, ..StartupParams::default() }
        );

        // Run across the wrap, every tick must see a sensible interval
        let mut last_clock = 0.0;
        for _ in 0..20 {
            if let StepReport::Control { report, .. } = step(&mut exec) {
                assert!(!report.dt_invalid);
                assert!(report.mission_clock_s - last_clock <= DT + 1e-6);
                last_clock = report.mission_clock_s;
            }
        }

        assert!((last_clock - 19.0 * DT).abs() < 1e-6);
    }

    /// Line keeping figures from a closed-loop run.
    #[derive(Debug, Default)]
    struct LoopStats {
        control_ticks: usize,
        lost_ticks: usize,
        longest_lost_run: usize,
        moved: bool,
    }

    fn closed_loop(exec: &mut AvExec<SimPlatform>, duration_s: f64) -> LoopStats {
        let mut stats = LoopStats::default();
        let mut lost_run = 0;

        while exec.platform().time_s() < duration_s {
            if let StepReport::Control { output, report } = step(exec) {
                assert!(output.wheels.left_pct.abs() <= 100.0);
                assert!(output.wheels.right_pct.abs() <= 100.0);
                stats.moved |= !output.wheels.is_stopped();
                stats.control_ticks += 1;

                if report.position == Some(LateralPosition::Lost) {
                    stats.lost_ticks += 1;
                    lost_run += 1;
                    stats.longest_lost_run = stats.longest_lost_run.max(lost_run);
                }
                else if report.position.is_some() {
                    lost_run = 0;
                }
            }
        }

        stats
    }

    fn assert_keeps_line(exec: &AvExec<SimPlatform>, stats: &LoopStats) {
        assert!(stats.moved);
        assert!(
            (stats.lost_ticks as f64) < 0.01 * stats.control_ticks as f64,
            "{:?}", stats
        );
        // Half a second of reversing at most
        assert!(stats.longest_lost_run <= 25, "{:?}", stats);
        assert!(exec.platform().offset_cm().abs() < 2.0, "{:?}", stats);
        assert_eq!(exec.platform().num_collisions(), 0);
    }

    #[test]
    fn test_closed_loop_run() {
        let mut exec = exec(
            SimParams::default(),
            StartupParams { enabled: false, ..StartupParams::default() }
        );

        let stats = closed_loop(&mut exec, 180.0);

        assert_keeps_line(&exec, &stats);
        assert!(exec.ds.av_ctrl_status_rpt.mission_clock_s > 179.0);
    }

    #[test]
    fn test_closed_loop_shipped_params() {
        let exec_params: crate::params::AvExecParams = params::load_from_path(
            concat!(env!("CARGO_MANIFEST_DIR"), "/../params/av_exec.toml")
        ).unwrap();

        for ctrl_file in ["av_ctrl.toml", "av_ctrl_cautious.toml"].iter() {
            let ctrl_params: av_ctrl::Params = params::load_from_path(
                format!("{}/../params/{}", env!("CARGO_MANIFEST_DIR"), ctrl_file)
            ).unwrap();
            let startup_params: StartupParams = params::load_from_path(
                concat!(env!("CARGO_MANIFEST_DIR"), "/../params/startup_seq.toml")
            ).unwrap();

            let mut exec = AvExec::new(
                SimPlatform::new(exec_params.sim.clone()),
                AvCtrl::new(ctrl_params).unwrap(),
                startup_params
            );

            let stats = closed_loop(&mut exec, exec_params.run_duration_s);

            assert!(exec.ds.ctrl_active, "{}", ctrl_file);
            assert_keeps_line(&exec, &stats);
        }
    }

    #[test]
    fn test_braking_from_range_sensor() {
        let mut exec = exec(
            SimParams::default(),
            StartupParams { enabled: false, ..StartupParams::default() }
        );

        step(&mut exec);
        exec.platform_mut().set_gap_cm(5.0);

        match step(&mut exec) {
            StepReport::Control { output, report } => {
                assert!(report.emergency_stop);
                assert!(output.wheels.is_stopped());
                assert_eq!(
                    exec.platform().indicator(),
                    IndicatorDems::both(av_ctrl::Params::default().colours.braking)
                );
            },
            r => panic!("Expected a control tick, got {:?}", r)
        }
    }

    #[test]
    fn test_shutdown() {
        let mut exec = exec(
            SimParams::default(),
            StartupParams { enabled: false, ..StartupParams::default() }
        );
        exec.shutdown();
        assert!(exec.platform().wheels().is_stopped());
        assert_eq!(exec.platform().indicator(), IndicatorDems::off());
    }
}
