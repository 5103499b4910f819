//! # Data Store

use log::warn;

use crate::av_ctrl;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Time since the first cycle, as measured by the platform's clock
    pub elapsed_s: f64,

    // AvCtrl
    pub av_ctrl: av_ctrl::AvCtrl,
    pub av_ctrl_input: av_ctrl::InputData,
    pub av_ctrl_output: av_ctrl::OutputData,
    pub av_ctrl_status_rpt: av_ctrl::StatusReport,

    /// Set once the startup sequence has completed and control ticks are running.
    pub ctrl_active: bool,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Total number of cycle overruns
    pub num_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Create a new data store around an initialised controller.
    pub fn new(av_ctrl: av_ctrl::AvCtrl) -> Self {
        Self {
            av_ctrl,
            ..Self::default()
        }
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears the controller input and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        let cycles_per_second = (cycle_frequency_hz.round() as u64).max(1);
        self.is_1_hz_cycle = self.num_cycles % cycles_per_second == 0;

        self.av_ctrl_input = av_ctrl::InputData::default();
    }

    /// Perform actions required at the end of a cycle.
    ///
    /// `overrun_s` is the time by which the cycle overran its period, if it did.
    pub fn cycle_end(&mut self, overrun_s: Option<f64>) {
        match overrun_s {
            Some(s) => {
                warn!("Cycle overran by {:.06} s", s);
                self.num_consec_cycle_overruns += 1;
                self.num_cycle_overruns += 1;
            },
            None => self.num_consec_cycle_overruns = 0,
        }

        self.num_cycles += 1;
    }
}
