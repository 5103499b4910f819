//! # Startup synchronisation sequence
//!
//! Before the control loop starts every robot on the track waits for the room lights to be
//! switched off and back on again, so that a group of robots all start driving at the same
//! moment. The sequence is:
//!
//! - `Init` - Ready tone, the indicator starts blinking.
//! - `Blink` - Blink the waiting colour until the lights go off.
//! - `LightsOff` - Lights off tone then a settle pause.
//! - `Flash` - A number of quick flashes to acknowledge the lights going off.
//! - `Settle` - Another settle pause.
//! - `WaitLightsOn` - Wait until the lights come back on.
//! - `Done` - Go tone and go colour, the control loop may start.
//!
//! The sequence is stepped once per cycle and never blocks, timing is measured on the elapsed
//! time passed into [`StartupSeq::step`].

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use comms_if::eqpt::{IndicatorDems, Rgb, Tone};
use log::{debug, info};
use serde::Deserialize;

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// Parameters of the startup sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StartupParams {
    /// If false the sequence is skipped and the control loop starts straight away.
    pub enabled: bool,

    /// Ambient light level above which the lights are considered on.
    pub light_threshold: f64,

    /// Time the waiting colour is shown, then hidden, for each blink.
    ///
    /// Units: milliseconds
    pub blink_period_ms: f64,

    pub flash_count: u32,

    /// Time the flash colour is shown, then hidden, for each flash.
    ///
    /// Units: milliseconds
    pub flash_period_ms: f64,

    /// Pause after the lights go off and after the flashes.
    ///
    /// Units: milliseconds
    pub settle_ms: f64,

    pub ready_tone: Tone,
    pub lights_off_tone: Tone,
    pub go_tone: Tone,

    pub waiting_colour: Rgb,
    pub flash_colour: Rgb,
    pub go_colour: Rgb,
}

/// The startup sequence state machine.
#[derive(Debug, Clone)]
pub struct StartupSeq {
    state: StartupState,
}

/// Demands produced by one step of the sequence.
///
/// Fields are `None` when there is nothing new to send to the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StartupOutput {
    pub indicator: Option<IndicatorDems>,
    pub tone: Option<Tone>,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

/// State of the startup sequence.
///
/// `since_s` fields hold the elapsed time at which the current period started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartupState {
    Init,
    Blink { since_s: f64, lit: bool },
    LightsOff { since_s: f64 },
    Flash { since_s: f64, lit: bool, count: u32 },
    Settle { since_s: f64 },
    WaitLightsOn,
    Done,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl Default for StartupParams {
    fn default() -> Self {
        Self {
            enabled: true,
            light_threshold: 300.0,
            blink_period_ms: 1000.0,
            flash_count: 5,
            flash_period_ms: 100.0,
            settle_ms: 1000.0,
            ready_tone: Tone::new(800, 200),
            lights_off_tone: Tone::new(500, 400),
            go_tone: Tone::new(800, 200),
            waiting_colour: Rgb::new(0x8f, 0x00, 0xff),
            flash_colour: Rgb::new(0xff, 0xff, 0xff),
            go_colour: Rgb::new(0x00, 0xff, 0x00),
        }
    }
}

impl StartupOutput {
    fn indicator(dems: IndicatorDems) -> Self {
        Self {
            indicator: Some(dems),
            tone: None,
        }
    }

    fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }
}

impl StartupSeq {
    /// Create a new sequence, which is already done if the sequence is disabled.
    pub fn new(params: &StartupParams) -> Self {
        let state = if params.enabled {
            StartupState::Init
        } else {
            info!("Startup sequence disabled");
            StartupState::Done
        };

        Self { state }
    }

    pub fn state(&self) -> StartupState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == StartupState::Done
    }

    /// Step the sequence.
    ///
    /// # Inputs
    /// - `elapsed_s`: time since the executable started, only differences are used
    /// - `light`: current ambient light level
    pub fn step(&mut self, params: &StartupParams, elapsed_s: f64, light: f64) -> StartupOutput {
        let lights_on = light >= params.light_threshold;
        let blink_s = params.blink_period_ms / 1000.0;
        let flash_s = params.flash_period_ms / 1000.0;
        let settle_s = params.settle_ms / 1000.0;

        let (next, output) = match self.state {
            StartupState::Init => {
                info!("Waiting for the lights to go off");
                (
                    StartupState::Blink { since_s: elapsed_s, lit: true },
                    StartupOutput::indicator(params.waiting_colour.into())
                        .with_tone(params.ready_tone)
                )
            },
            StartupState::Blink { since_s, lit } if elapsed_s - since_s >= blink_s => {
                if lit {
                    (
                        StartupState::Blink { since_s: elapsed_s, lit: false },
                        StartupOutput::indicator(IndicatorDems::off())
                    )
                }
                // Lights are only checked at the end of a full blink
                else if light > params.light_threshold {
                    (
                        StartupState::Blink { since_s: elapsed_s, lit: true },
                        StartupOutput::indicator(params.waiting_colour.into())
                    )
                }
                else {
                    info!("Lights off");
                    (
                        StartupState::LightsOff { since_s: elapsed_s },
                        StartupOutput::default().with_tone(params.lights_off_tone)
                    )
                }
            },
            StartupState::LightsOff { since_s } if elapsed_s - since_s >= settle_s => {
                if params.flash_count > 0 {
                    (
                        StartupState::Flash { since_s: elapsed_s, lit: true, count: 0 },
                        StartupOutput::indicator(params.flash_colour.into())
                    )
                }
                else {
                    (StartupState::Settle { since_s: elapsed_s }, StartupOutput::default())
                }
            },
            StartupState::Flash { since_s, lit, count } if elapsed_s - since_s >= flash_s => {
                if lit {
                    (
                        StartupState::Flash { since_s: elapsed_s, lit: false, count },
                        StartupOutput::indicator(IndicatorDems::off())
                    )
                }
                else if count + 1 < params.flash_count {
                    (
                        StartupState::Flash { since_s: elapsed_s, lit: true, count: count + 1 },
                        StartupOutput::indicator(params.flash_colour.into())
                    )
                }
                else {
                    (StartupState::Settle { since_s: elapsed_s }, StartupOutput::default())
                }
            },
            StartupState::Settle { since_s } if elapsed_s - since_s >= settle_s => {
                info!("Waiting for the lights to come on");
                (StartupState::WaitLightsOn, StartupOutput::default())
            },
            StartupState::WaitLightsOn if lights_on => {
                info!("Lights on, go");
                (
                    StartupState::Done,
                    StartupOutput::indicator(params.go_colour.into()).with_tone(params.go_tone)
                )
            },
            s => (s, StartupOutput::default())
        };

        if next != self.state {
            debug!("Startup {:?} -> {:?}", self.state, next);
            self.state = next;
        }

        output
    }
}
