//! # Drift correction
//!
//! The ring track makes the robot drift consistently to one side. Every time the robot steps off
//! the line to the right or to the left a counter is incremented, and the counters are used to
//! bend the left wheel speed when the robot is centered so that it stays on the ring.
//!
//! The counters live for the whole run and are never decremented or reset.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;

use crate::track_pos::LateralPosition;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Accumulated drift counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DriftBias {
    /// Number of entries into `LateralPosition::DriftingRight`.
    pub bias_right: u32,

    /// Number of entries into `LateralPosition::DriftingLeft`.
    pub bias_left: u32,
}

/// Owner of the drift counters, the only thing allowed to modify them.
#[derive(Debug, Default, Clone)]
pub struct DriftCorrector {
    bias: DriftBias,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriftCorrector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the current position, incrementing a counter if the robot has just entered a
    /// drifting position.
    ///
    /// `previous` is `None` before the first classified tick of the run, which counts as being in
    /// a different position to any drifting one.
    pub fn observe(
        &mut self,
        position: LateralPosition,
        previous: Option<LateralPosition>
    ) -> DriftBias {
        // Counters are incremented on the edge into a drifting position, not the level
        if previous != Some(position) {
            match position {
                LateralPosition::DriftingRight => {
                    self.bias.bias_right = self.bias.bias_right.saturating_add(1);
                    debug!("Drifted right, bias now {:?}", self.bias);
                },
                LateralPosition::DriftingLeft => {
                    self.bias.bias_left = self.bias.bias_left.saturating_add(1);
                    debug!("Drifted left, bias now {:?}", self.bias);
                },
                _ => ()
            }
        }

        self.bias
    }

    /// Apply the drift correction to the nominal left wheel speed.
    ///
    /// The result is not clipped, the caller must limit it.
    pub fn correction_for(&self, nominal_left_pct: f64) -> f64 {
        nominal_left_pct - self.bias.bias_right as f64 + self.bias.bias_left as f64
    }

    /// The current counters.
    pub fn bias(&self) -> DriftBias {
        self.bias
    }
}
