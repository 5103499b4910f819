//! # Track position classification
//!
//! Interprets the two line follower sensors as the robot's lateral position relative to the
//! track line.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::LineSensData;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Lateral position of the robot on the track.
///
/// The naming follows the steering table applied to each position rather than any physical
/// mounting orientation of the sensors, see `av_ctrl` for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LateralPosition {
    /// Both sensors over the line.
    Centered,

    /// Left sensor over the line, right sensor off it.
    DriftingRight,

    /// Left sensor off the line, right sensor over it.
    DriftingLeft,

    /// Neither sensor over the line.
    Lost,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LateralPosition {
    /// Classify a pair of line sensor readings.
    pub fn classify(left_on_black: bool, right_on_black: bool) -> Self {
        match (left_on_black, right_on_black) {
            (true, true) => LateralPosition::Centered,
            (true, false) => LateralPosition::DriftingRight,
            (false, true) => LateralPosition::DriftingLeft,
            (false, false) => LateralPosition::Lost,
        }
    }
}

impl From<LineSensData> for LateralPosition {
    fn from(data: LineSensData) -> Self {
        Self::classify(data.left_on_black, data.right_on_black)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(LateralPosition::classify(true, true), LateralPosition::Centered);
        assert_eq!(LateralPosition::classify(true, false), LateralPosition::DriftingRight);
        assert_eq!(LateralPosition::classify(false, true), LateralPosition::DriftingLeft);
        assert_eq!(LateralPosition::classify(false, false), LateralPosition::Lost);
    }

    #[test]
    fn test_from_raw_code() {
        let positions: Vec<LateralPosition> = (0..4)
            .map(|c| LineSensData::from_raw(c).unwrap().into())
            .collect();

        assert_eq!(
            positions,
            vec![
                LateralPosition::Centered,
                LateralPosition::DriftingRight,
                LateralPosition::DriftingLeft,
                LateralPosition::Lost
            ]
        );
    }
}
