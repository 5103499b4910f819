//! # Sensor Data

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// State of the two line follower sensors.
///
/// `true` means the sensor is over the black track line.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineSensData {
    pub left_on_black: bool,
    pub right_on_black: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LineCodeError {
    #[error("Line follower codes are between 0 and 3, found {0}")]
    OutOfRange(u8),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LineSensData {
    pub fn new(left_on_black: bool, right_on_black: bool) -> Self {
        Self {
            left_on_black,
            right_on_black,
        }
    }

    /// Decode the raw code reported by the line follower module.
    ///
    /// | code | left  | right |
    /// |------|-------|-------|
    /// | 0    | black | black |
    /// | 1    | black | white |
    /// | 2    | white | black |
    /// | 3    | white | white |
    pub fn from_raw(code: u8) -> Result<Self, LineCodeError> {
        if code > 3 {
            return Err(LineCodeError::OutOfRange(code));
        }

        Ok(Self {
            left_on_black: code <= 1,
            right_on_black: code % 2 == 0,
        })
    }

    /// Encode back into the line follower module's raw code.
    pub fn to_raw(&self) -> u8 {
        (!self.left_on_black as u8) << 1 | (!self.right_on_black as u8)
    }
}
