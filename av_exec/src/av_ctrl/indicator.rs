//! Indicator colour selection

use comms_if::eqpt::IndicatorDems;

use super::{IndicatorMode, Params};
use crate::{phase_sched::SpeedPhase, track_pos::LateralPosition};

/// Select the indicator colours for a tick.
///
/// Precedence, highest first: braking, low speed warning, phase or position (depending on the
/// indicator mode). `position` is `None` on ticks where the track was not classified.
pub fn select_indicator(
    params: &Params,
    phase: SpeedPhase,
    position: Option<LateralPosition>,
    emergency_stop: bool,
    low_speed: bool
) -> IndicatorDems {
    let colours = &params.colours;

    if emergency_stop {
        return IndicatorDems::both(colours.braking);
    }

    if low_speed {
        return IndicatorDems::both(colours.low_speed);
    }

    match (params.indicator_mode, position) {
        (IndicatorMode::Position, Some(pos)) => colours.position(pos),
        _ => IndicatorDems::both(colours.phase(phase)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::Rgb;

    #[test]
    fn test_precedence() {
        let params = Params::default();
        let c = &params.colours;
        let pos = Some(LateralPosition::Centered);

        assert_eq!(
            select_indicator(&params, SpeedPhase::Full, pos, true, true),
            IndicatorDems::both(c.braking)
        );
        assert_eq!(
            select_indicator(&params, SpeedPhase::Full, pos, false, true),
            IndicatorDems::both(c.low_speed)
        );
        assert_eq!(
            select_indicator(&params, SpeedPhase::Full, pos, false, false),
            IndicatorDems::both(c.full)
        );
    }

    #[test]
    fn test_phase_colours_distinct() {
        let params = Params::default();
        let colours: Vec<Rgb> = [SpeedPhase::Initial, SpeedPhase::Reduced, SpeedPhase::Full]
            .iter()
            .map(|p| select_indicator(&params, *p, None, false, false).left)
            .collect();

        assert_ne!(colours[0], colours[1]);
        assert_ne!(colours[1], colours[2]);
        assert_ne!(colours[0], colours[2]);
        assert!(!colours.contains(&params.colours.braking));
        assert!(!colours.contains(&params.colours.low_speed));
    }

    #[test]
    fn test_position_mode() {
        let params = Params {
            indicator_mode: IndicatorMode::Position,
            ..Params::default()
        };
        let c = &params.colours;

        assert_eq!(
            select_indicator(&params, SpeedPhase::Reduced, Some(LateralPosition::DriftingRight), false, false),
            c.drifting_right
        );
        assert_eq!(
            select_indicator(&params, SpeedPhase::Reduced, Some(LateralPosition::Lost), false, false),
            c.lost
        );
        assert_ne!(c.drifting_right, c.drifting_left);

        // Braking still wins in position mode
        assert_eq!(
            select_indicator(&params, SpeedPhase::Reduced, Some(LateralPosition::Lost), true, false),
            IndicatorDems::both(c.braking)
        );
    }
}
