//! Channel-to-energy calibration.
//!
//! Converts the raw pulse-height channel of every still-valid event to a
//! physical energy via the linear gain relation, invalidating events whose
//! calibrated energy falls outside the trusted range. Runs after quality
//! screening and may only shrink the valid set further.

use crate::config::DetectorConfig;
use crate::event::Event;

/// Energy range (keV) the calibration is trusted over, exclusive bounds.
pub const CALIBRATED_RANGE_KEV: (f64, f64) = (0.1, 15.0);

/// Counts from one calibration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalibrationSummary {
    /// Events whose energy was rewritten.
    pub calibrated: usize,
    /// Previously valid events invalidated for an out-of-range energy.
    pub invalidated: usize,
}

/// Calibrate every valid event in place.
///
/// `energy = channel · gain + offset`; the update is committed only when
/// the result lies strictly inside [`CALIBRATED_RANGE_KEV`], otherwise the
/// event is invalidated and its stored energy left untouched. Out-of-range
/// events are not an error, just a reduction of the valid set.
pub fn calibrate_energies(events: &mut [Event], config: &DetectorConfig) -> CalibrationSummary {
    let mut summary = CalibrationSummary::default();

    for event in events.iter_mut().filter(|e| e.valid) {
        let energy =
            event.channel as f64 * config.gain_kev_per_channel + config.offset_kev;

        if energy > CALIBRATED_RANGE_KEV.0 && energy < CALIBRATED_RANGE_KEV.1 {
            event.energy = energy;
            summary.calibrated += 1;
        } else {
            event.valid = false;
            summary.invalidated += 1;
        }
    }

    summary
}
