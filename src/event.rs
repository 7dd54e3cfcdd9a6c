//! Photon event data model.
//!
//! An [`Event`] is one detected photon as delivered by the ingestion layer:
//! arrival time, raw pulse-height channel, detector and sky positions, and
//! the quality columns the screening stages consume. The pipeline never
//! parses instrument files itself; it receives events already decoded.

use serde::{Deserialize, Serialize};

/// One detected photon.
///
/// Events are created in bulk at ingestion with `valid = true` and are
/// mutated by exactly two stages: quality screening (which may clear
/// `valid`) and energy calibration (which rewrites `energy` and may clear
/// `valid`). All other fields are read-only once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Arrival time in seconds since observation start.
    pub time: f64,
    /// Raw pulse-height (PI) channel from the 12-bit ADC.
    pub channel: u16,
    /// Detector x position in pixels.
    pub det_x: f64,
    /// Detector y position in pixels.
    pub det_y: f64,
    /// Right ascension in degrees.
    pub ra: f64,
    /// Declination in degrees.
    pub dec: f64,
    /// Photon energy in keV. Overwritten by energy calibration.
    pub energy: f64,
    /// Event grade from onboard pattern recognition (0 = single pixel).
    pub grade: u8,
    /// CCD readout frame index.
    pub frame: u32,
    /// Quality status word (0 = good).
    pub status: u8,
    /// Whether this event has passed every check applied so far.
    pub valid: bool,
}

impl Event {
    /// Create a new event with `valid = true`.
    ///
    /// Field order follows the instrument event-table columns
    /// (TIME, PI, X, Y, RA, DEC, ENERGY, GRADE, STATUS, FRAME).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time: f64,
        channel: u16,
        det_x: f64,
        det_y: f64,
        ra: f64,
        dec: f64,
        energy: f64,
        grade: u8,
        status: u8,
        frame: u32,
    ) -> Self {
        Self {
            time,
            channel,
            det_x,
            det_y,
            ra,
            dec,
            energy,
            grade,
            frame,
            status,
            valid: true,
        }
    }
}

/// Count the events still marked valid.
pub fn valid_count(events: &[Event]) -> usize {
    events.iter().filter(|e| e.valid).count()
}
