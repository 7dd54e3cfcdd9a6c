//! Event quality screening.
//!
//! Marks each event valid or invalid against the instrument quality cuts:
//! energy band, event grade, status word, and a one-pixel border exclusion
//! around the detector edge. Screening only mutates the `valid` flag; it
//! performs no I/O and no logging, returning a [`FilterSummary`] for the
//! caller to report.

use crate::config::DetectorConfig;
use crate::event::Event;
use crate::pipeline::PipelineError;

/// Accepted energy band in keV, inclusive on both ends.
pub const ENERGY_BAND_KEV: (f64, f64) = (0.2, 10.0);
/// Highest event grade accepted (singles, doubles and triples).
pub const MAX_GOOD_GRADE: u8 = 2;
/// Status word of an unflagged event.
pub const GOOD_STATUS: u8 = 0;

/// Per-reason tally from one screening pass.
///
/// An event failing several cuts is counted once, under the first failing
/// cut in the order energy, grade, status, border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    /// Events examined.
    pub input_events: usize,
    /// Events still valid after screening.
    pub accepted: usize,
    /// Events rejected for energy outside the band.
    pub rejected_energy: usize,
    /// Events rejected for grade above [`MAX_GOOD_GRADE`].
    pub rejected_grade: usize,
    /// Events rejected for a non-zero status word.
    pub rejected_status: usize,
    /// Events rejected inside the border exclusion zone.
    pub rejected_border: usize,
}

/// Apply the quality cuts to every event, clearing `valid` on failures.
///
/// Detector coordinates must lie in `[1, nx-1] × [1, ny-1]`; the outermost
/// pixel ring is excluded because charge from border events is only
/// partially collected.
///
/// # Errors
///
/// [`PipelineError::FilterExhaustion`] if no event survives. An empty
/// observation is rejected upstream, before screening runs.
pub fn screen_events(
    events: &mut [Event],
    config: &DetectorConfig,
) -> Result<FilterSummary, PipelineError> {
    let x_max = (config.nx - 1) as f64;
    let y_max = (config.ny - 1) as f64;

    let mut summary = FilterSummary {
        input_events: events.len(),
        ..Default::default()
    };

    for event in events.iter_mut() {
        if event.energy < ENERGY_BAND_KEV.0 || event.energy > ENERGY_BAND_KEV.1 {
            event.valid = false;
            summary.rejected_energy += 1;
        } else if event.grade > MAX_GOOD_GRADE {
            event.valid = false;
            summary.rejected_grade += 1;
        } else if event.status != GOOD_STATUS {
            event.valid = false;
            summary.rejected_status += 1;
        } else if event.det_x < 1.0 || event.det_x > x_max || event.det_y < 1.0 || event.det_y > y_max
        {
            event.valid = false;
            summary.rejected_border += 1;
        } else {
            summary.accepted += 1;
        }
    }

    if summary.accepted == 0 {
        return Err(PipelineError::FilterExhaustion {
            input_events: summary.input_events,
        });
    }

    Ok(summary)
}
