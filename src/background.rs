//! Global background-rate estimation.
//!
//! Reduces the valid event population to a single surface rate over the
//! whole detector: counts per second per arcsec². The detector consumes
//! only this global model; there is no spatially varying background.

use crate::config::DetectorConfig;
use crate::event::{valid_count, Event};

/// Global background estimate for one observation.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundEstimate {
    /// Background surface rate in counts/s/arcsec².
    pub rate: f64,
    /// Exposure the rate is normalised over, seconds.
    pub effective_exposure_s: f64,
    /// Valid events entering the estimate.
    pub valid_events: usize,
    /// Detector area in arcsec².
    pub detector_area_arcsec2: f64,
}

/// Estimate the global background rate from the valid event population.
///
/// `rate = valid / (effective_exposure · area)` with
/// `effective_exposure = max(min_exposure_s, latest valid event time)`.
/// The rate is zero only when no valid events remain, which screening
/// already treats as fatal, so downstream code may rely on `rate > 0`.
pub fn estimate_background(
    events: &[Event],
    config: &DetectorConfig,
    min_exposure_s: f64,
) -> BackgroundEstimate {
    let valid_events = valid_count(events);
    let latest_time = events
        .iter()
        .filter(|e| e.valid)
        .map(|e| e.time)
        .fold(0.0_f64, f64::max);

    let effective_exposure_s = min_exposure_s.max(latest_time);
    let detector_area_arcsec2 = config.detector_area_arcsec2();
    let rate = valid_events as f64 / (effective_exposure_s * detector_area_arcsec2);

    BackgroundEstimate {
        rate,
        effective_exposure_s,
        valid_events,
        detector_area_arcsec2,
    }
}
