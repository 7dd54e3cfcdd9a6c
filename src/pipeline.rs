//! Job orchestration: screening → calibration → background → detection.
//!
//! Each stage is a pure function returning a summary struct; this module
//! sequences them over one observation, owns all logging, and assembles
//! the per-job [`ProcessingResults`]. A job either runs to completion or
//! aborts at the first fatal stage precondition; no partial catalog is
//! ever emitted on the fatal path.

use log::{error, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::background::estimate_background;
use crate::calibrate::calibrate_energies;
use crate::config::{DetectionConfig, DetectorConfig};
use crate::coords::TangentPlane;
use crate::detect::{detect_sources, DetectedSource};
use crate::event::Event;
use crate::filter::screen_events;
use crate::observation::ObservationHeader;

/// Fatal pipeline failures.
///
/// Per-event calibration invalidation and an empty detection result are
/// deliberately not represented here: both are normal outcomes tracked
/// through counters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The ingestion layer supplied no events for this observation.
    #[error("observation {obs_id} supplied no events")]
    EmptyObservation {
        /// Observation identifier.
        obs_id: String,
    },

    /// Quality screening left no valid events.
    #[error("quality screening rejected all {input_events} events")]
    FilterExhaustion {
        /// Events that entered screening.
        input_events: usize,
    },
}

impl PipelineError {
    /// Stable numeric code reported alongside the message.
    pub fn code(&self) -> u32 {
        match self {
            PipelineError::EmptyObservation { .. } => 10,
            PipelineError::FilterExhaustion { .. } => 20,
        }
    }
}

/// Aggregate counters and status for one processed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResults {
    /// Observation identifier.
    pub obs_id: String,
    /// Events supplied by ingestion.
    pub input_events: usize,
    /// Events surviving quality screening.
    pub filtered_events: usize,
    /// Events surviving energy calibration.
    pub calibrated_events: usize,
    /// Sources accepted by the grid search.
    pub n_sources: usize,
    /// Global background rate in counts/s/arcsec².
    pub background_rate: f64,
    /// Effective exposure used for normalisation, seconds.
    pub effective_exposure_s: f64,
    /// Whether the job ran to completion.
    pub success: bool,
    /// Human-readable failure message, if any.
    pub error_message: Option<String>,
    /// Numeric failure code, if any.
    pub error_code: Option<u32>,
}

impl ProcessingResults {
    fn started(header: &ObservationHeader, input_events: usize) -> Self {
        Self {
            obs_id: header.obs_id.clone(),
            input_events,
            filtered_events: 0,
            calibrated_events: 0,
            n_sources: 0,
            background_rate: 0.0,
            effective_exposure_s: 0.0,
            success: false,
            error_message: None,
            error_code: None,
        }
    }

    fn failed(mut self, err: &PipelineError) -> Self {
        self.success = false;
        self.error_message = Some(err.to_string());
        self.error_code = Some(err.code());
        self
    }
}

/// The two externally visible artifacts of one job.
#[derive(Debug, Clone)]
pub struct JobOutput {
    /// Aggregate counters and status.
    pub results: ProcessingResults,
    /// Accepted sources in scan order; empty on failure.
    pub sources: Vec<DetectedSource>,
}

/// Process one observation end to end.
///
/// Consumes the event buffer (events are job-scoped and not persisted by
/// this layer). Fatal preconditions abort immediately and are reported
/// through the returned [`ProcessingResults`] with message and code; zero
/// detections completes normally.
pub fn run_pipeline(
    header: &ObservationHeader,
    mut events: Vec<Event>,
    detector: &DetectorConfig,
    detection: &DetectionConfig,
) -> JobOutput {
    let results = ProcessingResults::started(header, events.len());
    info!(
        "processing {}: {} events, pointing ({:.4}, {:.4}) deg",
        header.obs_id,
        events.len(),
        header.ra_nom,
        header.dec_nom
    );

    match run_stages(header, &mut events, detector, detection, results) {
        Ok(output) => output,
        Err((results, err)) => {
            error!("{} failed: {} (code {})", header.obs_id, err, err.code());
            JobOutput {
                results: results.failed(&err),
                sources: Vec::new(),
            }
        }
    }
}

fn run_stages(
    header: &ObservationHeader,
    events: &mut [Event],
    detector: &DetectorConfig,
    detection: &DetectionConfig,
    mut results: ProcessingResults,
) -> Result<JobOutput, (ProcessingResults, PipelineError)> {
    if events.is_empty() {
        return Err((
            results,
            PipelineError::EmptyObservation {
                obs_id: header.obs_id.clone(),
            },
        ));
    }

    let filter = match screen_events(events, detector) {
        Ok(summary) => summary,
        Err(err) => return Err((results, err)),
    };
    results.filtered_events = filter.accepted;
    info!(
        "{}: screening kept {}/{} (energy {}, grade {}, status {}, border {} rejected)",
        header.obs_id,
        filter.accepted,
        filter.input_events,
        filter.rejected_energy,
        filter.rejected_grade,
        filter.rejected_status,
        filter.rejected_border
    );

    let calibration = calibrate_energies(events, detector);
    results.calibrated_events = calibration.calibrated;
    info!(
        "{}: calibrated {} events, {} invalidated out of range",
        header.obs_id, calibration.calibrated, calibration.invalidated
    );

    let background = estimate_background(events, detector, detection.min_exposure_s);
    results.background_rate = background.rate;
    results.effective_exposure_s = background.effective_exposure_s;
    info!(
        "{}: background {:.3e} counts/s/arcsec2 over {:.0} s effective exposure",
        header.obs_id, background.rate, background.effective_exposure_s
    );

    let plane = TangentPlane::new(header, detector);
    let outcome = detect_sources(events, &plane, &background, detection);
    results.n_sources = outcome.sources.len();
    if outcome.sources.is_empty() {
        info!("{}: no significant sources found", header.obs_id);
    } else {
        info!(
            "{}: {} sources detected{}",
            header.obs_id,
            outcome.sources.len(),
            if outcome.truncated {
                " (scan stopped at result cap)"
            } else {
                ""
            }
        );
    }

    results.success = true;
    Ok(JobOutput {
        results,
        sources: outcome.sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_event(ra: f64, dec: f64, time: f64) -> Event {
        Event::new(time, 400, 192.0, 192.0, ra, dec, 2.2, 0, 0, 0)
    }

    #[test]
    fn test_empty_observation_fails_with_code_10() {
        let header = ObservationHeader::default();
        let output = run_pipeline(
            &header,
            Vec::new(),
            &DetectorConfig::default(),
            &DetectionConfig::default(),
        );

        assert!(!output.results.success);
        assert_eq!(output.results.error_code, Some(10));
        assert!(output.sources.is_empty());
        assert_eq!(output.results.n_sources, 0);
    }

    #[test]
    fn test_filter_exhaustion_fails_with_code_20() {
        let header = ObservationHeader::default();
        let events: Vec<Event> = (0..10)
            .map(|i| {
                let mut e = good_event(30.0, 10.0, i as f64);
                e.status = 1;
                e
            })
            .collect();

        let output = run_pipeline(
            &header,
            events,
            &DetectorConfig::default(),
            &DetectionConfig::default(),
        );

        assert!(!output.results.success);
        assert_eq!(output.results.error_code, Some(20));
        assert!(output
            .results
            .error_message
            .as_deref()
            .unwrap()
            .contains("10 events"));
        assert!(output.sources.is_empty());
        assert_eq!(output.results.input_events, 10);
        assert_eq!(output.results.filtered_events, 0);
    }

    #[test]
    fn test_zero_detections_still_succeeds() {
        let header = ObservationHeader::default();
        let events = vec![
            good_event(29.95, 9.95, 0.0),
            good_event(30.05, 9.95, 10.0),
            good_event(29.95, 10.05, 20.0),
            good_event(30.05, 10.05, 30.0),
        ];

        let output = run_pipeline(
            &header,
            events,
            &DetectorConfig::default(),
            &DetectionConfig::default(),
        );

        assert!(output.results.success);
        assert_eq!(output.results.n_sources, 0);
        assert!(output.sources.is_empty());
        assert!(output.results.error_message.is_none());
        assert!(output.results.background_rate > 0.0);
    }

    #[test]
    fn test_cluster_produces_sources_and_counters() {
        let header = ObservationHeader::default();
        let mut events: Vec<Event> = (0..12)
            .map(|i| good_event(30.0, 10.0, i as f64 * 80.0))
            .collect();
        // One bad-grade event to exercise the screening counter.
        events.push({
            let mut e = good_event(30.0, 10.0, 5.0);
            e.grade = 4;
            e
        });

        let output = run_pipeline(
            &header,
            events,
            &DetectorConfig::default(),
            &DetectionConfig::default(),
        );

        assert!(output.results.success);
        assert_eq!(output.results.input_events, 13);
        assert_eq!(output.results.filtered_events, 12);
        assert_eq!(output.results.calibrated_events, 12);
        assert_eq!(output.results.n_sources, output.sources.len());
        assert!(!output.sources.is_empty());
        assert_eq!(output.results.effective_exposure_s, 1000.0);
    }

    #[test]
    fn test_results_serde_round_trip() {
        let header = ObservationHeader::default();
        let events: Vec<Event> = (0..12)
            .map(|i| good_event(30.0, 10.0, i as f64))
            .collect();
        let output = run_pipeline(
            &header,
            events,
            &DetectorConfig::default(),
            &DetectionConfig::default(),
        );

        let json = serde_json::to_string(&output.results).unwrap();
        let parsed: ProcessingResults = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.obs_id, output.results.obs_id);
        assert_eq!(parsed.n_sources, output.results.n_sources);
        assert_eq!(parsed.success, output.results.success);
    }
}
