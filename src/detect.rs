//! Grid-search source detection.
//!
//! Scans a regular lattice of candidate sky positions spanning the valid
//! events' bounding box, counts events inside a fixed circular aperture at
//! each candidate, and tests the count against the expected background
//! with a Gaussian approximation to Poisson significance. Candidates are
//! accepted first-found in row-major grid order up to the configured
//! result cap.
//!
//! Adjacent grid cells straddling one bright or extended source each pass
//! the test independently and are emitted as separate sources; the
//! detector performs no deduplication or centroid refinement, so position
//! resolution is bounded by the grid spacing.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::background::BackgroundEstimate;
use crate::config::DetectionConfig;
use crate::coords::{angular_separation_arcsec, TangentPlane};
use crate::event::Event;

/// One grid-search detection.
///
/// Immutable after creation; the catalog writer consumes these as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedSource {
    /// Sequential 1-based identifier in scan order.
    pub id: u32,
    /// Right ascension of the accepted grid point, degrees.
    pub ra: f64,
    /// Declination of the accepted grid point, degrees.
    pub dec: f64,
    /// Detector x position of the grid point, pixels.
    pub det_x: f64,
    /// Detector y position of the grid point, pixels.
    pub det_y: f64,
    /// Source flux in counts per second.
    pub flux: f64,
    /// Poisson flux error, `sqrt(counts) / exposure`.
    pub flux_err: f64,
    /// Detection significance in sigma.
    pub significance: f64,
    /// Expected background counts in the aperture.
    pub background_counts: f64,
    /// Aperture counts minus the integer part of the expected background.
    pub net_counts: i64,
    /// Raw aperture counts.
    pub total_counts: u32,
    /// Signal-to-noise ratio; equal to `significance` in this detector.
    pub snr: f64,
    /// Reserved: the grid detector treats every candidate as point-like.
    pub extended: bool,
    /// Whether the detection passed all acceptance checks.
    pub valid: bool,
}

/// Sky-aligned bounding box of the search grid, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBox {
    pub ra_min: f64,
    pub ra_max: f64,
    pub dec_min: f64,
    pub dec_max: f64,
}

/// Everything one grid scan produced.
///
/// The count and significance lattices are indexed `[dec index, ra index]`
/// and are returned so callers can report or plot the scan without
/// re-deriving it. Cells past the point where the result cap stopped the
/// scan are left at zero.
#[derive(Debug, Clone)]
pub struct DetectionOutcome {
    /// Accepted sources in scan order.
    pub sources: Vec<DetectedSource>,
    /// Aperture counts per grid cell.
    pub counts: Array2<u32>,
    /// Significance per grid cell.
    pub significance: Array2<f64>,
    /// Grid extent, or `None` when no valid events were available.
    pub search_box: Option<SearchBox>,
    /// True when the scan stopped early at the result cap.
    pub truncated: bool,
}

impl DetectionOutcome {
    fn empty(grid_size: usize) -> Self {
        Self {
            sources: Vec::new(),
            counts: Array2::zeros((grid_size, grid_size)),
            significance: Array2::zeros((grid_size, grid_size)),
            search_box: None,
            truncated: false,
        }
    }
}

/// Gaussian approximation to Poisson detection significance.
///
/// `(counts - expected) / sqrt(expected)` for positive expected
/// background, zero otherwise. No small-count correction is applied.
pub fn poisson_significance(counts: u32, expected_bg: f64) -> f64 {
    if expected_bg > 0.0 {
        (counts as f64 - expected_bg) / expected_bg.sqrt()
    } else {
        0.0
    }
}

/// Run the grid search over the valid events.
///
/// The expected background per aperture is
/// `rate · π·r² · effective_exposure` using the observation's actual
/// effective exposure from `background`; flux normalisation uses the same
/// exposure. Zero accepted candidates is a normal outcome, not an error.
pub fn detect_sources(
    events: &[Event],
    plane: &TangentPlane,
    background: &BackgroundEstimate,
    config: &DetectionConfig,
) -> DetectionOutcome {
    let n = config.grid_size;
    let positions: Vec<(f64, f64)> = events
        .iter()
        .filter(|e| e.valid)
        .map(|e| (e.ra, e.dec))
        .collect();

    if positions.is_empty() || n < 2 {
        return DetectionOutcome::empty(n);
    }

    let mut search_box = SearchBox {
        ra_min: f64::INFINITY,
        ra_max: f64::NEG_INFINITY,
        dec_min: f64::INFINITY,
        dec_max: f64::NEG_INFINITY,
    };
    for &(ra, dec) in &positions {
        search_box.ra_min = search_box.ra_min.min(ra);
        search_box.ra_max = search_box.ra_max.max(ra);
        search_box.dec_min = search_box.dec_min.min(dec);
        search_box.dec_max = search_box.dec_max.max(dec);
    }
    search_box.ra_min -= config.box_margin_deg;
    search_box.ra_max += config.box_margin_deg;
    search_box.dec_min -= config.box_margin_deg;
    search_box.dec_max += config.box_margin_deg;

    let ra_step = (search_box.ra_max - search_box.ra_min) / (n - 1) as f64;
    let dec_step = (search_box.dec_max - search_box.dec_min) / (n - 1) as f64;

    let exposure = background.effective_exposure_s;
    let aperture_area = PI * config.aperture_radius_arcsec * config.aperture_radius_arcsec;
    let expected_bg = background.rate * aperture_area * exposure;

    let mut outcome = DetectionOutcome::empty(n);
    outcome.search_box = Some(search_box);

    'scan: for iy in 0..n {
        let dec = search_box.dec_min + iy as f64 * dec_step;
        for ix in 0..n {
            let ra = search_box.ra_min + ix as f64 * ra_step;

            let counts = positions
                .iter()
                .filter(|&&(era, edec)| {
                    angular_separation_arcsec(ra, dec, era, edec)
                        <= config.aperture_radius_arcsec
                })
                .count() as u32;

            let significance = poisson_significance(counts, expected_bg);
            outcome.counts[[iy, ix]] = counts;
            outcome.significance[[iy, ix]] = significance;

            if significance >= config.min_significance && counts >= config.min_counts {
                let (det_x, det_y) = plane.sky_to_detector(ra, dec);
                let net_counts = counts as i64 - expected_bg.floor() as i64;

                outcome.sources.push(DetectedSource {
                    id: outcome.sources.len() as u32 + 1,
                    ra,
                    dec,
                    det_x,
                    det_y,
                    flux: counts as f64 / exposure,
                    flux_err: (counts as f64).sqrt() / exposure,
                    significance,
                    background_counts: expected_bg,
                    net_counts,
                    total_counts: counts,
                    snr: significance,
                    extended: false,
                    valid: true,
                });

                if outcome.sources.len() >= config.max_sources {
                    outcome.truncated = true;
                    break 'scan;
                }
            }
        }
    }

    outcome
}
