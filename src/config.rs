//! Per-job detector and detection configuration.
//!
//! Configuration is constructed explicitly for each job and passed by
//! reference into the stages that need it. There is no process-wide
//! mutable state; two jobs running concurrently simply own separate
//! copies. Both structs serialize to JSON so a run can be reproduced
//! from its recorded configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Detector geometry and energy calibration for one run.
///
/// Effectively immutable: set once before processing and shared read-only
/// by calibration, background estimation and the coordinate transforms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Angular pixel scale in arcseconds per pixel.
    pub pixel_size_arcsec: f64,
    /// Detector width in pixels.
    pub nx: u32,
    /// Detector height in pixels.
    pub ny: u32,
    /// Energy calibration gain in keV per channel.
    pub gain_kev_per_channel: f64,
    /// Energy calibration offset in keV.
    pub offset_kev: f64,
    /// Detector-plane center x in pixels.
    pub center_x: f64,
    /// Detector-plane center y in pixels.
    pub center_y: f64,
}

impl DetectorConfig {
    /// Total detector area in arcsec².
    pub fn detector_area_arcsec2(&self) -> f64 {
        (self.nx as f64 * self.pixel_size_arcsec) * (self.ny as f64 * self.pixel_size_arcsec)
    }

    /// Save to a JSON file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Load from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

impl Default for DetectorConfig {
    /// Reference values for the simulated 384×384 CCD.
    fn default() -> Self {
        Self {
            pixel_size_arcsec: 4.1,
            nx: 384,
            ny: 384,
            gain_kev_per_channel: 0.005,
            offset_kev: 0.2,
            center_x: 192.0,
            center_y: 192.0,
        }
    }
}

/// Parameters for the grid-search source detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Number of candidate positions per grid axis.
    pub grid_size: usize,
    /// Aperture radius in arcseconds for candidate counting.
    pub aperture_radius_arcsec: f64,
    /// Minimum detection significance in sigma.
    pub min_significance: f64,
    /// Minimum aperture counts to accept a candidate.
    pub min_counts: u32,
    /// Maximum number of sources reported per job. A result-size cap:
    /// the grid scan stops once this many candidates are accepted.
    pub max_sources: usize,
    /// Margin added to every side of the event bounding box, degrees.
    pub box_margin_deg: f64,
    /// Floor for the effective exposure used in background and flux
    /// normalisation, seconds.
    pub min_exposure_s: f64,
}

impl DetectionConfig {
    /// Save to a JSON file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Load from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            aperture_radius_arcsec: 10.0,
            min_significance: 3.0,
            min_counts: 3,
            max_sources: 100,
            box_margin_deg: 0.01,
            min_exposure_s: 1000.0,
        }
    }
}
