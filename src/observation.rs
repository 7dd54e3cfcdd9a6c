//! Observation metadata.

use serde::{Deserialize, Serialize};

/// Identifying metadata for one observation.
///
/// Produced by the ingestion layer from the instrument file headers and
/// treated as read-only by every pipeline stage. The nominal pointing
/// anchors the tangent-plane transform, and the exposure feeds the
/// background and flux normalisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationHeader {
    /// Observation identifier, e.g. `"TEST001"`.
    pub obs_id: String,
    /// Telescope name.
    pub telescope: String,
    /// Instrument / telescope module name.
    pub instrument: String,
    /// Nominal pointing right ascension in degrees.
    pub ra_nom: f64,
    /// Nominal pointing declination in degrees.
    pub dec_nom: f64,
    /// Roll angle in degrees. Recorded but not applied by the linear
    /// small-field transform.
    pub roll_deg: f64,
    /// Nominal exposure time in seconds.
    pub exposure_s: f64,
    /// Observation start epoch, MJD.
    pub tstart_mjd: f64,
}

impl Default for ObservationHeader {
    /// A simulated-calibration-field header matching the test data
    /// generator defaults.
    fn default() -> Self {
        Self {
            obs_id: "SIM000".to_string(),
            telescope: "XSCAN-SIM".to_string(),
            instrument: "TM1".to_string(),
            ra_nom: 30.0,
            dec_nom: 10.0,
            roll_deg: 0.0,
            exposure_s: 1000.0,
            tstart_mjd: 60000.0,
        }
    }
}
