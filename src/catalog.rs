//! Source-catalog persistence.
//!
//! Serializes the detections of one job, together with the observation
//! header that produced them, to pretty-printed JSON. The persistence
//! layer that stores catalogs long-term is a separate collaborator; this
//! module only defines the record set and its file round trip.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::detect::DetectedSource;
use crate::observation::ObservationHeader;

/// One job's source catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCatalog {
    /// Observation the sources were detected in.
    pub observation: ObservationHeader,
    /// Software identifier recorded for provenance.
    pub generated_by: String,
    /// Detections in scan order.
    pub sources: Vec<DetectedSource>,
}

impl SourceCatalog {
    /// Assemble a catalog for one observation.
    pub fn new(observation: ObservationHeader, sources: Vec<DetectedSource>) -> Self {
        Self {
            observation,
            generated_by: format!("xscan {}", env!("CARGO_PKG_VERSION")),
            sources,
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_source(id: u32) -> DetectedSource {
        DetectedSource {
            id,
            ra: 30.05 + id as f64 * 0.01,
            dec: 10.03,
            det_x: 235.9,
            det_y: 218.3,
            flux: 0.052,
            flux_err: 0.0072,
            significance: 42.5,
            background_counts: 0.133,
            net_counts: 52,
            total_counts: 52,
            snr: 7.2,
            extended: false,
            valid: true,
        }
    }

    #[test]
    fn test_catalog_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let catalog = SourceCatalog::new(
            ObservationHeader::default(),
            vec![sample_source(1), sample_source(2)],
        );
        catalog.save_to_file(&path).unwrap();

        let loaded = SourceCatalog::load_from_file(&path).unwrap();
        assert_eq!(loaded.sources.len(), 2);
        assert_eq!(loaded.observation.obs_id, catalog.observation.obs_id);

        for (a, b) in catalog.sources.iter().zip(loaded.sources.iter()) {
            assert_eq!(a.id, b.id);
            assert_relative_eq!(a.ra, b.ra);
            assert_relative_eq!(a.dec, b.dec);
            assert_relative_eq!(a.det_x, b.det_x);
            assert_relative_eq!(a.det_y, b.det_y);
            assert_relative_eq!(a.flux, b.flux);
            assert_relative_eq!(a.flux_err, b.flux_err);
            assert_relative_eq!(a.significance, b.significance);
            assert_relative_eq!(a.background_counts, b.background_counts);
            assert_eq!(a.net_counts, b.net_counts);
            assert_eq!(a.total_counts, b.total_counts);
            assert_relative_eq!(a.snr, b.snr);
            assert_eq!(a.extended, b.extended);
            assert_eq!(a.valid, b.valid);
        }
    }

    #[test]
    fn test_empty_catalog_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");

        let catalog = SourceCatalog::new(ObservationHeader::default(), Vec::new());
        catalog.save_to_file(&path).unwrap();

        let loaded = SourceCatalog::load_from_file(&path).unwrap();
        assert!(loaded.sources.is_empty());
        assert!(loaded.generated_by.starts_with("xscan"));
    }
}
