//! Sky ↔ detector coordinate transforms for small fields.
//!
//! Implements the linear small-field approximation used by the instrument
//! WCS: detector offsets are proportional to sky offsets from the nominal
//! pointing, scaled by the pixel size. Valid for fields of a few
//! arcminutes where tangent-plane curvature is negligible; this is not a
//! full gnomonic projection.

use crate::config::DetectorConfig;
use crate::observation::ObservationHeader;

/// Linear tangent-plane mapping between sky and detector coordinates.
///
/// Anchored at the observation's actual nominal pointing and the
/// detector-plane center; immutable after construction, so one instance
/// may be shared freely within a job.
#[derive(Debug, Clone, Copy)]
pub struct TangentPlane {
    /// Pointing right ascension in degrees.
    ra0: f64,
    /// Pointing declination in degrees.
    dec0: f64,
    /// Detector-plane center x in pixels.
    center_x: f64,
    /// Detector-plane center y in pixels.
    center_y: f64,
    /// Angular pixel scale in arcseconds per pixel.
    pixel_size_arcsec: f64,
}

impl TangentPlane {
    /// Build the transform from an observation header and detector config.
    pub fn new(header: &ObservationHeader, config: &DetectorConfig) -> Self {
        Self {
            ra0: header.ra_nom,
            dec0: header.dec_nom,
            center_x: config.center_x,
            center_y: config.center_y,
            pixel_size_arcsec: config.pixel_size_arcsec,
        }
    }

    /// Map sky coordinates (degrees) to detector pixels.
    pub fn sky_to_detector(&self, ra: f64, dec: f64) -> (f64, f64) {
        let x = self.center_x + (ra - self.ra0) * 3600.0 / self.pixel_size_arcsec;
        let y = self.center_y + (dec - self.dec0) * 3600.0 / self.pixel_size_arcsec;
        (x, y)
    }

    /// Map detector pixels back to sky coordinates (degrees).
    ///
    /// Exact inverse of [`sky_to_detector`](Self::sky_to_detector).
    pub fn detector_to_sky(&self, x: f64, y: f64) -> (f64, f64) {
        let ra = self.ra0 + (x - self.center_x) * self.pixel_size_arcsec / 3600.0;
        let dec = self.dec0 + (y - self.center_y) * self.pixel_size_arcsec / 3600.0;
        (ra, dec)
    }
}

/// Angular separation between two sky positions, in arcseconds.
///
/// Flat-sky approximation: the RA difference is foreshortened by the
/// cosine of the mean declination and combined with the declination
/// difference in quadrature. Symmetric, zero only for identical points,
/// and accurate well below a milliarcsecond over arcminute separations.
pub fn angular_separation_arcsec(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let mean_dec = 0.5 * (dec1 + dec2);
    let d_ra = (ra1 - ra2) * mean_dec.to_radians().cos();
    let d_dec = dec1 - dec2;
    (d_ra * d_ra + d_dec * d_dec).sqrt() * 3600.0
}
