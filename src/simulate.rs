//! Synthetic event-field generation for testing and validation.
//!
//! Produces deterministic, seeded event streams with known ground truth:
//! uniform background fields, Gaussian point-spread sources, and tightly
//! bounded clusters. Events come back fully populated (times, channels,
//! detector coordinates, quality columns) so they can be fed straight
//! into the pipeline.

use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal};
use std::f64::consts::TAU;

use crate::config::DetectorConfig;
use crate::coords::TangentPlane;
use crate::event::Event;
use crate::observation::ObservationHeader;

/// CCD readout frame period, seconds.
const FRAME_TIME_S: f64 = 2.6;

/// Pattern-recognition grade frequencies for grades 0 through 4.
const GRADE_WEIGHTS: [f64; 5] = [0.70, 0.20, 0.05, 0.03, 0.02];

/// Fraction of events flagged bad by the quality status word.
const BAD_STATUS_FRACTION: f64 = 0.05;

/// Seeded generator of synthetic photon events for one observation.
pub struct FieldSimulator {
    exposure_s: f64,
    detector: DetectorConfig,
    plane: TangentPlane,
    rng: StdRng,
    spectrum: Exp<f64>,
    grades: WeightedIndex<f64>,
}

impl FieldSimulator {
    /// Create a simulator for the given observation geometry.
    ///
    /// The same seed with the same call sequence reproduces the event
    /// stream exactly.
    pub fn new(header: &ObservationHeader, detector: &DetectorConfig, seed: u64) -> Self {
        Self {
            exposure_s: header.exposure_s,
            detector: detector.clone(),
            plane: TangentPlane::new(header, detector),
            rng: StdRng::seed_from_u64(seed),
            // Exponential spectrum with a 1.5 keV e-folding, shifted and
            // clipped into the instrument band when sampled.
            spectrum: Exp::new(1.0 / 1.5).expect("spectrum rate must be positive"),
            grades: WeightedIndex::new(GRADE_WEIGHTS).expect("grade weights must be positive"),
        }
    }

    /// One event at an exact sky position.
    ///
    /// Time, energy, channel, grade and status are all drawn from the
    /// seeded stream; grades follow the instrument pattern frequencies
    /// and 5% of events carry a bad status word. Tests use this to pin a
    /// field's bounding box to exact coordinates.
    pub fn event_at(&mut self, ra: f64, dec: f64) -> Event {
        let time = self.rng.gen_range(0.0..self.exposure_s);
        let energy = (self.spectrum.sample(&mut self.rng) + 0.5).min(10.0);
        let channel = ((energy - self.detector.offset_kev) / self.detector.gain_kev_per_channel)
            .round()
            .clamp(0.0, 4095.0) as u16;
        let (det_x, det_y) = self.plane.sky_to_detector(ra, dec);
        let grade = self.grades.sample(&mut self.rng) as u8;
        let status = u8::from(self.rng.gen_bool(BAD_STATUS_FRACTION));

        Event::new(
            time,
            channel,
            det_x,
            det_y,
            ra,
            dec,
            energy,
            grade,
            status,
            (time / FRAME_TIME_S) as u32,
        )
    }

    /// `n` events distributed uniformly over a square sky box.
    ///
    /// The box is centered on (`center_ra`, `center_dec`) with the given
    /// side length in degrees.
    pub fn uniform_background(
        &mut self,
        n: usize,
        center_ra: f64,
        center_dec: f64,
        width_deg: f64,
    ) -> Vec<Event> {
        let half = width_deg / 2.0;
        (0..n)
            .map(|_| {
                let ra = self.rng.gen_range(center_ra - half..center_ra + half);
                let dec = self.rng.gen_range(center_dec - half..center_dec + half);
                self.event_at(ra, dec)
            })
            .collect()
    }

    /// `n` events uniformly distributed over a sky disc.
    ///
    /// Every event lies within `radius_arcsec` of (`ra`, `dec`) in
    /// angular separation, making aperture-recovery assertions exact.
    pub fn clustered_source(
        &mut self,
        ra: f64,
        dec: f64,
        n: usize,
        radius_arcsec: f64,
    ) -> Vec<Event> {
        let cos_dec = dec.to_radians().cos();
        (0..n)
            .map(|_| {
                let r = radius_arcsec * self.rng.gen_range(0.0_f64..1.0).sqrt();
                let theta = self.rng.gen_range(0.0..TAU);
                let d_ra = r * theta.cos() / 3600.0 / cos_dec;
                let d_dec = r * theta.sin() / 3600.0;
                self.event_at(ra + d_ra, dec + d_dec)
            })
            .collect()
    }

    /// `n` events from a Gaussian point-spread source.
    ///
    /// The spread is isotropic on the sky with the given sigma in
    /// arcseconds.
    pub fn point_source(&mut self, ra: f64, dec: f64, n: usize, sigma_arcsec: f64) -> Vec<Event> {
        let psf = Normal::new(0.0, sigma_arcsec).expect("PSF sigma must be non-negative");
        let cos_dec = dec.to_radians().cos();
        (0..n)
            .map(|_| {
                let d_ra = psf.sample(&mut self.rng) / 3600.0 / cos_dec;
                let d_dec = psf.sample(&mut self.rng) / 3600.0;
                self.event_at(ra + d_ra, dec + d_dec)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::angular_separation_arcsec;

    fn simulator(seed: u64) -> FieldSimulator {
        FieldSimulator::new(
            &ObservationHeader::default(),
            &DetectorConfig::default(),
            seed,
        )
    }

    #[test]
    fn test_deterministic_per_seed() {
        let a = simulator(42).uniform_background(50, 30.0, 10.0, 0.1);
        let b = simulator(42).uniform_background(50, 30.0, 10.0, 0.1);

        for (ea, eb) in a.iter().zip(b.iter()) {
            assert_eq!(ea.time, eb.time);
            assert_eq!(ea.ra, eb.ra);
            assert_eq!(ea.dec, eb.dec);
            assert_eq!(ea.channel, eb.channel);
            assert_eq!(ea.grade, eb.grade);
            assert_eq!(ea.status, eb.status);
        }

        let c = simulator(43).uniform_background(50, 30.0, 10.0, 0.1);
        assert!(a.iter().zip(c.iter()).any(|(ea, ec)| ea.ra != ec.ra));
    }

    #[test]
    fn test_events_are_fully_populated() {
        let events = simulator(7).uniform_background(200, 30.0, 10.0, 0.1);

        for e in &events {
            assert!(e.valid);
            assert!(e.grade <= 4);
            assert!(e.status <= 1);
            assert!(e.time >= 0.0 && e.time < 1000.0);
            assert!(e.energy >= 0.5 && e.energy <= 10.0);
            assert_eq!(e.frame, (e.time / FRAME_TIME_S) as u32);
        }
    }

    #[test]
    fn test_grade_and_status_fractions() {
        let events = simulator(23).uniform_background(10_000, 30.0, 10.0, 0.1);
        let n = events.len() as f64;

        let grade_0 = events.iter().filter(|e| e.grade == 0).count() as f64 / n;
        let good_grade = events.iter().filter(|e| e.grade <= 2).count() as f64 / n;
        let good_status = events.iter().filter(|e| e.status == 0).count() as f64 / n;

        // Binomial scatter at 10k samples is well under one percent.
        assert!((grade_0 - 0.70).abs() < 0.03, "grade-0 fraction {grade_0}");
        assert!((good_grade - 0.95).abs() < 0.02, "good-grade fraction {good_grade}");
        assert!((good_status - 0.95).abs() < 0.02, "good-status fraction {good_status}");
    }

    #[test]
    fn test_uniform_background_stays_in_box() {
        let events = simulator(11).uniform_background(500, 30.0, 10.0, 0.1);
        for e in &events {
            assert!(e.ra >= 29.95 && e.ra < 30.05);
            assert!(e.dec >= 9.95 && e.dec < 10.05);
        }
    }

    #[test]
    fn test_cluster_bounded_by_radius() {
        let events = simulator(13).clustered_source(30.05, 10.03, 200, 8.0);
        for e in &events {
            let sep = angular_separation_arcsec(e.ra, e.dec, 30.05, 10.03);
            assert!(sep <= 8.0 + 1e-9, "separation {sep} exceeds cluster radius");
        }
    }

    #[test]
    fn test_channel_inverts_calibration() {
        let detector = DetectorConfig::default();
        let events = simulator(17).uniform_background(100, 30.0, 10.0, 0.1);

        for e in &events {
            let recalibrated =
                e.channel as f64 * detector.gain_kev_per_channel + detector.offset_kev;
            // Channel quantisation loses at most half a gain step.
            assert!((recalibrated - e.energy).abs() <= detector.gain_kev_per_channel / 2.0 + 1e-12);
        }
    }

    #[test]
    fn test_point_source_concentrates_near_center() {
        let events = simulator(19).point_source(30.0, 10.0, 300, 2.0);
        let within_3_sigma = events
            .iter()
            .filter(|e| angular_separation_arcsec(e.ra, e.dec, 30.0, 10.0) <= 6.0)
            .count();
        // 2D Gaussian: ~98.9% of samples fall inside 3 sigma.
        assert!(within_3_sigma > 280, "only {within_3_sigma} of 300 inside 3 sigma");
    }
}
