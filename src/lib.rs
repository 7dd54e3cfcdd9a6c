//! Event-level X-ray calibration and source-detection pipeline.
//!
//! Processes an already-decoded photon event stream for one observation:
//! quality screening, channel-to-energy calibration, global background
//! estimation, and a grid-search source detector with Poisson
//! significance testing, producing a source catalog and per-job result
//! counters.
//!
//! # Module Organization
//!
//! ## Data model
//! - **event**: the per-photon [`Event`] record
//! - **observation**: per-observation metadata header
//! - **config**: per-job detector and detection configuration
//!
//! ## Processing stages
//! - **filter**: instrument quality cuts
//! - **calibrate**: linear channel → keV conversion
//! - **background**: global background-rate estimate
//! - **detect**: grid search with fixed-aperture photometry
//! - **pipeline**: stage sequencing, results assembly, error codes
//!
//! ## Support
//! - **coords**: small-field sky ↔ detector transforms
//! - **catalog**: JSON catalog persistence
//! - **simulate**: seeded synthetic event fields for testing
//!
//! Stages are pure functions over job-owned buffers; nothing in this
//! crate holds global state, so independent jobs can run concurrently as
//! long as each owns its events and configuration.

pub mod background;
pub mod calibrate;
pub mod catalog;
pub mod config;
pub mod coords;
pub mod detect;
pub mod event;
pub mod filter;
pub mod observation;
pub mod pipeline;
pub mod simulate;

// Re-export key functionality for easier access
pub use background::{estimate_background, BackgroundEstimate};
pub use calibrate::{calibrate_energies, CalibrationSummary};
pub use catalog::SourceCatalog;
pub use config::{DetectionConfig, DetectorConfig};
pub use coords::{angular_separation_arcsec, TangentPlane};
pub use detect::{detect_sources, poisson_significance, DetectedSource, DetectionOutcome};
pub use event::{valid_count, Event};
pub use filter::{screen_events, FilterSummary};
pub use observation::ObservationHeader;
pub use pipeline::{run_pipeline, JobOutput, PipelineError, ProcessingResults};
pub use simulate::FieldSimulator;
