//! Hearing model core of ECMA-418-2: time-dependent specific loudness of a mono signal.
//!
//! The pipeline runs in passes over the whole signal:
//!
//! 1. fade-in and zero padding sized for the per-band block layout,
//! 2. outer and middle ear filter,
//! 3. 53-band gammatone filter bank (complex coefficients, real part doubled),
//! 4. per-band segmentation, rectified RMS, compressive nonlinearity and threshold clipping.
//!
//! ```no_run
//! use ecma418::{analyze, AnalysisConfig, Signal};
//!
//! let samples = vec![0.0; 48_000];
//! let signal = Signal::new(samples, 48_000)?;
//! let loudness = analyze(&signal, &AnalysisConfig::default());
//! for (bark, values) in loudness.iter() {
//!     println!("{bark:4.1} Bark: {} blocks", values.len());
//! }
//! # Ok::<(), ecma418::LoudnessError>(())
//! ```

pub mod audio;
pub mod config;
pub mod error;

pub use audio::analysis::{analyze, band_pass, segment_and_compress};
pub use audio::features::SpecificLoudness;
pub use audio::gammatone::BandPassSignals;
pub use audio::signal::Signal;
pub use config::{AnalysisConfig, SegmentationConfig};
pub use error::LoudnessError;
