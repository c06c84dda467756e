//! Orbis Spherical Audio Engine - equatorial microphone array processing
//!
//! Encoding of rigid-sphere equatorial microphone array (EMA) recordings
//! into spherical-harmonic (ambisonic) domain signals:
//!
//! ## Radial filter design
//! - Spherical Hankel functions and derivatives up to arbitrary order
//! - Per-degree forward scattering response at the equator
//! - Regularized inversion: soft limiting, hard limiting, Tikhonov
//! - Causal time-domain FIR synthesis via half-length cyclic rotation
//!
//! ## Soundfield decoding
//! - Circular-harmonic surface decomposition over the microphone ring
//! - Per-mode radial filtering by linear convolution
//! - Expansion to ACN-ordered spherical-harmonic channels
//!
//! ## Usage
//!
//! ```rust,ignore
//! use orb_dsp::rfft_frequencies;
//! use orb_spatial::{design_radial_filters, RadialFilterConfig, RegularizationKind};
//! use orb_spatial::SoundfieldDecoder;
//!
//! // Design the inverse radial filters for a 8.75 cm ring at order 7
//! let frequencies = rfft_frequencies(2048, 48000.0);
//! let config = RadialFilterConfig::new(0.0875, 7, 40.0, RegularizationKind::Tikhonov);
//! let filters = design_radial_filters(&frequencies, &config)?;
//!
//! // Decode a 16-channel ring recording into 64 ambisonic channels
//! let decoder = SoundfieldDecoder::new(7, azimuths);
//! let ambisonics = decoder.decode(&recording, &filters)?;
//! ```

pub mod decoder;
pub mod hankel;
pub mod radial;
pub mod regularization;
pub mod sh;

mod error;

pub use decoder::{SoundfieldDecoder, acn_index, acn_to_order_degree};
pub use error::{SpatialError, SpatialResult};
pub use hankel::HankelKind;
pub use radial::{
    DEFAULT_SAMPLE_RATE, DEFAULT_SPEED_OF_SOUND, RadialFilterConfig, design_radial_filters,
};
pub use regularization::RegularizationKind;
