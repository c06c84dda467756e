//! orb-core: Shared types and containers for the Orbis spherical audio engine
//!
//! This crate provides the foundational types used across all Orbis crates:
//! - `Sample` - the audio sample type (f64 throughout, all processing is offline)
//! - `Signal` - immutable multichannel time-domain container with sample-rate metadata
//! - `CoreError` - validation errors raised at container construction

mod error;
mod signal;

pub use error::{CoreError, CoreResult};
pub use signal::Signal;

/// Audio sample type used across the engine
pub type Sample = f64;
