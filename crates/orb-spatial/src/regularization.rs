//! Gain regularization for inverse radial filters
//!
//! The inverted mode response grows without bound near the nulls of the
//! forward response (spatial aliasing frequencies), so the inversion is
//! always paired with one of three gain-limiting strategies:
//! - soft limiting: arctan saturation toward the ceiling, smooth derivative
//! - hard limiting: exact clip of the magnitude, phase preserved
//! - Tikhonov: regularized pseudo-inverse of the un-inverted response
//!
//! The limit is given in dB and converted to a linear amplitude ceiling
//! `L = 10^(dB/20)`; soft and hard limiting bound the magnitude by `L`,
//! Tikhonov uses it to derive the shaping term `lambda^2` and peaks just
//! below `L`.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::error::SpatialError;

/// Regularization strategy for the inverse mode filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegularizationKind {
    /// Arctan soft limiting of the inverted response
    Soft,
    /// Hard magnitude clip of the inverted response
    Hard,
    /// Tikhonov-regularized pseudo-inverse of the forward response
    Tikhonov,
}

impl FromStr for RegularizationKind {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self, SpatialError> {
        match s {
            "soft" => Ok(RegularizationKind::Soft),
            "hard" => Ok(RegularizationKind::Hard),
            "tikhonov" => Ok(RegularizationKind::Tikhonov),
            other => Err(SpatialError::InvalidRegularization(other.to_string())),
        }
    }
}

impl fmt::Display for RegularizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegularizationKind::Soft => write!(f, "soft"),
            RegularizationKind::Hard => write!(f, "hard"),
            RegularizationKind::Tikhonov => write!(f, "tikhonov"),
        }
    }
}

/// Convert a dB gain limit to a linear amplitude ceiling
pub fn db_to_linear(limit_db: f64) -> f64 {
    10.0_f64.powf(limit_db / 20.0)
}

/// Arctan soft limiting, element-wise, phase preserving
///
/// `x <- (2L/pi) * (x/|x|) * atan(pi/(2L) * |x|)`; the magnitude approaches
/// `L` asymptotically and never reaches it. Zero-magnitude elements map to
/// NaN and are left for the caller's NaN patch.
pub fn soft_limit(data: &mut Array2<Complex<f64>>, limit_db: f64) {
    let limit = db_to_linear(limit_db);
    data.mapv_inplace(|x| {
        let magnitude = x.norm();
        2.0 * limit / PI * (x / magnitude) * (PI / (2.0 * limit) * magnitude).atan()
    });
}

/// Hard limiting: elements above the ceiling are rescaled onto it
pub fn hard_limit(data: &mut Array2<Complex<f64>>, limit_db: f64) {
    let limit = db_to_linear(limit_db);
    data.mapv_inplace(|x| {
        let magnitude = x.norm();
        if magnitude > limit {
            x / magnitude * limit
        } else {
            x
        }
    });
}

/// Tikhonov-regularized inversion of the forward response
///
/// `lambda^2 = (1 - sqrt(1 - 1/L^2)) / (1 + sqrt(1 - 1/L^2))`, then
/// `conj(x) / (|x|^2 + lambda^2)` element-wise. Unlike the limiters this
/// consumes the un-inverted response and performs the inversion itself.
pub fn tikhonov_inverse(forward: &Array2<Complex<f64>>, limit_db: f64) -> Array2<Complex<f64>> {
    let limit = db_to_linear(limit_db);
    let root = (1.0 - 1.0 / (limit * limit)).sqrt();
    let lambda_squared = (1.0 - root) / (1.0 + root);
    forward.mapv(|x| x.conj() / (x.norm_sqr() + lambda_squared))
}
