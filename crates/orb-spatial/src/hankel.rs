//! Spherical Hankel functions and their derivatives
//!
//! Evaluates `h_n(z) = j_n(z) + i*sign*y_n(z)` for orders 0..N, where `j_n`
//! and `y_n` are the spherical Bessel functions of the first and second kind
//! and `sign` is +1 for the first-kind (outgoing) and -1 for the second-kind
//! (incoming) convention. The derivative with respect to the argument uses
//! the closed three-term formula, so no deep recursion is involved.
//!
//! `j_n` is computed by downward (Miller) recurrence, which stays stable for
//! arguments below the order; `y_n` grows with order and is computed by the
//! stable upward recurrence. Near-zero arguments fall back to the ascending
//! series. Overflow of `y_n` at extreme order/argument combinations
//! propagates as infinities, the usual special-function library behavior;
//! downstream design code patches the resulting bad bins.

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::error::SpatialError;

/// Below this argument the ascending series is used for `j_n`
const SMALL_ARGUMENT: f64 = 1e-3;

/// Extra orders above the target for the downward recurrence start
const MILLER_MARGIN: usize = 24;

/// Rescale threshold for the downward recurrence
const RESCALE_LIMIT: f64 = 1e250;

/// Kind of the spherical Hankel function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HankelKind {
    /// First kind: `j_n + i*y_n` (outgoing wave convention)
    First,
    /// Second kind: `j_n - i*y_n` (incoming wave convention)
    Second,
}

impl HankelKind {
    /// Sign of the imaginary Bessel term
    pub fn sign(self) -> f64 {
        match self {
            HankelKind::First => 1.0,
            HankelKind::Second => -1.0,
        }
    }
}

impl TryFrom<u8> for HankelKind {
    type Error = SpatialError;

    /// Numeric convention of the acoustics literature: 1 or 2
    fn try_from(kind: u8) -> Result<Self, SpatialError> {
        match kind {
            1 => Ok(HankelKind::First),
            2 => Ok(HankelKind::Second),
            other => Err(SpatialError::InvalidHankelKind(other)),
        }
    }
}

/// Spherical Hankel function of the given order and kind at every argument
pub fn spherical_hankel(order: usize, kind: HankelKind, z: &[f64]) -> Vec<Complex<f64>> {
    z.iter()
        .map(|&zi| {
            let j = spherical_bessel_j(order, zi);
            let y = spherical_bessel_y(order, zi);
            Complex::new(j[order], kind.sign() * y[order])
        })
        .collect()
}

/// Derivative of the spherical Hankel function with respect to its argument
///
/// Uses `h_0'(z) = -h_1(z)` and, for `n >= 1`,
/// `h_n'(z) = (n*h_{n-1}(z) - (n+1)*h_{n+1}(z)) / (2n+1)`.
pub fn spherical_hankel_derivative(
    order: usize,
    kind: HankelKind,
    z: &[f64],
) -> Vec<Complex<f64>> {
    let sign = kind.sign();
    z.iter()
        .map(|&zi| {
            let j = spherical_bessel_j(order + 1, zi);
            let y = spherical_bessel_y(order + 1, zi);
            let h = |n: usize| Complex::new(j[n], sign * y[n]);
            if order == 0 {
                -h(1)
            } else {
                (order as f64 * h(order - 1) - (order + 1) as f64 * h(order + 1))
                    / (2 * order + 1) as f64
            }
        })
        .collect()
}

/// Spherical Bessel functions of the first kind, orders `0..=n_max`
fn spherical_bessel_j(n_max: usize, z: f64) -> Vec<f64> {
    debug_assert!(z >= 0.0, "argument must be non-negative");

    if z.abs() < SMALL_ARGUMENT {
        return (0..=n_max).map(|n| spherical_jn_series(n, z)).collect();
    }

    // Downward recurrence: j_{k-1}(z) = (2k+1)/z * j_k(z) - j_{k+1}(z),
    // started well above both the target order and the argument, then
    // normalized against the closed forms for orders 0 and 1.
    let start = n_max.max(z.abs().ceil() as usize) + MILLER_MARGIN;
    let mut values = vec![0.0; n_max + 1];
    let mut f_kp1 = 0.0_f64;
    let mut f_k = 1e-30_f64;

    for k in (1..=start).rev() {
        let f_km1 = (2 * k + 1) as f64 / z * f_k - f_kp1;
        f_kp1 = f_k;
        f_k = f_km1;
        if k - 1 <= n_max {
            values[k - 1] = f_k;
        }
        if f_k.abs() > RESCALE_LIMIT {
            let r = 1.0 / RESCALE_LIMIT;
            f_k *= r;
            f_kp1 *= r;
            for v in &mut values {
                *v *= r;
            }
        }
    }

    // f_k and f_kp1 now hold the unnormalized orders 0 and 1. Normalize
    // against whichever closed form is larger to dodge the zeros of j_0.
    let j0 = z.sin() / z;
    let j1 = z.sin() / (z * z) - z.cos() / z;
    let scale = if j0.abs() >= j1.abs() {
        j0 / f_k
    } else {
        j1 / f_kp1
    };
    for v in &mut values {
        *v *= scale;
    }
    values
}

/// Ascending series for `j_n` near zero, where the closed forms cancel
fn spherical_jn_series(n: usize, z: f64) -> f64 {
    // j_n(z) = z^n / (2n+1)!! * (1 - (z^2/2)/(2n+3) + ...)
    let mut prefactor = 1.0;
    for k in 0..n {
        prefactor *= z / (2 * k + 3) as f64;
    }

    let x = z * z / 2.0;
    let mut sum = 1.0;
    let mut term = 1.0;
    for k in 1..=3 {
        term *= -x / (k as f64 * (2 * (n + k) + 1) as f64);
        sum += term;
    }
    prefactor * sum
}

/// Spherical Bessel functions of the second kind, orders `0..=n_max`
///
/// Upward recurrence from the closed forms for orders 0 and 1; magnitudes
/// grow with order, so the recurrence is stable. Overflow at high order and
/// tiny argument saturates to infinity.
fn spherical_bessel_y(n_max: usize, z: f64) -> Vec<f64> {
    let mut values = Vec::with_capacity(n_max + 1);
    values.push(-z.cos() / z);
    if n_max == 0 {
        return values;
    }
    values.push(-z.cos() / (z * z) - z.sin() / z);
    for k in 1..n_max {
        let next = (2 * k + 1) as f64 / z * values[k] - values[k - 1];
        values.push(next);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_kind_from_numeric_convention() {
        assert_eq!(HankelKind::try_from(1).unwrap(), HankelKind::First);
        assert_eq!(HankelKind::try_from(2).unwrap(), HankelKind::Second);
        assert!(matches!(
            HankelKind::try_from(3),
            Err(SpatialError::InvalidHankelKind(3))
        ));
        assert!(matches!(
            HankelKind::try_from(0),
            Err(SpatialError::InvalidHankelKind(0))
        ));
    }

    #[test]
    fn test_order_zero_closed_forms() {
        // h_0^(1)(z) = -i e^{iz} / z, h_0^(2)(z) = i e^{-iz} / z
        for &z in &[0.3, 1.0, 2.5, 7.9, 20.0] {
            let h1 = spherical_hankel(0, HankelKind::First, &[z])[0];
            let expected1 = -Complex::<f64>::i() * (Complex::<f64>::i() * z).exp() / z;
            assert_relative_eq!(h1.re, expected1.re, max_relative = 1e-12);
            assert_relative_eq!(h1.im, expected1.im, max_relative = 1e-12);

            let h2 = spherical_hankel(0, HankelKind::Second, &[z])[0];
            let expected2 = Complex::<f64>::i() * (-Complex::<f64>::i() * z).exp() / z;
            assert_relative_eq!(h2.re, expected2.re, max_relative = 1e-12);
            assert_relative_eq!(h2.im, expected2.im, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_order_two_closed_forms() {
        // j_2(z) = (3/z^2 - 1) sin(z)/z - 3 cos(z)/z^2
        // y_2(z) = (-3/z^2 + 1) cos(z)/z - 3 sin(z)/z^2
        for &z in &[0.7, 1.3, 4.2, 11.0] {
            let h = spherical_hankel(2, HankelKind::First, &[z])[0];
            let j2 = (3.0 / (z * z) - 1.0) * z.sin() / z - 3.0 * z.cos() / (z * z);
            let y2 = (-3.0 / (z * z) + 1.0) * z.cos() / z - 3.0 * z.sin() / (z * z);
            assert_relative_eq!(h.re, j2, max_relative = 1e-10, epsilon = 1e-12);
            assert_relative_eq!(h.im, y2, max_relative = 1e-10, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_small_argument_series() {
        // j_1(z) -> z/3 as z -> 0; the closed form cancels catastrophically
        let z = 1e-8;
        let h = spherical_hankel(1, HankelKind::First, &[z])[0];
        assert_relative_eq!(h.re, z / 3.0, max_relative = 1e-10);

        // j_0(z) -> 1
        let h0 = spherical_hankel(0, HankelKind::First, &[z])[0];
        assert_relative_eq!(h0.re, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_derivative_order_zero_identity() {
        for &z in &[0.5, 2.0, 9.3] {
            let d = spherical_hankel_derivative(0, HankelKind::Second, &[z])[0];
            let h1 = spherical_hankel(1, HankelKind::Second, &[z])[0];
            assert_abs_diff_eq!(d.re, -h1.re, epsilon = 1e-12);
            assert_abs_diff_eq!(d.im, -h1.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_derivative_matches_central_difference() {
        let dz = 1e-6;
        for order in 1..=7 {
            for &z in &[1.5, 4.0, 12.0] {
                let d = spherical_hankel_derivative(order, HankelKind::Second, &[z])[0];
                let plus = spherical_hankel(order, HankelKind::Second, &[z + dz])[0];
                let minus = spherical_hankel(order, HankelKind::Second, &[z - dz])[0];
                let numeric = (plus - minus) / (2.0 * dz);
                assert_relative_eq!(d.re, numeric.re, max_relative = 1e-5, epsilon = 1e-7);
                assert_relative_eq!(d.im, numeric.im, max_relative = 1e-5, epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn test_high_order_below_argument_is_stable() {
        // Upward recurrence would blow up here; the downward path must not.
        // Reference from the ascending series, which converges fast at z = 2
        // for order 20 (term ratio ~ z^2 / (2 * (2n + 3))).
        let z = 2.0_f64;
        let n = 20;
        let mut prefactor = 1.0;
        for k in 0..n {
            prefactor *= z / (2 * k + 3) as f64;
        }
        let x = z * z / 2.0;
        let mut sum = 1.0;
        let mut term = 1.0;
        for k in 1..=8 {
            term *= -x / (k as f64 * (2 * (n + k) + 1) as f64);
            sum += term;
        }
        let expected = prefactor * sum;

        let j = spherical_bessel_j(n, z);
        assert_relative_eq!(j[n], expected, max_relative = 1e-10);
    }

    #[test]
    fn test_vectorized_evaluation() {
        let z = [0.5, 1.0, 1.5];
        let batch = spherical_hankel(3, HankelKind::Second, &z);
        for (i, &zi) in z.iter().enumerate() {
            let single = spherical_hankel(3, HankelKind::Second, &[zi])[0];
            assert_eq!(batch[i], single);
        }
    }
}
