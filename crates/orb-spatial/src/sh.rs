//! Complex spherical harmonics
//!
//! Orthonormal spherical harmonics in the convention of the standard
//! scientific libraries:
//!
//! `Y_n^m(azimuth, polar) = sqrt((2n+1)/(4*pi) * (n-m)!/(n+m)!)
//!                          * P_n^m(cos(polar)) * exp(i*m*azimuth)`
//!
//! with the Condon-Shortley phase `(-1)^m` carried inside the associated
//! Legendre term, and negative degrees obtained from
//! `Y_n^{-m} = (-1)^m * conj(Y_n^m)`.

use std::f64::consts::PI;

use num_complex::Complex;

/// Complex spherical harmonic of order `n` and degree `m`
///
/// `azimuth` and `polar` are in radians; `polar` is measured from the pole,
/// so the equator sits at `polar = pi/2`. Degrees with `|m| > n` evaluate to
/// zero.
pub fn sph_harm(degree: i32, order: usize, azimuth: f64, polar: f64) -> Complex<f64> {
    let m_abs = degree.unsigned_abs() as usize;
    if m_abs > order {
        return Complex::new(0.0, 0.0);
    }

    let legendre = associated_legendre(order, m_abs, polar.cos());
    let amplitude = normalization(order, m_abs) * legendre;
    let value = Complex::from_polar(amplitude, m_abs as f64 * azimuth);

    if degree < 0 {
        let parity = if m_abs % 2 == 0 { 1.0 } else { -1.0 };
        parity * value.conj()
    } else {
        value
    }
}

/// Orthonormalization factor `sqrt((2n+1)/(4*pi) * (n-m)!/(n+m)!)`
fn normalization(order: usize, m_abs: usize) -> f64 {
    let factorial_ratio = ((order - m_abs + 1)..=(order + m_abs)).fold(1.0, |acc, k| acc / k as f64);
    ((2 * order + 1) as f64 / (4.0 * PI) * factorial_ratio).sqrt()
}

/// Associated Legendre function `P_l^m(x)` with Condon-Shortley phase
///
/// Standard three-step recurrence: close the diagonal with
/// `P_m^m = (-1)^m (2m-1)!! (1-x^2)^{m/2}`, step once with
/// `P_{m+1}^m = x (2m+1) P_m^m`, then raise the order with the three-term
/// recurrence.
fn associated_legendre(l: usize, m: usize, x: f64) -> f64 {
    let somx2 = ((1.0 - x) * (1.0 + x)).sqrt();
    let mut pmm = 1.0;
    let mut fact = 1.0;
    for _ in 0..m {
        pmm *= -fact * somx2;
        fact += 2.0;
    }
    if l == m {
        return pmm;
    }

    let mut pm_prev = pmm;
    let mut pm = x * (2 * m + 1) as f64 * pmm;
    for ll in (m + 2)..=l {
        let next = ((2 * ll - 1) as f64 * x * pm - (ll + m - 1) as f64 * pm_prev)
            / (ll - m) as f64;
        pm_prev = pm;
        pm = next;
    }
    pm
}
