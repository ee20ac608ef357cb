// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unscaled projection formulas.
//!
//! Inputs are longitude/latitude in radians; outputs are in "raw" units with
//! y pointing north. [`crate::Projection`] applies scale, translation and the
//! y flip into screen space.

use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, SQRT_2};

#[cfg(not(feature = "std"))]
use crate::float::FloatFuncs as _;
use crate::ProjectionKind;

/// Latitude (degrees) at which Mercator is clipped: `atan(sinh(π))`.
pub(crate) const MERCATOR_LAT_LIMIT: f64 = 85.051_128_779_806_59;

const MOLLWEIDE_ITERATIONS: usize = 30;
const EPSILON: f64 = 1e-6;

/// Standard parallel of the cylindrical equal-area projection, in degrees.
const CEA_PARALLEL: f64 = 38.58;

impl ProjectionKind {
    /// Largest absolute latitude (degrees) this projection can show.
    #[must_use]
    pub fn latitude_limit(self) -> f64 {
        match self {
            Self::Mercator => MERCATOR_LAT_LIMIT,
            _ => 90.0,
        }
    }

    /// Projects `(lambda, phi)` in radians to unscaled planar coordinates.
    #[must_use]
    pub fn project_raw(self, lambda: f64, phi: f64) -> (f64, f64) {
        match self {
            Self::Equirectangular => (lambda, phi),
            Self::Mercator => {
                let limit = MERCATOR_LAT_LIMIT.to_radians();
                let phi = phi.clamp(-limit, limit);
                (lambda, (FRAC_PI_4 + phi / 2.0).tan().ln())
            }
            Self::EqualEarth => equal_earth(lambda, phi),
            Self::NaturalEarth1 => natural_earth1(lambda, phi),
            Self::NaturalEarth2 => natural_earth2(lambda, phi),
            Self::Mollweide => mollweide(lambda, phi),
            Self::Sinusoidal => (lambda * phi.cos(), phi),
            Self::CylindricalEqualArea => {
                let cos0 = CEA_PARALLEL.to_radians().cos();
                (lambda * cos0, phi.sin() / cos0)
            }
        }
    }
}

fn equal_earth(lambda: f64, phi: f64) -> (f64, f64) {
    const A1: f64 = 1.340_264;
    const A2: f64 = -0.081_106;
    const A3: f64 = 0.000_893;
    const A4: f64 = 0.003_796;
    let m = 3.0_f64.sqrt() / 2.0;

    let l = (m * phi.sin()).asin();
    let l2 = l * l;
    let l6 = l2 * l2 * l2;
    (
        lambda * l.cos() / (m * (A1 + 3.0 * A2 * l2 + l6 * (7.0 * A3 + 9.0 * A4 * l2))),
        l * (A1 + A2 * l2 + l6 * (A3 + A4 * l2)),
    )
}

fn natural_earth1(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    (
        lambda
            * (0.8707 - 0.131_979 * phi2
                + phi4 * (-0.013_791 + phi4 * (0.003_971 * phi2 - 0.001_529 * phi4))),
        phi * (1.007_226
            + phi2 * (0.015_085 + phi4 * (-0.044_475 + 0.028_874 * phi2 - 0.005_916 * phi4))),
    )
}

fn natural_earth2(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let phi6 = phi2 * phi4;
    (
        lambda
            * (0.847_19 - 0.130_63 * phi2
                + phi6 * phi6 * (-0.045_15 + 0.054_94 * phi2 - 0.023_26 * phi4 + 0.003_31 * phi6)),
        phi * (1.011_83 + phi4 * phi4 * (-0.026_25 + 0.019_26 * phi2 - 0.003_96 * phi4)),
    )
}

/// Solves `2θ + sin 2θ = π sin φ` by Newton iteration and returns `θ`.
fn mollweide_theta(phi: f64) -> f64 {
    if (FRAC_PI_2 - phi.abs()).abs() < EPSILON {
        return if phi < 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
    }
    let target = PI * phi.sin();
    let mut t = phi;
    for _ in 0..MOLLWEIDE_ITERATIONS {
        let delta = (t + t.sin() - target) / (1.0 + t.cos());
        t -= delta;
        if delta.abs() <= EPSILON {
            break;
        }
    }
    t / 2.0
}

fn mollweide(lambda: f64, phi: f64) -> (f64, f64) {
    let theta = mollweide_theta(phi);
    (
        2.0 * SQRT_2 / PI * lambda * theta.cos(),
        SQRT_2 * theta.sin(),
    )
}
