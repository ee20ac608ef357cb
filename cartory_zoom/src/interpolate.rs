// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smooth zoom interpolation and easing.
//!
//! Transitions between two transforms follow the optimal pan/zoom path of
//! van Wijk and Nuij, "Smooth and efficient zooming and panning" (2003):
//! when the two views are far apart the path zooms out, pans, and zooms back
//! in. Views are expressed as `(cx, cy, w)`: the content-space point at the
//! centre of the viewport and the content-space width it spans.

use core::f64::consts::SQRT_2;

use kurbo::{Point, Rect};

#[cfg(not(feature = "std"))]
use crate::float::FloatFuncs as _;
use crate::{ScaleExtent, ZoomTransform};

const RHO: f64 = SQRT_2;
const RHO2: f64 = 2.0;
const RHO4: f64 = 4.0;
const EPSILON2: f64 = 1e-12;

/// Easing curve applied to transition progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Slow start and end.
    #[default]
    CubicInOut,
}

impl Easing {
    /// Maps linear progress `t ∈ [0, 1]` onto eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Path {
    /// Views share a centre; only the width changes.
    Scale { s: f64 },
    /// General case along the hyperbolic path.
    Arc { d1: f64, r0: f64, s: f64 },
}

/// `ln(sqrt(b² + 1) - b)`, evaluated without cancellation for large `b`.
fn neg_asinh(b: f64) -> f64 {
    let root = (b * b + 1.0).sqrt();
    if b > 0.0 {
        -(b + root).ln()
    } else {
        (root - b).ln()
    }
}

/// Interpolates between two `(cx, cy, w)` views.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewInterpolator {
    from: [f64; 3],
    to: [f64; 3],
    path: Path,
}

impl ViewInterpolator {
    /// Creates an interpolator between two views.
    #[must_use]
    pub fn new(from: [f64; 3], to: [f64; 3]) -> Self {
        let [ux0, uy0, w0] = from;
        let [ux1, uy1, w1] = to;
        let dx = ux1 - ux0;
        let dy = uy1 - uy0;
        let d2 = dx * dx + dy * dy;
        let path = if d2 < EPSILON2 {
            Path::Scale {
                s: (w1 / w0).ln() / RHO,
            }
        } else {
            let d1 = d2.sqrt();
            let b0 = (w1 * w1 - w0 * w0 + RHO4 * d2) / (2.0 * w0 * RHO2 * d1);
            let b1 = (w1 * w1 - w0 * w0 - RHO4 * d2) / (2.0 * w1 * RHO2 * d1);
            let r0 = neg_asinh(b0);
            let r1 = neg_asinh(b1);
            Path::Arc {
                d1,
                r0,
                s: (r1 - r0) / RHO,
            }
        };
        Self { from, to, path }
    }

    /// The view at progress `t ∈ [0, 1]`.
    #[must_use]
    pub fn at(&self, t: f64) -> [f64; 3] {
        if t >= 1.0 {
            return self.to;
        }
        let [ux0, uy0, w0] = self.from;
        let dx = self.to[0] - ux0;
        let dy = self.to[1] - uy0;
        match self.path {
            Path::Scale { s } => [ux0 + t * dx, uy0 + t * dy, w0 * (RHO * t * s).exp()],
            Path::Arc { d1, r0, s } => {
                let s = t * s;
                let cosh_r0 = r0.cosh();
                let u = w0 / (RHO2 * d1) * (cosh_r0 * (RHO * s + r0).tanh() - r0.sinh());
                [ux0 + u * dx, uy0 + u * dy, w0 * cosh_r0 / (RHO * s + r0).cosh()]
            }
        }
    }

    /// Recommended duration in milliseconds for this path.
    #[must_use]
    pub fn natural_duration_ms(&self) -> f64 {
        let s = match self.path {
            Path::Scale { s } | Path::Arc { s, .. } => s,
        };
        (s * 1000.0 * RHO / SQRT_2).abs()
    }
}

/// Interpolates between two transforms within a viewport.
///
/// Intermediate transforms are clamped into the scale extent by rescaling
/// about the viewport centre, so the path never leaves the allowed range.
///
/// A viewport without a positive, finite size has no centre to zoom about;
/// there the translation moves linearly and the scale geometrically.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformInterpolator {
    from: ZoomTransform,
    to: ZoomTransform,
    route: Route,
    extent: ScaleExtent,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Route {
    Smooth {
        centre: Point,
        width: f64,
        view: ViewInterpolator,
    },
    Direct,
}

impl TransformInterpolator {
    /// Creates an interpolator from `from` to `to` for a viewport `viewport`.
    #[must_use]
    pub fn new(
        from: ZoomTransform,
        to: ZoomTransform,
        viewport: Rect,
        extent: ScaleExtent,
    ) -> Self {
        let centre = viewport.center();
        let width = viewport.width().max(viewport.height());
        let route = if width.is_finite() && width > 0.0 && centre.is_finite() {
            let a = from.invert(centre);
            let b = to.invert(centre);
            Route::Smooth {
                centre,
                width,
                view: ViewInterpolator::new([a.x, a.y, width / from.k], [b.x, b.y, width / to.k]),
            }
        } else {
            Route::Direct
        };
        Self {
            from,
            to,
            route,
            extent,
        }
    }

    /// The transform at progress `t ∈ [0, 1]`.
    ///
    /// Always valid: a frame that cannot be computed is replaced by the
    /// target.
    #[must_use]
    pub fn at(&self, t: f64) -> ZoomTransform {
        if t >= 1.0 {
            return self.to;
        }
        let frame = match self.route {
            Route::Smooth {
                centre,
                width,
                view,
            } => {
                let [cx, cy, w] = view.at(t);
                let k = width / w;
                let raw = ZoomTransform::new(centre.x - cx * k, centre.y - cy * k, k);
                let clamped = self.extent.clamp(k);
                if clamped == k {
                    raw
                } else {
                    raw.rescale_about(centre, clamped)
                }
            }
            Route::Direct => {
                let (a, b) = (self.from, self.to);
                let k = (a.k.ln() + t * (b.k.ln() - a.k.ln())).exp();
                ZoomTransform::new(
                    a.x + t * (b.x - a.x),
                    a.y + t * (b.y - a.y),
                    self.extent.clamp(k),
                )
            }
        };
        if frame.is_valid() { frame } else { self.to }
    }

    /// The smooth zoom path, if the viewport has one.
    #[must_use]
    pub fn view(&self) -> Option<&ViewInterpolator> {
        match &self.route {
            Route::Smooth { view, .. } => Some(view),
            Route::Direct => None,
        }
    }
}
