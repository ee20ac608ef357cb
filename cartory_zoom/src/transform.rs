// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Affine, Point, Rect, Vec2};

/// A uniform pan + zoom transform: `p ↦ (x + k·px, y + k·py)`.
///
/// Values are replaced rather than mutated; every method returns a new
/// transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    /// Horizontal translation in view pixels.
    pub x: f64,
    /// Vertical translation in view pixels.
    pub y: f64,
    /// Uniform scale factor.
    pub k: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    /// No translation, scale `1`.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    /// Creates a transform from translation and scale.
    #[must_use]
    pub const fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// Appends a translation expressed in the transform's input space.
    ///
    /// The translation is multiplied by the current scale.
    #[must_use]
    pub fn translate(self, tx: f64, ty: f64) -> Self {
        Self {
            x: self.x + self.k * tx,
            y: self.y + self.k * ty,
            k: self.k,
        }
    }

    /// Appends a uniform scale.
    #[must_use]
    pub fn scale(self, k: f64) -> Self {
        Self {
            k: self.k * k,
            ..self
        }
    }

    /// Returns a transform with scale `k` that keeps `anchor` (a view point)
    /// fixed.
    #[must_use]
    pub fn rescale_about(self, anchor: Point, k: f64) -> Self {
        let world = self.invert(anchor);
        Self {
            x: anchor.x - world.x * k,
            y: anchor.y - world.y * k,
            k,
        }
    }

    /// Returns the transform translated by a view-space delta.
    #[must_use]
    pub fn pan_by(self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            k: self.k,
        }
    }

    /// Maps a point from content space into view space.
    #[must_use]
    pub fn apply(self, p: Point) -> Point {
        Point::new(self.x + self.k * p.x, self.y + self.k * p.y)
    }

    /// Maps a point from view space back into content space.
    #[must_use]
    pub fn invert(self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// Maps a content-space rectangle into view space.
    #[must_use]
    pub fn apply_rect(self, r: Rect) -> Rect {
        Rect::from_points(self.apply(r.origin()), self.apply(Point::new(r.x1, r.y1)))
    }

    /// The equivalent Kurbo affine.
    #[must_use]
    pub fn to_affine(self) -> Affine {
        Affine::translate((self.x, self.y)) * Affine::scale(self.k)
    }

    /// Returns `true` if all components are finite and the scale is positive.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.k.is_finite() && self.k > 0.0
    }
}

/// Formats as an SVG `transform` attribute value.
impl fmt::Display for ZoomTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

/// A closed range of allowed scale factors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleExtent {
    min: f64,
    max: f64,
}

impl ScaleExtent {
    /// Creates a scale extent. The bounds are swapped if given in the wrong
    /// order.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Smallest allowed scale.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest allowed scale.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamps `k` into the extent.
    #[must_use]
    pub fn clamp(&self, k: f64) -> f64 {
        k.clamp(self.min, self.max)
    }

    /// Returns `true` if `k` lies within the extent.
    #[must_use]
    pub fn contains(&self, k: f64) -> bool {
        (self.min..=self.max).contains(&k)
    }
}

impl Default for ScaleExtent {
    fn default() -> Self {
        Self::new(1.0, 18.0)
    }
}
