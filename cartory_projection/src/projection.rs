// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use cartory_geo::{Coord, Geometry};
use kurbo::{Point, Rect, Size, Vec2};

use crate::{PathGenerator, ProjectionError, ProjectionKind};

/// A configured projection: a [`ProjectionKind`] plus scale and translation.
///
/// Screen coordinates have y pointing down:
/// `x = tx + k * raw_x`, `y = ty - k * raw_y`.
///
/// The `fit_*` methods choose scale and translation so that an object's
/// projected bounds fill a target width, height or extent, which is how maps
/// are sized against [`cartory_geo::SPHERE`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    kind: ProjectionKind,
    scale: f64,
    translate: Vec2,
}

impl Projection {
    /// Creates a projection with scale `150` centred on a 960×500 canvas.
    #[must_use]
    pub fn new(kind: ProjectionKind) -> Self {
        Self {
            kind,
            scale: 150.0,
            translate: Vec2::new(480.0, 250.0),
        }
    }

    /// Resolves `name` through the projection registries.
    pub fn from_name(name: &str) -> Result<Self, ProjectionError> {
        ProjectionKind::from_name(name).map(Self::new)
    }

    /// The projection algorithm.
    #[must_use]
    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// Current scale factor.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current translation, in pixels.
    #[must_use]
    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    /// Returns a copy with a different scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Returns a copy with a different translation.
    #[must_use]
    pub fn with_translate(mut self, translate: Vec2) -> Self {
        self.translate = translate;
        self
    }

    /// Projects a geographic position (`x` longitude, `y` latitude, in
    /// degrees) to screen coordinates.
    ///
    /// Returns `None` if the result is not finite.
    #[must_use]
    pub fn project(&self, p: Coord<f64>) -> Option<Point> {
        let (x, y) = self.kind.project_raw(p.x.to_radians(), p.y.to_radians());
        let pt = Point::new(
            self.translate.x + self.scale * x,
            self.translate.y - self.scale * y,
        );
        pt.is_finite().then_some(pt)
    }

    /// Fits `object` so that its projected width equals `width`, with its
    /// top edge at `y = 0` and centred horizontally.
    ///
    /// Returns the projection unchanged if `object` has no horizontal extent.
    #[must_use]
    pub fn fit_width(self, width: f64, object: &Geometry) -> Self {
        self.fit(object, |b| {
            if b.width() <= 0.0 {
                return None;
            }
            let k = width / b.width();
            Some((
                k,
                Vec2::new((width - k * (b.x0 + b.x1)) / 2.0, -k * b.y0),
            ))
        })
    }

    /// Fits `object` so that its projected height equals `height`, with its
    /// left edge at `x = 0` and centred vertically.
    #[must_use]
    pub fn fit_height(self, height: f64, object: &Geometry) -> Self {
        self.fit(object, |b| {
            if b.height() <= 0.0 {
                return None;
            }
            let k = height / b.height();
            Some((
                k,
                Vec2::new(-k * b.x0, (height - k * (b.y0 + b.y1)) / 2.0),
            ))
        })
    }

    /// Fits `object` into a `size` rectangle anchored at the origin.
    #[must_use]
    pub fn fit_size(self, size: Size, object: &Geometry) -> Self {
        self.fit_extent(size.to_rect(), object)
    }

    /// Fits `object` into `extent`, preserving aspect ratio and centring it.
    #[must_use]
    pub fn fit_extent(self, extent: Rect, object: &Geometry) -> Self {
        self.fit(object, |b| {
            if b.width() <= 0.0 || b.height() <= 0.0 {
                return None;
            }
            let w = extent.width();
            let h = extent.height();
            let k = (w / b.width()).min(h / b.height());
            Some((
                k,
                Vec2::new(
                    extent.x0 + (w - k * (b.x0 + b.x1)) / 2.0,
                    extent.y0 + (h - k * (b.y0 + b.y1)) / 2.0,
                ),
            ))
        })
    }

    fn fit(self, object: &Geometry, solve: impl FnOnce(Rect) -> Option<(f64, Vec2)>) -> Self {
        let unit = self.with_scale(1.0).with_translate(Vec2::ZERO);
        let Some(bounds) = PathGenerator::new(unit).bounds(object) else {
            return self;
        };
        match solve(bounds) {
            Some((k, translate)) if k.is_finite() && translate.is_finite() => {
                self.with_scale(k).with_translate(translate)
            }
            _ => self,
        }
    }
}
