// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use cartory_projection::{ProjectionError, ProjectionKind};
use cartory_zoom::{ScaleExtent, ZoomTransform};
use kurbo::{Rect, Size, Vec2};

/// Selects the projection a map is drawn with.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectionConfig {
    /// Projection name, for example `"geoNaturalEarth2"`.
    pub name: String,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            name: ProjectionKind::NaturalEarth2.name().into(),
        }
    }
}

impl ProjectionConfig {
    /// Creates a configuration for the named projection.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Resolves the name through the core registry, then the extension
    /// registry.
    pub fn resolve(&self) -> Result<ProjectionKind, ProjectionError> {
        ProjectionKind::from_name(&self.name)
    }
}

impl From<ProjectionKind> for ProjectionConfig {
    fn from(kind: ProjectionKind) -> Self {
        Self::new(kind.name())
    }
}

/// Zoom limits and the click-to-zoom framing rule.
///
/// A clicked shape with screen bounds `w × h` is zoomed to
/// `k = clamp(fill / max(w / ref.width, h / ref.height), lower_bound, max_scale)`,
/// then centred in the viewport and shifted by `offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ZoomPolicy {
    /// Smallest scale gestures may reach.
    pub min_scale: f64,
    /// Largest scale gestures and clicks may reach.
    pub max_scale: f64,
    /// Share of the reference canvas a focused shape fills.
    pub fill: f64,
    /// Nominal unzoomed canvas the fill is measured against.
    pub reference: Size,
    /// Smallest scale a click zooms to.
    pub lower_bound: f64,
    /// Pixel offset added to the focus point, leaving room for side panels.
    pub offset: Vec2,
    /// Duration of click and reset transitions, in milliseconds.
    pub duration_ms: u64,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            min_scale: 1.0,
            max_scale: 18.0,
            fill: 0.9,
            reference: Size::new(960.0, 500.0),
            lower_bound: 1.1,
            offset: Vec2::new(-100.0, 0.0),
            duration_ms: 750,
        }
    }
}

impl ZoomPolicy {
    /// Sets the gesture scale range.
    #[must_use]
    pub fn with_scale_extent(mut self, min_scale: f64, max_scale: f64) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self
    }

    /// Sets the fill factor.
    #[must_use]
    pub fn with_fill(mut self, fill: f64) -> Self {
        self.fill = fill;
        self
    }

    /// Sets the reference canvas.
    #[must_use]
    pub fn with_reference(mut self, reference: Size) -> Self {
        self.reference = reference;
        self
    }

    /// Sets the smallest click scale.
    #[must_use]
    pub fn with_lower_bound(mut self, lower_bound: f64) -> Self {
        self.lower_bound = lower_bound;
        self
    }

    /// Sets the focus offset.
    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the transition duration.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// The gesture scale range.
    #[must_use]
    pub fn extent(&self) -> ScaleExtent {
        ScaleExtent::new(self.min_scale, self.max_scale)
    }

    /// Scale a click on a shape with these screen bounds zooms to.
    ///
    /// Boxes with zero or non-finite width or height give `max_scale`.
    #[must_use]
    pub fn target_scale(&self, bounds: Rect) -> f64 {
        let w = bounds.width();
        let h = bounds.height();
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return self.max_scale;
        }
        let k = self.fill / (w / self.reference.width).max(h / self.reference.height);
        if !k.is_finite() {
            return self.max_scale;
        }
        // `max` after `min`: the lower bound wins if the two ever cross.
        k.min(self.max_scale).max(self.lower_bound)
    }

    /// Transform that centres `bounds` in a `viewport`-sized view at
    /// [`target_scale`](Self::target_scale), shifted by the offset.
    #[must_use]
    pub fn focus(&self, bounds: Rect, viewport: Size) -> ZoomTransform {
        let k = self.target_scale(bounds);
        let centre = bounds.center();
        ZoomTransform::IDENTITY
            .translate(
                viewport.width / 2.0 + self.offset.x,
                viewport.height / 2.0 + self.offset.y,
            )
            .scale(k)
            .translate(-centre.x, -centre.y)
    }
}
