// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use cartory_geo::Feature;
use cartory_projection::PathGenerator;
use cartory_zoom::ZoomTransform;
use kurbo::{BezPath, Point, Rect, Shape, Size};
use peniko::Color;

use crate::ZoomPolicy;
use crate::scene::{COUNTRY_FILL, COUNTRY_STROKE, CountryShape};

/// Projected geometry of one country, rebuilt whenever the map is refitted.
#[derive(Clone, Debug, Default)]
pub(crate) struct CountryLayout {
    pub(crate) path: BezPath,
    pub(crate) bounds: Option<Rect>,
}

impl CountryLayout {
    pub(crate) fn project(paths: &PathGenerator, feature: &Feature) -> Self {
        Self {
            path: paths.path(&feature.geometry),
            bounds: paths.bounds(&feature.geometry),
        }
    }

    /// Non-zero winding test in projected coordinates.
    pub(crate) fn contains(&self, p: Point) -> bool {
        self.bounds.is_some_and(|b| b.contains(p)) && self.path.contains(p)
    }
}

/// One country of a [`WorldMap`](crate::WorldMap): its feature and its
/// projected shape.
#[derive(Clone, Copy, Debug)]
pub struct CountryView<'a> {
    index: usize,
    feature: &'a Feature,
    layout: &'a CountryLayout,
}

impl<'a> CountryView<'a> {
    pub(crate) fn new(index: usize, feature: &'a Feature, layout: &'a CountryLayout) -> Self {
        Self {
            index,
            feature,
            layout,
        }
    }

    /// Index in the atlas.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The underlying feature.
    #[must_use]
    pub fn feature(&self) -> &'a Feature {
        self.feature
    }

    /// Hover title: the display name.
    #[must_use]
    pub fn title(&self) -> &'a str {
        self.feature.name()
    }

    /// Stable subunit code.
    #[must_use]
    pub fn subunit(&self) -> &'a str {
        self.feature.subunit()
    }

    /// Projected outline, before the pan/zoom transform.
    #[must_use]
    pub fn path(&self) -> &'a BezPath {
        &self.layout.path
    }

    /// Bounding box under the current projection, before the pan/zoom
    /// transform. `None` if the country has no projectable geometry.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.layout.bounds
    }

    /// Fill color.
    #[must_use]
    pub fn fill(&self) -> Color {
        COUNTRY_FILL
    }

    /// Stroke color.
    #[must_use]
    pub fn stroke(&self) -> Color {
        COUNTRY_STROKE
    }

    /// Transform that frames this country in a `viewport`-sized view.
    ///
    /// `None` if the country has no bounds.
    #[must_use]
    pub fn focus_transform(&self, viewport: Size, policy: &ZoomPolicy) -> Option<ZoomTransform> {
        self.bounds().map(|b| policy.focus(b, viewport))
    }

    pub(crate) fn shape(&self) -> CountryShape<'a> {
        CountryShape {
            index: self.index,
            subunit: self.subunit(),
            title: self.title(),
            path: self.path(),
            fill: self.fill(),
            stroke: self.stroke(),
        }
    }
}
