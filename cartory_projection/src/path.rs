// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use cartory_geo::geo_types::{self, LineString, Polygon};
use cartory_geo::{Coord, Geometry, lon_lat};
use kurbo::{BezPath, Circle, PathEl, Point, Rect, Shape};

use crate::Projection;
use crate::cut;
#[cfg(not(feature = "std"))]
use crate::float::FloatFuncs as _;

/// Angular step, in degrees, used to sample the sphere outline.
const SPHERE_STEP: f64 = 1.0;

/// Flattening tolerance for point markers.
const MARKER_TOLERANCE: f64 = 0.1;

/// Turns geometries into screen‑space paths under a [`Projection`].
///
/// Polygons are cut along the antimeridian before projecting, the sphere
/// becomes the outline of the projection's domain, and points are drawn as
/// small circles (their bounds are the point itself).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathGenerator {
    projection: Projection,
    point_radius: f64,
}

impl PathGenerator {
    /// Creates a path generator for `projection` with a point radius of `4.5`.
    #[must_use]
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            point_radius: 4.5,
        }
    }

    /// Returns a copy with a different point marker radius.
    #[must_use]
    pub fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }

    /// The projection used by this generator.
    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Builds the screen‑space path of `geometry`.
    #[must_use]
    pub fn path(&self, geometry: &Geometry) -> BezPath {
        let mut sink = PathSink {
            path: BezPath::new(),
            open: 0,
            radius: self.point_radius,
        };
        self.stream(geometry, &mut sink);
        sink.path
    }

    /// Returns the axis-aligned bounds of `geometry` in screen space, or
    /// `None` if it has no finite projected positions.
    #[must_use]
    pub fn bounds(&self, geometry: &Geometry) -> Option<Rect> {
        let mut sink = BoundsSink { bounds: None };
        self.stream(geometry, &mut sink);
        sink.bounds
    }

    /// Returns SVG path data (`d` attribute) for `geometry`.
    #[must_use]
    pub fn svg_path(&self, geometry: &Geometry) -> String {
        svg_path_data(&self.path(geometry))
    }

    fn stream(&self, geometry: &Geometry, sink: &mut impl Sink) {
        match geometry {
            Geometry::Null => {}
            Geometry::Sphere => {
                self.ring(&sphere_ring(self.projection.kind().latitude_limit()).0, sink);
            }
            Geometry::Shape(shape) => self.shape(shape, sink),
        }
    }

    fn shape(&self, shape: &geo_types::Geometry<f64>, sink: &mut impl Sink) {
        use geo_types::Geometry as G;
        match shape {
            G::Point(p) => self.marker(p.0, sink),
            G::MultiPoint(points) => {
                for p in &points.0 {
                    self.marker(p.0, sink);
                }
            }
            G::Line(line) => self.line(&[line.start, line.end], sink),
            G::LineString(line) => self.line(&line.0, sink),
            G::MultiLineString(lines) => {
                for line in &lines.0 {
                    self.line(&line.0, sink);
                }
            }
            G::Polygon(polygon) => self.polygon(polygon, sink),
            G::MultiPolygon(polygons) => {
                for polygon in &polygons.0 {
                    self.polygon(polygon, sink);
                }
            }
            G::Rect(rect) => self.polygon(&rect.to_polygon(), sink),
            G::Triangle(triangle) => self.polygon(&triangle.to_polygon(), sink),
            G::GeometryCollection(items) => {
                for item in &items.0 {
                    self.shape(item, sink);
                }
            }
        }
    }

    fn marker(&self, p: Coord<f64>, sink: &mut impl Sink) {
        if let Some(pt) = self.projection.project(p) {
            sink.marker(pt);
        }
    }

    fn line(&self, line: &[Coord<f64>], sink: &mut impl Sink) {
        sink.line_start();
        let mut prev: Option<Coord<f64>> = None;
        for &p in line {
            if prev.is_some_and(|q| (p.x - q.x).abs() > 180.0) {
                sink.line_end(false);
                sink.line_start();
            }
            if let Some(pt) = self.projection.project(p) {
                sink.point(pt);
            }
            prev = Some(p);
        }
        sink.line_end(false);
    }

    fn polygon(&self, polygon: &Polygon<f64>, sink: &mut impl Sink) {
        let rings = core::iter::once(polygon.exterior()).chain(polygon.interiors());
        for ring in rings {
            cut::for_each_piece(&ring.0, |piece| self.ring(piece, sink));
        }
    }

    fn ring(&self, ring: &[Coord<f64>], sink: &mut impl Sink) {
        sink.line_start();
        for &p in ring {
            if let Some(pt) = self.projection.project(p) {
                sink.point(pt);
            }
        }
        sink.line_end(true);
    }
}

/// Samples the boundary of the `[-180, 180] × [-limit, limit]` domain as a
/// closed ring, clockwise from the north-west corner.
fn sphere_ring(limit: f64) -> LineString<f64> {
    let mut ring = Vec::new();
    let mut lon = -180.0;
    while lon < 180.0 {
        ring.push(lon_lat(lon, limit));
        lon += SPHERE_STEP;
    }
    let mut lat = limit;
    while lat > -limit {
        ring.push(lon_lat(180.0, lat));
        lat -= SPHERE_STEP;
    }
    let mut lon = 180.0;
    while lon > -180.0 {
        ring.push(lon_lat(lon, -limit));
        lon -= SPHERE_STEP;
    }
    let mut lat = -limit;
    while lat < limit {
        ring.push(lon_lat(-180.0, lat));
        lat += SPHERE_STEP;
    }
    ring.push(lon_lat(-180.0, limit));
    LineString::new(ring)
}

trait Sink {
    fn line_start(&mut self);
    fn point(&mut self, p: Point);
    fn line_end(&mut self, closed: bool);
    fn marker(&mut self, p: Point);
}

struct PathSink {
    path: BezPath,
    open: usize,
    radius: f64,
}

impl Sink for PathSink {
    fn line_start(&mut self) {
        self.open = 0;
    }

    fn point(&mut self, p: Point) {
        if self.open == 0 {
            self.path.move_to(p);
        } else {
            self.path.line_to(p);
        }
        self.open += 1;
    }

    fn line_end(&mut self, closed: bool) {
        if closed && self.open > 1 {
            self.path.close_path();
        }
        self.open = 0;
    }

    fn marker(&mut self, p: Point) {
        self.path
            .extend(Circle::new(p, self.radius).path_elements(MARKER_TOLERANCE));
    }
}

struct BoundsSink {
    bounds: Option<Rect>,
}

impl BoundsSink {
    fn include(&mut self, p: Point) {
        self.bounds = Some(match self.bounds {
            Some(b) => b.union_pt(p),
            None => Rect::from_points(p, p),
        });
    }
}

impl Sink for BoundsSink {
    fn line_start(&mut self) {}

    fn point(&mut self, p: Point) {
        self.include(p);
    }

    fn line_end(&mut self, _closed: bool) {}

    fn marker(&mut self, p: Point) {
        self.include(p);
    }
}

/// Serializes a path as compact SVG path data.
///
/// Coordinates are written with at most three decimals.
#[must_use]
pub fn svg_path_data(path: &BezPath) -> String {
    let mut d = String::new();
    for el in path.iter() {
        match el {
            PathEl::MoveTo(p) => {
                d.push('M');
                write_point(&mut d, p);
            }
            PathEl::LineTo(p) => {
                d.push('L');
                write_point(&mut d, p);
            }
            PathEl::QuadTo(p1, p2) => {
                d.push('Q');
                write_point(&mut d, p1);
                d.push(' ');
                write_point(&mut d, p2);
            }
            PathEl::CurveTo(p1, p2, p3) => {
                d.push('C');
                write_point(&mut d, p1);
                d.push(' ');
                write_point(&mut d, p2);
                d.push(' ');
                write_point(&mut d, p3);
            }
            PathEl::ClosePath => d.push('Z'),
        }
    }
    d
}

fn write_point(out: &mut String, p: Point) {
    write_number(out, p.x);
    out.push(',');
    write_number(out, p.y);
}

pub(crate) fn write_number(out: &mut String, v: f64) {
    if !v.is_finite() {
        let _ = write!(out, "{v}");
        return;
    }
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        out.push('0');
        return;
    }
    let start = out.len();
    let _ = write!(out, "{rounded:.3}");
    while out.len() > start && out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
}
