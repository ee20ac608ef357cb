// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use geo_types::{Coord, Polygon};

/// Geometry of a feature, in geographic coordinates.
///
/// Positions are [`Coord`]s with `x` the longitude and `y` the latitude, both
/// in degrees. Everything that has a planar counterpart is a
/// [`geo_types::Geometry`]; the two cases that do not are kept alongside it.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Geometry {
    /// No geometry (a TopoJSON `null` type).
    #[default]
    Null,
    /// The outline of the whole globe.
    ///
    /// Projections turn this into the boundary of their valid domain, which
    /// is used both to size a map and to clip it.
    Sphere,
    /// A planar geometry in lon/lat degrees.
    Shape(geo_types::Geometry<f64>),
}

/// The whole‑globe geometry shared by every map.
pub const SPHERE: Geometry = Geometry::Sphere;

impl From<geo_types::Geometry<f64>> for Geometry {
    fn from(shape: geo_types::Geometry<f64>) -> Self {
        Self::Shape(shape)
    }
}

impl Geometry {
    /// Returns `true` for geometries that enclose an area.
    #[must_use]
    pub fn is_areal(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Sphere => true,
            Self::Shape(shape) => is_areal(shape),
        }
    }

    /// Visits every polygon contained in this geometry.
    ///
    /// The sphere is not a polygon in lon/lat space and is skipped.
    pub fn for_each_polygon(&self, f: &mut impl FnMut(&Polygon<f64>)) {
        if let Self::Shape(shape) = self {
            for_each_polygon(shape, f);
        }
    }

    /// Total number of positions stored in this geometry.
    #[must_use]
    pub fn position_count(&self) -> usize {
        match self {
            Self::Null | Self::Sphere => 0,
            Self::Shape(shape) => position_count(shape),
        }
    }
}

fn is_areal(shape: &geo_types::Geometry<f64>) -> bool {
    use geo_types::Geometry as G;
    match shape {
        G::Polygon(_) | G::MultiPolygon(_) | G::Rect(_) | G::Triangle(_) => true,
        G::GeometryCollection(items) => items.0.iter().any(is_areal),
        G::Point(_) | G::Line(_) | G::LineString(_) | G::MultiPoint(_) | G::MultiLineString(_) => {
            false
        }
    }
}

fn for_each_polygon(shape: &geo_types::Geometry<f64>, f: &mut impl FnMut(&Polygon<f64>)) {
    use geo_types::Geometry as G;
    match shape {
        G::Polygon(polygon) => f(polygon),
        G::MultiPolygon(polygons) => {
            for polygon in &polygons.0 {
                f(polygon);
            }
        }
        G::Rect(rect) => f(&rect.to_polygon()),
        G::Triangle(triangle) => f(&triangle.to_polygon()),
        G::GeometryCollection(items) => {
            for item in &items.0 {
                for_each_polygon(item, f);
            }
        }
        G::Point(_) | G::Line(_) | G::LineString(_) | G::MultiPoint(_) | G::MultiLineString(_) => {}
    }
}

fn polygon_positions(polygon: &Polygon<f64>) -> usize {
    polygon.exterior().0.len() + polygon.interiors().iter().map(|r| r.0.len()).sum::<usize>()
}

fn position_count(shape: &geo_types::Geometry<f64>) -> usize {
    use geo_types::Geometry as G;
    match shape {
        G::Point(_) => 1,
        G::Line(_) => 2,
        G::LineString(line) => line.0.len(),
        G::Polygon(polygon) => polygon_positions(polygon),
        G::MultiPoint(points) => points.0.len(),
        G::MultiLineString(lines) => lines.0.iter().map(|l| l.0.len()).sum(),
        G::MultiPolygon(polygons) => polygons.0.iter().map(polygon_positions).sum(),
        G::GeometryCollection(items) => items.0.iter().map(position_count).sum(),
        G::Rect(_) => 5,
        G::Triangle(_) => 4,
    }
}

/// Builds a position from longitude and latitude in degrees.
#[must_use]
pub const fn lon_lat(lon: f64, lat: f64) -> Coord<f64> {
    Coord { x: lon, y: lat }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use geo_types::{GeometryCollection, LineString, MultiPolygon, Point, Polygon};

    use super::{Geometry, SPHERE};

    fn square(x: f64, y: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(x, y), (x + 1.0, y), (x + 1.0, y + 1.0), (x, y)]),
            vec![],
        )
    }

    #[test]
    fn areal_kinds() {
        assert!(SPHERE.is_areal());
        assert!(Geometry::Shape(square(0.0, 0.0).into()).is_areal());
        assert!(!Geometry::Shape(Point::new(1.0, 2.0).into()).is_areal());
        assert!(!Geometry::Null.is_areal());
        let mixed = GeometryCollection::from(vec![
            geo_types::Geometry::from(Point::new(0.0, 0.0)),
            geo_types::Geometry::from(square(3.0, 3.0)),
        ]);
        assert!(Geometry::Shape(geo_types::Geometry::GeometryCollection(mixed)).is_areal());
    }

    #[test]
    fn polygons_are_visited_through_collections() {
        let geom = Geometry::Shape(geo_types::Geometry::GeometryCollection(GeometryCollection::from(vec![
            geo_types::Geometry::from(MultiPolygon::new(vec![
                square(0.0, 0.0),
                square(5.0, 5.0),
            ])),
            geo_types::Geometry::from(square(9.0, 9.0)),
            geo_types::Geometry::from(square(1.0, 1.0).exterior().clone()),
        ])));
        let mut seen = 0;
        geom.for_each_polygon(&mut |polygon| {
            assert!(polygon.interiors().is_empty(), "test polygons have no holes");
            seen += 1;
        });
        assert_eq!(seen, 3);
        assert_eq!(geom.position_count(), 16);
    }
}
