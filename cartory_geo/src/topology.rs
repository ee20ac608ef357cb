// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! TopoJSON decoding.
//!
//! A topology stores shared boundaries once, as *arcs*, and describes each
//! geometry as a list of arc references. Arcs may be quantized and
//! delta-encoded; [`Topology::from_json`] resolves both up front so that
//! geometry extraction is a matter of stitching arcs together.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use geo_types::{
    Coord, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::TopologyError;
use crate::{CountryProperties, Feature, FeatureId, Geometry, lon_lat};

/// Quantization transform of a topology.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct QuantizeTransform {
    /// Per-axis scale applied to quantized integer positions.
    pub scale: [f64; 2],
    /// Per-axis offset added after scaling.
    pub translate: [f64; 2],
}

impl QuantizeTransform {
    fn apply(&self, x: f64, y: f64) -> Coord<f64> {
        lon_lat(
            x * self.scale[0] + self.translate[0],
            y * self.scale[1] + self.translate[1],
        )
    }
}

/// A geometry object as stored in a topology, before arcs are resolved.
#[derive(Clone, Debug, Deserialize)]
pub struct GeometryObject {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    arcs: Option<Value>,
    #[serde(default)]
    coordinates: Option<Value>,
    #[serde(default)]
    geometries: Vec<GeometryObject>,
}

impl GeometryObject {
    /// The TopoJSON `type` of this object, or `None` for null geometries.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Child geometries of a `GeometryCollection`.
    #[must_use]
    pub fn geometries(&self) -> &[Self] {
        &self.geometries
    }
}

#[derive(Deserialize)]
struct RawTopology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<QuantizeTransform>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: BTreeMap<String, GeometryObject>,
}

/// A decoded topology with absolute (dequantized) arcs.
#[derive(Clone, Debug)]
pub struct Topology {
    transform: Option<QuantizeTransform>,
    arcs: Vec<Vec<Coord<f64>>>,
    objects: BTreeMap<String, GeometryObject>,
}

impl Topology {
    /// Parses TopoJSON text.
    ///
    /// Delta-encoded, quantized arcs are decoded eagerly.
    pub fn from_json(text: &str) -> Result<Self, TopologyError> {
        let raw: RawTopology = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    /// Parses TopoJSON from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, TopologyError> {
        let raw: RawTopology = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawTopology) -> Result<Self, TopologyError> {
        if raw.kind != "Topology" {
            return Err(TopologyError::NotATopology);
        }
        let transform = raw.transform;
        let arcs = raw
            .arcs
            .into_iter()
            .map(|arc| decode_arc(&arc, transform.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            transform,
            arcs,
            objects: raw.objects,
        })
    }

    /// Number of arcs.
    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Names of the objects in this topology.
    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Returns a named geometry object.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&GeometryObject> {
        self.objects.get(name)
    }

    /// Converts a named object into features.
    ///
    /// A `GeometryCollection` yields one feature per member; any other object
    /// yields a single feature.
    pub fn features(&self, name: &str) -> Result<Vec<Feature>, TopologyError> {
        let object = self
            .object(name)
            .ok_or_else(|| TopologyError::MissingObject(name.into()))?;
        if object.kind() == Some("GeometryCollection") {
            object
                .geometries
                .iter()
                .map(|g| self.feature(g))
                .collect()
        } else {
            Ok(alloc::vec![self.feature(object)?])
        }
    }

    /// Converts one geometry object into a feature.
    pub fn feature(&self, object: &GeometryObject) -> Result<Feature, TopologyError> {
        let id = object.id.as_ref().and_then(FeatureId::from_json);
        let properties =
            CountryProperties::from_json(object.properties.clone().unwrap_or_default(), id.as_ref());
        let geometry = self.geometry(object)?;
        Ok(Feature {
            id,
            properties,
            geometry,
        })
    }

    /// Resolves the arcs of a geometry object into absolute coordinates.
    pub fn geometry(&self, object: &GeometryObject) -> Result<Geometry, TopologyError> {
        Ok(self.shape(object)?.map_or(Geometry::Null, Geometry::Shape))
    }

    /// Resolves a geometry object into a planar shape; `None` for null
    /// geometries, which are also dropped from collections.
    fn shape(
        &self,
        object: &GeometryObject,
    ) -> Result<Option<geo_types::Geometry<f64>>, TopologyError> {
        let Some(kind) = object.kind() else {
            return Ok(None);
        };
        let shape = match kind {
            "Point" => Point::from(self.position(required(&object.coordinates)?)?).into(),
            "MultiPoint" => MultiPoint::new(
                array(required(&object.coordinates)?)?
                    .iter()
                    .map(|p| self.position(p).map(Point::from))
                    .collect::<Result<_, _>>()?,
            )
            .into(),
            "LineString" => LineString::new(self.line(required(&object.arcs)?)?).into(),
            "MultiLineString" => MultiLineString::new(
                array(required(&object.arcs)?)?
                    .iter()
                    .map(|arcs| self.line(arcs).map(LineString::new))
                    .collect::<Result<_, _>>()?,
            )
            .into(),
            "Polygon" => self.polygon(required(&object.arcs)?)?.into(),
            "MultiPolygon" => MultiPolygon::new(
                array(required(&object.arcs)?)?
                    .iter()
                    .map(|rings| self.polygon(rings))
                    .collect::<Result<_, _>>()?,
            )
            .into(),
            "GeometryCollection" => {
                let mut members = Vec::with_capacity(object.geometries.len());
                for member in &object.geometries {
                    if let Some(shape) = self.shape(member)? {
                        members.push(shape);
                    }
                }
                geo_types::Geometry::GeometryCollection(GeometryCollection::from(members))
            }
            other => return Err(TopologyError::UnknownGeometryType(other.into())),
        };
        Ok(Some(shape))
    }

    fn position(&self, value: &Value) -> Result<Coord<f64>, TopologyError> {
        let [x, y] = pair(value)?;
        Ok(match &self.transform {
            Some(t) => t.apply(x, y),
            None => lon_lat(x, y),
        })
    }

    /// Stitches arcs into a single sequence; the shared endpoint of
    /// consecutive arcs is kept once.
    fn line(&self, value: &Value) -> Result<Vec<Coord<f64>>, TopologyError> {
        let mut points = Vec::new();
        for reference in array(value)? {
            let index = reference
                .as_i64()
                .ok_or(TopologyError::Malformed("arc reference is not an integer"))?;
            self.append_arc(index, &mut points)?;
        }
        if points.len() < 2
            && let Some(&first) = points.first()
        {
            points.push(first);
        }
        Ok(points)
    }

    /// The first ring is the exterior and any further rings are holes.
    /// `Polygon::new` closes every ring.
    fn polygon(&self, value: &Value) -> Result<Polygon<f64>, TopologyError> {
        let mut rings = array(value)?
            .iter()
            .map(|ring| self.line(ring).map(LineString::new));
        let exterior = rings.next().transpose()?.unwrap_or_else(|| LineString::new(Vec::new()));
        let interiors = rings.collect::<Result<Vec<_>, _>>()?;
        Ok(Polygon::new(exterior, interiors))
    }

    fn append_arc(&self, index: i64, points: &mut Vec<Coord<f64>>) -> Result<(), TopologyError> {
        let reversed = index < 0;
        let resolved = if reversed { !index } else { index };
        let arc = usize::try_from(resolved)
            .ok()
            .and_then(|i| self.arcs.get(i))
            .ok_or(TopologyError::ArcOutOfRange {
                index,
                len: self.arcs.len(),
            })?;
        points.pop();
        if reversed {
            points.extend(arc.iter().rev().copied());
        } else {
            points.extend(arc.iter().copied());
        }
        Ok(())
    }
}

fn decode_arc(
    arc: &[Vec<f64>],
    transform: Option<&QuantizeTransform>,
) -> Result<Vec<Coord<f64>>, TopologyError> {
    let mut out = Vec::with_capacity(arc.len());
    let (mut x, mut y) = (0.0, 0.0);
    for position in arc {
        let (&px, &py) = match position.as_slice() {
            [px, py, ..] => (px, py),
            _ => return Err(TopologyError::Malformed("arc position needs two numbers")),
        };
        match transform {
            Some(t) => {
                x += px;
                y += py;
                out.push(t.apply(x, y));
            }
            None => out.push(lon_lat(px, py)),
        }
    }
    Ok(out)
}

fn required(value: &Option<Value>) -> Result<&Value, TopologyError> {
    value
        .as_ref()
        .ok_or(TopologyError::Malformed("missing arcs or coordinates"))
}

fn array(value: &Value) -> Result<&[Value], TopologyError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or(TopologyError::Malformed("expected an array"))
}

fn pair(value: &Value) -> Result<[f64; 2], TopologyError> {
    match array(value)? {
        [x, y, ..] => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => Ok([x, y]),
            _ => Err(TopologyError::Malformed("position is not numeric")),
        },
        _ => Err(TopologyError::Malformed("position needs two numbers")),
    }
}

#[cfg(test)]
mod tests {
    use geo_types::{Coord, Point, Polygon};

    use super::Topology;
    use crate::{Geometry, TopologyError, lon_lat};

    fn polygon(geometry: &Geometry) -> &Polygon<f64> {
        match geometry {
            Geometry::Shape(geo_types::Geometry::Polygon(polygon)) => polygon,
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    const SHARED_EDGE: &str = r#"{
        "type": "Topology",
        "arcs": [
            [[0, 0], [0, 10]],
            [[0, 10], [10, 10], [10, 0], [0, 0]],
            [[0, 0], [-10, 0], [-10, 10], [0, 10]]
        ],
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "id": "E", "properties": { "name": "East" }, "arcs": [[0, 1]] },
                    { "type": "Polygon", "id": "W", "properties": { "name": "West" }, "arcs": [[2, -1]] }
                ]
            }
        }
    }"#;

    #[test]
    fn shared_arcs_stitch_into_closed_rings() {
        let topo = Topology::from_json(SHARED_EDGE).unwrap();
        let features = topo.features("countries").unwrap();
        assert_eq!(features.len(), 2);

        let east: &[Coord<f64>] = &polygon(&features[0].geometry).exterior().0;
        assert_eq!(
            east,
            [
                lon_lat(0.0, 0.0),
                lon_lat(0.0, 10.0),
                lon_lat(10.0, 10.0),
                lon_lat(10.0, 0.0),
                lon_lat(0.0, 0.0),
            ]
        );

        // The west polygon walks arc 0 backwards.
        let west = &polygon(&features[1].geometry).exterior().0;
        assert_eq!(west.first(), west.last());
        assert_eq!(west.len(), 5);
        assert_eq!(west[3], lon_lat(0.0, 10.0));
        assert_eq!(features[1].subunit(), "W");
    }

    #[test]
    fn quantized_arcs_are_delta_decoded() {
        let text = r#"{
            "type": "Topology",
            "transform": { "scale": [0.5, 0.25], "translate": [-180, -90] },
            "arcs": [[[0, 0], [2, 0], [0, 4], [-2, -4]]],
            "objects": { "a": { "type": "Polygon", "arcs": [[0]] } }
        }"#;
        let topo = Topology::from_json(text).unwrap();
        let features = topo.features("a").unwrap();
        let ring = &polygon(&features[0].geometry).exterior().0;
        assert_eq!(ring[1], lon_lat(-179.0, -90.0));
        assert_eq!(ring[2], lon_lat(-179.0, -89.0));
        assert_eq!(ring[3], lon_lat(-180.0, -90.0));
    }

    #[test]
    fn errors_are_reported() {
        assert!(matches!(
            Topology::from_json(r#"{ "type": "FeatureCollection" }"#),
            Err(TopologyError::NotATopology)
        ));
        assert!(matches!(
            Topology::from_json("not json"),
            Err(TopologyError::Json(_))
        ));

        let topo = Topology::from_json(SHARED_EDGE).unwrap();
        assert!(matches!(
            topo.features("land"),
            Err(TopologyError::MissingObject(name)) if name == "land"
        ));

        let bad = r#"{
            "type": "Topology",
            "arcs": [[[0, 0], [1, 1]]],
            "objects": { "x": { "type": "LineString", "arcs": [3] } }
        }"#;
        let topo = Topology::from_json(bad).unwrap();
        assert!(matches!(
            topo.features("x"),
            Err(TopologyError::ArcOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn null_and_point_geometries() {
        let text = r#"{
            "type": "Topology",
            "transform": { "scale": [1, 1], "translate": [10, 20] },
            "arcs": [],
            "objects": {
                "things": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": null, "properties": { "name": "Nowhere" } },
                        { "type": "Point", "coordinates": [1, 2] }
                    ]
                }
            }
        }"#;
        let topo = Topology::from_json(text).unwrap();
        let features = topo.features("things").unwrap();
        assert_eq!(features[0].geometry, Geometry::Null);
        assert_eq!(features[0].name(), "Nowhere");
        assert_eq!(
            features[1].geometry,
            Geometry::Shape(Point::new(11.0, 22.0).into())
        );
    }
}
