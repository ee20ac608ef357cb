// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=cartory_geo --heading-base-level=0

//! Cartory Geo: geographic features and TopoJSON decoding.
//!
//! This crate holds the data model shared by the other Cartory crates:
//! - [`Geometry`] values in degrees, built on [`geo_types`]: positions are
//!   [`Coord`]s with `x` the longitude and `y` the latitude.
//! - The [`SPHERE`] singleton, the outline of the whole globe.
//! - [`Feature`]s carrying [`CountryProperties`] (display name, stable
//!   subunit code, and any extra source properties).
//! - A [`Topology`] decoder that resolves shared, quantized arcs into
//!   per-feature polygons.
//!
//! Features are plain immutable values. Projection, path generation and
//! interaction live in `cartory_projection`, `cartory_zoom` and `cartory_map`.
//!
//! ## Decoding a topology
//!
//! ```rust
//! use cartory_geo::{Geometry, Topology, geo_types};
//!
//! let text = r#"{
//!     "type": "Topology",
//!     "arcs": [[[0, 0], [10, 0], [10, 10], [0, 0]]],
//!     "objects": {
//!         "countries": {
//!             "type": "GeometryCollection",
//!             "geometries": [{
//!                 "type": "Polygon",
//!                 "arcs": [[0]],
//!                 "properties": { "name": "Triangle", "subunit": "TRI" }
//!             }]
//!         }
//!     }
//! }"#;
//!
//! let topology = Topology::from_json(text).unwrap();
//! let countries = topology.features("countries").unwrap();
//! assert_eq!(countries[0].name(), "Triangle");
//! assert!(matches!(
//!     countries[0].geometry,
//!     Geometry::Shape(geo_types::Geometry::Polygon(_))
//! ));
//! ```
//!
//! This crate is `no_std` (with `alloc`).

#![no_std]

extern crate alloc;

mod error;
mod feature;
mod geometry;
pub mod topology;

pub use error::TopologyError;
pub use feature::{CountryProperties, Feature, FeatureId};
pub use geometry::{Geometry, SPHERE, lon_lat};

pub use geo_types;
pub use geo_types::Coord;
pub use topology::Topology;
