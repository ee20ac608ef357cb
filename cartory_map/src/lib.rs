// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=cartory_map --heading-base-level=0

//! Cartory Map: a headless, interactive world map.
//!
//! [`WorldMap`] turns an [`Atlas`] of country features into a projected,
//! pannable and zoomable map:
//! - The projection is chosen by name through a [`ProjectionConfig`]. Unknown
//!   names are reported as [`MapError::Projection`] instead of drawing
//!   nothing.
//! - The host reports its container width; the map fits the sphere to it and
//!   derives its height from the projected sphere.
//! - Clicking a country animates a zoom that frames it, following the
//!   [`ZoomPolicy`].
//! - Pointer gestures pan and zoom through a [`ZoomController`]. Gestures,
//!   clicks and animation frames all reach the displayed transform through
//!   one event queue.
//! - [`WorldMap::scene`] describes what to draw, and [`WorldMap::to_svg`]
//!   renders that description as an SVG document.
//!
//! The decoded atlas is immutable and cheap to share; an [`AtlasCell`] holds
//! one process-wide.
//!
//! ## Example
//!
//! ```rust
//! use cartory_map::{Atlas, ProjectionConfig, WorldMap};
//!
//! let atlas = Atlas::from_json(r#"{
//!     "type": "Topology",
//!     "arcs": [[[-10, 40], [20, 40], [20, 60], [-10, 60], [-10, 40]]],
//!     "objects": { "countries": { "type": "GeometryCollection", "geometries": [
//!         { "type": "Polygon", "arcs": [[0]],
//!           "properties": { "name": "Europa", "subunit": "EUR" } }
//!     ] } }
//! }"#).unwrap();
//!
//! let mut map = WorldMap::new(atlas, ProjectionConfig::default()).unwrap();
//! map.set_container_width(960.0);
//! map.mount();
//!
//! let target = map.click_country(0, 0).unwrap().unwrap();
//! let mut now = 0;
//! while map.tick(now) {
//!     now += 16;
//! }
//! assert_eq!(map.transform(), target);
//! assert!(map.to_svg().contains("<title>Europa</title>"));
//! ```
//!
//! [`ZoomController`]: cartory_zoom::ZoomController
//!
//! This crate is `no_std` (with `alloc`); enable the `libm` feature when
//! building without `std`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod atlas;
mod config;
mod country;
mod error;
mod map;
mod scene;

pub use atlas::{Atlas, AtlasCell, COUNTRIES_OBJECT};
pub use config::{ProjectionConfig, ZoomPolicy};
pub use country::CountryView;
pub use error::MapError;
pub use map::WorldMap;
pub use scene::{
    COUNTRY_FILL, COUNTRY_STROKE, CountryShape, MapScene, SPHERE_CLIP_ID, SPHERE_FILL,
};

pub use cartory_zoom::{DeltaMode, Gesture, ZoomTransform};
