// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=cartory_projection --heading-base-level=0

//! Cartory Projection: cartographic projections and path generation.
//!
//! This crate turns geographic [`Geometry`](cartory_geo::Geometry) into
//! screen‑space Kurbo paths:
//! - [`ProjectionKind`] is a closed set of world projections, grouped into a
//!   core and an extension [`Registry`] and resolved by name with an explicit
//!   [`ProjectionError`] for unknown names.
//! - [`Projection`] adds scale and translation, and can be fitted to a width,
//!   height or extent using any geometry (usually the sphere) as reference.
//! - [`PathGenerator`] produces [`kurbo::BezPath`]s, screen bounds and SVG
//!   path data, cutting polygons along the antimeridian.
//!
//! ## Fitting a map to a width
//!
//! ```rust
//! use cartory_geo::SPHERE;
//! use cartory_projection::{PathGenerator, Projection};
//!
//! let projection = Projection::from_name("geoNaturalEarth2")
//!     .unwrap()
//!     .fit_width(960.0, &SPHERE);
//! let paths = PathGenerator::new(projection);
//!
//! // The projected sphere spans the full width; its bottom edge gives the
//! // height the map needs.
//! let bounds = paths.bounds(&SPHERE).unwrap();
//! assert!((bounds.width() - 960.0).abs() < 1e-6);
//! let height = bounds.y1;
//! assert!(height > 0.0);
//! ```
//!
//! ## Unknown projections
//!
//! ```rust
//! use cartory_projection::{ProjectionError, ProjectionKind};
//!
//! let err = ProjectionKind::from_name("geoFancy").unwrap_err();
//! assert!(matches!(err, ProjectionError::Unknown { .. }));
//! ```
//!
//! This crate is `no_std` (with `alloc`); enable the `libm` feature when
//! building without `std`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod cut;
#[cfg(not(feature = "std"))]
mod float;
mod kind;
mod path;
mod projection;
mod raw;

pub use kind::{ProjectionError, ProjectionKind, Registry};
pub use path::{PathGenerator, svg_path_data};
pub use projection::Projection;
