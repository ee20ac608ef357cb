// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use cartory_geo::TopologyError;
use cartory_projection::ProjectionError;

/// Errors reported by a [`WorldMap`](crate::WorldMap).
#[derive(Debug)]
pub enum MapError {
    /// The configured projection does not exist.
    Projection(ProjectionError),
    /// The topology could not be decoded.
    Topology(TopologyError),
    /// No country has this index.
    UnknownCountry(usize),
    /// The map is not mounted, so it has no zoom surface.
    NotMounted,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Projection(err) => write!(f, "projection: {err}"),
            Self::Topology(err) => write!(f, "topology: {err}"),
            Self::UnknownCountry(index) => write!(f, "no country at index {index}"),
            Self::NotMounted => f.write_str("map is not mounted"),
        }
    }
}

impl core::error::Error for MapError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Projection(err) => Some(err),
            Self::Topology(err) => Some(err),
            Self::UnknownCountry(_) | Self::NotMounted => None,
        }
    }
}

impl From<ProjectionError> for MapError {
    fn from(err: ProjectionError) -> Self {
        Self::Projection(err)
    }
}

impl From<TopologyError> for MapError {
    fn from(err: TopologyError) -> Self {
        Self::Topology(err)
    }
}
