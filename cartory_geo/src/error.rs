// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;

/// Error returned when decoding a topology fails.
#[derive(Debug)]
pub enum TopologyError {
    /// The input is not valid JSON or does not have the TopoJSON shape.
    Json(serde_json::Error),
    /// The top-level `type` member is not `"Topology"`.
    NotATopology,
    /// The requested object does not exist in `objects`.
    MissingObject(String),
    /// A geometry references an arc that does not exist.
    ArcOutOfRange {
        /// The arc reference as written in the source (negative for reversed arcs).
        index: i64,
        /// Number of arcs in the topology.
        len: usize,
    },
    /// A geometry has a `type` this decoder does not know.
    UnknownGeometryType(String),
    /// A geometry's `arcs` or `coordinates` member has the wrong nesting.
    Malformed(&'static str),
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid topology JSON: {err}"),
            Self::NotATopology => f.write_str("top-level object is not a Topology"),
            Self::MissingObject(name) => write!(f, "topology has no object named {name:?}"),
            Self::ArcOutOfRange { index, len } => {
                write!(f, "arc reference {index} is out of range for {len} arcs")
            }
            Self::UnknownGeometryType(kind) => write!(f, "unknown geometry type {kind:?}"),
            Self::Malformed(what) => write!(f, "malformed geometry: {what}"),
        }
    }
}

impl core::error::Error for TopologyError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            #[cfg(feature = "std")]
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TopologyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
