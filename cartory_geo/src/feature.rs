// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::{String, ToString};
use core::fmt;

use serde_json::{Map, Value};

use crate::Geometry;

/// Identifier of a feature as carried by the source data.
///
/// TopoJSON allows both numeric and string ids; numbers are kept in their
/// decimal string form so ids compare uniformly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(String);

impl FeatureId {
    /// Creates an id from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Properties of a country feature.
///
/// `name` is the display string and `subunit` a stable identifier. All other
/// source properties are kept verbatim in `extra`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CountryProperties {
    /// Display name.
    pub name: String,
    /// Stable identifier, unique within an atlas.
    pub subunit: String,
    /// Remaining properties from the source data.
    pub extra: Map<String, Value>,
}

impl CountryProperties {
    /// Builds properties from a decoded JSON object.
    ///
    /// Missing `subunit` falls back to the feature id, then to the name.
    #[must_use]
    pub fn from_json(mut props: Map<String, Value>, id: Option<&FeatureId>) -> Self {
        let name = take_string(&mut props, "name").unwrap_or_default();
        let subunit = take_string(&mut props, "subunit")
            .or_else(|| id.map(|id| id.as_str().into()))
            .unwrap_or_else(|| name.clone());
        Self {
            name,
            subunit,
            extra: props,
        }
    }

    /// Returns an extra property by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

fn take_string(props: &mut Map<String, Value>, key: &str) -> Option<String> {
    match props.remove(key)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// An immutable geographic feature: id, properties and geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Feature {
    /// Source id, if any.
    pub id: Option<FeatureId>,
    /// Country properties.
    pub properties: CountryProperties,
    /// Geometry in geographic coordinates.
    pub geometry: Geometry,
}

impl Feature {
    /// Display name of the feature.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.properties.name
    }

    /// Stable subunit identifier of the feature.
    #[must_use]
    pub fn subunit(&self) -> &str {
        &self.properties.subunit
    }
}
