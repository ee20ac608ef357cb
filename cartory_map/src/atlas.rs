// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use cartory_geo::{Feature, Topology, TopologyError};
use hashbrown::HashMap;
use once_cell::race::OnceBox;
use tracing::debug;

/// Name of the topology object holding country geometries.
pub const COUNTRIES_OBJECT: &str = "countries";

/// An immutable, shared collection of country features.
///
/// Cloning an atlas is cheap: the features are behind an [`Arc`] and are
/// never copied or mutated after construction. Every map built from the same
/// atlas references the same features.
#[derive(Clone, Debug, Default)]
pub struct Atlas {
    features: Arc<[Feature]>,
    by_subunit: Arc<HashMap<String, usize>>,
}

impl Atlas {
    /// Builds an atlas from already decoded features.
    ///
    /// When several features share a subunit code, lookups by subunit resolve
    /// to the first of them.
    #[must_use]
    pub fn from_features(features: Vec<Feature>) -> Self {
        let mut by_subunit = HashMap::with_capacity(features.len());
        for (index, feature) in features.iter().enumerate() {
            if !feature.subunit().is_empty() {
                by_subunit.entry(feature.subunit().into()).or_insert(index);
            }
        }
        Self {
            features: features.into(),
            by_subunit: Arc::new(by_subunit),
        }
    }

    /// Extracts the features of the [`COUNTRIES_OBJECT`] object of a decoded
    /// topology.
    pub fn from_topology(topology: &Topology) -> Result<Self, TopologyError> {
        Self::from_topology_object(topology, COUNTRIES_OBJECT)
    }

    /// Extracts the features of the named object of a decoded topology.
    pub fn from_topology_object(topology: &Topology, object: &str) -> Result<Self, TopologyError> {
        let features = topology.features(object)?;
        debug!(object, count = features.len(), "atlas decoded");
        Ok(Self::from_features(features))
    }

    /// Decodes TopoJSON text and extracts its [`COUNTRIES_OBJECT`] features.
    pub fn from_json(text: &str) -> Result<Self, TopologyError> {
        Self::from_topology(&Topology::from_json(text)?)
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if the atlas holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// All features in source order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// The feature at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    /// Index of the feature with the given subunit code.
    #[must_use]
    pub fn index_of(&self, subunit: &str) -> Option<usize> {
        self.by_subunit.get(subunit).copied()
    }

    /// Returns `true` if both handles share the same features.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.features, &other.features)
    }
}

/// A write-once slot for a process-wide [`Atlas`].
///
/// The atlas is built on first access and shared by reference afterwards;
/// it is never replaced. Suitable for a `static`:
///
/// ```rust
/// use cartory_geo::Feature;
/// use cartory_map::{Atlas, AtlasCell};
///
/// static ATLAS: AtlasCell = AtlasCell::new();
///
/// let atlas = ATLAS.get_or_init(|| Atlas::from_features(vec![Feature::default()]));
/// assert_eq!(atlas.len(), 1);
/// // Later initialisers are ignored.
/// let again = ATLAS.get_or_init(Atlas::default);
/// assert!(again.ptr_eq(atlas));
/// ```
#[derive(Debug, Default)]
pub struct AtlasCell {
    cell: OnceBox<Atlas>,
}

impl AtlasCell {
    /// Creates an empty cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceBox::new(),
        }
    }

    /// The atlas, if it has been initialised.
    #[must_use]
    pub fn get(&self) -> Option<&Atlas> {
        self.cell.get()
    }

    /// Returns the atlas, building it with `init` on first access.
    pub fn get_or_init(&self, init: impl FnOnce() -> Atlas) -> &Atlas {
        self.cell.get_or_init(|| Box::new(init()))
    }

    /// Returns the atlas, building it with the fallible `init` on first
    /// access. On error the cell stays empty.
    pub fn get_or_try_init<E>(&self, init: impl FnOnce() -> Result<Atlas, E>) -> Result<&Atlas, E> {
        self.cell.get_or_try_init(|| init().map(Box::new))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use cartory_geo::{CountryProperties, Feature, Geometry};

    use super::{Atlas, AtlasCell};

    fn feature(name: &str, subunit: &str) -> Feature {
        Feature {
            id: None,
            properties: CountryProperties {
                name: name.into(),
                subunit: subunit.into(),
                ..CountryProperties::default()
            },
            geometry: Geometry::Null,
        }
    }

    #[test]
    fn subunit_lookup_prefers_first() {
        let atlas = Atlas::from_features(vec![
            feature("France", "FRA"),
            feature("Spain", "ESP"),
            feature("Corsica", "FRA"),
            feature("Nowhere", ""),
        ]);
        assert_eq!(atlas.len(), 4);
        assert_eq!(atlas.index_of("ESP"), Some(1));
        assert_eq!(atlas.index_of("FRA"), Some(0));
        assert_eq!(atlas.index_of(""), None);
        assert_eq!(atlas.get(1).map(Feature::name), Some("Spain"));
    }

    #[test]
    fn clones_share_features() {
        let atlas = Atlas::from_features(vec![feature("A", "A")]);
        let copy = atlas.clone();
        assert!(copy.ptr_eq(&atlas));
        assert!(!Atlas::default().ptr_eq(&atlas));
    }

    #[test]
    fn failed_init_leaves_cell_empty() {
        let cell = AtlasCell::new();
        assert!(cell.get_or_try_init(|| Err::<Atlas, _>("boom")).is_err());
        assert!(cell.get().is_none());
        let atlas = cell
            .get_or_try_init(|| Ok::<_, ()>(Atlas::from_features(vec![feature("A", "A")])))
            .unwrap();
        assert_eq!(atlas.len(), 1);
    }
}
