// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

/// The set of projections Cartory knows how to build.
///
/// Each projection belongs to one [`Registry`] and is addressed by a stable
/// name (for example `"geoNaturalEarth2"`). Name lookup goes through
/// [`ProjectionKind::from_name`], which reports unknown names as
/// [`ProjectionError::Unknown`] instead of falling back to a default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ProjectionKind {
    /// Plate carrée: longitude and latitude map linearly to x and y.
    Equirectangular,
    /// Conformal cylindrical projection, clipped at about ±85.05° latitude
    /// so that the projected sphere is square.
    Mercator,
    /// Equal‑area pseudocylindrical projection by Šavrič, Patterson and Jenny.
    EqualEarth,
    /// Compromise pseudocylindrical projection by Tom Patterson.
    NaturalEarth1,
    /// Second Natural Earth variant with flatter polar regions.
    #[default]
    NaturalEarth2,
    /// Equal‑area elliptical projection.
    Mollweide,
    /// Equal‑area sinusoidal (Sanson–Flamsteed) projection.
    Sinusoidal,
    /// Lambert cylindrical equal‑area projection with standard parallels at
    /// ±38.58°.
    CylindricalEqualArea,
}

/// A named group of projections.
///
/// Lookups consult [`Registry::Core`] first and then
/// [`Registry::Extension`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Registry {
    /// The commonly used world projections.
    Core,
    /// Additional projections.
    Extension,
}

impl Registry {
    /// Registries in lookup order.
    pub const LOOKUP_ORDER: [Self; 2] = [Self::Core, Self::Extension];

    /// Returns the projections in this registry.
    pub fn kinds(self) -> impl Iterator<Item = ProjectionKind> {
        ProjectionKind::ALL
            .into_iter()
            .filter(move |kind| kind.registry() == self)
    }

    /// Looks up a projection by name in this registry only.
    #[must_use]
    pub fn lookup(self, name: &str) -> Option<ProjectionKind> {
        self.kinds().find(|kind| kind.name() == name)
    }
}

impl ProjectionKind {
    /// Every supported projection.
    pub const ALL: [Self; 8] = [
        Self::Equirectangular,
        Self::Mercator,
        Self::EqualEarth,
        Self::NaturalEarth1,
        Self::NaturalEarth2,
        Self::Mollweide,
        Self::Sinusoidal,
        Self::CylindricalEqualArea,
    ];

    /// Resolves a projection by name, searching the core registry and then
    /// the extension registry.
    pub fn from_name(name: &str) -> Result<Self, ProjectionError> {
        Registry::LOOKUP_ORDER
            .into_iter()
            .find_map(|registry| registry.lookup(name))
            .ok_or_else(|| ProjectionError::Unknown { name: name.into() })
    }

    /// The registry name of this projection.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Equirectangular => "geoEquirectangular",
            Self::Mercator => "geoMercator",
            Self::EqualEarth => "geoEqualEarth",
            Self::NaturalEarth1 => "geoNaturalEarth1",
            Self::NaturalEarth2 => "geoNaturalEarth2",
            Self::Mollweide => "geoMollweide",
            Self::Sinusoidal => "geoSinusoidal",
            Self::CylindricalEqualArea => "geoCylindricalEqualArea",
        }
    }

    /// The registry this projection is listed in.
    #[must_use]
    pub const fn registry(self) -> Registry {
        match self {
            Self::Equirectangular | Self::Mercator | Self::EqualEarth | Self::NaturalEarth1 => {
                Registry::Core
            }
            Self::NaturalEarth2
            | Self::Mollweide
            | Self::Sinusoidal
            | Self::CylindricalEqualArea => Registry::Extension,
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectionKind {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Error returned when a projection cannot be resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectionError {
    /// No registry contains a projection with this name.
    Unknown {
        /// The name that was requested.
        name: String,
    },
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { name } => write!(f, "unknown projection {name:?}"),
        }
    }
}

impl core::error::Error for ProjectionError {}

#[cfg(test)]
mod tests {
    use super::{ProjectionError, ProjectionKind, Registry};

    #[test]
    fn every_kind_resolves_by_name() {
        for kind in ProjectionKind::ALL {
            assert_eq!(ProjectionKind::from_name(kind.name()), Ok(kind));
            assert_eq!(kind.name().parse::<ProjectionKind>(), Ok(kind));
        }
    }

    #[test]
    fn registries_partition_the_kinds() {
        let core = Registry::Core.kinds().count();
        let ext = Registry::Extension.kinds().count();
        assert_eq!(core + ext, ProjectionKind::ALL.len());
        assert_eq!(Registry::Core.lookup("geoNaturalEarth2"), None);
        assert_eq!(
            Registry::Extension.lookup("geoNaturalEarth2"),
            Some(ProjectionKind::NaturalEarth2)
        );
    }

    #[test]
    fn unknown_names_are_errors() {
        let err = ProjectionKind::from_name("geoBogus").unwrap_err();
        assert_eq!(
            err,
            ProjectionError::Unknown {
                name: "geoBogus".into()
            }
        );
        assert_eq!(alloc::format!("{err}"), "unknown projection \"geoBogus\"");
        // Lookups are exact; there is no case folding.
        assert!(ProjectionKind::from_name("geonaturalearth2").is_err());
    }

    #[test]
    fn default_is_natural_earth_2() {
        assert_eq!(ProjectionKind::default(), ProjectionKind::NaturalEarth2);
    }
}
