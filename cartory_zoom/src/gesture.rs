// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gestures understood by the zoom controller.

use core::f64::consts::LN_2;

use kurbo::{Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::float::FloatFuncs as _;

/// Unit of a wheel delta, mirroring the DOM `deltaMode` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeltaMode {
    /// Delta in pixels.
    #[default]
    Pixel,
    /// Delta in lines.
    Line,
    /// Delta in pages.
    Page,
}

impl DeltaMode {
    /// Multiplier turning a delta in this unit into a zoom exponent.
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            Self::Pixel => 0.002,
            Self::Line => 0.05,
            Self::Page => 1.0,
        }
    }
}

/// A pointer gesture in view coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// Wheel or trackpad scroll. Positive `delta_y` zooms out.
    Wheel {
        /// Pointer position; the zoom keeps it fixed.
        point: Point,
        /// Vertical scroll delta.
        delta_y: f64,
        /// Unit of `delta_y`.
        mode: DeltaMode,
    },
    /// Primary button pressed; starts a pan.
    PointerDown {
        /// Pointer position.
        point: Point,
    },
    /// Pointer moved; pans while a button is held.
    PointerMove {
        /// Pointer position.
        point: Point,
    },
    /// Primary button released; ends a pan.
    PointerUp {
        /// Pointer position.
        point: Point,
    },
    /// Double click; zooms in by two about `point`, or out with `shift`.
    DoubleClick {
        /// Pointer position.
        point: Point,
        /// Zoom out instead of in.
        shift: bool,
    },
}

impl Gesture {
    /// Returns `true` if the pointer position and any wheel delta are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match *self {
            Self::Wheel { point, delta_y, .. } => point.is_finite() && delta_y.is_finite(),
            Self::PointerDown { point }
            | Self::PointerMove { point }
            | Self::PointerUp { point }
            | Self::DoubleClick { point, .. } => point.is_finite(),
        }
    }

    /// Scale multiplier a wheel delta asks for: `2^(-delta_y · factor)`.
    #[must_use]
    pub fn wheel_scale(delta_y: f64, mode: DeltaMode) -> f64 {
        (-delta_y * mode.factor() * LN_2).exp()
    }
}

/// Tracks the pointer during a pan.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PanState {
    last: Option<Point>,
}

impl PanState {
    pub(crate) fn start(&mut self, point: Point) {
        self.last = Some(point);
    }

    /// Returns the movement since the previous position, or `None` when no
    /// pan is active.
    pub(crate) fn update(&mut self, point: Point) -> Option<Vec2> {
        let last = self.last.replace(point)?;
        Some(point - last)
    }

    /// Ends the pan, returning whether one was active.
    pub(crate) fn end(&mut self) -> bool {
        self.last.take().is_some()
    }

    pub(crate) fn is_panning(&self) -> bool {
        self.last.is_some()
    }
}
