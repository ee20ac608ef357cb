// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::ZoomTransform;

/// Identifies a surface the controller is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Phase of a zoom interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomEventKind {
    /// A gesture or transition began. Carries the transform it starts from.
    Start,
    /// The transform changed.
    Zoom,
    /// A gesture or transition ended, completed or interrupted.
    End,
}

/// What produced a zoom event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomSource {
    /// A pointer gesture.
    Gesture,
    /// An animated transition.
    Transition,
    /// An immediate [`set_transform`](crate::ZoomController::set_transform).
    Programmatic,
}

/// A transform report queued by the controller.
///
/// Events are delivered in dispatch order; `sequence` increases by one for
/// every event the controller emits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomEvent {
    /// Dispatch order across all surfaces.
    pub sequence: u64,
    /// Surface whose transform this is.
    pub surface: SurfaceId,
    /// Interaction phase.
    pub kind: ZoomEventKind,
    /// The surface's transform at the time of the event.
    pub transform: ZoomTransform,
    /// Origin of the event.
    pub source: ZoomSource,
}

impl ZoomEvent {
    /// Returns `true` for events that carry a new transform.
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.kind == ZoomEventKind::Zoom
    }
}
