// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=cartory_zoom --heading-base-level=0

//! Cartory Zoom: pan/zoom state, gestures and animated transitions.
//!
//! This crate is the headless zoom behaviour behind a Cartory map:
//! - [`ZoomTransform`] is a uniform translate + scale, replaced on every
//!   change and never mutated in place.
//! - [`ScaleExtent`] is the closed range every produced scale is clamped to.
//! - [`ZoomController`] owns one transform per attached surface, interprets
//!   [`Gesture`]s (wheel, drag, double click) and runs animated transitions
//!   along a smooth zoom path.
//!
//! The controller does not call back into its owner. Every change is queued
//! as a [`ZoomEvent`] carrying a sequence number, and the owner drains the
//! queue and applies what it finds. Time is supplied by the caller as
//! milliseconds, which keeps the controller deterministic and easy to test.
//!
//! ## Example
//!
//! ```rust
//! use cartory_zoom::{ScaleExtent, SurfaceId, ZoomController, ZoomTransform};
//! use kurbo::Rect;
//!
//! let surface = SurfaceId(1);
//! let mut zoom = ZoomController::new(ScaleExtent::new(1.0, 18.0));
//! assert!(zoom.attach(surface, Rect::new(0.0, 0.0, 960.0, 500.0)));
//! // Attaching again registers nothing.
//! assert!(!zoom.attach(surface, Rect::new(0.0, 0.0, 960.0, 500.0)));
//!
//! let target = ZoomTransform::new(-400.0, -200.0, 4.0);
//! zoom.transition_to(surface, target, 750, 0);
//!
//! // Drive the transition from an animation-frame loop.
//! let mut now = 0;
//! while zoom.tick(now) {
//!     now += 16;
//! }
//!
//! let last = zoom.drain_events().last().unwrap();
//! assert_eq!(last.transform, target);
//! ```
//!
//! This crate is `no_std` (with `alloc`); enable the `libm` feature when
//! building without `std`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod controller;
mod event;
#[cfg(not(feature = "std"))]
mod float;
mod gesture;
mod interpolate;
mod transform;

pub use controller::{DOUBLE_CLICK_DURATION_MS, ZoomController};
pub use event::{SurfaceId, ZoomEvent, ZoomEventKind, ZoomSource};
pub use gesture::{DeltaMode, Gesture};
pub use interpolate::{Easing, TransformInterpolator, ViewInterpolator};
pub use transform::{ScaleExtent, ZoomTransform};
