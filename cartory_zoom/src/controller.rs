// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};
use tracing::{debug, trace};

use crate::gesture::PanState;
use crate::interpolate::{Easing, TransformInterpolator};
use crate::{Gesture, ScaleExtent, SurfaceId, ZoomEvent, ZoomEventKind, ZoomSource, ZoomTransform};

/// Duration of the animated double-click zoom, in milliseconds.
pub const DOUBLE_CLICK_DURATION_MS: u64 = 250;

#[derive(Clone, Copy, Debug)]
struct Transition {
    interpolator: TransformInterpolator,
    target: ZoomTransform,
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
}

impl Transition {
    fn at(&self, now: u64) -> (ZoomTransform, bool) {
        let elapsed = now.saturating_sub(self.start_ms);
        if elapsed >= self.duration_ms {
            return (self.target, true);
        }
        let t = elapsed as f64 / self.duration_ms as f64;
        let frame = self.interpolator.at(self.easing.apply(t));
        if frame.is_valid() {
            (frame, false)
        } else {
            (self.target, true)
        }
    }
}

#[derive(Clone, Debug)]
struct Surface {
    id: SurfaceId,
    viewport: Rect,
    transform: ZoomTransform,
    transition: Option<Transition>,
    pan: PanState,
}

/// Pan/zoom state for a set of surfaces.
///
/// The controller owns the transform of every attached surface and reports
/// each change as a [`ZoomEvent`] on an internal FIFO queue. Owners drain the
/// queue with [`pop_event`](Self::pop_event) or
/// [`drain_events`](Self::drain_events) and apply the transforms they find;
/// the controller never calls back into its owner.
///
/// The scale factor of every transform the controller produces lies within
/// its [`ScaleExtent`]. Transitions are advanced by [`tick`](Self::tick) with a
/// caller-supplied millisecond clock. A new transition on a surface replaces
/// the one in flight, and any gesture interrupts it.
#[derive(Clone, Debug, Default)]
pub struct ZoomController {
    extent: ScaleExtent,
    surfaces: Vec<Surface>,
    events: VecDeque<ZoomEvent>,
    next_sequence: u64,
}

impl ZoomController {
    /// Creates a controller that clamps scale into `extent`.
    #[must_use]
    pub fn new(extent: ScaleExtent) -> Self {
        Self {
            extent,
            ..Self::default()
        }
    }

    /// The allowed scale range.
    #[must_use]
    pub fn extent(&self) -> ScaleExtent {
        self.extent
    }

    /// Attaches a surface with the given viewport, starting at the identity
    /// transform.
    ///
    /// Returns `false` and changes nothing if `id` is already attached.
    pub fn attach(&mut self, id: SurfaceId, viewport: Rect) -> bool {
        if self.is_attached(id) {
            trace!(%id, "surface already attached");
            return false;
        }
        debug!(%id, width = viewport.width(), height = viewport.height(), "attach surface");
        self.surfaces.push(Surface {
            id,
            viewport,
            transform: ZoomTransform::IDENTITY,
            transition: None,
            pan: PanState::default(),
        });
        true
    }

    /// Detaches a surface, dropping its transition and any of its events still
    /// in the queue.
    pub fn detach(&mut self, id: SurfaceId) -> bool {
        let Some(index) = self.index(id) else {
            return false;
        };
        self.surfaces.remove(index);
        self.events.retain(|e| e.surface != id);
        debug!(%id, "detach surface");
        true
    }

    /// Returns `true` if `id` is attached.
    #[must_use]
    pub fn is_attached(&self, id: SurfaceId) -> bool {
        self.index(id).is_some()
    }

    /// Updates the viewport of an attached surface. The transform is kept.
    pub fn set_viewport(&mut self, id: SurfaceId, viewport: Rect) -> bool {
        match self.surface_mut(id) {
            Some(surface) => {
                surface.viewport = viewport;
                true
            }
            None => false,
        }
    }

    /// The viewport of an attached surface.
    #[must_use]
    pub fn viewport(&self, id: SurfaceId) -> Option<Rect> {
        self.surface(id).map(|s| s.viewport)
    }

    /// The current transform of an attached surface.
    #[must_use]
    pub fn transform(&self, id: SurfaceId) -> Option<ZoomTransform> {
        self.surface(id).map(|s| s.transform)
    }

    /// Returns `true` while a transition is running on `id`.
    #[must_use]
    pub fn is_transitioning(&self, id: SurfaceId) -> bool {
        self.surface(id).is_some_and(|s| s.transition.is_some())
    }

    /// Returns `true` while a pointer pan is in progress on `id`.
    #[must_use]
    pub fn is_panning(&self, id: SurfaceId) -> bool {
        self.surface(id).is_some_and(|s| s.pan.is_panning())
    }

    /// Returns `true` while any surface has a transition running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.surfaces.iter().any(|s| s.transition.is_some())
    }

    /// Replaces the transform of `id` immediately, interrupting any
    /// transition.
    ///
    /// A scale outside the extent is clamped about the viewport centre.
    /// Emits `Start`, `Zoom` and `End`. Returns `false` and changes nothing
    /// if `id` is not attached or `transform` is not finite.
    pub fn set_transform(&mut self, id: SurfaceId, transform: ZoomTransform) -> bool {
        let Some(index) = self.index(id) else {
            return false;
        };
        if !transform.is_valid() {
            return false;
        }
        self.interrupt(index);
        let target = self.constrain(index, transform);
        self.emit(index, ZoomEventKind::Start, ZoomSource::Programmatic);
        self.surfaces[index].transform = target;
        self.emit(index, ZoomEventKind::Zoom, ZoomSource::Programmatic);
        self.emit(index, ZoomEventKind::End, ZoomSource::Programmatic);
        true
    }

    /// Starts an animated transition of `id` towards `target`.
    ///
    /// The transition starts from the current transform at `now` and runs for
    /// `duration_ms` along a smooth zoom path with cubic easing; a zero
    /// duration applies the target at once. A transition already running on
    /// the surface is ended first, so only the latest request completes.
    ///
    /// Returns `false` and changes nothing if `id` is not attached or
    /// `target` is not finite.
    pub fn transition_to(
        &mut self,
        id: SurfaceId,
        target: ZoomTransform,
        duration_ms: u64,
        now: u64,
    ) -> bool {
        let Some(index) = self.index(id) else {
            return false;
        };
        if !target.is_valid() {
            return false;
        }
        self.interrupt(index);
        self.start_transition(index, target, duration_ms, now);
        true
    }

    /// Interprets a gesture on `id`.
    ///
    /// Returns `true` if the gesture produced any events. Gestures on
    /// unattached surfaces are ignored, as are gestures with non-finite
    /// positions or deltas (a non-finite pointer release still ends a pan).
    pub fn handle(&mut self, id: SurfaceId, gesture: Gesture, now: u64) -> bool {
        let Some(index) = self.index(id) else {
            return false;
        };
        let before = self.events.len();
        if !gesture.is_finite() {
            trace!(%id, ?gesture, "non-finite gesture ignored");
            if matches!(gesture, Gesture::PointerUp { .. }) {
                self.end_pan(index);
            }
            return self.events.len() > before;
        }
        match gesture {
            Gesture::Wheel {
                point,
                delta_y,
                mode,
            } => {
                let current = self.surfaces[index].transform;
                let k = self
                    .extent
                    .clamp(current.k * Gesture::wheel_scale(delta_y, mode));
                if k != current.k {
                    self.interrupt(index);
                    self.end_pan(index);
                    self.emit(index, ZoomEventKind::Start, ZoomSource::Gesture);
                    self.surfaces[index].transform = current.rescale_about(point, k);
                    self.emit(index, ZoomEventKind::Zoom, ZoomSource::Gesture);
                    self.emit(index, ZoomEventKind::End, ZoomSource::Gesture);
                }
            }
            Gesture::PointerDown { point } => {
                self.interrupt(index);
                self.end_pan(index);
                self.surfaces[index].pan.start(point);
                self.emit(index, ZoomEventKind::Start, ZoomSource::Gesture);
            }
            Gesture::PointerMove { point } => self.pan_to(index, point),
            Gesture::PointerUp { point } => {
                self.pan_to(index, point);
                self.end_pan(index);
            }
            Gesture::DoubleClick { point, shift } => {
                self.end_pan(index);
                let current = self.surfaces[index].transform;
                let factor = if shift { 0.5 } else { 2.0 };
                let k = self.extent.clamp(current.k * factor);
                if k != current.k {
                    self.interrupt(index);
                    let target = current.rescale_about(point, k);
                    self.start_transition(index, target, DOUBLE_CLICK_DURATION_MS, now);
                }
            }
        }
        self.events.len() > before
    }

    /// Advances every running transition to `now`, emitting a `Zoom` event per
    /// surface and an `End` event for transitions that complete.
    ///
    /// Returns `true` while any transition is still running.
    pub fn tick(&mut self, now: u64) -> bool {
        for index in 0..self.surfaces.len() {
            let Some(transition) = self.surfaces[index].transition else {
                continue;
            };
            let (transform, done) = transition.at(now);
            let surface = &mut self.surfaces[index];
            surface.transform = transform;
            if done {
                surface.transition = None;
            }
            self.emit(index, ZoomEventKind::Zoom, ZoomSource::Transition);
            if done {
                debug!(id = %self.surfaces[index].id, "transition complete");
                self.emit(index, ZoomEventKind::End, ZoomSource::Transition);
            }
        }
        self.is_animating()
    }

    /// Removes and returns the oldest queued event.
    pub fn pop_event(&mut self) -> Option<ZoomEvent> {
        self.events.pop_front()
    }

    /// Removes and yields all queued events in dispatch order.
    pub fn drain_events(&mut self) -> impl Iterator<Item = ZoomEvent> + '_ {
        self.events.drain(..)
    }

    /// Number of queued events.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn index(&self, id: SurfaceId) -> Option<usize> {
        self.surfaces.iter().position(|s| s.id == id)
    }

    fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.iter_mut().find(|s| s.id == id)
    }

    /// Clamps the scale of `transform` into the extent, keeping the viewport
    /// centre fixed (the origin for a viewport without a finite centre).
    fn constrain(&self, index: usize, transform: ZoomTransform) -> ZoomTransform {
        let k = self.extent.clamp(transform.k);
        if k == transform.k {
            return transform;
        }
        let centre = self.surfaces[index].viewport.center();
        let anchor = if centre.is_finite() { centre } else { Point::ZERO };
        transform.rescale_about(anchor, k)
    }

    fn start_transition(&mut self, index: usize, target: ZoomTransform, duration_ms: u64, now: u64) {
        let target = self.constrain(index, target);
        let Surface {
            id,
            viewport,
            transform: from,
            ..
        } = self.surfaces[index];
        debug!(
            %id,
            x = target.x,
            y = target.y,
            k = target.k,
            duration_ms,
            "transition start"
        );
        self.emit(index, ZoomEventKind::Start, ZoomSource::Transition);
        if duration_ms == 0 {
            self.surfaces[index].transform = target;
            self.emit(index, ZoomEventKind::Zoom, ZoomSource::Transition);
            self.emit(index, ZoomEventKind::End, ZoomSource::Transition);
            return;
        }
        let interpolator = TransformInterpolator::new(from, target, viewport, self.extent);
        self.surfaces[index].transition = Some(Transition {
            interpolator,
            target,
            start_ms: now,
            duration_ms,
            easing: Easing::CubicInOut,
        });
    }

    /// Drops a running transition, emitting its `End` at the transform it
    /// reached.
    fn interrupt(&mut self, index: usize) {
        if self.surfaces[index].transition.take().is_some() {
            trace!(id = %self.surfaces[index].id, "transition interrupted");
            self.emit(index, ZoomEventKind::End, ZoomSource::Transition);
        }
    }

    fn pan_to(&mut self, index: usize, point: Point) {
        let surface = &mut self.surfaces[index];
        if let Some(delta) = surface.pan.update(point)
            && delta != Vec2::ZERO
        {
            surface.transform = surface.transform.pan_by(delta);
            self.emit(index, ZoomEventKind::Zoom, ZoomSource::Gesture);
        }
    }

    fn end_pan(&mut self, index: usize) {
        if self.surfaces[index].pan.end() {
            self.emit(index, ZoomEventKind::End, ZoomSource::Gesture);
        }
    }

    fn emit(&mut self, index: usize, kind: ZoomEventKind, source: ZoomSource) {
        let surface = &self.surfaces[index];
        let event = ZoomEvent {
            sequence: self.next_sequence,
            surface: surface.id,
            kind,
            transform: surface.transform,
            source,
        };
        self.next_sequence += 1;
        trace!(
            id = %surface.id,
            sequence = event.sequence,
            ?kind,
            ?source,
            x = event.transform.x,
            y = event.transform.y,
            k = event.transform.k,
            "zoom event"
        );
        self.events.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::{Point, Rect};

    use super::{DOUBLE_CLICK_DURATION_MS, ZoomController};
    use crate::{
        DeltaMode, Gesture, ScaleExtent, SurfaceId, ZoomEventKind, ZoomSource, ZoomTransform,
    };

    const S: SurfaceId = SurfaceId(1);

    fn controller() -> ZoomController {
        let mut c = ZoomController::new(ScaleExtent::new(1.0, 18.0));
        assert!(c.attach(S, Rect::new(0.0, 0.0, 960.0, 500.0)));
        c
    }

    fn kinds(c: &mut ZoomController) -> Vec<(ZoomEventKind, ZoomSource)> {
        c.drain_events().map(|e| (e.kind, e.source)).collect()
    }

    #[test]
    fn wheel_zooms_about_the_pointer() {
        let mut c = controller();
        let point = Point::new(300.0, 200.0);
        assert!(c.handle(
            S,
            Gesture::Wheel {
                point,
                delta_y: -500.0,
                mode: DeltaMode::Pixel
            },
            0
        ));
        let t = c.transform(S).unwrap();
        assert!((t.k - 2.0).abs() < 1e-12);
        let fixed = t.invert(point);
        assert!((fixed.x - 300.0).abs() < 1e-9 && (fixed.y - 200.0).abs() < 1e-9);
        assert_eq!(
            kinds(&mut c),
            [
                (ZoomEventKind::Start, ZoomSource::Gesture),
                (ZoomEventKind::Zoom, ZoomSource::Gesture),
                (ZoomEventKind::End, ZoomSource::Gesture),
            ]
        );
    }

    #[test]
    fn wheel_at_the_limit_emits_nothing() {
        let mut c = controller();
        let out = Gesture::Wheel {
            point: Point::ZERO,
            delta_y: 100.0,
            mode: DeltaMode::Line,
        };
        assert!(!c.handle(S, out, 0));
        assert_eq!(c.pending_events(), 0);
        assert_eq!(c.transform(S), Some(ZoomTransform::IDENTITY));
    }

    #[test]
    fn drag_pans_by_pointer_deltas() {
        let mut c = controller();
        c.handle(S, Gesture::PointerDown { point: Point::new(10.0, 10.0) }, 0);
        c.handle(S, Gesture::PointerMove { point: Point::new(30.0, 5.0) }, 1);
        c.handle(S, Gesture::PointerMove { point: Point::new(30.0, 5.0) }, 2);
        c.handle(S, Gesture::PointerUp { point: Point::new(35.0, 5.0) }, 3);
        assert_eq!(c.transform(S), Some(ZoomTransform::new(25.0, -5.0, 1.0)));
        assert_eq!(
            kinds(&mut c),
            [
                (ZoomEventKind::Start, ZoomSource::Gesture),
                (ZoomEventKind::Zoom, ZoomSource::Gesture),
                (ZoomEventKind::Zoom, ZoomSource::Gesture),
                (ZoomEventKind::End, ZoomSource::Gesture),
            ]
        );
        // Moving without a button held does nothing.
        assert!(!c.handle(S, Gesture::PointerMove { point: Point::ZERO }, 4));
    }

    #[test]
    fn transition_reaches_target_and_ends() {
        let mut c = controller();
        let target = ZoomTransform::new(-200.0, -100.0, 4.0);
        assert!(c.transition_to(S, target, 750, 1_000));
        assert!(c.is_transitioning(S));
        assert!(c.tick(1_300));
        let mid = c.transform(S).unwrap();
        assert!(mid != target && mid.is_valid());
        assert!(!c.tick(1_750));
        assert_eq!(c.transform(S), Some(target));
        let events: Vec<_> = c.drain_events().collect();
        assert_eq!(events.first().map(|e| e.kind), Some(ZoomEventKind::Start));
        assert_eq!(events.last().map(|e| e.kind), Some(ZoomEventKind::End));
        assert!(events.windows(2).all(|w| w[1].sequence == w[0].sequence + 1));
        // Nothing left to animate.
        assert!(!c.tick(2_000));
        assert_eq!(c.pending_events(), 0);
    }

    #[test]
    fn zero_duration_applies_immediately() {
        let mut c = controller();
        let target = ZoomTransform::new(5.0, 5.0, 3.0);
        c.transition_to(S, target, 0, 0);
        assert!(!c.is_transitioning(S));
        assert_eq!(c.transform(S), Some(target));
    }

    #[test]
    fn transition_targets_are_clamped() {
        let mut c = controller();
        c.transition_to(S, ZoomTransform::new(0.0, 0.0, 40.0), 0, 0);
        assert_eq!(c.transform(S).unwrap().k, 18.0);
        c.set_transform(S, ZoomTransform::new(0.0, 0.0, 0.25));
        let t = c.transform(S).unwrap();
        assert_eq!(t.k, 1.0);
        // Clamped about the viewport centre.
        let centre = t.invert(Point::new(480.0, 250.0));
        let expected = ZoomTransform::new(0.0, 0.0, 0.25).invert(Point::new(480.0, 250.0));
        assert!((centre.x - expected.x).abs() < 1e-9);
    }

    #[test]
    fn gestures_interrupt_transitions() {
        let mut c = controller();
        c.transition_to(S, ZoomTransform::new(-500.0, -300.0, 6.0), 750, 0);
        c.tick(100);
        c.drain_events().for_each(drop);
        c.handle(S, Gesture::PointerDown { point: Point::ZERO }, 150);
        assert!(!c.is_transitioning(S));
        assert_eq!(
            kinds(&mut c),
            [
                (ZoomEventKind::End, ZoomSource::Transition),
                (ZoomEventKind::Start, ZoomSource::Gesture),
            ]
        );
        let held = c.transform(S);
        assert!(!c.tick(900));
        assert_eq!(c.transform(S), held);
    }

    #[test]
    fn double_click_animates_a_doubling() {
        let mut c = controller();
        let point = Point::new(100.0, 100.0);
        c.handle(S, Gesture::DoubleClick { point, shift: false }, 0);
        assert!(c.is_transitioning(S));
        c.tick(DOUBLE_CLICK_DURATION_MS);
        let t = c.transform(S).unwrap();
        assert!((t.k - 2.0).abs() < 1e-12);
        let fixed = t.invert(point);
        assert!((fixed.x - 100.0).abs() < 1e-9 && (fixed.y - 100.0).abs() < 1e-9);

        c.handle(S, Gesture::DoubleClick { point, shift: true }, 1_000);
        c.tick(1_000 + DOUBLE_CLICK_DURATION_MS);
        assert!((c.transform(S).unwrap().k - 1.0).abs() < 1e-12);
    }

    #[test]
    fn detach_discards_queued_events() {
        let mut c = controller();
        let other = SurfaceId(2);
        c.attach(other, Rect::new(0.0, 0.0, 100.0, 100.0));
        c.set_transform(S, ZoomTransform::new(1.0, 1.0, 2.0));
        c.set_transform(other, ZoomTransform::new(1.0, 1.0, 2.0));
        assert!(c.detach(S));
        assert!(!c.detach(S));
        assert!(c.drain_events().all(|e| e.surface == other));
        assert_eq!(c.transform(S), None);
        assert!(!c.handle(S, Gesture::PointerDown { point: Point::ZERO }, 0));
    }

    #[test]
    fn double_click_at_the_limit_leaves_the_view_alone() {
        let mut c = controller();
        let point = Point::new(100.0, 100.0);
        c.handle(S, Gesture::DoubleClick { point, shift: true }, 0);
        assert!(!c.is_transitioning(S));
        assert_eq!(c.pending_events(), 0);
        assert_eq!(c.transform(S), Some(ZoomTransform::IDENTITY));

        let deep = ZoomTransform::new(-700.0, -300.0, 18.0);
        c.set_transform(S, deep);
        c.drain_events().for_each(drop);
        assert!(!c.handle(S, Gesture::DoubleClick { point, shift: false }, 10));
        assert_eq!(c.transform(S), Some(deep));
    }

    #[test]
    fn double_click_near_the_limit_keeps_the_pointer_fixed() {
        let mut c = controller();
        let point = Point::new(640.0, 120.0);
        c.set_transform(S, ZoomTransform::new(-1_000.0, -800.0, 12.0));
        c.handle(S, Gesture::DoubleClick { point, shift: false }, 0);
        let before = ZoomTransform::new(-1_000.0, -800.0, 12.0).invert(point);
        c.tick(DOUBLE_CLICK_DURATION_MS);
        let t = c.transform(S).unwrap();
        assert_eq!(t.k, 18.0);
        let after = t.invert(point);
        assert!(
            (after.x - before.x).abs() < 1e-9 && (after.y - before.y).abs() < 1e-9,
            "pointer drifted from {before:?} to {after:?}"
        );
    }

    #[test]
    fn non_finite_gestures_are_ignored() {
        let mut c = controller();
        let wheel = Gesture::Wheel {
            point: Point::new(10.0, 10.0),
            delta_y: f64::NAN,
            mode: DeltaMode::Pixel,
        };
        assert!(!c.handle(S, wheel, 0));
        let nowhere = Point::new(f64::NAN, 1.0);
        assert!(!c.handle(
            S,
            Gesture::DoubleClick {
                point: nowhere,
                shift: false
            },
            0
        ));
        assert_eq!(c.transform(S), Some(ZoomTransform::IDENTITY));
        assert_eq!(c.pending_events(), 0);

        // A release anywhere still ends the pan.
        c.handle(S, Gesture::PointerDown { point: Point::ZERO }, 1);
        assert!(c.is_panning(S));
        c.handle(S, Gesture::PointerUp { point: nowhere }, 2);
        assert!(!c.is_panning(S));
        assert_eq!(c.transform(S), Some(ZoomTransform::IDENTITY));

        let bad = ZoomTransform::new(f64::NAN, 0.0, 2.0);
        assert!(!c.set_transform(S, bad));
        assert!(!c.transition_to(S, bad, 750, 3));
        assert!(!c.is_transitioning(S));
    }

    #[test]
    fn empty_viewports_still_animate_finite_frames() {
        let extent = ScaleExtent::new(1.0, 18.0);
        let mut c = ZoomController::new(extent);
        assert!(c.attach(S, Rect::ZERO));
        c.handle(
            S,
            Gesture::DoubleClick {
                point: Point::new(100.0, 100.0),
                shift: false,
            },
            0,
        );
        let mut now = 0;
        while c.tick(now) {
            now += 16;
        }
        for event in c.drain_events() {
            assert!(event.transform.is_valid(), "frame {event:?} is not finite");
            assert!(extent.contains(event.transform.k), "scale escaped in {event:?}");
        }
        assert!((c.transform(S).unwrap().k - 2.0).abs() < 1e-12);

        c.transition_to(S, ZoomTransform::IDENTITY, 750, now);
        c.tick(now + 300);
        let mid = c.transform(S).unwrap();
        assert!(mid.is_valid() && extent.contains(mid.k), "mid frame {mid:?}");
    }
}
