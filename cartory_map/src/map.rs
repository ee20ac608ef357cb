// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use cartory_geo::SPHERE;
use cartory_projection::{PathGenerator, Projection, ProjectionKind};
use cartory_zoom::{Gesture, SurfaceId, ZoomController, ZoomTransform};
use kurbo::{BezPath, Point, Rect, Shape, Size};
use tracing::{debug, trace};

use crate::country::{CountryLayout, CountryView};
use crate::scene::{MapScene, SPHERE_FILL};
use crate::{Atlas, MapError, ProjectionConfig, ZoomPolicy};

/// The single zoom surface a map registers with its controller.
const SURFACE: SurfaceId = SurfaceId(0);

/// A pannable, zoomable world map.
///
/// The map owns its projection, the projected country layout and one
/// [`ZoomController`]. Its render state is the current [`ZoomTransform`],
/// which changes only when controller events are applied: gestures, clicks
/// and animation ticks all end up in [`apply_pending_events`], so user and
/// programmatic zooms can never disagree about what is displayed.
///
/// Lifecycle:
/// 1. [`new`](Self::new) resolves the projection; an unknown name fails here.
/// 2. [`set_container_width`](Self::set_container_width) fits the projection
///    to the host's width and lays out every country.
/// 3. [`mount`](Self::mount) registers the zoom surface (once).
/// 4. The host forwards gestures with [`handle_gesture`](Self::handle_gesture)
///    and drives transitions with [`tick`](Self::tick).
/// 5. [`unmount`](Self::unmount) drops the surface and resets the transform.
///
/// [`apply_pending_events`]: Self::apply_pending_events
#[derive(Debug)]
pub struct WorldMap {
    atlas: Atlas,
    config: ProjectionConfig,
    kind: ProjectionKind,
    policy: ZoomPolicy,
    zoom: ZoomController,
    paths: PathGenerator,
    width: f64,
    size: Size,
    sphere: BezPath,
    countries: Vec<CountryLayout>,
    transform: ZoomTransform,
    last_sequence: Option<u64>,
}

impl WorldMap {
    /// Creates a map over `atlas` with the default [`ZoomPolicy`].
    pub fn new(atlas: Atlas, config: ProjectionConfig) -> Result<Self, MapError> {
        Self::with_policy(atlas, config, ZoomPolicy::default())
    }

    /// Creates a map over `atlas` with an explicit zoom policy.
    ///
    /// The map starts unmounted with a zero width; nothing is laid out until
    /// [`set_container_width`](Self::set_container_width) is called.
    pub fn with_policy(
        atlas: Atlas,
        config: ProjectionConfig,
        policy: ZoomPolicy,
    ) -> Result<Self, MapError> {
        let kind = config.resolve()?;
        debug!(projection = kind.name(), countries = atlas.len(), "map created");
        let countries = core::iter::repeat_with(CountryLayout::default)
            .take(atlas.len())
            .collect();
        Ok(Self {
            atlas,
            config,
            kind,
            policy,
            zoom: ZoomController::new(policy.extent()),
            paths: PathGenerator::new(Projection::new(kind)),
            width: 0.0,
            size: Size::ZERO,
            sphere: BezPath::new(),
            countries,
            transform: ZoomTransform::IDENTITY,
            last_sequence: None,
        })
    }

    /// Decodes a TopoJSON `countries` dataset and creates a map over it.
    ///
    /// For a dataset shared between maps, decode it once into an
    /// [`AtlasCell`](crate::AtlasCell) and use [`new`](Self::new) instead.
    pub fn from_json(text: &str, config: ProjectionConfig) -> Result<Self, MapError> {
        let atlas = Atlas::from_json(text)?;
        Self::new(atlas, config)
    }

    /// The shared atlas.
    #[must_use]
    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    /// The projection configuration this map was created with.
    #[must_use]
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// The resolved projection kind.
    #[must_use]
    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// The fitted projection.
    #[must_use]
    pub fn projection(&self) -> &Projection {
        self.paths.projection()
    }

    /// The zoom policy.
    #[must_use]
    pub fn policy(&self) -> &ZoomPolicy {
        &self.policy
    }

    /// The zoom controller.
    #[must_use]
    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    /// Size of the drawing surface: the container width and the height of
    /// the projected sphere.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// The displayed pan/zoom transform.
    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    /// Projected outline of the globe.
    #[must_use]
    pub fn sphere(&self) -> &BezPath {
        &self.sphere
    }

    /// Fits the map to a container `width`.
    ///
    /// The projection is fitted so the sphere spans exactly `width`, the
    /// height becomes the bottom edge of the projected sphere, and every
    /// country is re-projected. The transform is kept. A non-positive or
    /// non-finite width clears the layout to a zero size.
    ///
    /// Returns `false` if the width did not change.
    pub fn set_container_width(&mut self, width: f64) -> bool {
        if width.to_bits() == self.width.to_bits() {
            return false;
        }
        self.width = width;
        if width.is_finite() && width > 0.0 {
            let projection = Projection::new(self.kind).fit_width(width, &SPHERE);
            self.paths = PathGenerator::new(projection);
            let height = self
                .paths
                .bounds(&SPHERE)
                .map(|b| b.y1)
                .filter(|h| h.is_finite() && *h > 0.0)
                .unwrap_or(0.0);
            self.size = Size::new(width, height);
            self.sphere = self.paths.path(&SPHERE);
            for (layout, feature) in self.countries.iter_mut().zip(self.atlas.features()) {
                *layout = CountryLayout::project(&self.paths, feature);
            }
        } else {
            self.size = Size::ZERO;
            self.sphere = BezPath::new();
            for layout in &mut self.countries {
                *layout = CountryLayout::default();
            }
        }
        self.zoom.set_viewport(SURFACE, self.size.to_rect());
        debug!(
            width,
            height = self.size.height,
            projection = self.kind.name(),
            "map refitted"
        );
        true
    }

    /// Registers the map's zoom surface with its controller.
    ///
    /// Returns `false` if already mounted; the surface is never registered
    /// twice.
    pub fn mount(&mut self) -> bool {
        self.zoom.attach(SURFACE, self.size.to_rect())
    }

    /// Returns `true` while the zoom surface is registered.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.zoom.is_attached(SURFACE)
    }

    /// Unregisters the zoom surface, cancelling any transition and dropping
    /// pending events, and resets the transform to identity.
    pub fn unmount(&mut self) -> bool {
        let detached = self.zoom.detach(SURFACE);
        self.transform = ZoomTransform::IDENTITY;
        self.last_sequence = None;
        detached
    }

    /// Forwards a pointer gesture in view coordinates to the controller and
    /// applies what it reports.
    ///
    /// Returns the number of transform updates applied. Gestures are ignored
    /// while unmounted.
    pub fn handle_gesture(&mut self, gesture: Gesture, now: u64) -> usize {
        self.zoom.handle(SURFACE, gesture, now);
        self.apply_pending_events()
    }

    /// Advances running transitions to `now` and applies their frames.
    ///
    /// Returns `true` while a transition is still running, meaning the host
    /// should schedule another frame.
    pub fn tick(&mut self, now: u64) -> bool {
        let animating = self.zoom.tick(now);
        self.apply_pending_events();
        animating
    }

    /// Copies every transform the controller has reported into the
    /// displayed state, in dispatch order. Returns how many were applied.
    ///
    /// Every other operation calls this already; hosts only need it after
    /// driving the controller some other way.
    pub fn apply_pending_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.zoom.pop_event() {
            if event.surface != SURFACE || !event.is_update() {
                continue;
            }
            if self.last_sequence.is_some_and(|last| event.sequence <= last) {
                continue;
            }
            self.last_sequence = Some(event.sequence);
            self.transform = event.transform;
            applied += 1;
            trace!(
                sequence = event.sequence,
                x = event.transform.x,
                y = event.transform.y,
                k = event.transform.k,
                "transform applied"
            );
        }
        applied
    }

    /// Number of countries.
    #[must_use]
    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    /// The country at `index`.
    #[must_use]
    pub fn country(&self, index: usize) -> Option<CountryView<'_>> {
        let feature = self.atlas.get(index)?;
        let layout = self.countries.get(index)?;
        Some(CountryView::new(index, feature, layout))
    }

    /// All countries in atlas order.
    pub fn countries(&self) -> impl Iterator<Item = CountryView<'_>> {
        self.atlas
            .features()
            .iter()
            .zip(&self.countries)
            .enumerate()
            .map(|(index, (feature, layout))| CountryView::new(index, feature, layout))
    }

    /// Index of the country with the given subunit code.
    #[must_use]
    pub fn country_index(&self, subunit: &str) -> Option<usize> {
        self.atlas.index_of(subunit)
    }

    /// The country under `point`, given in view coordinates.
    ///
    /// The point is mapped back through the current transform, must fall
    /// inside the sphere, and is tested against country outlines from the
    /// top-most (last drawn) down.
    #[must_use]
    pub fn country_at(&self, point: Point) -> Option<usize> {
        if !self.transform.is_valid() {
            return None;
        }
        let p = self.transform.invert(point);
        if !self.sphere.bounding_box().contains(p) || !self.sphere.contains(p) {
            return None;
        }
        self.countries.iter().rposition(|layout| layout.contains(p))
    }

    /// Starts the animated zoom onto the country at `index`.
    ///
    /// Returns the target transform, or `None` if the country has no
    /// projected shape to frame. A click during a running transition
    /// replaces it.
    pub fn click_country(
        &mut self,
        index: usize,
        now: u64,
    ) -> Result<Option<ZoomTransform>, MapError> {
        let country = self.country(index).ok_or(MapError::UnknownCountry(index))?;
        if !self.is_mounted() {
            return Err(MapError::NotMounted);
        }
        debug!(
            index,
            name = country.title(),
            subunit = country.subunit(),
            "country clicked"
        );
        let Some(target) = country.focus_transform(self.size, &self.policy) else {
            return Ok(None);
        };
        self.zoom
            .transition_to(SURFACE, target, self.policy.duration_ms, now);
        self.apply_pending_events();
        Ok(Some(target))
    }

    /// Hit tests `point` (view coordinates) and zooms onto the country
    /// found there. Returns its index.
    pub fn click_at(&mut self, point: Point, now: u64) -> Result<Option<usize>, MapError> {
        let Some(index) = self.country_at(point) else {
            return Ok(None);
        };
        self.click_country(index, now)?;
        Ok(Some(index))
    }

    /// Animates back to the identity transform.
    pub fn reset_zoom(&mut self, now: u64) -> Result<(), MapError> {
        if !self.zoom.transition_to(
            SURFACE,
            ZoomTransform::IDENTITY,
            self.policy.duration_ms,
            now,
        ) {
            return Err(MapError::NotMounted);
        }
        debug!("zoom reset");
        self.apply_pending_events();
        Ok(())
    }

    /// The current scene: sphere, clip and every country under the
    /// displayed transform.
    #[must_use]
    pub fn scene(&self) -> MapScene<'_> {
        MapScene {
            size: self.size,
            transform: self.transform,
            sphere: &self.sphere,
            sphere_fill: SPHERE_FILL,
            clip: &self.sphere,
            countries: self.countries().map(|c| c.shape()).collect(),
        }
    }

    /// The current scene as an SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        self.scene().to_svg()
    }

    /// Screen-space bounds of the country at `index` under the displayed
    /// transform.
    #[must_use]
    pub fn country_view_bounds(&self, index: usize) -> Option<Rect> {
        let bounds = self.country(index)?.bounds()?;
        Some(self.transform.apply_rect(bounds))
    }
}
