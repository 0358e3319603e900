use std::cell::{Cell, RefCell};
use std::rc::Rc;

use foundation::math::LatLng;
use layers::map::{Map, map_type};
use runtime::event_bus::Subscription;
use scene::camera::{AltitudeMode, FlySpeed, LookAt};
use scene::surface::{GlobeLayer, GlobeSurface};
use tracing::info;

use crate::config::MirrorConfig;

/// Map zoom whose tile scale best matches a globe camera range (meters).
/// Halves round up.
pub fn zoom_from_range(range: f64, ratio: f64) -> i32 {
    (26.0 - (range * ratio).log2() + 0.5).floor() as i32
}

/// Globe camera range (meters) that shows about as much as map `zoom`.
pub fn range_from_zoom(zoom: i32, ratio: f64) -> f64 {
    2f64.powi(26 - zoom) / ratio
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransitionState {
    Hidden,
    Showing,
    /// Flying back to a flat, north-up view before handing over to the map.
    Hiding,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HideOutcome {
    /// The camera already matched a map view; the map took over right away.
    Finalized,
    /// The camera is flying to a map-compatible view; the map takes over when
    /// it lands.
    Animating,
    /// The globe was not showing.
    Ignored,
}

enum ViewState {
    Hidden,
    Showing,
    Hiding(Subscription),
}

struct ViewInner {
    map: Map,
    surface: Rc<dyn GlobeSurface>,
    config: Rc<MirrorConfig>,
    state: RefCell<ViewState>,
    saved_scrollwheel: Cell<Option<bool>>,
    previous_map_type: RefCell<Option<String>>,
}

/// Hands the camera over between the map and the globe.
#[derive(Clone)]
pub struct ViewTransitionController {
    inner: Rc<ViewInner>,
}

impl ViewTransitionController {
    pub fn new(map: Map, surface: Rc<dyn GlobeSurface>, config: Rc<MirrorConfig>) -> Self {
        Self {
            inner: Rc::new(ViewInner {
                map,
                surface,
                config,
                state: RefCell::new(ViewState::Hidden),
                saved_scrollwheel: Cell::new(None),
                previous_map_type: RefCell::new(None),
            }),
        }
    }

    pub fn state(&self) -> TransitionState {
        match &*self.inner.state.borrow() {
            ViewState::Hidden => TransitionState::Hidden,
            ViewState::Showing => TransitionState::Showing,
            ViewState::Hiding(_) => TransitionState::Hiding,
        }
    }

    pub fn is_showing(&self) -> bool {
        self.state() == TransitionState::Showing
    }

    /// The 2-D map type in use before the globe took over.
    pub fn previous_map_type(&self) -> Option<String> {
        self.inner.previous_map_type.borrow().clone()
    }

    pub fn set_previous_map_type(&self, id: &str) {
        *self.inner.previous_map_type.borrow_mut() = Some(id.to_string());
    }

    /// Puts the globe camera straight above the map center at the range
    /// matching the map zoom.
    pub fn jump_to_center(&self) {
        let inner = &self.inner;
        let center = inner.map.center().get();
        let range = range_from_zoom(inner.map.zoom().get(), inner.config.range_zoom_ratio);
        inner
            .surface
            .set_view(LookAt::overhead(center.lat, center.lng, range), FlySpeed::Teleport);
    }

    /// Switches to the globe. Returns `false` if it was already showing.
    ///
    /// Interrupts a hide that is still animating.
    pub fn show(&self) -> bool {
        let inner = &self.inner;
        let previous = {
            let mut state = inner.state.borrow_mut();
            if matches!(*state, ViewState::Showing) {
                return false;
            }
            std::mem::replace(&mut *state, ViewState::Showing)
        };
        // Drops a pending finalize, if any.
        drop(previous);

        // The globe takes scroll events while it is up.
        if inner.saved_scrollwheel.get().is_none() {
            inner
                .saved_scrollwheel
                .set(Some(inner.map.scrollwheel().get()));
        }
        inner.map.scrollwheel().set(false);

        let street_map = matches!(
            inner.previous_map_type.borrow().as_deref(),
            Some(map_type::ROADMAP | map_type::HYBRID | map_type::TERRAIN)
        );
        inner.surface.enable_layer(GlobeLayer::Roads, street_map);
        inner.surface.enable_layer(GlobeLayer::Borders, street_map);

        self.jump_to_center();
        inner.surface.set_window_visible(true);
        info!("globe shown at zoom {}", inner.map.zoom().get());
        true
    }

    /// Switches back to the map.
    ///
    /// The map can only show north-up, untilted views at whole zoom levels.
    /// If the globe camera is anywhere else it first flies there, and the map
    /// takes over once the flight ends.
    pub fn hide(&self) -> HideOutcome {
        let inner = &self.inner;
        if !matches!(*inner.state.borrow(), ViewState::Showing) {
            return HideOutcome::Ignored;
        }

        let ratio = inner.config.range_zoom_ratio;
        let live = inner.surface.view();
        let zoom = zoom_from_range(live.range, ratio);
        let range = range_from_zoom(zoom, ratio);
        let center = LatLng::new(live.lat, live.lng);

        if live.heading != 0.0 || live.tilt != 0.0 || live.range != range {
            let target = LookAt {
                altitude_mode: AltitudeMode::ClampToGround,
                heading: 0.0,
                tilt: 0.0,
                range,
                ..live
            };
            let weak = Rc::downgrade(inner);
            let landed = inner.surface.on_view_change_end(Box::new(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.finalize(zoom, center);
                }
            }));
            *inner.state.borrow_mut() = ViewState::Hiding(landed);
            inner
                .surface
                .set_view(target, FlySpeed::Rate(inner.config.hide_fly_speed));
            // A surface that cannot animate lands before returning.
            if !matches!(*inner.state.borrow(), ViewState::Hiding(_)) {
                return HideOutcome::Finalized;
            }
            info!("globe hiding: flying to a map-compatible view (zoom {zoom})");
            HideOutcome::Animating
        } else {
            inner.finalize(zoom, center);
            HideOutcome::Finalized
        }
    }
}

impl ViewInner {
    fn finalize(&self, zoom: i32, center: LatLng) {
        let previous = std::mem::replace(&mut *self.state.borrow_mut(), ViewState::Hidden);
        drop(previous);

        self.map.zoom().set(zoom);
        self.map.center().set(center);
        if let Some(scrollwheel) = self.saved_scrollwheel.take() {
            self.map.scrollwheel().set(scrollwheel);
        }
        self.surface.set_window_visible(false);
        info!("globe hidden at zoom {zoom}");
    }
}
