use std::cell::RefCell;
use std::rc::Rc;

use foundation::math::LatLng;
use runtime::event_bus::{Listeners, Subscription};
use runtime::property::Property;

use crate::overlay::Overlay;

/// Built-in 2-D map type ids.
pub mod map_type {
    pub const ROADMAP: &str = "roadmap";
    pub const SATELLITE: &str = "satellite";
    pub const HYBRID: &str = "hybrid";
    pub const TERRAIN: &str = "terrain";
}

/// An overlay joined or left the map.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayChange {
    Added(Overlay),
    Removed(Overlay),
}

#[derive(Debug)]
struct MapState {
    center: Property<LatLng>,
    zoom: Property<i32>,
    map_type_id: Property<String>,
    scrollwheel: Property<bool>,
    overlays: RefCell<Vec<Overlay>>,
    changes: Listeners<OverlayChange>,
}

/// The 2-D map: a (center, zoom) camera plus the overlays drawn on it.
#[derive(Debug, Clone)]
pub struct Map(Rc<MapState>);

impl Map {
    pub fn new(center: LatLng, zoom: i32) -> Self {
        Map(Rc::new(MapState {
            center: Property::new(center),
            zoom: Property::new(zoom),
            map_type_id: Property::new(map_type::ROADMAP.to_string()),
            scrollwheel: Property::new(true),
            overlays: RefCell::new(Vec::new()),
            changes: Listeners::new(),
        }))
    }

    pub fn center(&self) -> &Property<LatLng> {
        &self.0.center
    }

    pub fn zoom(&self) -> &Property<i32> {
        &self.0.zoom
    }

    pub fn map_type_id(&self) -> &Property<String> {
        &self.0.map_type_id
    }

    pub fn scrollwheel(&self) -> &Property<bool> {
        &self.0.scrollwheel
    }

    /// Puts `overlay` on the map. Returns `false` if it was already there.
    pub fn add_overlay(&self, overlay: impl Into<Overlay>) -> bool {
        let overlay = overlay.into();
        {
            let mut overlays = self.0.overlays.borrow_mut();
            if overlays.contains(&overlay) {
                return false;
            }
            overlays.push(overlay.clone());
        }
        self.0.changes.emit(&OverlayChange::Added(overlay));
        true
    }

    /// Takes `overlay` off the map. Returns `false` if it was not there.
    pub fn remove_overlay(&self, overlay: &Overlay) -> bool {
        {
            let mut overlays = self.0.overlays.borrow_mut();
            let Some(pos) = overlays.iter().position(|o| o == overlay) else {
                return false;
            };
            overlays.remove(pos);
        }
        self.0.changes.emit(&OverlayChange::Removed(overlay.clone()));
        true
    }

    pub fn overlays(&self) -> Vec<Overlay> {
        self.0.overlays.borrow().clone()
    }

    pub fn on_overlay_change(&self, f: impl Fn(&OverlayChange) + 'static) -> Subscription {
        self.0.changes.subscribe(f)
    }
}
