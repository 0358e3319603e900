use std::cell::RefCell;
use std::collections::BTreeMap;

use foundation::handles::Handle;
use runtime::event_bus::{Listeners, Subscription};
use runtime::frame::Frame;

use crate::camera::{FlySpeed, LookAt};
use crate::entity::NodeId;
use crate::feature::Feature;
use crate::surface::{GlobeLayer, GlobeSurface};

const DEFAULT_RANGE_M: f64 = 10_000_000.0;

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    feature: Option<Feature>,
}

#[derive(Debug, Copy, Clone)]
struct Flight {
    from: LookAt,
    to: LookAt,
    rate: f64,
    progress: f64,
}

#[derive(Debug)]
struct GlobeState {
    slots: Vec<Slot>,
    free: Vec<u32>,
    view: LookAt,
    flight: Option<Flight>,
    window_visible: bool,
    atmosphere_visible: bool,
    grid_visible: bool,
    layers: BTreeMap<GlobeLayer, bool>,
}

/// In-memory globe surface.
///
/// Features live in generational slots, so a [`NodeId`] goes stale as soon as
/// its feature is removed. Animated camera flights advance on [`Globe::tick`];
/// teleports land immediately. Both end with a view-change-end notification.
#[derive(Debug)]
pub struct Globe {
    state: RefCell<GlobeState>,
    view_change_end: Listeners<LookAt>,
}

impl Globe {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(GlobeState {
                slots: Vec::new(),
                free: Vec::new(),
                view: LookAt::overhead(0.0, 0.0, DEFAULT_RANGE_M),
                flight: None,
                window_visible: false,
                atmosphere_visible: true,
                grid_visible: false,
                layers: BTreeMap::new(),
            }),
            view_change_end: Listeners::new(),
        }
    }

    /// Attached features in slot order.
    pub fn features(&self) -> Vec<(NodeId, Feature)> {
        let state = self.state.borrow();
        let mut out = Vec::new();
        for (idx, slot) in state.slots.iter().enumerate() {
            let Some(feature) = &slot.feature else {
                continue;
            };
            out.push((
                NodeId(Handle::new(idx as u32, slot.generation)),
                feature.clone(),
            ));
        }
        out
    }

    pub fn feature_count(&self) -> usize {
        self.state
            .borrow()
            .slots
            .iter()
            .filter(|s| s.feature.is_some())
            .count()
    }

    pub fn is_flying(&self) -> bool {
        self.state.borrow().flight.is_some()
    }

    pub fn is_window_visible(&self) -> bool {
        self.state.borrow().window_visible
    }

    pub fn is_atmosphere_visible(&self) -> bool {
        self.state.borrow().atmosphere_visible
    }

    pub fn is_grid_visible(&self) -> bool {
        self.state.borrow().grid_visible
    }

    pub fn is_layer_enabled(&self, layer: GlobeLayer) -> bool {
        self.state
            .borrow()
            .layers
            .get(&layer)
            .copied()
            .unwrap_or(false)
    }

    /// Advances an in-progress flight by one frame.
    pub fn tick(&self, frame: Frame) {
        let landed = {
            let mut state = self.state.borrow_mut();
            let Some(mut flight) = state.flight else {
                return;
            };
            flight.progress += frame.dt_s * flight.rate;
            if flight.progress >= 1.0 {
                state.view = flight.to;
                state.flight = None;
                Some(flight.to)
            } else {
                state.view = flight.from.lerp(&flight.to, flight.progress);
                state.flight = Some(flight);
                None
            }
        };
        if let Some(view) = landed {
            self.view_change_end.emit(&view);
        }
    }

    fn slot_mut(state: &mut GlobeState, node: NodeId) -> Option<&mut Slot> {
        state
            .slots
            .get_mut(node.index() as usize)
            .filter(|s| s.generation == node.generation())
    }
}

impl Default for Globe {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobeSurface for Globe {
    fn append_feature(&self, feature: Feature) -> NodeId {
        let mut state = self.state.borrow_mut();
        let index = match state.free.pop() {
            Some(index) => index,
            None => {
                state.slots.push(Slot::default());
                (state.slots.len() - 1) as u32
            }
        };
        let slot = &mut state.slots[index as usize];
        slot.feature = Some(feature);
        NodeId(Handle::new(index, slot.generation))
    }

    fn remove_feature(&self, node: NodeId) -> Option<Feature> {
        let mut state = self.state.borrow_mut();
        let slot = Self::slot_mut(&mut state, node)?;
        let feature = slot.feature.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        state.free.push(node.index());
        Some(feature)
    }

    fn feature(&self, node: NodeId) -> Option<Feature> {
        let state = self.state.borrow();
        state
            .slots
            .get(node.index() as usize)
            .filter(|s| s.generation == node.generation())
            .and_then(|s| s.feature.clone())
    }

    fn view(&self) -> LookAt {
        self.state.borrow().view
    }

    fn set_view(&self, lookat: LookAt, speed: FlySpeed) {
        match speed {
            FlySpeed::Rate(rate) if rate > 0.0 && rate.is_finite() => {
                let mut state = self.state.borrow_mut();
                let from = state.view;
                state.flight = Some(Flight {
                    from,
                    to: lookat,
                    rate,
                    progress: 0.0,
                });
            }
            _ => {
                {
                    let mut state = self.state.borrow_mut();
                    state.flight = None;
                    state.view = lookat;
                }
                self.view_change_end.emit(&lookat);
            }
        }
    }

    fn on_view_change_end(&self, f: Box<dyn Fn(&LookAt)>) -> Subscription {
        self.view_change_end.subscribe(move |v| f(v))
    }

    fn set_window_visible(&self, visible: bool) {
        self.state.borrow_mut().window_visible = visible;
    }

    fn set_atmosphere_visible(&self, visible: bool) {
        self.state.borrow_mut().atmosphere_visible = visible;
    }

    fn set_grid_visible(&self, visible: bool) {
        self.state.borrow_mut().grid_visible = visible;
    }

    fn enable_layer(&self, layer: GlobeLayer, enabled: bool) {
        self.state.borrow_mut().layers.insert(layer, enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::Globe;
    use crate::camera::{FlySpeed, LookAt};
    use crate::feature::{Feature, KmlObject, Placemark};
    use crate::surface::{GlobeLayer, GlobeSurface};
    use pretty_assertions::assert_eq;
    use runtime::frame::Frame;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn append_and_remove_features() {
        let globe = Globe::new();
        let a = globe.append_feature(Feature::Placemark(Placemark::new()));
        let b = globe.append_feature(Feature::Kml(KmlObject::new("u", "b")));
        assert_eq!(globe.feature_count(), 2);

        assert!(globe.remove_feature(a).is_some());
        assert!(globe.remove_feature(a).is_none());
        assert!(globe.feature(a).is_none());
        assert!(globe.feature(b).is_some());
        assert_eq!(globe.features().len(), 1);
    }

    #[test]
    fn reused_slot_does_not_resolve_stale_id() {
        let globe = Globe::new();
        let a = globe.append_feature(Feature::Placemark(Placemark::new()));
        globe.remove_feature(a);
        let b = globe.append_feature(Feature::Placemark(Placemark::new()));
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(globe.feature(a).is_none());
        assert!(globe.remove_feature(a).is_none());
        assert_eq!(globe.feature_count(), 1);
    }

    #[test]
    fn teleport_lands_immediately_and_notifies() {
        let globe = Globe::new();
        let ends = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let ends = ends.clone();
            globe.on_view_change_end(Box::new(move |v| ends.borrow_mut().push(v.range)))
        };
        globe.set_view(LookAt::overhead(1.0, 2.0, 500.0), FlySpeed::Teleport);
        assert_eq!(globe.view().range, 500.0);
        assert!(!globe.is_flying());
        assert_eq!(*ends.borrow(), vec![500.0]);
    }

    #[test]
    fn animated_flight_lands_after_ticks() {
        let globe = Globe::new();
        globe.set_view(LookAt::overhead(0.0, 0.0, 100.0), FlySpeed::Teleport);
        let ends = Rc::new(RefCell::new(0));
        let _sub = {
            let ends = ends.clone();
            globe.on_view_change_end(Box::new(move |_| *ends.borrow_mut() += 1))
        };

        let target = LookAt::overhead(0.0, 0.0, 300.0);
        globe.set_view(target, FlySpeed::Rate(2.0));
        assert!(globe.is_flying());

        globe.tick(Frame::new(0, 0.25));
        assert_eq!(globe.view().range, 200.0);
        assert_eq!(*ends.borrow(), 0);

        globe.tick(Frame::new(1, 0.25));
        assert_eq!(globe.view(), target);
        assert!(!globe.is_flying());
        assert_eq!(*ends.borrow(), 1);
    }

    #[test]
    fn option_toggles() {
        let globe = Globe::new();
        assert!(!globe.is_layer_enabled(GlobeLayer::Roads));
        globe.enable_layer(GlobeLayer::Roads, true);
        globe.set_grid_visible(true);
        globe.set_window_visible(true);
        assert!(globe.is_layer_enabled(GlobeLayer::Roads));
        assert!(globe.is_grid_visible());
        assert!(globe.is_window_visible());
    }
}
