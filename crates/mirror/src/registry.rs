use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use foundation::ids::{IdAllocator, TrackedId};
use layers::overlay::{ObjectKey, Overlay, WeakOverlay};
use runtime::event_bus::{Listeners, Subscription};
use tracing::debug;

/// Dead entries are swept from the id table once it grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum MembershipEvent {
    Insert(Overlay),
    Remove(Overlay),
}

impl MembershipEvent {
    pub fn overlay(&self) -> &Overlay {
        match self {
            MembershipEvent::Insert(o) | MembershipEvent::Remove(o) => o,
        }
    }
}

#[derive(Debug, Default)]
struct IdTable {
    allocator: IdAllocator,
    // Weak side table: the registry never keeps an overlay alive through it.
    entries: HashMap<ObjectKey, (WeakOverlay, TrackedId)>,
    prune_at: usize,
}

impl IdTable {
    fn id_of(&mut self, overlay: &Overlay) -> TrackedId {
        let key = overlay.object_key();
        if let Some((weak, id)) = self.entries.get(&key) {
            // A dead entry means the address was reused by a new object.
            if weak.is_alive() {
                return *id;
            }
        }
        let id = self.allocator.next_id();
        self.entries.insert(key, (overlay.downgrade(), id));
        if self.entries.len() > self.prune_at.max(PRUNE_THRESHOLD) {
            self.entries.retain(|_, (weak, _)| weak.is_alive());
            self.prune_at = self.entries.len() * 2;
        }
        id
    }
}

/// Tracks which overlays are currently on the map.
///
/// Every overlay gets a [`TrackedId`] the first time it is seen and keeps it
/// for as long as it lives. Membership changes are announced to subscribers
/// after the registry's own state is updated.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    ids: RefCell<IdTable>,
    members: RefCell<BTreeMap<TrackedId, Overlay>>,
    events: Listeners<MembershipEvent>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_id(&self, overlay: &Overlay) -> TrackedId {
        self.ids.borrow_mut().id_of(overlay)
    }

    pub fn add(&self, overlay: &Overlay) {
        let id = self.get_id(overlay);
        {
            let mut members = self.members.borrow_mut();
            if members.contains_key(&id) {
                return;
            }
            members.insert(id, overlay.clone());
        }
        debug!("registry: {} {id} joined", overlay.kind());
        self.events.emit(&MembershipEvent::Insert(overlay.clone()));
    }

    pub fn remove(&self, overlay: &Overlay) {
        let id = self.get_id(overlay);
        if self.members.borrow_mut().remove(&id).is_none() {
            return;
        }
        debug!("registry: {} {id} left", overlay.kind());
        self.events.emit(&MembershipEvent::Remove(overlay.clone()));
    }

    pub fn contains(&self, overlay: &Overlay) -> bool {
        let id = self.get_id(overlay);
        self.members.borrow().contains_key(&id)
    }

    /// Calls `f` once per current member.
    pub fn for_each(&self, mut f: impl FnMut(&Overlay)) {
        let members: Vec<Overlay> = self.members.borrow().values().cloned().collect();
        for overlay in &members {
            f(overlay);
        }
    }

    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(&self, f: impl Fn(&MembershipEvent) + 'static) -> Subscription {
        self.events.subscribe(f)
    }

    /// Markers the map library creates for its own editing handles look like
    /// this: not clickable, draggable, and not raised while dragged.
    pub fn likely_internal_object(overlay: &Overlay) -> bool {
        match overlay {
            Overlay::Marker(m) => {
                !m.clickable().get() && m.draggable().get() && !m.raise_on_drag().get()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IdentityRegistry, MembershipEvent};
    use foundation::math::LatLng;
    use layers::{KmlLayer, Marker, Overlay, Polyline};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn marker() -> Overlay {
        Marker::new(LatLng::new(0.0, 0.0)).into()
    }

    #[test]
    fn ids_are_stable_and_distinct() {
        let reg = IdentityRegistry::new();
        let a = marker();
        let b: Overlay = Polyline::new(vec![]).into();
        let id_a = reg.get_id(&a);
        assert_eq!(reg.get_id(&a), id_a);
        assert_eq!(reg.get_id(&a.clone()), id_a);
        assert!(reg.get_id(&b) > id_a);
    }

    #[test]
    fn ids_are_not_reused_after_drop() {
        let reg = IdentityRegistry::new();
        let first = reg.get_id(&marker());
        let second = reg.get_id(&marker());
        assert_ne!(first, second);
    }

    #[test]
    fn membership_is_idempotent() {
        let reg = IdentityRegistry::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let events = events.clone();
            reg.subscribe(move |e| events.borrow_mut().push(e.clone()))
        };

        let a = marker();
        reg.add(&a);
        reg.add(&a);
        assert!(reg.contains(&a));
        assert_eq!(reg.len(), 1);

        reg.remove(&a);
        reg.remove(&a);
        assert!(!reg.contains(&a));

        let never: Overlay = KmlLayer::new("http://x/a.kml").into();
        reg.remove(&never);

        assert_eq!(
            *events.borrow(),
            vec![
                MembershipEvent::Insert(a.clone()),
                MembershipEvent::Remove(a)
            ]
        );
    }

    #[test]
    fn for_each_visits_every_member_once() {
        let reg = IdentityRegistry::new();
        let a = marker();
        let b = marker();
        reg.add(&a);
        reg.add(&b);
        let mut seen = Vec::new();
        reg.for_each(|o| seen.push(o.clone()));
        assert_eq!(seen.len(), 2);
        assert!(seen.contains(&a) && seen.contains(&b));
    }

    #[test]
    fn editing_handles_are_flagged_as_internal() {
        let m = Marker::new(LatLng::new(0.0, 0.0));
        assert!(!IdentityRegistry::likely_internal_object(&m.clone().into()));
        m.clickable().set(false);
        m.draggable().set(true);
        m.raise_on_drag().set(false);
        assert!(IdentityRegistry::likely_internal_object(&m.into()));
        let line: Overlay = Polyline::new(vec![]).into();
        assert!(!IdentityRegistry::likely_internal_object(&line));
    }

    #[test]
    fn dead_ids_are_swept_once_the_table_grows() {
        let registry = IdentityRegistry::new();
        let table_len = || registry.ids.borrow().entries.len();
        let line = || -> Overlay { Polyline::new(vec![LatLng::new(0.0, 0.0)]).into() };

        let keep = line();
        let kept_id = registry.get_id(&keep);
        let first: Vec<Overlay> = (0..1500).map(|_| line()).collect();
        for o in &first {
            registry.get_id(o);
        }
        // Everything is alive, so the sweep at 1025 entries kept all of them.
        assert_eq!(table_len(), 1501);
        drop(first);

        let second: Vec<Overlay> = (0..600).map(|_| line()).collect();
        let second_ids: Vec<_> = second.iter().map(|o| registry.get_id(o)).collect();
        assert_eq!(table_len(), 601);

        assert_eq!(registry.get_id(&keep), kept_id);
        let again: Vec<_> = second.iter().map(|o| registry.get_id(o)).collect();
        assert_eq!(again, second_ids);
        assert_eq!(table_len(), 601);
    }
}
