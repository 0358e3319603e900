use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use foundation::ids::TrackedId;
use layers::kml::KmlLayer;
use layers::overlay::{Overlay, WeakOverlay};
use runtime::event_bus::Subscription;
use scene::entity::NodeId;
use scene::feature::{Feature, KmlObject};
use scene::surface::GlobeSurface;
use tracing::{debug, warn};

use crate::config::MirrorConfig;
use crate::geometry::{self, Attached};
use crate::registry::{IdentityRegistry, MembershipEvent};
use crate::services::MirrorServices;

#[derive(Debug)]
struct MirrorEntry {
    overlay: Overlay,
    /// `None` while an asynchronous attach is outstanding.
    node: Option<NodeId>,
    subscriptions: Vec<Subscription>,
    epoch: u64,
}

/// A fetched document, kept only while its layer is alive.
#[derive(Debug)]
struct CachedKml {
    layer: WeakOverlay,
    doc: KmlObject,
}

#[derive(Debug, Default)]
struct MirrorState {
    entries: HashMap<TrackedId, MirrorEntry>,
    owners: HashMap<NodeId, Overlay>,
    kml_cache: HashMap<TrackedId, CachedKml>,
    next_epoch: u64,
}

impl MirrorState {
    fn prune_kml_cache(&mut self) {
        self.kml_cache.retain(|_, cached| cached.layer.is_alive());
    }
}

struct MirrorInner {
    registry: Rc<IdentityRegistry>,
    surface: Rc<dyn GlobeSurface>,
    services: MirrorServices,
    config: Rc<MirrorConfig>,
    state: RefCell<MirrorState>,
}

/// Mirrors every registry member onto the globe.
///
/// On construction the current members are attached; after that the mirror
/// follows the registry's insert and remove notifications. Each attached
/// overlay owns one globe feature plus the subscriptions that keep it in
/// sync, and removing the overlay releases both.
///
/// Clones share the same mirror.
#[derive(Clone)]
pub struct SceneMirror {
    inner: Rc<MirrorInner>,
    _membership: Rc<Subscription>,
}

impl SceneMirror {
    pub fn new(
        registry: Rc<IdentityRegistry>,
        surface: Rc<dyn GlobeSurface>,
        services: MirrorServices,
        config: Rc<MirrorConfig>,
    ) -> Self {
        let inner = Rc::new(MirrorInner {
            registry: registry.clone(),
            surface,
            services,
            config,
            state: RefCell::new(MirrorState::default()),
        });
        registry.for_each(|overlay| inner.insert(overlay));

        let weak = Rc::downgrade(&inner);
        let membership = registry.subscribe(move |event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            match event {
                MembershipEvent::Insert(o) => inner.insert(o),
                MembershipEvent::Remove(o) => inner.remove(o),
            }
        });
        Self {
            inner,
            _membership: Rc::new(membership),
        }
    }

    pub fn insert(&self, overlay: &Overlay) {
        self.inner.insert(overlay);
    }

    pub fn remove(&self, overlay: &Overlay) {
        self.inner.remove(overlay);
    }

    pub fn is_attached(&self, overlay: &Overlay) -> bool {
        let id = self.inner.registry.get_id(overlay);
        self.inner.state.borrow().entries.contains_key(&id)
    }

    /// Globe node of an attached overlay; `None` while it is still loading.
    pub fn node_of(&self, overlay: &Overlay) -> Option<NodeId> {
        let id = self.inner.registry.get_id(overlay);
        self.inner.state.borrow().entries.get(&id).and_then(|e| e.node)
    }

    pub fn overlay_of_node(&self, node: NodeId) -> Option<Overlay> {
        self.inner.state.borrow().owners.get(&node).cloned()
    }

    pub fn subscription_count(&self, overlay: &Overlay) -> usize {
        let id = self.inner.registry.get_id(overlay);
        self.inner
            .state
            .borrow()
            .entries
            .get(&id)
            .map_or(0, |e| e.subscriptions.len())
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cached KML documents whose layers are still alive.
    pub fn cached_kml_count(&self) -> usize {
        let mut state = self.inner.state.borrow_mut();
        state.prune_kml_cache();
        state.kml_cache.len()
    }
}

impl MirrorInner {
    fn insert(self: &Rc<Self>, overlay: &Overlay) {
        if IdentityRegistry::likely_internal_object(overlay) {
            debug!("skipping {} that looks like a map editing handle", overlay.kind());
            return;
        }
        if let Overlay::Unsupported(u) = overlay {
            warn!("no globe mirror for overlay type {}", u.type_name());
            return;
        }

        let id = self.registry.get_id(overlay);
        let epoch = {
            let mut state = self.state.borrow_mut();
            if state.entries.contains_key(&id) {
                return;
            }
            state.next_epoch += 1;
            let epoch = state.next_epoch;
            // Placeholder first: a routine may complete synchronously.
            state.entries.insert(
                id,
                MirrorEntry {
                    overlay: overlay.clone(),
                    node: None,
                    subscriptions: Vec::new(),
                    epoch,
                },
            );
            epoch
        };

        let attached = match overlay {
            Overlay::Marker(m) => {
                geometry::marker::mirror(m, &self.services.images, &self.config)
            }
            Overlay::Polyline(p) => geometry::polyline::mirror(p),
            Overlay::Polygon(p) => geometry::polygon::mirror(p),
            Overlay::Circle(c) => geometry::circle::mirror(c, self.config.circle_meters_per_degree),
            Overlay::Rectangle(r) => geometry::rectangle::mirror(r),
            Overlay::KmlLayer(layer) => self.mirror_kml(id, epoch, overlay, layer),
            Overlay::Unsupported(_) => return,
        };
        self.store(id, epoch, attached);
    }

    fn store(&self, id: TrackedId, epoch: u64, attached: Attached) {
        let node = attached.feature.map(|f| self.surface.append_feature(f));
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        match state.entries.get_mut(&id) {
            Some(entry) if entry.epoch == epoch => {
                entry.subscriptions.extend(attached.subscriptions);
                if let Some(node) = node {
                    entry.node = Some(node);
                    state.owners.insert(node, entry.overlay.clone());
                }
            }
            _ => {
                // Removed while its routine was still running.
                if let Some(node) = node {
                    self.surface.remove_feature(node);
                }
            }
        }
    }

    fn mirror_kml(
        self: &Rc<Self>,
        id: TrackedId,
        epoch: u64,
        overlay: &Overlay,
        layer: &KmlLayer,
    ) -> Attached {
        let cached = {
            let mut state = self.state.borrow_mut();
            state.prune_kml_cache();
            state.kml_cache.get(&id).map(|c| c.doc.clone())
        };
        let weak = Rc::downgrade(self);
        let owner = overlay.downgrade();
        geometry::kml::mirror(layer, cached, self.services.kml.as_ref(), move |doc| {
            if let Some(inner) = weak.upgrade() {
                inner.deliver_kml(id, epoch, owner, doc);
            }
        })
    }

    fn deliver_kml(&self, id: TrackedId, epoch: u64, owner: WeakOverlay, doc: KmlObject) {
        {
            let mut state = self.state.borrow_mut();
            state.prune_kml_cache();
            if owner.is_alive() {
                state.kml_cache.insert(
                    id,
                    CachedKml {
                        layer: owner,
                        doc: doc.clone(),
                    },
                );
            }
            let current = state
                .entries
                .get(&id)
                .is_some_and(|e| e.epoch == epoch && e.node.is_none());
            if !current {
                debug!("discarding kml for {id}: layer was detached or re-attached");
                return;
            }
        }
        let node = self.surface.append_feature(Feature::Kml(doc));
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        if let Some(entry) = state.entries.get_mut(&id) {
            entry.node = Some(node);
            state.owners.insert(node, entry.overlay.clone());
        }
    }

    fn remove(&self, overlay: &Overlay) {
        let id = self.registry.get_id(overlay);
        let entry = {
            let mut state = self.state.borrow_mut();
            let Some(entry) = state.entries.remove(&id) else {
                drop(state);
                if IdentityRegistry::likely_internal_object(overlay)
                    || matches!(overlay, Overlay::Unsupported(_))
                {
                    debug!("ignoring removal of unmirrored {}", overlay.kind());
                } else {
                    warn!("remove of {} {id} which was never mirrored", overlay.kind());
                }
                return;
            };
            if let Some(node) = entry.node {
                state.owners.remove(&node);
            }
            entry
        };
        let MirrorEntry {
            node,
            subscriptions,
            ..
        } = entry;
        drop(subscriptions);
        if let Some(node) = node {
            self.surface.remove_feature(node);
        }
    }
}
