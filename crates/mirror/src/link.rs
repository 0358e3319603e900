use std::cell::RefCell;
use std::rc::{Rc, Weak};

use layers::map::{Map, OverlayChange};
use runtime::event_bus::{Listeners, Subscription};
use runtime::frame::Frame;
use runtime::property::Property;
use scene::surface::GlobeSurface;
use tracing::info;

use crate::bootstrap::{BootstrapPoll, SurfaceBootstrap, SurfaceProvider};
use crate::config::MirrorConfig;
use crate::error::BootstrapError;
use crate::registry::IdentityRegistry;
use crate::scene_mirror::SceneMirror;
use crate::services::MirrorServices;
use crate::view::ViewTransitionController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// The globe surface is up and mirroring has started.
    Initialized,
}

struct Linked {
    surface: Rc<dyn GlobeSurface>,
    mirror: SceneMirror,
    view: ViewTransitionController,
    _options: Vec<Subscription>,
}

struct LinkInner {
    map: Map,
    registry: Rc<IdentityRegistry>,
    services: MirrorServices,
    config: Rc<MirrorConfig>,
    bootstrap: RefCell<SurfaceBootstrap>,
    linked: RefCell<Option<Linked>>,
    previous_map_type: RefCell<Option<String>>,
    atmosphere: Property<bool>,
    graticules: Property<bool>,
    events: Listeners<LinkEvent>,
}

/// Registers the globe as an extra map type on a [`Map`].
///
/// Map overlays are forwarded into the registry right away. Once the surface
/// bootstrap succeeds, a [`SceneMirror`] and a [`ViewTransitionController`]
/// are built and the map's type selector drives show and hide.
pub struct GlobeLink {
    inner: Rc<LinkInner>,
    _map_subscriptions: Vec<Subscription>,
}

impl GlobeLink {
    pub fn new(
        map: Map,
        registry: Rc<IdentityRegistry>,
        services: MirrorServices,
        config: Rc<MirrorConfig>,
        provider: SurfaceProvider,
    ) -> Self {
        let current_type = map.map_type_id().get();
        let previous_map_type = (current_type != config.map_type_name).then_some(current_type);
        let inner = Rc::new(LinkInner {
            bootstrap: RefCell::new(SurfaceBootstrap::new(&config.bootstrap, provider)),
            map,
            registry,
            services,
            config,
            linked: RefCell::new(None),
            previous_map_type: RefCell::new(previous_map_type),
            atmosphere: Property::new(true),
            graticules: Property::new(false),
            events: Listeners::new(),
        });

        for overlay in inner.map.overlays() {
            inner.registry.add(&overlay);
        }
        let overlays = {
            let registry = inner.registry.clone();
            inner.map.on_overlay_change(move |change| match change {
                OverlayChange::Added(o) => registry.add(o),
                OverlayChange::Removed(o) => registry.remove(o),
            })
        };
        let map_type = {
            let weak: Weak<LinkInner> = Rc::downgrade(&inner);
            inner.map.map_type_id().on_change(move |id| {
                if let Some(inner) = weak.upgrade() {
                    inner.map_type_changed(id);
                }
            })
        };

        Self {
            inner,
            _map_subscriptions: vec![overlays, map_type],
        }
    }

    /// Advances the surface bootstrap. Does nothing once linked.
    pub fn tick(&self, frame: Frame) -> Result<(), BootstrapError> {
        if self.is_ready() {
            return Ok(());
        }
        let poll = self.inner.bootstrap.borrow_mut().poll(frame)?;
        if let BootstrapPoll::Ready(surface) = poll {
            self.inner.initialize(surface);
        }
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.inner.linked.borrow().is_some()
    }

    pub fn registry(&self) -> &Rc<IdentityRegistry> {
        &self.inner.registry
    }

    pub fn scene_mirror(&self) -> Option<SceneMirror> {
        self.inner.linked.borrow().as_ref().map(|l| l.mirror.clone())
    }

    pub fn view(&self) -> Option<ViewTransitionController> {
        self.inner.linked.borrow().as_ref().map(|l| l.view.clone())
    }

    pub fn surface(&self) -> Option<Rc<dyn GlobeSurface>> {
        self.inner.linked.borrow().as_ref().map(|l| l.surface.clone())
    }

    /// Atmosphere glow on the globe. On by default.
    pub fn atmosphere(&self) -> &Property<bool> {
        &self.inner.atmosphere
    }

    /// Lat/lng grid on the globe. Off by default.
    pub fn graticules(&self) -> &Property<bool> {
        &self.inner.graticules
    }

    pub fn on_event(&self, f: impl Fn(&LinkEvent) + 'static) -> Subscription {
        self.inner.events.subscribe(f)
    }
}

impl LinkInner {
    fn initialize(&self, surface: Rc<dyn GlobeSurface>) {
        surface.set_window_visible(false);
        let mirror = SceneMirror::new(
            self.registry.clone(),
            surface.clone(),
            self.services.clone(),
            self.config.clone(),
        );
        let view =
            ViewTransitionController::new(self.map.clone(), surface.clone(), self.config.clone());
        if let Some(previous) = self.previous_map_type.borrow().as_deref() {
            view.set_previous_map_type(previous);
        }

        let atmosphere = {
            let surface = surface.clone();
            self.atmosphere
                .follow(move |on| surface.set_atmosphere_visible(*on))
        };
        let graticules = {
            let surface = surface.clone();
            self.graticules.follow(move |on| surface.set_grid_visible(*on))
        };

        view.jump_to_center();
        info!("globe linked: {} overlay(s) mirrored", mirror.len());
        *self.linked.borrow_mut() = Some(Linked {
            surface,
            mirror,
            view: view.clone(),
            _options: vec![atmosphere, graticules],
        });
        self.events.emit(&LinkEvent::Initialized);

        if self.map.map_type_id().get() == self.config.map_type_name {
            view.show();
        }
    }

    fn map_type_changed(&self, id: &str) {
        let view = self.linked.borrow().as_ref().map(|l| l.view.clone());
        if id == self.config.map_type_name {
            if let Some(view) = view {
                view.show();
            }
            return;
        }
        *self.previous_map_type.borrow_mut() = Some(id.to_string());
        if let Some(view) = view {
            view.set_previous_map_type(id);
            if view.is_showing() {
                view.hide();
            }
        }
    }
}
