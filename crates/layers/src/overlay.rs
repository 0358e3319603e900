use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::circle::Circle;
use crate::kml::KmlLayer;
use crate::marker::Marker;
use crate::polygon::Polygon;
use crate::polyline::Polyline;
use crate::rectangle::Rectangle;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Marker,
    Polyline,
    Polygon,
    Circle,
    Rectangle,
    KmlLayer,
    Unsupported,
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OverlayKind::Marker => "marker",
            OverlayKind::Polyline => "polyline",
            OverlayKind::Polygon => "polygon",
            OverlayKind::Circle => "circle",
            OverlayKind::Rectangle => "rectangle",
            OverlayKind::KmlLayer => "kml layer",
            OverlayKind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub(crate) struct UnsupportedState {
    type_name: String,
}

/// An overlay type the map can show but the globe has no mirror for
/// (ground overlays, info windows, ...).
#[derive(Debug, Clone)]
pub struct UnsupportedOverlay(pub(crate) Rc<UnsupportedState>);

impl UnsupportedOverlay {
    pub fn new(type_name: impl Into<String>) -> Self {
        UnsupportedOverlay(Rc::new(UnsupportedState {
            type_name: type_name.into(),
        }))
    }

    pub fn type_name(&self) -> &str {
        &self.0.type_name
    }
}

/// Address-based identity of a live overlay object.
///
/// Only meaningful while the object is alive; pair it with a [`WeakOverlay`]
/// to detect reuse of the address after the object is gone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(usize);

/// A drawable object owned by the 2-D map.
///
/// Every variant is a shared handle; clones refer to the same object and
/// compare equal.
#[derive(Debug, Clone)]
pub enum Overlay {
    Marker(Marker),
    Polyline(Polyline),
    Polygon(Polygon),
    Circle(Circle),
    Rectangle(Rectangle),
    KmlLayer(KmlLayer),
    Unsupported(UnsupportedOverlay),
}

impl Overlay {
    pub fn kind(&self) -> OverlayKind {
        match self {
            Overlay::Marker(_) => OverlayKind::Marker,
            Overlay::Polyline(_) => OverlayKind::Polyline,
            Overlay::Polygon(_) => OverlayKind::Polygon,
            Overlay::Circle(_) => OverlayKind::Circle,
            Overlay::Rectangle(_) => OverlayKind::Rectangle,
            Overlay::KmlLayer(_) => OverlayKind::KmlLayer,
            Overlay::Unsupported(_) => OverlayKind::Unsupported,
        }
    }

    pub fn object_key(&self) -> ObjectKey {
        ObjectKey(Rc::as_ptr(&self.as_any()) as *const () as usize)
    }

    pub fn downgrade(&self) -> WeakOverlay {
        WeakOverlay(Rc::downgrade(&self.as_any()))
    }

    fn as_any(&self) -> Rc<dyn Any> {
        match self {
            Overlay::Marker(o) => o.0.clone() as Rc<dyn Any>,
            Overlay::Polyline(o) => o.0.clone() as Rc<dyn Any>,
            Overlay::Polygon(o) => o.0.clone() as Rc<dyn Any>,
            Overlay::Circle(o) => o.0.clone() as Rc<dyn Any>,
            Overlay::Rectangle(o) => o.0.clone() as Rc<dyn Any>,
            Overlay::KmlLayer(o) => o.0.clone() as Rc<dyn Any>,
            Overlay::Unsupported(o) => o.0.clone() as Rc<dyn Any>,
        }
    }
}

impl PartialEq for Overlay {
    fn eq(&self, other: &Self) -> bool {
        self.object_key() == other.object_key()
    }
}

impl Eq for Overlay {}

/// Non-owning reference to an overlay.
#[derive(Debug, Clone)]
pub struct WeakOverlay(Weak<dyn Any>);

impl WeakOverlay {
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

macro_rules! overlay_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Overlay {
            fn from(o: $ty) -> Self {
                Overlay::$variant(o)
            }
        })*
    };
}

overlay_from! {
    Marker => Marker,
    Polyline => Polyline,
    Polygon => Polygon,
    Circle => Circle,
    Rectangle => Rectangle,
    KmlLayer => KmlLayer,
    UnsupportedOverlay => Unsupported,
}
