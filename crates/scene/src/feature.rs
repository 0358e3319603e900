use std::cell::RefCell;
use std::rc::Rc;

use crate::components::{Geometry, Style};

#[derive(Debug, Default)]
struct PlacemarkData {
    name: String,
    visible: bool,
    geometry: Option<Geometry>,
    style: Option<Style>,
}

/// A named, styled geometry on the globe.
///
/// `Placemark` is a shared handle; clones refer to the same placemark.
#[derive(Debug, Clone)]
pub struct Placemark(Rc<RefCell<PlacemarkData>>);

impl Placemark {
    pub fn new() -> Self {
        Placemark(Rc::new(RefCell::new(PlacemarkData {
            visible: true,
            ..PlacemarkData::default()
        })))
    }

    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.0.borrow_mut().name = name.into();
    }

    pub fn is_visible(&self) -> bool {
        self.0.borrow().visible
    }

    pub fn set_visibility(&self, visible: bool) {
        self.0.borrow_mut().visible = visible;
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.0.borrow().geometry.clone()
    }

    pub fn set_geometry(&self, geometry: Geometry) {
        self.0.borrow_mut().geometry = Some(geometry);
    }

    pub fn style(&self) -> Option<Style> {
        self.0.borrow().style.clone()
    }

    pub fn set_style(&self, style: Style) {
        self.0.borrow_mut().style = Some(style);
    }

    /// Edits the style in place, starting from the default style if the
    /// placemark has none yet.
    pub fn update_style(&self, f: impl FnOnce(&mut Style)) {
        let mut data = self.0.borrow_mut();
        f(data.style.get_or_insert_with(Style::default));
    }

    pub fn ptr_eq(&self, other: &Placemark) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Placemark {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed KML document, attached to the globe as an opaque unit.
#[derive(Debug, Clone, PartialEq)]
pub struct KmlObject {
    url: Rc<str>,
    body: Rc<str>,
}

impl KmlObject {
    pub fn new(url: &str, body: &str) -> Self {
        Self {
            url: Rc::from(url),
            body: Rc::from(body),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Anything that can hang off the globe's feature tree.
#[derive(Debug, Clone)]
pub enum Feature {
    Placemark(Placemark),
    Kml(KmlObject),
}

impl Feature {
    pub fn as_placemark(&self) -> Option<&Placemark> {
        match self {
            Feature::Placemark(p) => Some(p),
            Feature::Kml(_) => None,
        }
    }

    pub fn as_kml(&self) -> Option<&KmlObject> {
        match self {
            Feature::Kml(k) => Some(k),
            Feature::Placemark(_) => None,
        }
    }
}
