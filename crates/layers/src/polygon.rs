use std::rc::Rc;

use foundation::math::LatLng;
use runtime::array::ObservableVec;
use runtime::property::Property;

use crate::symbology::ShapeStyle;

#[derive(Debug)]
pub(crate) struct PolygonState {
    path: ObservableVec<LatLng>,
    style: Property<ShapeStyle>,
}

/// Filled area bounded by a single path. The closing edge is implicit.
#[derive(Debug, Clone)]
pub struct Polygon(pub(crate) Rc<PolygonState>);

impl Polygon {
    pub fn new(path: Vec<LatLng>) -> Self {
        Polygon(Rc::new(PolygonState {
            path: ObservableVec::from_vec(path),
            style: Property::default(),
        }))
    }

    pub fn with_style(self, style: ShapeStyle) -> Self {
        self.style().set(style);
        self
    }

    pub fn path(&self) -> &ObservableVec<LatLng> {
        &self.0.path
    }

    pub fn style(&self) -> &Property<ShapeStyle> {
        &self.0.style
    }

    pub fn listener_count(&self) -> usize {
        self.path().listener_count() + self.style().listener_count()
    }
}
