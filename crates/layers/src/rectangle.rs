use std::rc::Rc;

use foundation::bounds::LatLngBounds;
use runtime::property::Property;

use crate::circle::set_attributes;
use crate::symbology::{ShapeAttributes, ShapeStyle};

#[derive(Debug)]
pub(crate) struct RectangleState {
    bounds: Property<LatLngBounds>,
    attributes: Rc<ShapeAttributes>,
}

/// Axis-aligned lat/lng rectangle.
#[derive(Debug, Clone)]
pub struct Rectangle(pub(crate) Rc<RectangleState>);

impl Rectangle {
    pub fn new(bounds: LatLngBounds) -> Self {
        Rectangle(Rc::new(RectangleState {
            bounds: Property::new(bounds),
            attributes: Rc::new(ShapeAttributes::default()),
        }))
    }

    pub fn with_style(self, style: ShapeStyle) -> Self {
        set_attributes(&self.0.attributes, style);
        self
    }

    pub fn bounds(&self) -> &Property<LatLngBounds> {
        &self.0.bounds
    }

    pub fn attributes(&self) -> &Rc<ShapeAttributes> {
        &self.0.attributes
    }

    pub fn listener_count(&self) -> usize {
        self.bounds().listener_count() + self.attributes().listener_count()
    }
}
