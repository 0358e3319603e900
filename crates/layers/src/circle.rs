use std::rc::Rc;

use foundation::math::LatLng;
use runtime::property::Property;

use crate::symbology::{ShapeAttributes, ShapeStyle};

#[derive(Debug)]
pub(crate) struct CircleState {
    center: Property<LatLng>,
    radius: Property<f64>,
    attributes: Rc<ShapeAttributes>,
}

/// Circle with a radius in meters.
#[derive(Debug, Clone)]
pub struct Circle(pub(crate) Rc<CircleState>);

impl Circle {
    pub fn new(center: LatLng, radius_m: f64) -> Self {
        Circle(Rc::new(CircleState {
            center: Property::new(center),
            radius: Property::new(radius_m),
            attributes: Rc::new(ShapeAttributes::default()),
        }))
    }

    pub fn with_style(self, style: ShapeStyle) -> Self {
        set_attributes(&self.0.attributes, style);
        self
    }

    pub fn center(&self) -> &Property<LatLng> {
        &self.0.center
    }

    /// Radius in meters.
    pub fn radius(&self) -> &Property<f64> {
        &self.0.radius
    }

    pub fn attributes(&self) -> &Rc<ShapeAttributes> {
        &self.0.attributes
    }

    pub fn listener_count(&self) -> usize {
        self.center().listener_count()
            + self.radius().listener_count()
            + self.attributes().listener_count()
    }
}

pub(crate) fn set_attributes(attrs: &ShapeAttributes, style: ShapeStyle) {
    attrs.stroke_color.set(style.stroke_color);
    attrs.stroke_opacity.set(style.stroke_opacity);
    attrs.stroke_weight.set(style.stroke_weight);
    attrs.fill_color.set(style.fill_color);
    attrs.fill_opacity.set(style.fill_opacity);
}
