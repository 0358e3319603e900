use std::cell::Cell;
use std::rc::{Rc, Weak};

use foundation::math::{Coord, LatLng};
use layers::circle::Circle;
use layers::symbology::ShapeAttributes;
use runtime::event_bus::Subscription;
use scene::components::{Geometry, LinearRing, Polygon};
use scene::feature::{Feature, Placemark};

use super::{Attached, area_style, follow};
use crate::circle::approximate;

pub fn mirror(circle: &Circle, meters_per_degree: f64) -> Attached {
    let placemark = Placemark::new();
    let center = Rc::new(Cell::new(circle.center().get()));
    let radius_m = Rc::new(Cell::new(circle.radius().get()));

    let rebuild = {
        let placemark = placemark.clone();
        let center = center.clone();
        let radius_m = radius_m.clone();
        Rc::new(move || {
            let c = center.get();
            let ring = approximate(c.lat, c.lng, radius_m.get() / meters_per_degree);
            let ring = LinearRing::from_coords(ring.iter().map(|p| Coord::from(*p)));
            placemark.set_geometry(Geometry::Polygon(Polygon::with_outer(ring)));
        })
    };

    let mut subscriptions = Vec::new();
    {
        let rebuild = rebuild.clone();
        follow(&mut subscriptions, circle.center(), move |c: &LatLng| {
            center.set(*c);
            rebuild();
        });
    }
    follow(&mut subscriptions, circle.radius(), move |r: &f64| {
        radius_m.set(*r);
        rebuild();
    });
    follow_shape_style(&mut subscriptions, circle.attributes(), &placemark);

    Attached::new(Feature::Placemark(placemark), subscriptions)
}

/// Recomputes the placemark's stroke and fill whenever any of the five
/// shape attributes changes.
pub(crate) fn follow_shape_style(
    subscriptions: &mut Vec<Subscription>,
    attributes: &Rc<ShapeAttributes>,
    placemark: &Placemark,
) {
    // The listeners live inside `attributes`, so they must not own it.
    let restyle = {
        let attributes: Weak<ShapeAttributes> = Rc::downgrade(attributes);
        let placemark = placemark.clone();
        Rc::new(move || {
            let Some(attributes) = attributes.upgrade() else {
                return;
            };
            let area = area_style(&attributes.snapshot());
            placemark.update_style(|s| {
                s.line = area.line;
                s.poly = area.poly;
            });
        })
    };
    let r = restyle.clone();
    follow(subscriptions, &attributes.stroke_color, move |_| r());
    let r = restyle.clone();
    follow(subscriptions, &attributes.stroke_opacity, move |_| r());
    let r = restyle.clone();
    follow(subscriptions, &attributes.stroke_weight, move |_| r());
    let r = restyle.clone();
    follow(subscriptions, &attributes.fill_color, move |_| r());
    follow(subscriptions, &attributes.fill_opacity, move |_| restyle());
}

#[cfg(test)]
mod tests {
    use super::mirror;
    use foundation::math::LatLng;
    use layers::circle::Circle;
    use scene::components::Geometry;
    use scene::feature::Placemark;

    fn ring_of(placemark: &Placemark) -> Vec<foundation::math::Coord> {
        match placemark.geometry() {
            Some(Geometry::Polygon(p)) => p.outer_boundary.unwrap().coordinates.to_vec(),
            other => panic!("expected a polygon, got {other:?}"),
        }
    }

    #[test]
    fn ring_follows_center_and_radius() {
        let circle = Circle::new(LatLng::new(10.0, 20.0), 50_000.0);
        let attached = mirror(&circle, 100_000.0);
        let placemark = attached.placemark().cloned().unwrap();

        let ring = ring_of(&placemark);
        assert_eq!(ring.len(), 25);
        assert_eq!(ring[0].lat, 10.5);

        circle.radius().set(100_000.0);
        assert_eq!(ring_of(&placemark)[0].lat, 11.0);

        circle.center().set(LatLng::new(0.0, 0.0));
        let ring = ring_of(&placemark);
        assert_eq!(ring.len(), 25);
        assert_eq!(ring[0].lat, 1.0);
        assert_eq!(ring[0].lng, 0.0);
    }

    #[test]
    fn each_style_attribute_is_followed() {
        let circle = Circle::new(LatLng::new(0.0, 0.0), 1.0);
        let attached = mirror(&circle, 100_000.0);
        assert_eq!(attached.subscriptions.len(), 7);
        assert_eq!(circle.listener_count(), 7);

        let placemark = attached.placemark().cloned().unwrap();
        circle.attributes().fill_opacity.set(Some(1.0));
        assert_eq!(placemark.style().unwrap().poly.color.to_hex(), "ff000000");

        drop(attached);
        assert_eq!(circle.listener_count(), 0);
    }
}
