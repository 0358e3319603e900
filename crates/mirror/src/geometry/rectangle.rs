use foundation::bounds::LatLngBounds;
use foundation::math::Coord;
use layers::rectangle::Rectangle;
use scene::components::{Geometry, LinearRing, Polygon};
use scene::feature::{Feature, Placemark};

use super::circle::follow_shape_style;
use super::{Attached, follow};

pub fn mirror(rect: &Rectangle) -> Attached {
    let placemark = Placemark::new();
    let ring = LinearRing::new();
    let coordinates = ring.coordinates.clone();
    placemark.set_geometry(Geometry::Polygon(Polygon::with_outer(ring)));

    let mut subscriptions = Vec::new();
    follow(&mut subscriptions, rect.bounds(), move |b: &LatLngBounds| {
        coordinates.clear();
        for c in closed_ring(b) {
            coordinates.push_back(c);
        }
    });
    follow_shape_style(&mut subscriptions, rect.attributes(), &placemark);

    Attached::new(Feature::Placemark(placemark), subscriptions)
}

fn closed_ring(b: &LatLngBounds) -> [Coord; 5] {
    let (sw, ne) = (b.south_west, b.north_east);
    [
        Coord::ground(sw.lat, sw.lng),
        Coord::ground(ne.lat, sw.lng),
        Coord::ground(ne.lat, ne.lng),
        Coord::ground(sw.lat, ne.lng),
        Coord::ground(sw.lat, sw.lng),
    ]
}
