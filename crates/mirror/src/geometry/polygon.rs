use layers::polygon::Polygon;
use scene::components::{Geometry, LinearRing, Polygon as GlobePolygon};
use scene::feature::{Feature, Placemark};

use super::{Attached, area_style, follow};
use crate::path;

pub fn mirror(polygon: &Polygon) -> Attached {
    let placemark = Placemark::new();
    let ring = LinearRing::new();
    let coordinates = ring.coordinates.clone();
    placemark.set_geometry(Geometry::Polygon(GlobePolygon::with_outer(ring)));

    let mut subscriptions = path::bind(polygon.path(), &coordinates);
    {
        let placemark = placemark.clone();
        follow(&mut subscriptions, polygon.style(), move |style| {
            let area = area_style(style);
            placemark.update_style(|s| {
                s.line = area.line;
                s.poly = area.poly;
            });
        });
    }
    Attached::new(Feature::Placemark(placemark), subscriptions)
}
