use layers::polyline::Polyline;
use scene::components::{CoordArray, Geometry, LineString};
use scene::feature::{Feature, Placemark};

use super::{Attached, follow, line_style};
use crate::path;

pub fn mirror(line: &Polyline) -> Attached {
    let placemark = Placemark::new();
    let coordinates = CoordArray::new();
    placemark.set_geometry(Geometry::LineString(LineString {
        coordinates: coordinates.clone(),
        tessellate: true,
    }));

    let mut subscriptions = path::bind(line.path(), &coordinates);
    {
        let placemark = placemark.clone();
        follow(&mut subscriptions, line.style(), move |style| {
            let line = line_style(style);
            placemark.update_style(|s| s.line = line);
        });
    }
    Attached::new(Feature::Placemark(placemark), subscriptions)
}

#[cfg(test)]
mod tests {
    use super::mirror;
    use foundation::math::LatLng;
    use layers::polyline::Polyline;
    use layers::symbology::ShapeStyle;
    use scene::components::Geometry;

    #[test]
    fn three_point_path_gives_four_subscriptions() {
        let line = Polyline::new(vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(2.0, 0.0),
        ]);
        let attached = mirror(&line);
        assert_eq!(attached.subscriptions.len(), 4);
        assert_eq!(line.listener_count(), 4);

        let placemark = attached.placemark().cloned().unwrap();
        let Some(Geometry::LineString(ls)) = placemark.geometry() else {
            panic!("expected a line string");
        };
        assert!(ls.tessellate);
        assert_eq!(ls.coordinates.len(), 3);

        drop(attached);
        assert_eq!(line.listener_count(), 0);
    }

    #[test]
    fn style_changes_reach_the_placemark() {
        let line = Polyline::new(vec![]);
        let attached = mirror(&line);
        let placemark = attached.placemark().cloned().unwrap();
        assert_eq!(placemark.style().unwrap().line.width, 2.0);

        line.style().set(ShapeStyle::stroke("#fff", 1.0, 6.0));
        let style = placemark.style().unwrap();
        assert_eq!(style.line.width, 6.0);
        assert_eq!(style.line.color.to_hex(), "ffffffff");
    }
}
