use foundation::math::Coord;

use crate::components::CoordArray;

/// Closed ring of coordinates (a polygon boundary).
#[derive(Debug, Clone, Default)]
pub struct LinearRing {
    pub coordinates: CoordArray,
}

impl LinearRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_coords(coords: impl IntoIterator<Item = Coord>) -> Self {
        Self {
            coordinates: CoordArray::from_coords(coords),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineString {
    pub coordinates: CoordArray,
    /// Follow the terrain between vertices instead of cutting straight lines.
    pub tessellate: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Polygon {
    pub outer_boundary: Option<LinearRing>,
}

impl Polygon {
    pub fn with_outer(outer: LinearRing) -> Self {
        Self {
            outer_boundary: Some(outer),
        }
    }
}

/// Geometry carried by a placemark.
///
/// Coordinate sequences are shared handles: cloning a geometry shares them.
#[derive(Debug, Clone)]
pub enum Geometry {
    Point(Coord),
    LineString(LineString),
    Polygon(Polygon),
}

impl Geometry {
    /// The coordinate sequence a mirror keeps in sync: the line itself or the
    /// outer boundary of a polygon.
    pub fn path_coordinates(&self) -> Option<CoordArray> {
        match self {
            Geometry::Point(_) => None,
            Geometry::LineString(line) => Some(line.coordinates.clone()),
            Geometry::Polygon(poly) => poly.outer_boundary.as_ref().map(|r| r.coordinates.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Geometry, LineString, LinearRing, Polygon};
    use foundation::math::Coord;

    #[test]
    fn path_coordinates_share_storage() {
        let line = LineString::default();
        let geom = Geometry::LineString(line.clone());
        let coords = geom.path_coordinates().expect("line has coordinates");
        coords.push_back(Coord::ground(1.0, 1.0));
        assert_eq!(line.coordinates.len(), 1);
    }

    #[test]
    fn points_and_empty_polygons_have_no_path() {
        assert!(Geometry::Point(Coord::ground(0.0, 0.0)).path_coordinates().is_none());
        assert!(Geometry::Polygon(Polygon::default()).path_coordinates().is_none());
        let ring = LinearRing::from_coords([Coord::ground(0.0, 0.0)]);
        let poly = Geometry::Polygon(Polygon::with_outer(ring));
        assert_eq!(poly.path_coordinates().map(|c| c.len()), Some(1));
    }
}
