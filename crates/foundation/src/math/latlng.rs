/// A geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A geographic position in degrees plus an altitude in meters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lng: f64,
    pub alt: f64,
}

impl Coord {
    pub const fn new(lat: f64, lng: f64, alt: f64) -> Self {
        Self { lat, lng, alt }
    }

    /// Coordinate sitting on the ground (zero altitude).
    pub const fn ground(lat: f64, lng: f64) -> Self {
        Self::new(lat, lng, 0.0)
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

impl From<LatLng> for Coord {
    fn from(p: LatLng) -> Self {
        Coord::ground(p.lat, p.lng)
    }
}
