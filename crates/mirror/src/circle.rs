use std::f64::consts::PI;

use foundation::math::LatLng;

/// Vertex count of a mirrored circle's ring.
pub const CIRCLE_SEGMENTS: usize = 25;

/// Ring of [`CIRCLE_SEGMENTS`] points around a center, radius in degrees.
///
/// Offsets are applied to latitude and longitude alike, so the ring is only
/// round near the equator and for small radii.
pub fn approximate(center_lat: f64, center_lng: f64, radius_deg: f64) -> [LatLng; CIRCLE_SEGMENTS] {
    std::array::from_fn(|k| {
        let theta = 2.0 * PI * k as f64 / CIRCLE_SEGMENTS as f64;
        LatLng::new(
            center_lat + radius_deg * theta.cos(),
            center_lng + radius_deg * theta.sin(),
        )
    })
}
