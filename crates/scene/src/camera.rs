/// How the altitude of a look-at target is interpreted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AltitudeMode {
    #[default]
    ClampToGround,
    RelativeToGround,
    Absolute,
}

/// Camera pose expressed as a target point plus heading, tilt, and range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LookAt {
    pub lat: f64,
    pub lng: f64,
    pub altitude: f64,
    pub altitude_mode: AltitudeMode,
    /// Degrees clockwise from north.
    pub heading: f64,
    /// Degrees away from straight down.
    pub tilt: f64,
    /// Distance from the target in meters.
    pub range: f64,
}

impl LookAt {
    /// Straight-down view of a ground point.
    pub fn overhead(lat: f64, lng: f64, range: f64) -> Self {
        Self {
            lat,
            lng,
            altitude: 0.0,
            altitude_mode: AltitudeMode::ClampToGround,
            heading: 0.0,
            tilt: 0.0,
            range,
        }
    }

    pub(crate) fn lerp(&self, to: &LookAt, t: f64) -> LookAt {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        LookAt {
            lat: mix(self.lat, to.lat),
            lng: mix(self.lng, to.lng),
            altitude: mix(self.altitude, to.altitude),
            altitude_mode: to.altitude_mode,
            heading: mix(self.heading, to.heading),
            tilt: mix(self.tilt, to.tilt),
            range: mix(self.range, to.range),
        }
    }
}

/// How fast the camera moves to a new view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FlySpeed {
    /// Jump straight to the new view.
    Teleport,
    /// Animate; larger is faster. A flight at rate `r` lasts `1 / r` seconds.
    Rate(f64),
}

#[cfg(test)]
mod tests {
    use super::{AltitudeMode, LookAt};

    #[test]
    fn overhead_is_flat_and_ground_clamped() {
        let l = LookAt::overhead(1.0, 2.0, 300.0);
        assert_eq!(l.heading, 0.0);
        assert_eq!(l.tilt, 0.0);
        assert_eq!(l.altitude_mode, AltitudeMode::ClampToGround);
    }

    #[test]
    fn lerp_endpoints() {
        let mut a = LookAt::overhead(0.0, 0.0, 100.0);
        a.heading = 90.0;
        let b = LookAt::overhead(10.0, 20.0, 300.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5).range, 200.0);
    }
}
