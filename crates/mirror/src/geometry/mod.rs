//! One mirroring routine per overlay kind.
//!
//! Each routine builds the globe feature for an overlay and returns it along
//! with the subscriptions that keep it current. Attribute subscriptions go
//! through [`follow`], which applies the current value before returning.

use layers::symbology::ShapeStyle;
use runtime::event_bus::Subscription;
use runtime::property::Property;
use scene::components::{LineStyle, PolyStyle, Style, to_packed_color};
use scene::feature::{Feature, Placemark};

pub mod circle;
pub mod kml;
pub mod marker;
pub mod polygon;
pub mod polyline;
pub mod rectangle;

const DEFAULT_COLOR: &str = "000000";
const DEFAULT_STROKE_OPACITY: f64 = 1.0;
const DEFAULT_STROKE_WEIGHT: f64 = 2.0;
const DEFAULT_FILL_OPACITY: f64 = 0.5;

/// Output of a mirroring routine.
///
/// `feature` is `None` while the globe feature is still being produced
/// asynchronously.
#[derive(Debug)]
pub struct Attached {
    pub feature: Option<Feature>,
    pub subscriptions: Vec<Subscription>,
}

impl Attached {
    pub fn new(feature: Feature, subscriptions: Vec<Subscription>) -> Self {
        Self {
            feature: Some(feature),
            subscriptions,
        }
    }

    pub fn pending(subscriptions: Vec<Subscription>) -> Self {
        Self {
            feature: None,
            subscriptions,
        }
    }

    pub fn placemark(&self) -> Option<&Placemark> {
        self.feature.as_ref().and_then(Feature::as_placemark)
    }
}

pub(crate) fn follow<T: Clone + 'static>(
    subscriptions: &mut Vec<Subscription>,
    property: &Property<T>,
    f: impl Fn(&T) + 'static,
) {
    subscriptions.push(property.follow(f));
}

pub(crate) fn line_style(style: &ShapeStyle) -> LineStyle {
    LineStyle {
        color: to_packed_color(
            Some(style.stroke_color.as_deref().unwrap_or(DEFAULT_COLOR)),
            style.stroke_opacity.unwrap_or(DEFAULT_STROKE_OPACITY),
        ),
        width: style.stroke_weight.unwrap_or(DEFAULT_STROKE_WEIGHT),
    }
}

pub(crate) fn poly_style(style: &ShapeStyle) -> PolyStyle {
    PolyStyle {
        color: to_packed_color(
            Some(style.fill_color.as_deref().unwrap_or(DEFAULT_COLOR)),
            style.fill_opacity.unwrap_or(DEFAULT_FILL_OPACITY),
        ),
    }
}

/// Stroke plus fill, for closed shapes.
pub(crate) fn area_style(style: &ShapeStyle) -> Style {
    Style {
        line: line_style(style),
        poly: poly_style(style),
        ..Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{area_style, line_style};
    use layers::symbology::ShapeStyle;
    use scene::components::PackedColor;

    #[test]
    fn unset_style_falls_back_to_black() {
        let line = line_style(&ShapeStyle::default());
        assert_eq!(line.color, PackedColor::new(0xff, 0, 0, 0));
        assert_eq!(line.width, 2.0);

        let area = area_style(&ShapeStyle::default());
        assert_eq!(area.poly.color.to_hex(), "7f000000");
    }

    #[test]
    fn explicit_style_is_packed() {
        let line = line_style(&ShapeStyle::stroke("#00ff00", 0.5, 5.0));
        assert_eq!(line.color.to_hex(), "7f00ff00");
        assert_eq!(line.width, 5.0);
    }
}
