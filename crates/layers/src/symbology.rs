use runtime::property::Property;

/// Stroke and fill attributes of a vector overlay, as the 2-D map states
/// them. `None` means "not set"; consumers apply their own defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeStyle {
    pub stroke_color: Option<String>,
    pub stroke_opacity: Option<f64>,
    pub stroke_weight: Option<f64>,
    pub fill_color: Option<String>,
    pub fill_opacity: Option<f64>,
}

impl ShapeStyle {
    pub fn stroke(color: &str, opacity: f64, weight: f64) -> Self {
        Self {
            stroke_color: Some(color.to_string()),
            stroke_opacity: Some(opacity),
            stroke_weight: Some(weight),
            ..Self::default()
        }
    }

    pub fn with_fill(mut self, color: &str, opacity: f64) -> Self {
        self.fill_color = Some(color.to_string());
        self.fill_opacity = Some(opacity);
        self
    }
}

/// Stroke and fill attributes held as five independently observable
/// properties (circles and rectangles notify per attribute).
#[derive(Debug, Default)]
pub struct ShapeAttributes {
    pub stroke_color: Property<Option<String>>,
    pub stroke_opacity: Property<Option<f64>>,
    pub stroke_weight: Property<Option<f64>>,
    pub fill_color: Property<Option<String>>,
    pub fill_opacity: Property<Option<f64>>,
}

impl ShapeAttributes {
    pub fn from_style(style: ShapeStyle) -> Self {
        Self {
            stroke_color: Property::new(style.stroke_color),
            stroke_opacity: Property::new(style.stroke_opacity),
            stroke_weight: Property::new(style.stroke_weight),
            fill_color: Property::new(style.fill_color),
            fill_opacity: Property::new(style.fill_opacity),
        }
    }

    pub fn snapshot(&self) -> ShapeStyle {
        ShapeStyle {
            stroke_color: self.stroke_color.get(),
            stroke_opacity: self.stroke_opacity.get(),
            stroke_weight: self.stroke_weight.get(),
            fill_color: self.fill_color.get(),
            fill_opacity: self.fill_opacity.get(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.stroke_color.listener_count()
            + self.stroke_opacity.listener_count()
            + self.stroke_weight.listener_count()
            + self.fill_color.listener_count()
            + self.fill_opacity.listener_count()
    }
}

#[cfg(test)]
mod tests {
    use super::{ShapeAttributes, ShapeStyle};

    #[test]
    fn snapshot_reflects_individual_sets() {
        let attrs = ShapeAttributes::from_style(ShapeStyle::stroke("#123456", 0.8, 3.0));
        attrs.fill_opacity.set(Some(0.2));
        let s = attrs.snapshot();
        assert_eq!(s.stroke_color.as_deref(), Some("#123456"));
        assert_eq!(s.stroke_weight, Some(3.0));
        assert_eq!(s.fill_opacity, Some(0.2));
        assert_eq!(s.fill_color, None);
    }
}
