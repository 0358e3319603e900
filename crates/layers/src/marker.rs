use std::rc::Rc;

use foundation::math::LatLng;
use runtime::property::Property;

/// Pixel dimensions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pixel offset from the top-left corner of an image.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Marker image. Missing size or anchor are derived from the loaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerIcon {
    pub url: String,
    pub size: Option<Size>,
    pub anchor: Option<Point>,
}

impl MarkerIcon {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            size: None,
            anchor: None,
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_anchor(mut self, anchor: Point) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

#[derive(Debug)]
pub(crate) struct MarkerState {
    position: Property<Option<LatLng>>,
    icon: Property<Option<MarkerIcon>>,
    title: Property<Option<String>>,
    visible: Property<bool>,
    clickable: Property<bool>,
    draggable: Property<bool>,
    raise_on_drag: Property<bool>,
}

/// Point marker on the 2-D map.
#[derive(Debug, Clone)]
pub struct Marker(pub(crate) Rc<MarkerState>);

impl Marker {
    pub fn new(position: LatLng) -> Self {
        Marker(Rc::new(MarkerState {
            position: Property::new(Some(position)),
            icon: Property::new(None),
            title: Property::new(None),
            visible: Property::new(true),
            clickable: Property::new(true),
            draggable: Property::new(false),
            raise_on_drag: Property::new(true),
        }))
    }

    pub fn with_title(self, title: &str) -> Self {
        self.title().set(Some(title.to_string()));
        self
    }

    pub fn with_icon(self, icon: MarkerIcon) -> Self {
        self.icon().set(Some(icon));
        self
    }

    pub fn position(&self) -> &Property<Option<LatLng>> {
        &self.0.position
    }

    pub fn icon(&self) -> &Property<Option<MarkerIcon>> {
        &self.0.icon
    }

    pub fn title(&self) -> &Property<Option<String>> {
        &self.0.title
    }

    pub fn visible(&self) -> &Property<bool> {
        &self.0.visible
    }

    pub fn clickable(&self) -> &Property<bool> {
        &self.0.clickable
    }

    pub fn draggable(&self) -> &Property<bool> {
        &self.0.draggable
    }

    pub fn raise_on_drag(&self) -> &Property<bool> {
        &self.0.raise_on_drag
    }

    pub fn listener_count(&self) -> usize {
        self.position().listener_count()
            + self.icon().listener_count()
            + self.title().listener_count()
            + self.visible().listener_count()
    }
}
