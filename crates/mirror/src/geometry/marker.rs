use std::cell::Cell;
use std::rc::Rc;

use foundation::math::{Coord, LatLng};
use layers::marker::{Marker, MarkerIcon, Point, Size};
use runtime::event_bus::{CancelToken, Subscription};
use scene::components::{Geometry, HotSpot, IconStyle};
use scene::feature::{Feature, Placemark};
use tracing::{debug, error};

use super::{Attached, follow};
use crate::config::MirrorConfig;
use crate::error::LoadError;
use crate::services::ImageLoader;

pub fn mirror(
    marker: &Marker,
    images: &Rc<dyn ImageLoader>,
    config: &Rc<MirrorConfig>,
) -> Attached {
    let placemark = Placemark::new();
    let (cancel, token) = Subscription::with_token();
    let mut subscriptions = vec![cancel];

    {
        let placemark = placemark.clone();
        follow(&mut subscriptions, marker.position(), move |p: &Option<LatLng>| {
            if let Some(p) = p {
                placemark.set_geometry(Geometry::Point(Coord::from(*p)));
            }
        });
    }
    {
        let placemark = placemark.clone();
        let images = images.clone();
        let config = config.clone();
        let generation = Rc::new(Cell::new(0u64));
        follow(&mut subscriptions, marker.icon(), move |icon: &Option<MarkerIcon>| {
            generation.set(generation.get() + 1);
            match icon {
                Some(icon) => request_icon(
                    icon,
                    &placemark,
                    images.as_ref(),
                    &config,
                    IconGuard {
                        token: token.clone(),
                        generation: generation.clone(),
                        issued: generation.get(),
                    },
                ),
                None => placemark.update_style(|s| s.icon = default_icon(&config)),
            }
        });
    }
    {
        let placemark = placemark.clone();
        follow(&mut subscriptions, marker.title(), move |t: &Option<String>| {
            placemark.set_name(t.as_deref().unwrap_or(""));
        });
    }
    {
        let placemark = placemark.clone();
        follow(&mut subscriptions, marker.visible(), move |v: &bool| {
            placemark.set_visibility(*v);
        });
    }

    Attached::new(Feature::Placemark(placemark), subscriptions)
}

/// Decides whether a finished icon load may still touch the placemark.
struct IconGuard {
    token: CancelToken,
    generation: Rc<Cell<u64>>,
    issued: u64,
}

impl IconGuard {
    fn is_current(&self) -> bool {
        !self.token.is_cancelled() && self.generation.get() == self.issued
    }
}

fn request_icon(
    icon: &MarkerIcon,
    placemark: &Placemark,
    images: &dyn ImageLoader,
    config: &MirrorConfig,
    guard: IconGuard,
) {
    let href = config.absolute_url(&icon.url);
    let icon = icon.clone();
    let placemark = placemark.clone();
    let base_px = config.icon_base_px;
    let url = href.clone();
    images.load(
        &url,
        Box::new(move |result: Result<Size, LoadError>| {
            if !guard.is_current() {
                debug!("discarding stale icon load for {href}");
                return;
            }
            match result {
                Ok(natural) => {
                    let style = icon_style(&icon, href, natural, base_px);
                    placemark.update_style(|s| s.icon = style);
                }
                Err(e) => error!("marker icon: {e}"),
            }
        }),
    );
}

fn icon_style(icon: &MarkerIcon, href: String, natural: Size, base_px: f64) -> IconStyle {
    let size = icon.size.unwrap_or(natural);
    let anchor = icon
        .anchor
        .unwrap_or(Point::new(size.width / 2.0, size.height));
    IconStyle {
        href: Some(href),
        scale: size.width.min(size.height) / base_px,
        // Globe hotspots are measured from the bottom edge.
        hotspot: Some(HotSpot {
            x: anchor.x,
            y: size.height - anchor.y,
        }),
    }
}

fn default_icon(config: &MirrorConfig) -> IconStyle {
    let [x, y] = config.default_icon_hotspot;
    IconStyle {
        href: Some(config.default_icon_href.clone()),
        scale: 1.0,
        hotspot: Some(HotSpot { x, y }),
    }
}

#[cfg(test)]
mod tests {
    use super::mirror;
    use crate::config::MirrorConfig;
    use crate::error::LoadError;
    use crate::services::ImageLoader;
    use crate::services::fakes::PendingImages;
    use foundation::math::{Coord, LatLng};
    use layers::marker::{Marker, MarkerIcon, Point, Size};
    use pretty_assertions::assert_eq;
    use scene::components::{Geometry, HotSpot};
    use scene::feature::Placemark;
    use std::rc::Rc;

    fn setup(marker: &Marker) -> (Rc<PendingImages>, super::Attached, Placemark) {
        let images = Rc::new(PendingImages::default());
        let loader: Rc<dyn ImageLoader> = images.clone();
        let config = Rc::new(MirrorConfig {
            origin: Some("http://maps.example.com".into()),
            ..MirrorConfig::default()
        });
        let attached = mirror(marker, &loader, &config);
        let placemark = attached.placemark().cloned().unwrap();
        (images, attached, placemark)
    }

    #[test]
    fn follows_position_title_and_visibility() {
        let marker = Marker::new(LatLng::new(1.0, 2.0)).with_title("Pier");
        let (_images, attached, placemark) = setup(&marker);
        assert_eq!(attached.subscriptions.len(), 5);

        assert!(matches!(
            placemark.geometry(),
            Some(Geometry::Point(c)) if c == Coord::ground(1.0, 2.0)
        ));
        assert_eq!(placemark.name(), "Pier");

        marker.position().set(Some(LatLng::new(5.0, 6.0)));
        marker.title().set(None);
        marker.visible().set(false);
        assert!(matches!(
            placemark.geometry(),
            Some(Geometry::Point(c)) if c == Coord::ground(5.0, 6.0)
        ));
        assert_eq!(placemark.name(), "");
        assert!(!placemark.is_visible());
    }

    #[test]
    fn missing_icon_uses_the_default_paddle() {
        let marker = Marker::new(LatLng::new(0.0, 0.0));
        let (_images, _attached, placemark) = setup(&marker);
        let icon = placemark.style().unwrap().icon;
        assert_eq!(icon.href.as_deref(), Some(MirrorConfig::default().default_icon_href.as_str()));
        assert_eq!(icon.hotspot, Some(HotSpot { x: 32.0, y: 1.0 }));
        assert_eq!(icon.scale, 1.0);
    }

    #[test]
    fn icon_style_applies_after_load() {
        let marker = Marker::new(LatLng::new(0.0, 0.0)).with_icon(
            MarkerIcon::new("/img/pin.png").with_anchor(Point::new(8.0, 30.0)),
        );
        let (images, _attached, placemark) = setup(&marker);
        assert_eq!(images.urls(), vec!["http://maps.example.com/img/pin.png".to_string()]);

        images.complete(Ok(Size::new(16.0, 32.0)));
        let icon = placemark.style().unwrap().icon;
        assert_eq!(icon.href.as_deref(), Some("http://maps.example.com/img/pin.png"));
        assert_eq!(icon.scale, 0.5);
        assert_eq!(icon.hotspot, Some(HotSpot { x: 8.0, y: 2.0 }));
    }

    #[test]
    fn superseded_icon_load_is_ignored() {
        let marker = Marker::new(LatLng::new(0.0, 0.0))
            .with_icon(MarkerIcon::new("http://x/old.png"));
        let (images, _attached, placemark) = setup(&marker);
        let newer = MarkerIcon::new("http://x/new.png").with_size(Size::new(64.0, 64.0));
        marker.icon().set(Some(newer));

        images.complete(Ok(Size::new(32.0, 32.0)));
        assert_eq!(placemark.style().and_then(|s| s.icon.href), None);

        images.complete(Ok(Size::new(10.0, 10.0)));
        let icon = placemark.style().unwrap().icon;
        assert_eq!(icon.href.as_deref(), Some("http://x/new.png"));
        assert_eq!(icon.scale, 2.0);
        assert_eq!(icon.hotspot, Some(HotSpot { x: 32.0, y: 0.0 }));
    }

    #[test]
    fn load_after_detach_is_discarded() {
        let marker = Marker::new(LatLng::new(0.0, 0.0))
            .with_icon(MarkerIcon::new("http://x/a.png"));
        let (images, attached, placemark) = setup(&marker);
        drop(attached);
        assert_eq!(marker.listener_count(), 0);
        images.complete(Ok(Size::new(32.0, 32.0)));
        assert_eq!(placemark.style().and_then(|s| s.icon.href), None);
    }

    #[test]
    fn failed_load_leaves_style_untouched() {
        let marker = Marker::new(LatLng::new(0.0, 0.0))
            .with_icon(MarkerIcon::new("http://x/missing.png"));
        let (images, _attached, placemark) = setup(&marker);
        images.complete(Err(LoadError::NotFound {
            url: "http://x/missing.png".into(),
        }));
        assert!(placemark.style().is_none());
    }
}
