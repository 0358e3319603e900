use std::rc::Rc;

#[derive(Debug)]
pub(crate) struct KmlLayerState {
    url: String,
}

/// Layer rendered from an external KML document.
#[derive(Debug, Clone)]
pub struct KmlLayer(pub(crate) Rc<KmlLayerState>);

impl KmlLayer {
    pub fn new(url: impl Into<String>) -> Self {
        KmlLayer(Rc::new(KmlLayerState { url: url.into() }))
    }

    pub fn url(&self) -> &str {
        &self.0.url
    }
}

#[cfg(test)]
mod tests {
    use super::KmlLayer;

    #[test]
    fn clones_share_identity() {
        let a = KmlLayer::new("http://example.com/parks.kml");
        let b = a.clone();
        assert_eq!(b.url(), "http://example.com/parks.kml");
        assert!(std::rc::Rc::ptr_eq(&a.0, &b.0));
    }
}
