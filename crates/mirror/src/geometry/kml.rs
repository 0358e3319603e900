use layers::kml::KmlLayer;
use runtime::event_bus::Subscription;
use scene::feature::{Feature, KmlObject};
use tracing::{debug, error};

use super::Attached;
use crate::error::LoadError;
use crate::services::KmlFetcher;

/// Attaches a cached document straight away; otherwise fetches it and hands
/// the result to `on_loaded`, unless the returned subscriptions were dropped
/// first.
pub fn mirror(
    layer: &KmlLayer,
    cached: Option<KmlObject>,
    fetcher: &dyn KmlFetcher,
    on_loaded: impl FnOnce(KmlObject) + 'static,
) -> Attached {
    if let Some(doc) = cached {
        return Attached::new(Feature::Kml(doc), Vec::new());
    }

    let (cancel, token) = Subscription::with_token();
    let url = layer.url().to_string();
    fetcher.fetch(
        layer.url(),
        Box::new(move |result: Result<KmlObject, LoadError>| {
            if token.is_cancelled() {
                debug!("kml {url} arrived after its layer was detached");
                return;
            }
            match result {
                Ok(doc) => on_loaded(doc),
                Err(e) => error!("kml layer: {e}"),
            }
        }),
    );
    Attached::pending(vec![cancel])
}
