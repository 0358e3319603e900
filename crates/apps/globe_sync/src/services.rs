use std::collections::HashMap;
use std::rc::Rc;

use layers::marker::Size;
use mirror::error::LoadError;
use mirror::services::{ImageCallback, ImageLoader, KmlCallback, KmlFetcher};
use runtime::frame::FrameClock;
use runtime::scheduler::Scheduler;
use scene::feature::KmlObject;

/// Image loader that answers from a fixed table after a few frames.
pub struct DeferredImages {
    scheduler: Rc<Scheduler>,
    clock: Rc<FrameClock>,
    latency: u64,
    sizes: HashMap<String, Size>,
}

impl DeferredImages {
    pub fn new(scheduler: Rc<Scheduler>, clock: Rc<FrameClock>, latency: u64) -> Self {
        Self {
            scheduler,
            clock,
            latency,
            sizes: HashMap::new(),
        }
    }

    pub fn with_image(mut self, url: &str, size: Size) -> Self {
        self.sizes.insert(url.to_string(), size);
        self
    }
}

impl ImageLoader for DeferredImages {
    fn load(&self, url: &str, done: ImageCallback) {
        let result = self.sizes.get(url).copied().ok_or_else(|| LoadError::NotFound {
            url: url.to_string(),
        });
        self.scheduler
            .defer(self.clock.current().after(self.latency), move || done(result));
    }
}

/// KML fetcher serving in-memory documents after a few frames.
pub struct DeferredKml {
    scheduler: Rc<Scheduler>,
    clock: Rc<FrameClock>,
    latency: u64,
    documents: HashMap<String, String>,
}

impl DeferredKml {
    pub fn new(scheduler: Rc<Scheduler>, clock: Rc<FrameClock>, latency: u64) -> Self {
        Self {
            scheduler,
            clock,
            latency,
            documents: HashMap::new(),
        }
    }

    pub fn with_document(mut self, url: &str, body: &str) -> Self {
        self.documents.insert(url.to_string(), body.to_string());
        self
    }
}

impl KmlFetcher for DeferredKml {
    fn fetch(&self, url: &str, done: KmlCallback) {
        let result = match self.documents.get(url) {
            Some(body) => Ok(KmlObject::new(url, body)),
            None => Err(LoadError::NotFound {
                url: url.to_string(),
            }),
        };
        self.scheduler
            .defer(self.clock.current().after(self.latency), move || done(result));
    }
}
