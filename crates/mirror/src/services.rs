//! Asynchronous collaborators consumed by the mirrors.
//!
//! Both services report through a one-shot completion callback. A host may
//! call it before `load`/`fetch` returns or at any later point; the mirrors
//! cope with either.

use std::rc::Rc;

use layers::marker::Size;
use scene::feature::KmlObject;

use crate::error::LoadError;

pub type ImageCallback = Box<dyn FnOnce(Result<Size, LoadError>)>;
pub type KmlCallback = Box<dyn FnOnce(Result<KmlObject, LoadError>)>;

/// Resolves an image url to the image's natural pixel size.
pub trait ImageLoader {
    fn load(&self, url: &str, done: ImageCallback);
}

/// Downloads and parses a KML document.
pub trait KmlFetcher {
    fn fetch(&self, url: &str, done: KmlCallback);
}

/// The asynchronous services a [`crate::SceneMirror`] draws on.
#[derive(Clone)]
pub struct MirrorServices {
    pub images: Rc<dyn ImageLoader>,
    pub kml: Rc<dyn KmlFetcher>,
}

impl MirrorServices {
    pub fn new(images: Rc<dyn ImageLoader>, kml: Rc<dyn KmlFetcher>) -> Self {
        Self { images, kml }
    }
}
