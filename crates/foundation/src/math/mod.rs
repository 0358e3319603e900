pub mod latlng;

pub use latlng::*;
