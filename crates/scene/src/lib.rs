pub mod camera;
pub mod components;
pub mod entity;
pub mod feature;
pub mod surface;
pub mod world;

pub use camera::*;
pub use feature::*;
pub use surface::*;
pub use world::*;
