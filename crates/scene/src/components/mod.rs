pub mod coordinates;
pub mod geometry;
pub mod style;

pub use coordinates::*;
pub use geometry::*;
pub use style::*;
