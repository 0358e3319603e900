pub mod circle;
pub mod kml;
pub mod map;
pub mod marker;
pub mod overlay;
pub mod polygon;
pub mod polyline;
pub mod rectangle;
pub mod symbology;

pub use circle::*;
pub use kml::*;
pub use map::*;
pub use marker::*;
pub use overlay::*;
pub use polygon::*;
pub use polyline::*;
pub use rectangle::*;
pub use symbology::*;
