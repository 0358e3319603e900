//! Keeps a 3-D globe in step with the overlays of a 2-D map.
//!
//! [`IdentityRegistry`] tracks which overlays are on the map, [`SceneMirror`]
//! turns each member into a globe feature kept live by subscriptions, and
//! [`ViewTransitionController`] carries the camera across when the user flips
//! between the two views. [`GlobeLink`] wires all of it to a [`layers::Map`].

pub mod bootstrap;
pub mod circle;
pub mod config;
pub mod error;
pub mod geometry;
pub mod link;
pub mod path;
pub mod registry;
pub mod scene_mirror;
pub mod services;
pub mod view;

pub use bootstrap::*;
pub use circle::*;
pub use config::*;
pub use error::*;
pub use link::*;
pub use path::*;
pub use registry::*;
pub use scene_mirror::*;
pub use services::*;
pub use view::*;
