use runtime::event_bus::Subscription;

use crate::camera::{FlySpeed, LookAt};
use crate::entity::NodeId;
use crate::feature::Feature;

/// Built-in data layers the globe can draw on its own.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GlobeLayer {
    Roads,
    Borders,
}

/// The 3-D rendering surface, as seen by the synchronization core.
///
/// Implementations are single-threaded and use interior mutability; every
/// method takes `&self`.
pub trait GlobeSurface {
    /// Attaches `feature` to the root of the feature tree.
    fn append_feature(&self, feature: Feature) -> NodeId;

    /// Detaches a feature. Returns `None` for unknown or stale ids.
    fn remove_feature(&self, node: NodeId) -> Option<Feature>;

    fn feature(&self, node: NodeId) -> Option<Feature>;

    /// Current camera, as a ground-clamped look-at.
    fn view(&self) -> LookAt;

    fn set_view(&self, lookat: LookAt, speed: FlySpeed);

    /// Notifies when the camera comes to rest after a view change.
    fn on_view_change_end(&self, f: Box<dyn Fn(&LookAt)>) -> Subscription;

    fn set_window_visible(&self, visible: bool);

    fn set_atmosphere_visible(&self, visible: bool);

    fn set_grid_visible(&self, visible: bool);

    fn enable_layer(&self, layer: GlobeLayer, enabled: bool);
}
