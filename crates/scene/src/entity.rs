use foundation::handles::Handle;

/// Identifies a feature attached to the globe's feature tree.
///
/// Ids are generational: once a feature is removed its id goes stale and is
/// never resolved again, even if the slot is reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub Handle);

impl NodeId {
    pub fn index(&self) -> u32 {
        self.0.index()
    }

    pub fn generation(&self) -> u32 {
        self.0.generation()
    }
}
