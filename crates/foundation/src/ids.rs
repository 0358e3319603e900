use std::fmt;

/// Identity assigned to an observed object the first time it is seen.
///
/// Ids are handed out in increasing order and are never reused, even after
/// the object they named has gone away.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackedId(u64);

impl TrackedId {
    pub fn new(n: u64) -> Self {
        TrackedId(n)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TrackedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic source of [`TrackedId`]s.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> TrackedId {
        let id = TrackedId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::{IdAllocator, TrackedId};

    #[test]
    fn allocates_in_increasing_order() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), TrackedId::new(0));
        assert_eq!(ids.next_id(), TrackedId::new(1));
        assert_eq!(ids.allocated(), 2);
    }

    #[test]
    fn display_is_hash_prefixed() {
        assert_eq!(TrackedId::new(7).to_string(), "#7");
    }
}
