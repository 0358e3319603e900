use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use foundation::math::Coord;

/// Shared, mutable coordinate sequence owned by a line string or ring.
///
/// Cloning the handle shares the underlying sequence. Both ends support O(1)
/// push and pop so that edits near either end stay cheap.
#[derive(Clone, Default)]
pub struct CoordArray(Rc<RefCell<VecDeque<Coord>>>);

impl CoordArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_coords(coords: impl IntoIterator<Item = Coord>) -> Self {
        CoordArray(Rc::new(RefCell::new(coords.into_iter().collect())))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Coord> {
        self.0.borrow().get(index).copied()
    }

    /// Replaces the coordinate at `index`.
    ///
    /// # Panics
    /// If `index` is out of range.
    pub fn set(&self, index: usize, coord: Coord) {
        self.0.borrow_mut()[index] = coord;
    }

    pub fn push_back(&self, coord: Coord) {
        self.0.borrow_mut().push_back(coord);
    }

    pub fn push_front(&self, coord: Coord) {
        self.0.borrow_mut().push_front(coord);
    }

    pub fn pop_back(&self) -> Option<Coord> {
        self.0.borrow_mut().pop_back()
    }

    pub fn pop_front(&self) -> Option<Coord> {
        self.0.borrow_mut().pop_front()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn to_vec(&self) -> Vec<Coord> {
        self.0.borrow().iter().copied().collect()
    }

    /// Whether both handles share the same sequence.
    pub fn ptr_eq(&self, other: &CoordArray) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CoordArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::CoordArray;
    use foundation::math::Coord;

    #[test]
    fn clones_share_storage() {
        let a = CoordArray::new();
        let b = a.clone();
        a.push_back(Coord::ground(1.0, 2.0));
        b.push_front(Coord::ground(0.0, 0.0));
        assert_eq!(a.len(), 2);
        assert_eq!(a.get(0), Some(Coord::ground(0.0, 0.0)));
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&CoordArray::new()));
    }

    #[test]
    fn deque_edits() {
        let a = CoordArray::from_coords([Coord::ground(1.0, 1.0), Coord::ground(2.0, 2.0)]);
        assert_eq!(a.pop_front(), Some(Coord::ground(1.0, 1.0)));
        a.set(0, Coord::ground(3.0, 3.0));
        assert_eq!(a.pop_back(), Some(Coord::ground(3.0, 3.0)));
        assert!(a.is_empty());
        assert_eq!(a.pop_back(), None);
    }
}
