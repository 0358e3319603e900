use std::cell::RefCell;
use std::fmt;

use crate::event_bus::{Listeners, Subscription};

/// An ordered, observable sequence.
///
/// Structural edits notify after the sequence has been updated:
/// - insert-at: `(index, inserted)`
/// - remove-at: `(index, removed)`
/// - set-at: `(index, previous, current)`
///
/// Indices follow `Vec` semantics; an out-of-range index panics.
pub struct ObservableVec<T> {
    items: RefCell<Vec<T>>,
    inserted: Listeners<(usize, T)>,
    removed: Listeners<(usize, T)>,
    replaced: Listeners<(usize, T, T)>,
}

impl<T: Clone + 'static> ObservableVec<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items: RefCell::new(items),
            inserted: Listeners::new(),
            removed: Listeners::new(),
            replaced: Listeners::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.items.borrow().get(index).cloned()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.items.borrow().clone()
    }

    pub fn insert_at(&self, index: usize, value: T) {
        self.items.borrow_mut().insert(index, value.clone());
        self.inserted.emit(&(index, value));
    }

    pub fn remove_at(&self, index: usize) -> T {
        let removed = self.items.borrow_mut().remove(index);
        self.removed.emit(&(index, removed.clone()));
        removed
    }

    pub fn set_at(&self, index: usize, value: T) {
        let previous = std::mem::replace(&mut self.items.borrow_mut()[index], value.clone());
        self.replaced.emit(&(index, previous, value));
    }

    pub fn push(&self, value: T) {
        let index = self.len();
        self.insert_at(index, value);
    }

    pub fn pop(&self) -> Option<T> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        Some(self.remove_at(len - 1))
    }

    pub fn on_insert_at(&self, f: impl Fn(usize, &T) + 'static) -> Subscription {
        self.inserted.subscribe(move |(i, v)| f(*i, v))
    }

    pub fn on_remove_at(&self, f: impl Fn(usize, &T) + 'static) -> Subscription {
        self.removed.subscribe(move |(i, v)| f(*i, v))
    }

    pub fn on_set_at(&self, f: impl Fn(usize, &T, &T) + 'static) -> Subscription {
        self.replaced.subscribe(move |(i, prev, v)| f(*i, prev, v))
    }

    /// Total number of listeners across the three edit streams.
    pub fn listener_count(&self) -> usize {
        self.inserted.len() + self.removed.len() + self.replaced.len()
    }
}

impl<T: Clone + 'static> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ObservableVec;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn edits_notify_after_update() {
        let v = Rc::new(ObservableVec::from_vec(vec!['a', 'b']));
        let log = Rc::new(RefCell::new(Vec::new()));
        let _ins = {
            let log = log.clone();
            let v2 = Rc::downgrade(&v);
            v.on_insert_at(move |i, x| {
                let len = v2.upgrade().map(|v| v.len()).unwrap_or(0);
                log.borrow_mut().push(format!("ins {i} {x} len={len}"));
            })
        };
        let _rem = {
            let log = log.clone();
            v.on_remove_at(move |i, x| log.borrow_mut().push(format!("rem {i} {x}")))
        };
        let _set = {
            let log = log.clone();
            v.on_set_at(move |i, prev, x| log.borrow_mut().push(format!("set {i} {prev}->{x}")))
        };

        v.insert_at(1, 'x');
        v.set_at(0, 'z');
        assert_eq!(v.remove_at(2), 'b');
        v.push('q');
        assert_eq!(v.pop(), Some('q'));

        assert_eq!(v.to_vec(), vec!['z', 'x']);
        assert_eq!(
            *log.borrow(),
            vec![
                "ins 1 x len=3",
                "set 0 a->z",
                "rem 2 b",
                "ins 2 q len=3",
                "rem 2 q",
            ]
        );
        assert_eq!(v.listener_count(), 3);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let v: ObservableVec<u8> = ObservableVec::new();
        assert_eq!(v.pop(), None);
        assert!(v.is_empty());
    }
}
