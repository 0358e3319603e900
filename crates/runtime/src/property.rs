use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::event_bus::{Listeners, Subscription};

/// An observable value.
///
/// Every `set` notifies listeners with the new value, whether or not it
/// differs from the previous one.
pub struct Property<T> {
    value: RefCell<T>,
    changed: Listeners<T>,
}

impl<T: Clone + 'static> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            changed: Listeners::new(),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value.clone();
        self.changed.emit(&value);
    }

    /// Calls `f` on every future change.
    pub fn on_change(&self, f: impl Fn(&T) + 'static) -> Subscription {
        self.changed.subscribe(f)
    }

    /// Calls `f` with the current value right away, then on every change.
    pub fn follow(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let f = Rc::new(f);
        let listener = Rc::clone(&f);
        let sub = self.changed.subscribe(move |v| listener(v));
        let current = self.get();
        f(&current);
        sub
    }

    pub fn listener_count(&self) -> usize {
        self.changed.len()
    }
}

impl<T: Clone + Default + 'static> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &*self.value.borrow())
            .field("listeners", &self.changed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Property;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn follow_fires_immediately_then_on_change() {
        let p = Property::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = seen.clone();
            p.follow(move |v| seen.borrow_mut().push(*v))
        };
        p.set(2);
        p.set(2);
        assert_eq!(*seen.borrow(), vec![1, 2, 2]);
    }

    #[test]
    fn follow_does_not_refire_existing_listeners() {
        let p = Property::new("a".to_string());
        let early = Rc::new(RefCell::new(0));
        let _a = {
            let early = early.clone();
            p.on_change(move |_| *early.borrow_mut() += 1)
        };
        let _b = p.follow(|_| {});
        assert_eq!(*early.borrow(), 0);
        assert_eq!(p.listener_count(), 2);
    }

    #[test]
    fn on_change_skips_current_value() {
        let p = Property::new(0.5f64);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sub = {
            let seen = seen.clone();
            p.on_change(move |v| seen.borrow_mut().push(*v))
        };
        p.set(0.25);
        drop(sub);
        p.set(0.75);
        assert_eq!(*seen.borrow(), vec![0.25]);
        assert_eq!(p.get(), 0.75);
    }
}
