use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Callback<E> = Rc<dyn Fn(&E)>;

struct Slots<E> {
    next_id: u64,
    entries: Vec<(u64, Callback<E>)>,
}

/// Single-threaded list of event listeners.
///
/// Listeners are called in registration order. Each registration hands back a
/// [`Subscription`]; dropping it removes the listener. Listeners may subscribe
/// or unsubscribe (themselves or others) while an event is being delivered: a
/// listener removed mid-delivery is not called for the rest of that event.
pub struct Listeners<E> {
    slots: Rc<RefCell<Slots<E>>>,
}

impl<E: 'static> Listeners<E> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self, f: impl Fn(&E) + 'static) -> Subscription {
        let id = {
            let mut slots = self.slots.borrow_mut();
            let id = slots.next_id;
            slots.next_id += 1;
            slots.entries.push((id, Rc::new(f)));
            id
        };
        let weak = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = weak.upgrade() {
                slots.borrow_mut().entries.retain(|(k, _)| *k != id);
            }
        })
    }

    pub fn emit(&self, event: &E) {
        let snapshot: Vec<(u64, Callback<E>)> = self
            .slots
            .borrow()
            .entries
            .iter()
            .map(|(id, f)| (*id, Rc::clone(f)))
            .collect();
        for (id, f) in snapshot {
            let live = self.slots.borrow().entries.iter().any(|(k, _)| *k == id);
            if live {
                f(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.slots.borrow().entries.len())
            .finish()
    }
}

/// Handle for an active registration. Released exactly once, on drop.
#[must_use = "dropping a Subscription releases it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription that only flips a [`CancelToken`] when released.
    ///
    /// Used to tie a pending asynchronous completion to the lifetime of the
    /// subscriptions of the object that requested it.
    pub fn with_token() -> (Self, CancelToken) {
        let token = CancelToken(Rc::new(Cell::new(false)));
        let flag = token.clone();
        (Self::new(move || flag.0.set(true)), token)
    }

    /// Releases the subscription now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Observes whether the paired [`Subscription`] has been released.
#[derive(Clone, Debug)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::{Listeners, Subscription};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivers_in_registration_order() {
        let bus: Listeners<u32> = Listeners::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let a = {
            let seen = seen.clone();
            bus.subscribe(move |v| seen.borrow_mut().push(("a", *v)))
        };
        let b = {
            let seen = seen.clone();
            bus.subscribe(move |v| seen.borrow_mut().push(("b", *v)))
        };
        bus.emit(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
        drop((a, b));
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let bus: Listeners<()> = Listeners::new();
        let hits = Rc::new(RefCell::new(0));
        let sub = {
            let hits = hits.clone();
            bus.subscribe(move |_| *hits.borrow_mut() += 1)
        };
        bus.emit(&());
        assert_eq!(bus.len(), 1);
        drop(sub);
        bus.emit(&());
        assert_eq!(*hits.borrow(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn listener_can_release_itself_during_delivery() {
        let bus: Rc<Listeners<()>> = Rc::new(Listeners::new());
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(RefCell::new(0));
        let sub = {
            let slot = slot.clone();
            let hits = hits.clone();
            bus.subscribe(move |_| {
                *hits.borrow_mut() += 1;
                slot.borrow_mut().take();
            })
        };
        *slot.borrow_mut() = Some(sub);
        bus.emit(&());
        bus.emit(&());
        assert_eq!(*hits.borrow(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn listener_removed_mid_delivery_is_skipped() {
        let bus: Listeners<()> = Listeners::new();
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let victim_hits = Rc::new(RefCell::new(0));
        let _killer = {
            let victim = victim.clone();
            bus.subscribe(move |_| {
                victim.borrow_mut().take();
            })
        };
        let sub = {
            let victim_hits = victim_hits.clone();
            bus.subscribe(move |_| *victim_hits.borrow_mut() += 1)
        };
        *victim.borrow_mut() = Some(sub);
        bus.emit(&());
        assert_eq!(*victim_hits.borrow(), 0);
    }

    #[test]
    fn token_flips_when_subscription_released() {
        let (sub, token) = Subscription::with_token();
        assert!(!token.is_cancelled());
        sub.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn subscription_outliving_listeners_is_harmless() {
        let bus: Listeners<()> = Listeners::new();
        let sub = bus.subscribe(|_| {});
        drop(bus);
        drop(sub);
    }
}
