use std::cell::RefCell;

use crate::frame::Frame;

struct Deferred {
    due_frame: u64,
    order: u64,
    run: Box<dyn FnOnce()>,
}

/// Deterministic queue of deferred callbacks.
///
/// Hosts use it to deliver asynchronous completions cooperatively: a callback
/// is parked until a given frame and then run from [`Scheduler::run_frame`].
/// Callbacks due on the same frame run in the order they were deferred.
/// Callbacks may defer more work while running; that work is picked up by a
/// later `run_frame` call.
#[derive(Default)]
pub struct Scheduler {
    next_order: RefCell<u64>,
    tasks: RefCell<Vec<Deferred>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(&self, due_frame: u64, run: impl FnOnce() + 'static) {
        let order = {
            let mut next = self.next_order.borrow_mut();
            let order = *next;
            *next = next.wrapping_add(1);
            order
        };
        self.tasks.borrow_mut().push(Deferred {
            due_frame,
            order,
            run: Box::new(run),
        });
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Runs every callback due at or before `frame`. Returns how many ran.
    pub fn run_frame(&self, frame: Frame) -> usize {
        let mut due: Vec<Deferred> = {
            let mut tasks = self.tasks.borrow_mut();
            let (ready, waiting): (Vec<_>, Vec<_>) = tasks
                .drain(..)
                .partition(|t| t.due_frame <= frame.index);
            *tasks = waiting;
            ready
        };
        due.sort_by(|a, b| {
            a.due_frame
                .cmp(&b.due_frame)
                .then_with(|| a.order.cmp(&b.order))
        });
        let ran = due.len();
        for task in due {
            (task.run)();
        }
        ran
    }
}
