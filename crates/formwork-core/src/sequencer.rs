// File: formwork-core/src/sequencer.rs
// Purpose: Serializes rapid child-driven changes against the latest known value

use std::cell::RefCell;
use std::rc::Rc;

use crate::handler::Handler;

/// Applies changes in proper sequence when several writers react within the
/// same turn.
///
/// Each change is expressed as a step from the previous value to the next
/// one, and every step reads the latest value this sequencer has recorded -
/// never a snapshot captured when the writer was created. Two children
/// reacting to one parent emission therefore cannot lose each other's
/// updates: the second recombination sees the first one already applied.
/// Ordering is the call order, which is FIFO on a single thread.
pub struct ChangeSequencer<T: Clone> {
    latest: RefCell<Option<T>>,
    sink: Handler<T>,
}

impl<T: Clone + 'static> ChangeSequencer<T> {
    pub fn new(initial: Option<T>, sink: Handler<T>) -> Rc<Self> {
        Rc::new(Self {
            latest: RefCell::new(initial),
            sink,
        })
    }

    /// The most recently recorded value.
    pub fn latest(&self) -> Option<T> {
        self.latest.borrow().clone()
    }

    /// Computes the next value from the latest known one, records it, then
    /// forwards it to the sink. The previous value is cloned out before the
    /// stepper runs, so a sink that synchronously applies another change
    /// cannot alias the slot.
    pub fn apply(&self, stepper: impl FnOnce(Option<&T>) -> T) {
        let previous = self.latest.borrow().clone();
        let next = stepper(previous.as_ref());
        *self.latest.borrow_mut() = Some(next.clone());
        (self.sink)(next);
    }

    /// Re-baselines on an authoritative value, without notifying the sink.
    pub fn reset(&self, value: Option<T>) {
        *self.latest.borrow_mut() = value;
    }
}
