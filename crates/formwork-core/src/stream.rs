// File: formwork-core/src/stream.rs
// Purpose: Synchronous multi-consumer value broadcasting

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A subscribed callback.
pub type Observer<T> = Rc<dyn Fn(&T)>;

struct Registry<T> {
    observers: RefCell<Vec<(u64, Observer<T>)>>,
    next_id: Cell<u64>,
}

impl<T: 'static> Registry<T> {
    fn new() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    fn attach(registry: &Rc<Self>, observer: Observer<T>) -> Subscription {
        let id = registry.next_id.get();
        registry.next_id.set(id + 1);
        registry.observers.borrow_mut().push((id, observer));
        let registry = Rc::downgrade(registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry
                    .observers
                    .borrow_mut()
                    .retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }
}

/// The sending half of a broadcast: every subscriber observes every `send`,
/// synchronously and in subscription order.
pub struct Publisher<T> {
    registry: Rc<Registry<T>>,
}

impl<T: 'static> Publisher<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(Registry::new()),
        }
    }

    /// Delivers `value` to every current subscriber. The subscriber list is
    /// snapshotted first, so observers attached or detached during delivery
    /// take effect from the next send.
    pub fn send(&self, value: &T) {
        let observers: Vec<Observer<T>> = self
            .registry
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in observers {
            observer(value);
        }
    }

    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) -> Subscription {
        Registry::attach(&self.registry, Rc::new(observer))
    }
}

impl<T: 'static> Publisher<T> {
    /// The subscribe face of this publisher.
    pub fn source(&self) -> Source<T> {
        let registry = Rc::clone(&self.registry);
        Source::from_fn(move |observer| Registry::attach(&registry, observer))
    }
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<T: 'static> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The subscribe half of a broadcast. Sources are cheap handles; cloning one
/// aliases the same underlying stream.
pub struct Source<T> {
    subscribe_with: Rc<dyn Fn(Observer<T>) -> Subscription>,
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe_with: Rc::clone(&self.subscribe_with),
        }
    }
}

impl<T: 'static> Source<T> {
    pub fn from_fn(subscribe_with: impl Fn(Observer<T>) -> Subscription + 'static) -> Self {
        Self {
            subscribe_with: Rc::new(subscribe_with),
        }
    }

    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) -> Subscription {
        (self.subscribe_with)(Rc::new(observer))
    }

    /// A source that never emits.
    pub fn never() -> Self {
        Source::from_fn(|_| Subscription::detached())
    }

    /// Projects every emission through `mapper`. Each subscriber gets its own
    /// projection of the base stream.
    pub fn map<U: 'static>(&self, mapper: impl Fn(&T) -> U + 'static) -> Source<U> {
        let base = self.clone();
        let mapper = Rc::new(mapper);
        Source::from_fn(move |observer| {
            let mapper = Rc::clone(&mapper);
            base.subscribe(move |value| observer(&mapper(value)))
        })
    }

    /// Projects emissions, skipping those the mapper declines.
    pub fn filter_map<U: 'static>(&self, mapper: impl Fn(&T) -> Option<U> + 'static) -> Source<U> {
        let base = self.clone();
        let mapper = Rc::new(mapper);
        Source::from_fn(move |observer| {
            let mapper = Rc::clone(&mapper);
            base.subscribe(move |value| {
                if let Some(mapped) = mapper(value) {
                    observer(&mapped);
                }
            })
        })
    }

    /// Emissions of this source interleaved with another's.
    pub fn merge(&self, other: &Source<T>) -> Source<T> {
        let first = self.clone();
        let second = other.clone();
        Source::from_fn(move |observer| {
            let forwarded = Rc::clone(&observer);
            let a = first.subscribe(move |value| forwarded(value));
            let b = second.subscribe(move |value| observer(value));
            a.and(b)
        })
    }
}

/// Handle for detaching an observer. Detachment is explicit: dropping the
/// handle without calling [`Subscription::unsubscribe`] keeps the observer
/// attached.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// A handle with nothing to detach.
    pub fn detached() -> Self {
        Self { detach: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }

    /// Combines two handles into one that detaches both.
    pub fn and(self, other: Subscription) -> Subscription {
        Subscription::new(move || {
            self.unsubscribe();
            other.unsubscribe();
        })
    }
}
