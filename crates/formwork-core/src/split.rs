// File: formwork-core/src/split.rs
// Purpose: Splits one parent control into child controls by key

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::composite::CompositeStrategy;
use crate::handle::{ControlChannel, ControlHandle};
use crate::sequencer::ChangeSequencer;
use crate::stream::{Source, Subscription};
use crate::value::FormValue;

/// Splits a parent control handle into logical children keyed by the
/// strategy's key type, without parent or child knowing each other's shape.
///
/// Since two children may update independently within one turn, all child
/// writes funnel through a shared [`ChangeSequencer`]: each recombination
/// steps from the latest applied parent value, never from the snapshot taken
/// when the child handle was built.
pub struct SplitControl<S: CompositeStrategy> {
    sequencer: Rc<ChangeSequencer<FormValue<S::Parent, S::Error>>>,
}

impl<S: CompositeStrategy> SplitControl<S> {
    pub fn new(parent: ControlHandle<S::Parent, S::Error>) -> Self {
        Self {
            sequencer: ChangeSequencer::new(parent.value, parent.on_change),
        }
    }

    /// Builds the child handle for `key`. The child's value is extracted
    /// from the latest known parent value at call time, so handles obtained
    /// after a sibling's write already observe that write.
    pub fn child(&self, key: S::Key) -> ControlHandle<S::Child, S::Error> {
        let latest = self.sequencer.latest();
        let value = S::extract(latest.as_ref(), &key);
        let sequencer = Rc::clone(&self.sequencer);
        ControlHandle {
            value,
            on_change: Rc::new(move |next_child: FormValue<S::Child, S::Error>| {
                sequencer
                    .apply(|prev_parent| S::recombine(prev_parent, next_child.clone(), &key));
            }),
        }
    }
}

/// Stream-shaped counterpart of [`SplitControl`]: one child channel per key,
/// built lazily and cached so repeated lookups share their write-back path.
///
/// A child's value source is the parent stream projected through the
/// strategy's `extract`; every subscriber to a child receives every parent
/// emission independently. Child write-backs share the same sequencing
/// discipline as the eager variant, and each authoritative parent emission
/// re-baselines the sequencer.
pub struct ChannelSplit<S: CompositeStrategy> {
    parent_values: Source<Option<FormValue<S::Parent, S::Error>>>,
    sequencer: Rc<ChangeSequencer<FormValue<S::Parent, S::Error>>>,
    children: RefCell<BTreeMap<S::Key, ControlChannel<S::Child, S::Error>>>,
    baseline: Subscription,
}

impl<S: CompositeStrategy> ChannelSplit<S> {
    pub fn new(parent: ControlChannel<S::Parent, S::Error>) -> Self {
        let sequencer = ChangeSequencer::new(None, parent.on_change);
        let baseline = parent.values.subscribe({
            let sequencer = Rc::clone(&sequencer);
            move |parent_value: &Option<FormValue<S::Parent, S::Error>>| {
                sequencer.reset(parent_value.clone());
            }
        });
        Self {
            parent_values: parent.values,
            sequencer,
            children: RefCell::new(BTreeMap::new()),
            baseline,
        }
    }

    /// The child channel for `key`, built on first use.
    pub fn child(&self, key: S::Key) -> ControlChannel<S::Child, S::Error> {
        if let Some(existing) = self.children.borrow().get(&key) {
            return existing.clone();
        }
        let built = self.build_child(key.clone());
        self.children.borrow_mut().insert(key, built.clone());
        built
    }

    fn build_child(&self, key: S::Key) -> ControlChannel<S::Child, S::Error> {
        let values = {
            let key = key.clone();
            self.parent_values
                .map(move |parent_value| S::extract(parent_value.as_ref(), &key))
        };
        let sequencer = Rc::clone(&self.sequencer);
        ControlChannel {
            values,
            on_change: Rc::new(move |next_child: FormValue<S::Child, S::Error>| {
                sequencer
                    .apply(|prev_parent| S::recombine(prev_parent, next_child.clone(), &key));
            }),
        }
    }

    /// Detaches from the parent stream.
    pub fn dispose(self) {
        self.baseline.unsubscribe();
    }
}
