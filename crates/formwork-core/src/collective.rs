// File: formwork-core/src/collective.rs
// Purpose: Models one parent consumer as a collection of per-key item adapters

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::composition::ChildItem;
use crate::consumer::{ValueAdapter, ValueConsumer};
use crate::error::{ControlError, GroupError};
use crate::handler::Handler;
use crate::stream::{Publisher, Source, Subscription};
use crate::validity::Validity;
use crate::value::{FormValue, GroupValue};

/// Connects individual item consumers to one parent value+validity
/// aggregate.
///
/// One [`ValueAdapter`] is cached per key; whenever any active child reports
/// a form value, the parent's `FormValue` is rebuilt from whichever children
/// are currently active - value map plus a group error of the children's
/// errors. Incoming parent values are routed to active children item by
/// item, keys present in the value but not yet active are announced as
/// `new_items`, and active keys missing from the value as `omitted_items`.
pub struct CollectiveValueConsumer<T, E> {
    inner: Rc<CollectiveInner<T, E>>,
    incoming: Subscription,
}

struct CollectiveInner<T, E> {
    parent_on_form_value: Handler<Option<FormValue<GroupValue<T>, E>>>,
    item_adapters: RefCell<BTreeMap<String, Rc<ValueAdapter<T, E>>>>,
    key_activity: RefCell<BTreeMap<String, bool>>,
    new_items: Publisher<ChildItem<T>>,
    omitted_items: Publisher<String>,
}

impl<T: Clone + 'static, E: Clone + 'static> CollectiveValueConsumer<T, E> {
    pub fn new(parent_consumer: ValueConsumer<GroupValue<T>, E>) -> Self {
        let inner = Rc::new(CollectiveInner {
            parent_on_form_value: parent_consumer.on_form_value,
            item_adapters: RefCell::new(BTreeMap::new()),
            key_activity: RefCell::new(BTreeMap::new()),
            new_items: Publisher::new(),
            omitted_items: Publisher::new(),
        });
        let incoming = parent_consumer.values.subscribe({
            let inner = Rc::clone(&inner);
            move |value: &GroupValue<T>| inner.transfer_value_to_items(value)
        });
        Self { inner, incoming }
    }

    /// The item adapter for `key`, built on first use. Obtaining an adapter
    /// marks its key active.
    pub fn item_consumer(&self, key: &str) -> Rc<ValueAdapter<T, E>> {
        let existing = self.inner.item_adapters.borrow().get(key).cloned();
        let adapter = match existing {
            Some(adapter) => adapter,
            None => {
                let built = CollectiveInner::build_item_adapter(&self.inner, key.to_owned());
                self.inner
                    .item_adapters
                    .borrow_mut()
                    .insert(key.to_owned(), Rc::clone(&built));
                built
            }
        };
        self.inner
            .key_activity
            .borrow_mut()
            .insert(key.to_owned(), true);
        adapter
    }

    /// Keys present in an incoming parent value but not yet active.
    pub fn new_items(&self) -> Source<ChildItem<T>> {
        self.inner.new_items.source()
    }

    /// Active keys missing from an incoming parent value.
    pub fn omitted_items(&self) -> Source<String> {
        self.inner.omitted_items.source()
    }

    /// The parent form value as currently rebuilt from active children.
    pub fn build_parent_form_value(&self) -> FormValue<GroupValue<T>, E> {
        self.inner.build_parent_form_value()
    }

    /// Detaches from the parent value stream.
    pub fn dispose(self) {
        self.incoming.unsubscribe();
    }
}

impl<T: Clone + 'static, E: Clone + 'static> CollectiveInner<T, E> {
    fn build_item_adapter(inner: &Rc<Self>, key: String) -> Rc<ValueAdapter<T, E>> {
        // Weak: the adapter's write-back closure must not keep the whole
        // collective alive through the adapter map it itself lives in.
        let collective: Weak<Self> = Rc::downgrade(inner);
        let base = ValueConsumer {
            // Parent-to-child values are routed directly via set_value.
            values: Source::never(),
            on_form_value: Rc::new(move |form_value: Option<FormValue<T, E>>| {
                if let Some(collective) = collective.upgrade() {
                    collective
                        .key_activity
                        .borrow_mut()
                        .insert(key.clone(), form_value.is_some());
                    let parent_form_value = collective.build_parent_form_value();
                    (collective.parent_on_form_value)(Some(parent_form_value));
                }
            }),
        };
        Rc::new(ValueAdapter::new(Some(base)))
    }

    fn transfer_value_to_items(&self, value: &GroupValue<T>) {
        // First, notify active children based on the incoming value.
        let adapters: Vec<(String, Rc<ValueAdapter<T, E>>)> = self
            .item_adapters
            .borrow()
            .iter()
            .map(|(key, adapter)| (key.clone(), Rc::clone(adapter)))
            .collect();
        for (key, adapter) in adapters {
            if !self.is_active(&key) {
                continue;
            }
            match value.get(&key) {
                Some(item_value) => adapter.set_value(item_value.clone()),
                // Don't let "omitted" items (whose values are not updated) be forgotten.
                None => self.omitted_items.send(&key),
            }
        }
        // Also announce "new" items (in the value but not active).
        for (key, item_value) in value {
            if !self.is_active(key) {
                self.new_items.send(&ChildItem {
                    key: key.clone(),
                    value: item_value.clone(),
                });
            }
        }
    }

    fn is_active(&self, key: &str) -> bool {
        self.key_activity.borrow().get(key).copied().unwrap_or(false)
    }

    fn build_parent_form_value(&self) -> FormValue<GroupValue<T>, E> {
        let mut parent_value = GroupValue::new();
        let mut inner_errors = BTreeMap::new();
        for (key, adapter) in self.item_adapters.borrow().iter() {
            let Some(child_form_value) = adapter.form_value() else {
                continue;
            };
            parent_value.insert(key.clone(), child_form_value.value);
            if let Validity::Invalid { error } = child_form_value.validity {
                inner_errors.insert(key.clone(), error);
            }
        }
        let group_error = (!inner_errors.is_empty()).then(|| {
            ControlError::Group(GroupError {
                errors: vec![],
                inner_errors,
            })
        });
        FormValue {
            value: parent_value,
            validity: Validity::for_error(group_error),
        }
    }
}
