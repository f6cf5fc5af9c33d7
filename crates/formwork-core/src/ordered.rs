// File: formwork-core/src/ordered.rs
// Purpose: Bridges array-shaped parent values and keyed collective consumers

use std::cell::RefCell;
use std::rc::Rc;

use crate::composition::ChildItem;
use crate::consumer::ValueConsumer;
use crate::detector::KeyOrderDetector;
use crate::error::{ArrayError, ControlError};
use crate::handler::Handler;
use crate::sparse::SparseSlots;
use crate::stream::{Publisher, Source, Subscription};
use crate::validity::Validity;
use crate::value::{FormValue, GroupValue};

/// A collective (string-keyed) consumer face for an array-valued parent,
/// paired with a similar interface for key ordering.
pub struct OrderedCollectiveConsumer<T, E> {
    /// The consumer face for the keyed collection of items.
    pub collection: ValueConsumer<GroupValue<T>, E>,
    /// Keys detected for the initial parent value, in order.
    pub initial_items: Vec<ChildItem<T>>,
    /// The detected item ordering of every incoming parent value.
    pub item_orders: Source<Vec<ChildItem<T>>>,
    /// Tells the bridge which key order the items are currently in.
    pub on_key_order_change: Handler<Vec<String>>,
    incoming: Subscription,
}

impl<T, E> OrderedCollectiveConsumer<T, E> {
    /// Detaches from the parent value stream.
    pub fn dispose(self) {
        self.incoming.unsubscribe();
    }
}

/// Separates an array-valued consumer into its key-order and collective
/// form-value concerns, based on the provided key detector.
///
/// Incoming arrays are keyified once per emission - the detector is stateful,
/// so the ordered items are re-broadcast rather than re-detected per
/// subscriber. Outgoing collection values are sequentialized back into a
/// dense array in the current key order, with errors kept index-aligned, and
/// the detector's references are replaced on every outgoing value so the
/// next detection matches against what the collection last reported.
pub fn split_array_consumer<T: Clone + 'static, E: Clone + 'static>(
    parent_consumer: ValueConsumer<Vec<T>, E>,
    initial_parent_value: &[T],
    key_order_detector: KeyOrderDetector<T>,
) -> OrderedCollectiveConsumer<T, E> {
    let detector = Rc::new(RefCell::new(key_order_detector));
    let initial_items = detector
        .borrow_mut()
        .keyify_by_reference_value(initial_parent_value);

    let ordered_values: Publisher<Vec<ChildItem<T>>> = Publisher::new();
    let incoming = parent_consumer.values.subscribe({
        let detector = Rc::clone(&detector);
        let ordered_values = ordered_values.clone();
        move |array_value: &Vec<T>| {
            let items = detector.borrow_mut().keyify_by_reference_value(array_value);
            ordered_values.send(&items);
        }
    });

    let state = Rc::new(OrderedState {
        detector,
        current_key_order: RefCell::new(Vec::new()),
        latest_collection_form_value: RefCell::new(None),
        parent_on_form_value: parent_consumer.on_form_value,
    });

    let collection = ValueConsumer {
        values: ordered_values.source().map(items_to_collection),
        on_form_value: {
            let state = Rc::clone(&state);
            Rc::new(
                move |collection_form_value: Option<FormValue<GroupValue<T>, E>>| {
                    state.detector.borrow_mut().set_reference_values(
                        collection_form_value
                            .as_ref()
                            .map(|form_value| form_value.value.clone())
                            .unwrap_or_default(),
                    );
                    *state.latest_collection_form_value.borrow_mut() = collection_form_value;
                    state.emit_ordered_form_value();
                },
            )
        },
    };

    OrderedCollectiveConsumer {
        collection,
        initial_items,
        item_orders: ordered_values.source(),
        on_key_order_change: {
            let state = Rc::clone(&state);
            Rc::new(move |new_order: Vec<String>| {
                *state.current_key_order.borrow_mut() = new_order;
                state.emit_ordered_form_value();
            })
        },
        incoming,
    }
}

struct OrderedState<T, E> {
    detector: Rc<RefCell<KeyOrderDetector<T>>>,
    current_key_order: RefCell<Vec<String>>,
    latest_collection_form_value: RefCell<Option<FormValue<GroupValue<T>, E>>>,
    parent_on_form_value: Handler<Option<FormValue<Vec<T>, E>>>,
}

impl<T: Clone, E: Clone> OrderedState<T, E> {
    fn emit_ordered_form_value(&self) {
        let sequentialized = sequentialize_form_value(
            self.latest_collection_form_value.borrow().as_ref(),
            &self.current_key_order.borrow(),
        );
        (self.parent_on_form_value)(sequentialized);
    }
}

fn items_to_collection<T: Clone>(items: &Vec<ChildItem<T>>) -> GroupValue<T> {
    items
        .iter()
        .map(|item| (item.key.clone(), item.value.clone()))
        .collect()
}

fn sequentialize_form_value<T: Clone, E: Clone>(
    collection_form_value: Option<&FormValue<GroupValue<T>, E>>,
    current_key_order: &[String],
) -> Option<FormValue<Vec<T>, E>> {
    let collection_form_value = collection_form_value?;
    // An outer error that isn't group-shaped is stale bookkeeping; treat it
    // as carrying no inner errors.
    let collection_errors = collection_form_value
        .validity
        .error()
        .and_then(ControlError::as_group)
        .map(|group| group.inner_errors.clone())
        .unwrap_or_default();
    let collection_value = &collection_form_value.value;
    let mut value = Vec::new();
    let mut inner_errors = SparseSlots::new();
    for key in current_key_order {
        // Ignore keys that didn't make their way into the value; indexing by
        // the output position keeps errors matched with their values.
        let Some(item_value) = collection_value.get(key) else {
            continue;
        };
        let index = value.len();
        value.push(item_value.clone());
        if let Some(item_error) = collection_errors.get(key) {
            inner_errors.set(index, item_error.clone());
        }
    }
    let array_error = (!inner_errors.is_hollow()).then(|| {
        ControlError::Array(ArrayError {
            errors: vec![],
            inner_errors,
        })
    });
    Some(FormValue {
        value,
        validity: Validity::for_error(array_error),
    })
}
