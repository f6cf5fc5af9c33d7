// File: formwork-core/src/consumer.rs
// Purpose: The value-consumer boundary contract and its adapter

use std::cell::RefCell;
use std::rc::Rc;

use crate::handler::Handler;
use crate::stream::{Publisher, Source};
use crate::value::FormValue;

/// The fundamental building block for communicating values to and from form
/// controls. Anything that should influence or utilize the value of a form
/// control does so via this contract: `values` carries incoming "top-down"
/// base values, `on_form_value` is notified of every outgoing `FormValue`
/// the control produces (`None` when the control's value is cleared).
pub struct ValueConsumer<T, E> {
    pub values: Source<T>,
    pub on_form_value: Handler<Option<FormValue<T, E>>>,
}

impl<T, E> Clone for ValueConsumer<T, E> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            on_form_value: self.on_form_value.clone(),
        }
    }
}

/// Wraps an optional base consumer with direct access from owning code:
/// incoming values merge the base stream with directly-pushed ones, and
/// outgoing form values are recorded, re-published to direct observers, and
/// forwarded to the base consumer.
pub struct ValueAdapter<T, E> {
    pushed_values: Publisher<T>,
    values: Source<T>,
    latest_form_value: RefCell<Option<FormValue<T, E>>>,
    form_values: Publisher<Option<FormValue<T, E>>>,
    base_on_form_value: Option<Handler<Option<FormValue<T, E>>>>,
}

impl<T: Clone + 'static, E: Clone + 'static> ValueAdapter<T, E> {
    pub fn new(base_consumer: Option<ValueConsumer<T, E>>) -> Self {
        let pushed_values = Publisher::new();
        let base_values = base_consumer
            .as_ref()
            .map(|base| base.values.clone())
            .unwrap_or_else(Source::never);
        let values = base_values.merge(&pushed_values.source());
        Self {
            pushed_values,
            values,
            latest_form_value: RefCell::new(None),
            form_values: Publisher::new(),
            base_on_form_value: base_consumer.map(|base| base.on_form_value),
        }
    }

    /// An adapter with no base consumer; values arrive only via `set_value`.
    pub fn standalone() -> Self {
        Self::new(None)
    }

    /// Incoming values: the base consumer's stream merged with
    /// directly-pushed ones.
    pub fn values(&self) -> Source<T> {
        self.values.clone()
    }

    pub fn set_value(&self, value: T) {
        self.pushed_values.send(&value);
    }

    /// The most recent outgoing form value.
    pub fn form_value(&self) -> Option<FormValue<T, E>> {
        self.latest_form_value.borrow().clone()
    }

    /// Outgoing form values, as a stream for direct observers.
    pub fn form_values(&self) -> Source<Option<FormValue<T, E>>> {
        self.form_values.source()
    }

    pub fn on_form_value_change(&self, form_value: Option<FormValue<T, E>>) {
        *self.latest_form_value.borrow_mut() = form_value.clone();
        self.form_values.send(&form_value);
        if let Some(base) = &self.base_on_form_value {
            base(form_value);
        }
    }

    /// This adapter's own consumer face, for handing to a control.
    pub fn consumer(self: Rc<Self>) -> ValueConsumer<T, E> {
        let values = self.values();
        ValueConsumer {
            values,
            on_form_value: Rc::new(move |form_value| self.on_form_value_change(form_value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_values_merge_base_stream_with_pushed_values() {
        let base_values = Publisher::new();
        let forwarded = Rc::new(RefCell::new(Vec::new()));
        let base = ValueConsumer::<i32, String> {
            values: base_values.source(),
            on_form_value: {
                let forwarded = Rc::clone(&forwarded);
                Rc::new(move |form_value| forwarded.borrow_mut().push(form_value))
            },
        };
        let adapter = ValueAdapter::new(Some(base));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = adapter.values().subscribe({
            let seen = Rc::clone(&seen);
            move |value: &i32| seen.borrow_mut().push(*value)
        });
        base_values.send(&1);
        adapter.set_value(2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_outgoing_form_values_are_recorded_and_forwarded() {
        let forwarded = Rc::new(RefCell::new(Vec::new()));
        let base = ValueConsumer::<i32, String> {
            values: Source::never(),
            on_form_value: {
                let forwarded = Rc::clone(&forwarded);
                Rc::new(move |form_value| forwarded.borrow_mut().push(form_value))
            },
        };
        let adapter = ValueAdapter::new(Some(base));
        assert_eq!(adapter.form_value(), None);
        adapter.on_form_value_change(Some(FormValue::unvalidated(7)));
        assert_eq!(adapter.form_value(), Some(FormValue::unvalidated(7)));
        assert_eq!(*forwarded.borrow(), vec![Some(FormValue::unvalidated(7))]);
    }

    #[test]
    fn test_direct_observers_see_outgoing_form_values() {
        let adapter: ValueAdapter<i32, String> = ValueAdapter::standalone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = adapter.form_values().subscribe({
            let seen = Rc::clone(&seen);
            move |form_value: &Option<FormValue<i32, String>>| {
                seen.borrow_mut().push(form_value.clone())
            }
        });
        adapter.on_form_value_change(Some(FormValue::unvalidated(3)));
        adapter.on_form_value_change(None);
        assert_eq!(
            *seen.borrow(),
            vec![Some(FormValue::unvalidated(3)), None]
        );
    }

    #[test]
    fn test_consumer_face_routes_back_into_the_adapter() {
        let adapter: Rc<ValueAdapter<i32, String>> = Rc::new(ValueAdapter::standalone());
        let consumer = Rc::clone(&adapter).consumer();
        (consumer.on_form_value)(Some(FormValue::unvalidated(9)));
        assert_eq!(adapter.form_value(), Some(FormValue::unvalidated(9)));
    }
}
