// File: formwork-core/src/translate.rs
// Purpose: Presents controls and consumers through translated value types

use std::rc::Rc;

use crate::consumer::ValueConsumer;
use crate::handle::ControlHandle;
use crate::handler::{Handler, HandlerInterceptor};
use crate::value::FormValue;

/// Presents a control handle under a translated value type.
///
/// Useful when an underlying control (say, a text field) carries one type
/// but its consumer requires another (say, a parsed number): `map_value`
/// translates outgoing values and `change_interceptor` translates - and may
/// filter - changes on their way back. Validity rides along untouched in
/// both directions.
pub fn translate_control_handle<S, T, E>(
    source_interface: ControlHandle<S, E>,
    map_value: impl Fn(&S) -> T + 'static,
    change_interceptor: HandlerInterceptor<T, S>,
) -> ControlHandle<T, E>
where
    S: Clone + 'static,
    T: Clone + 'static,
    E: Clone + 'static,
{
    let value = source_interface.value.as_ref().map(|form_value| FormValue {
        value: map_value(&form_value.value),
        validity: form_value.validity.clone(),
    });
    let base = source_interface.on_change;
    let on_change: Handler<FormValue<T, E>> = Rc::new(move |next: FormValue<T, E>| {
        // The interceptor works on base types; unwrap and rewrap the
        // validity to bridge the gap.
        let validity = next.validity;
        let base = Rc::clone(&base);
        change_interceptor(
            next.value,
            Rc::new(move |source_value: S| {
                base(FormValue {
                    value: source_value,
                    validity: validity.clone(),
                });
            }),
        );
    });
    ControlHandle { value, on_change }
}

/// Presents a value consumer under a translated value type: incoming values
/// map source-to-target, outgoing form values map back target-to-source.
pub fn translate_value_consumer<S, T, E>(
    source_consumer: ValueConsumer<S, E>,
    value_source_mapper: impl Fn(&S) -> T + 'static,
    value_change_mapper: impl Fn(T) -> S + 'static,
) -> ValueConsumer<T, E>
where
    S: Clone + 'static,
    T: Clone + 'static,
    E: Clone + 'static,
{
    let base = source_consumer.on_form_value;
    ValueConsumer {
        values: source_consumer.values.map(value_source_mapper),
        on_form_value: Rc::new(move |target_form_value: Option<FormValue<T, E>>| {
            base(target_form_value
                .map(|form_value| form_value.map_value(|value| value_change_mapper(value))));
        }),
    }
}
