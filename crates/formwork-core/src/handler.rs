// File: formwork-core/src/handler.rs
// Purpose: Handler and interceptor combinators

use std::rc::Rc;

/// A callback accepting one value.
pub type Handler<T> = Rc<dyn Fn(T)>;

/// Logic that "intercepts" a handler call: it may translate, filter, or
/// defer before (or instead of) invoking the base handler.
pub type HandlerInterceptor<T, U> = Rc<dyn Fn(T, Handler<U>)>;

/// Produces a handler that applies another two in sequence.
pub fn combine_handlers<T: Clone + 'static>(
    first: Option<Handler<T>>,
    second: Option<Handler<T>>,
) -> Handler<T> {
    Rc::new(move |value: T| {
        if let Some(first) = &first {
            first(value.clone());
        }
        if let Some(second) = &second {
            second(value);
        }
    })
}

/// Intercepts a handler function based on the provided logic. For example,
/// an interceptor might let only numeric strings through to the base, or
/// parse the string and hand the base the number.
pub fn intercept_handler<T: 'static, U: 'static>(
    base: Handler<U>,
    interceptor: HandlerInterceptor<T, U>,
) -> Handler<T> {
    Rc::new(move |value: T| interceptor(value, Rc::clone(&base)))
}

/// Guards a handler behind a predicate; no predicate means everything passes.
pub fn filter_handler<T: 'static>(
    handler: Handler<T>,
    filter_predicate: Option<Rc<dyn Fn(&T) -> bool>>,
) -> Handler<T> {
    Rc::new(move |value: T| {
        let passes = filter_predicate
            .as_ref()
            .map(|predicate| predicate(&value))
            .unwrap_or(true);
        if passes {
            handler(value);
        }
    })
}

/// Produces an interceptor that applies another two in sequence.
pub fn combine_interceptors<T: 'static, U: 'static, V: 'static>(
    first: HandlerInterceptor<T, U>,
    second: HandlerInterceptor<U, V>,
) -> HandlerInterceptor<T, V> {
    Rc::new(move |value: T, base: Handler<V>| {
        let second = Rc::clone(&second);
        first(
            value,
            Rc::new(move |intermediate: U| second(intermediate, Rc::clone(&base))),
        );
    })
}

/// Allows a handler to "listen in" on another via interception: the listener
/// observes every value and the base still runs.
pub fn listener_interceptor<T: Clone + 'static>(listener: Handler<T>) -> HandlerInterceptor<T, T> {
    Rc::new(move |value: T, base: Handler<T>| {
        listener(value.clone());
        base(value);
    })
}
