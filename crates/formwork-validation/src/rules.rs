// File: formwork-validation/src/rules.rs
// Purpose: Plain validator builders

use std::rc::Rc;

use formwork_core::Validator;

/// Requires a non-empty string; an absent value is also an error.
pub fn not_empty<E: Clone + 'static>(error: E) -> Validator<String, E> {
    Rc::new(move |value: Option<&String>| match value {
        Some(v) if !v.is_empty() => None,
        _ => Some(vec![error.clone()]),
    })
}

/// Requires at least `min` characters. Absent values pass; pair with
/// [`not_empty`] when presence is also required.
pub fn min_length<E: Clone + 'static>(min: usize, error: E) -> Validator<String, E> {
    Rc::new(move |value: Option<&String>| match value {
        Some(v) if v.chars().count() < min => Some(vec![error.clone()]),
        _ => None,
    })
}

/// Requires at most `max` characters.
pub fn max_length<E: Clone + 'static>(max: usize, error: E) -> Validator<String, E> {
    Rc::new(move |value: Option<&String>| match value {
        Some(v) if v.chars().count() > max => Some(vec![error.clone()]),
        _ => None,
    })
}

/// Requires a value within `min..=max`.
pub fn in_range<T, E>(min: T, max: T, error: E) -> Validator<T, E>
where
    T: PartialOrd + Copy + 'static,
    E: Clone + 'static,
{
    Rc::new(move |value: Option<&T>| match value {
        Some(v) if *v < min || *v > max => Some(vec![error.clone()]),
        _ => None,
    })
}
