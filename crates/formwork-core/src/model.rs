// File: formwork-core/src/model.rs
// Purpose: Validator-driven value model and the control subject pair

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ControlError;
use crate::stream::{Publisher, Source};
use crate::validity::Validity;
use crate::value::FormValue;

/// Validates a value by computing the errors that apply to it; no errors is
/// expressed as `None`.
///
/// It is common to want "asynchronous validation" - say, a username checked
/// against a database for uniqueness. That is better modelled as synchronous
/// validation of a facet of the value that happens to be uncertain sometimes,
/// keeping the asynchronicity on the value side.
pub type Validator<T, E> = Rc<dyn Fn(Option<&T>) -> Option<Vec<E>>>;

/// Owns a control's current value, validating every change into a
/// `FormValue` and publishing the result.
pub struct ValueModel<T, E> {
    validator: RefCell<Option<Validator<T, E>>>,
    equality_comparer: Box<dyn Fn(&T, &T) -> bool>,
    current: RefCell<Option<FormValue<T, E>>>,
    form_values: Publisher<Option<FormValue<T, E>>>,
}

impl<T: Clone + PartialEq + 'static, E: Clone + 'static> ValueModel<T, E> {
    pub fn new(initial_value: T, validator: Option<Validator<T, E>>) -> Self {
        Self::with_equality(initial_value, validator, |a, b| a == b)
    }
}

impl<T: Clone + 'static, E: Clone + 'static> ValueModel<T, E> {
    /// A model with a caller-supplied equality, for value types whose
    /// sameness is narrower than structural equality.
    pub fn with_equality(
        initial_value: T,
        validator: Option<Validator<T, E>>,
        equality_comparer: impl Fn(&T, &T) -> bool + 'static,
    ) -> Self {
        let model = Self {
            validator: RefCell::new(validator),
            equality_comparer: Box::new(equality_comparer),
            current: RefCell::new(None),
            form_values: Publisher::new(),
        };
        let initial = model.compute_form_value(initial_value);
        *model.current.borrow_mut() = Some(initial);
        model
    }

    /// The current form value; present until cleared.
    pub fn form_value(&self) -> Option<FormValue<T, E>> {
        self.current.borrow().clone()
    }

    /// Every change to the form value, including clears.
    pub fn form_values(&self) -> Source<Option<FormValue<T, E>>> {
        self.form_values.source()
    }

    /// Accepts a new base value; values equal to the current one are
    /// ignored, anything else is validated, stored, and published.
    pub fn set_value(&self, value: T) {
        let unchanged = self
            .current
            .borrow()
            .as_ref()
            .is_some_and(|current| (self.equality_comparer)(&value, &current.value));
        if unchanged {
            return;
        }
        let form_value = self.compute_form_value(value);
        *self.current.borrow_mut() = Some(form_value.clone());
        self.form_values.send(&Some(form_value));
    }

    /// Clears the current value, publishing the absence once.
    pub fn clear_value(&self) {
        if self.current.borrow().is_none() {
            return;
        }
        *self.current.borrow_mut() = None;
        self.form_values.send(&None);
    }

    fn compute_form_value(&self, base_value: T) -> FormValue<T, E> {
        let errors = self
            .validator
            .borrow()
            .as_ref()
            .and_then(|validator| validator(Some(&base_value)));
        let error = errors.map(ControlError::field);
        FormValue {
            value: base_value,
            validity: Validity::for_error(error),
        }
    }
}

impl<T: Clone + 'static, E: Clone + PartialEq + 'static> ValueModel<T, E> {
    /// Swaps the validator, re-validating the current value. The result is
    /// published only when the validity actually changed.
    pub fn set_validator(&self, validator: Option<Validator<T, E>>) {
        *self.validator.borrow_mut() = validator;
        let revalidated = self
            .current
            .borrow()
            .as_ref()
            .map(|current| self.compute_form_value(current.value.clone()));
        if let Some(next) = revalidated {
            let changed = self
                .current
                .borrow()
                .as_ref()
                .is_some_and(|current| current.validity != next.validity);
            if changed {
                *self.current.borrow_mut() = Some(next.clone());
                self.form_values.send(&Some(next));
            }
        }
    }
}

/// The subject pair bridging a control's two directions: plain values
/// travelling top-down and validated form values travelling bottom-up.
pub struct ControlModel<T, E> {
    external_values: Publisher<T>,
    value_changes: Publisher<FormValue<T, E>>,
}

impl<T: 'static, E: 'static> ControlModel<T, E> {
    pub fn new() -> Self {
        Self {
            external_values: Publisher::new(),
            value_changes: Publisher::new(),
        }
    }

    /// Top-down values pushed by the owner.
    pub fn values(&self) -> Source<T> {
        self.external_values.source()
    }

    pub fn set_value(&self, value: T) {
        self.external_values.send(&value);
    }

    /// Reports a new validated value from the control side.
    pub fn on_value_change(&self, form_value: FormValue<T, E>) {
        self.value_changes.send(&form_value);
    }

    /// Bottom-up form values, for the form side to observe.
    pub fn changes(&self) -> Source<FormValue<T, E>> {
        self.value_changes.source()
    }
}

impl<T: 'static, E: 'static> Default for ControlModel<T, E> {
    fn default() -> Self {
        Self::new()
    }
}
