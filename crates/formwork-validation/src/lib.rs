// File: formwork-validation/src/lib.rs
// Purpose: Validator contract, error contract, and message resolution

//! # formwork-validation
//!
//! The validator-side companions to `formwork-core`: the minimal
//! [`ValidationError`] contract, a ready-made error type, validator
//! combination, and plain validator builders.
//!
//! Applications define their own error schema; nothing here is a rule
//! language. A validator is just a function from a possibly-absent value to
//! a possibly-absent list of errors, and the builders in [`rules`] produce
//! such functions with the caller supplying the error to report.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use formwork_core::Validity;
pub use formwork_core::Validator;

pub mod rules;

/// Minimally indicates an invalidity of some value. Applications should
/// implement their own schema for producing and consuming errors based on
/// the `code` value.
pub trait ValidationError {
    /// Discriminator for the kind of invalidity.
    fn code(&self) -> &str;

    /// Distinguishes "wrong" from "not right yet".
    ///
    /// A value with invalid characters is definitely incorrect and the only
    /// remedy is to undo; a too-short email address may simply not be
    /// complete yet, and should only be flagged once the user is done with
    /// it.
    fn requires_confirmation(&self) -> bool {
        false
    }
}

/// A plain code-plus-flag error for applications without a richer schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleValidationError {
    pub code: String,
    #[serde(default)]
    pub requires_confirmation: bool,
}

impl SimpleValidationError {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            requires_confirmation: false,
        }
    }

    /// An error that may just mean "still being entered".
    pub fn needing_confirmation(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            requires_confirmation: true,
        }
    }
}

impl ValidationError for SimpleValidationError {
    fn code(&self) -> &str {
        &self.code
    }

    fn requires_confirmation(&self) -> bool {
        self.requires_confirmation
    }
}

/// Combines validators into one that reports every validator's errors,
/// in order. No errors from any of them means no errors at all.
pub fn combine_validators<T: 'static, E: 'static>(
    validators: impl IntoIterator<Item = Validator<T, E>>,
) -> Validator<T, E> {
    let validators: Vec<Validator<T, E>> = validators.into_iter().collect();
    Rc::new(move |value| {
        let mut all_errors = Vec::new();
        for validator in &validators {
            if let Some(errors) = validator(value) {
                all_errors.extend(errors);
            }
        }
        if all_errors.is_empty() {
            None
        } else {
            Some(all_errors)
        }
    })
}

/// Resolves the first displayable message for a field's validity. A validity
/// whose error isn't field-shaped resolves to nothing.
pub fn field_error_message<E>(
    validity: &Validity<E>,
    message_resolver: impl Fn(&E) -> Option<String>,
) -> Option<String> {
    let field = validity.error()?.as_field()?;
    field.errors.iter().find_map(message_resolver)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use formwork_core::ControlError;

    fn erroring(code: &'static str) -> Validator<String, SimpleValidationError> {
        Rc::new(move |_| Some(vec![SimpleValidationError::new(code)]))
    }

    fn passing() -> Validator<String, SimpleValidationError> {
        Rc::new(|_| None)
    }

    #[test]
    fn test_combined_validators_report_in_order() {
        let combined = combine_validators([erroring("first"), passing(), erroring("second")]);
        let errors = combined(Some(&"x".to_owned())).unwrap();
        assert_eq!(
            errors,
            vec![
                SimpleValidationError::new("first"),
                SimpleValidationError::new("second"),
            ]
        );
    }

    #[test]
    fn test_combined_validators_with_nothing_to_say_stay_silent() {
        let combined = combine_validators([passing(), passing()]);
        assert_eq!(combined(Some(&"x".to_owned())), None);
    }

    #[test]
    fn test_field_error_message_resolves_the_first_match() {
        let validity = Validity::invalid(ControlError::field(vec![
            SimpleValidationError::new("unknowable"),
            SimpleValidationError::new("required"),
        ]));
        let message = field_error_message(&validity, |error| match error.code() {
            "required" => Some("This field is required".to_owned()),
            _ => None,
        });
        assert_eq!(message, Some("This field is required".to_owned()));
    }

    #[test]
    fn test_field_error_message_is_none_for_valid_values() {
        let validity: Validity<SimpleValidationError> = Validity::Valid;
        assert_eq!(field_error_message(&validity, |_| None), None);
    }

    #[test]
    fn test_field_error_message_ignores_non_field_errors() {
        let validity: Validity<SimpleValidationError> = Validity::invalid(
            formwork_core::ControlError::Group(formwork_core::GroupError {
                errors: vec![],
                inner_errors: Default::default(),
            }),
        );
        assert_eq!(
            field_error_message(&validity, |error| Some(error.code().to_owned())),
            None
        );
    }

    #[test]
    fn test_simple_error_serialization_shape() {
        let error = SimpleValidationError::needing_confirmation("minLength");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": "minLength", "requiresConfirmation": true })
        );
    }
}
