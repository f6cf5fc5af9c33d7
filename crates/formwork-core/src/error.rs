// File: formwork-core/src/error.rs
// Purpose: Recursive control-error model and sibling-preserving merge operations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sparse::SparseSlots;

/// Error within some abstracted form control. The control - or, more
/// precisely, the errors attached to it - may be a simple "field", a "group"
/// of errors keyed by string, or an "array" of errors keyed by number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum ControlError<E> {
    Field(FieldError<E>),
    Group(GroupError<E>),
    Array(ArrayError<E>),
}

/// A simple "field"-style error: no inner element errors, only a flat list
/// of errors that apply directly to the control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError<E> {
    pub errors: Vec<E>,
}

/// A string-keyed "group" of inner errors. The base control may have its own
/// flat errors, and the inner map is sparse: an absent key is genuinely
/// missing, not an empty error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupError<E> {
    pub errors: Vec<E>,
    pub inner_errors: BTreeMap<String, ControlError<E>>,
}

/// A number-keyed "array" of inner errors. Slots that carry no error are
/// genuinely absent, and an array whose every slot is absent is "hollow".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayError<E> {
    pub errors: Vec<E>,
    pub inner_errors: SparseSlots<ControlError<E>>,
}

impl<E> ControlError<E> {
    /// A leaf error carrying the given flat error list.
    pub fn field(errors: Vec<E>) -> Self {
        ControlError::Field(FieldError { errors })
    }

    pub fn as_field(&self) -> Option<&FieldError<E>> {
        match self {
            ControlError::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupError<E>> {
        match self {
            ControlError::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayError<E>> {
        match self {
            ControlError::Array(array) => Some(array),
            _ => None,
        }
    }
}

/// Adjusts a group error so that it includes a particular error within its
/// item error group. Sibling entries and the group's own errors are carried
/// over untouched.
///
/// Group errors with no actual errors are not representable: when the result
/// would have no own errors and no present inner errors, this returns `None`.
pub fn add_grouped_error<E: Clone>(
    current_group_error: Option<&GroupError<E>>,
    next_item_error: Option<ControlError<E>>,
    item_name: &str,
) -> Option<GroupError<E>> {
    let mut inner_errors = current_group_error
        .map(|group| group.inner_errors.clone())
        .unwrap_or_default();
    match next_item_error {
        Some(item_error) => {
            inner_errors.insert(item_name.to_owned(), item_error);
        }
        None => {
            inner_errors.remove(item_name);
        }
    }
    let errors = current_group_error
        .map(|group| group.errors.clone())
        .unwrap_or_default();
    if inner_errors.is_empty() && errors.is_empty() {
        None
    } else {
        Some(GroupError {
            errors,
            inner_errors,
        })
    }
}

/// Adjusts an array error so that it includes a particular error within its
/// item error array. The inner storage is extended through `index` so that
/// untouched positions stay genuinely absent rather than gaining a sentinel.
///
/// As with groups, a result with no own errors and a hollow inner array
/// collapses to `None`.
pub fn add_arrayed_error<E: Clone>(
    current_array_error: Option<&ArrayError<E>>,
    next_item_error: Option<ControlError<E>>,
    index: usize,
) -> Option<ArrayError<E>> {
    let mut inner_errors = current_array_error
        .map(|array| array.inner_errors.clone())
        .unwrap_or_default();
    match next_item_error {
        Some(item_error) => inner_errors.set(index, item_error),
        None => {
            inner_errors.clear_slot(index);
        }
    }
    let errors = current_array_error
        .map(|array| array.errors.clone())
        .unwrap_or_default();
    if inner_errors.is_hollow() && errors.is_empty() {
        None
    } else {
        Some(ArrayError {
            errors,
            inner_errors,
        })
    }
}
