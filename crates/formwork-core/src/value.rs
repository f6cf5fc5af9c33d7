// File: formwork-core/src/value.rs
// Purpose: The value-plus-validity pair that flows through every form node

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::validity::Validity;

/// A string-keyed composite value. Heterogeneous groups are expressed by
/// choosing an enum for `T`.
pub type GroupValue<T> = BTreeMap<String, T>;

/// Pairs a form control's base value with its validity. Every form node, at
/// every level of nesting, flows through the system as one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormValue<T, E> {
    pub value: T,
    pub validity: Validity<E>,
}

impl<T, E> FormValue<T, E> {
    pub fn new(value: T, validity: Validity<E>) -> Self {
        Self { value, validity }
    }

    /// A value whose validity is not yet known. In the absence of an
    /// "unknown" option, "no known errors" means valid.
    pub fn unvalidated(value: T) -> Self {
        Self {
            value,
            validity: Validity::Valid,
        }
    }

    /// Reshapes the base value, carrying the validity along unchanged.
    pub fn map_value<U>(self, mapper: impl FnOnce(T) -> U) -> FormValue<U, E> {
        FormValue {
            value: mapper(self.value),
            validity: self.validity,
        }
    }
}
