// File: formwork-core/src/validity.rs
// Purpose: The valid/invalid sum type wrapping control errors

use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// Portrays the validity of some external value by conditionally carrying an
/// error.
///
/// It is common to support "asynchronous validation" - for example, a
/// username that needs to be checked against a database for uniqueness. Even
/// while processing, though, a value is either known to be valid or it
/// isn't, so `Validity` does not attempt to cover asynchronicity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Validity<E> {
    Valid,
    Invalid { error: ControlError<E> },
}

impl<E> Validity<E> {
    /// Creates a validity from the possibility of an error; the single
    /// conversion point between "error or no error" and this sum type.
    pub fn for_error(error: Option<ControlError<E>>) -> Self {
        match error {
            Some(error) => Validity::Invalid { error },
            None => Validity::Valid,
        }
    }

    pub fn invalid(error: ControlError<E>) -> Self {
        Validity::Invalid { error }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }

    /// The control error, if invalid.
    pub fn error(&self) -> Option<&ControlError<E>> {
        match self {
            Validity::Valid => None,
            Validity::Invalid { error } => Some(error),
        }
    }

    pub fn into_error(self) -> Option<ControlError<E>> {
        match self {
            Validity::Valid => None,
            Validity::Invalid { error } => Some(error),
        }
    }

    /// Re-validates through a translation of the component error. A valid
    /// base stays valid, and a mapper producing no error yields valid.
    pub fn map_error(
        &self,
        error_mapper: impl FnOnce(&ControlError<E>) -> Option<ControlError<E>>,
    ) -> Validity<E> {
        match self {
            Validity::Valid => Validity::Valid,
            Validity::Invalid { error } => Validity::for_error(error_mapper(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_for_error_wraps_presence_and_absence() {
        let error = ControlError::field(vec!["bad"]);
        assert_eq!(
            Validity::for_error(Some(error.clone())),
            Validity::Invalid { error }
        );
        assert_eq!(Validity::<&str>::for_error(None), Validity::Valid);
    }

    #[test]
    fn test_map_error_passes_valid_through() {
        let validity: Validity<&str> = Validity::Valid;
        let mapped = validity.map_error(|_| Some(ControlError::field(vec!["x"])));
        assert_eq!(mapped, Validity::Valid);
    }

    #[test]
    fn test_map_error_dropping_the_error_yields_valid() {
        let validity = Validity::invalid(ControlError::field(vec!["bad"]));
        assert_eq!(validity.map_error(|_| None), Validity::Valid);
    }

    #[test]
    fn test_map_error_replaces_the_error() {
        let validity = Validity::invalid(ControlError::field(vec!["outer"]));
        let mapped = validity.map_error(|_| Some(ControlError::field(vec!["inner"])));
        assert_eq!(mapped.error(), Some(&ControlError::field(vec!["inner"])));
    }
}
