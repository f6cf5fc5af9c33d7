// File: formwork-core/src/composite.rs
// Purpose: Extract/recombine strategies for group and array composites

use std::marker::PhantomData;

use crate::error::{add_arrayed_error, add_grouped_error, ControlError};
use crate::sparse::SparseSlots;
use crate::validity::Validity;
use crate::value::{FormValue, GroupValue};

/// The two-function protocol by which a composite value exposes addressable
/// children and absorbs child edits.
///
/// `extract` derives the child at a key from the parent's current value;
/// `recombine` folds a changed child back into a new parent value. Neither
/// fails: an absent extraction means "child not yet present", and a
/// recombination with no previous parent synthesizes a parent holding only
/// that one child.
pub trait CompositeStrategy {
    type Parent: Clone + 'static;
    type Child: Clone + 'static;
    type Key: Clone + Ord + 'static;
    type Error: Clone + 'static;

    fn extract(
        parent: Option<&FormValue<Self::Parent, Self::Error>>,
        key: &Self::Key,
    ) -> Option<FormValue<Self::Child, Self::Error>>;

    fn recombine(
        prev_parent: Option<&FormValue<Self::Parent, Self::Error>>,
        next_child: FormValue<Self::Child, Self::Error>,
        key: &Self::Key,
    ) -> FormValue<Self::Parent, Self::Error>;
}

/// Strategy for string-keyed group values.
pub struct GroupComposite<T, E>(PhantomData<(T, E)>);

impl<T: Clone + 'static, E: Clone + 'static> CompositeStrategy for GroupComposite<T, E> {
    type Parent = GroupValue<T>;
    type Child = T;
    type Key = String;
    type Error = E;

    /// Absent when the parent is absent or the key was never set; a key set
    /// to any value - however empty - extracts.
    fn extract(
        parent: Option<&FormValue<GroupValue<T>, E>>,
        key: &String,
    ) -> Option<FormValue<T, E>> {
        let parent = parent?;
        let value = parent.value.get(key)?.clone();
        Some(FormValue {
            value,
            validity: group_child_validity(&parent.validity, key),
        })
    }

    fn recombine(
        prev_parent: Option<&FormValue<GroupValue<T>, E>>,
        next_child: FormValue<T, E>,
        key: &String,
    ) -> FormValue<GroupValue<T>, E> {
        let mut value = prev_parent
            .map(|parent| parent.value.clone())
            .unwrap_or_default();
        value.insert(key.clone(), next_child.value);
        let validity = updated_group_validity(
            prev_parent.map(|parent| &parent.validity),
            next_child.validity,
            key,
        );
        FormValue { value, validity }
    }
}

fn group_child_validity<E: Clone>(group_validity: &Validity<E>, key: &str) -> Validity<E> {
    group_validity.map_error(|group_error| {
        group_error
            .as_group()
            .and_then(|group| group.inner_errors.get(key).cloned())
    })
}

fn updated_group_validity<E: Clone>(
    current_outer_validity: Option<&Validity<E>>,
    next_item_validity: Validity<E>,
    item_name: &str,
) -> Validity<E> {
    // In the buggy case that the outer error doesn't fit a group, just ditch it.
    let current_group_error = current_outer_validity
        .and_then(Validity::error)
        .and_then(ControlError::as_group);
    let next_item_error = next_item_validity.into_error();
    let new_group_error = add_grouped_error(current_group_error, next_item_error, item_name);
    Validity::for_error(new_group_error.map(ControlError::Group))
}

/// Strategy for integer-keyed array values with sparse-slot semantics.
pub struct ArrayComposite<T, E>(PhantomData<(T, E)>);

impl<T: Clone + 'static, E: Clone + 'static> CompositeStrategy for ArrayComposite<T, E> {
    type Parent = SparseSlots<T>;
    type Child = T;
    type Key = usize;
    type Error = E;

    /// Absent when the parent is absent or the slot holds nothing - a
    /// cleared slot is indistinguishable from one that was never provided.
    fn extract(
        parent: Option<&FormValue<SparseSlots<T>, E>>,
        index: &usize,
    ) -> Option<FormValue<T, E>> {
        let parent = parent?;
        let value = parent.value.get(*index)?.clone();
        Some(FormValue {
            value,
            validity: array_child_validity(&parent.validity, *index),
        })
    }

    fn recombine(
        prev_parent: Option<&FormValue<SparseSlots<T>, E>>,
        next_child: FormValue<T, E>,
        index: &usize,
    ) -> FormValue<SparseSlots<T>, E> {
        let mut value = prev_parent
            .map(|parent| parent.value.clone())
            .unwrap_or_default();
        value.set(*index, next_child.value);
        let validity = updated_array_validity(
            prev_parent.map(|parent| &parent.validity),
            next_child.validity,
            *index,
        );
        FormValue { value, validity }
    }
}

fn array_child_validity<E: Clone>(array_validity: &Validity<E>, index: usize) -> Validity<E> {
    array_validity.map_error(|array_error| {
        array_error
            .as_array()
            .and_then(|array| array.inner_errors.get(index).cloned())
    })
}

fn updated_array_validity<E: Clone>(
    current_outer_validity: Option<&Validity<E>>,
    next_item_validity: Validity<E>,
    index: usize,
) -> Validity<E> {
    // In the buggy case that the outer error doesn't fit an array, just ditch it.
    let current_array_error = current_outer_validity
        .and_then(Validity::error)
        .and_then(ControlError::as_array);
    let next_item_error = next_item_validity.into_error();
    let new_array_error = add_arrayed_error(current_array_error, next_item_error, index);
    Validity::for_error(new_array_error.map(ControlError::Array))
}
