// File: formwork-core/src/composition.rs
// Purpose: Authoritative ordered list of keyed items with structural deltas

use serde::{Deserialize, Serialize};

use crate::stream::{Publisher, Source};

/// One entry in a keyed, ordered collection of form items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildItem<T> {
    pub key: String,
    pub value: T,
}

/// The delta between a previous and new keyed composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionChange<T> {
    pub new_composition: Vec<ChildItem<T>>,
    pub dropped_keys: Vec<String>,
}

/// Owns the authoritative ordered list of keyed items and announces
/// structural changes to collaborators.
///
/// Structure means the key sequence: values may be replaced behind stable
/// keys without this model considering the composition changed.
pub struct KeyedItemComposition<T> {
    current_composition: Vec<ChildItem<T>>,
    change_publisher: Publisher<CompositionChange<T>>,
}

impl<T: Clone + 'static> KeyedItemComposition<T> {
    pub fn new(initial_composition: Vec<ChildItem<T>>) -> Self {
        Self {
            current_composition: initial_composition,
            change_publisher: Publisher::new(),
        }
    }

    pub fn composition(&self) -> &[ChildItem<T>] {
        &self.current_composition
    }

    /// Every structural change, with its dropped keys.
    pub fn changes(&self) -> Source<CompositionChange<T>> {
        self.change_publisher.source()
    }

    /// Just the new composition half of every change.
    pub fn compositions(&self) -> Source<Vec<ChildItem<T>>> {
        self.changes().map(|change| change.new_composition.clone())
    }

    /// Replaces the composition. A new composition whose key sequence equals
    /// the current one (order and content) is a no-op: no change event.
    /// Otherwise the dropped keys - present before, absent after, regardless
    /// of position - are reported alongside the new composition.
    pub fn set_items(&mut self, new_composition: Vec<ChildItem<T>>) {
        let keys_unchanged = self.current_composition.len() == new_composition.len()
            && self
                .current_composition
                .iter()
                .zip(&new_composition)
                .all(|(current, next)| current.key == next.key);
        if keys_unchanged {
            return;
        }
        let dropped_keys: Vec<String> = self
            .current_composition
            .iter()
            .map(|item| item.key.clone())
            .filter(|key| !new_composition.iter().any(|next| next.key == *key))
            .collect();
        tracing::trace!(
            "composition changed to {} items, {} dropped",
            new_composition.len(),
            dropped_keys.len()
        );
        self.current_composition = new_composition.clone();
        self.change_publisher.send(&CompositionChange {
            new_composition,
            dropped_keys,
        });
    }

    pub fn append_item(&mut self, key: impl Into<String>, value: T) {
        let mut next = self.current_composition.clone();
        next.push(ChildItem {
            key: key.into(),
            value,
        });
        self.set_items(next);
    }

    pub fn remove_item(&mut self, key: &str) {
        let next = self
            .current_composition
            .iter()
            .filter(|item| item.key != key)
            .cloned()
            .collect();
        self.set_items(next);
    }
}

impl<T: Clone + 'static> Default for KeyedItemComposition<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
