// File: formwork-core/src/detector.rs
// Purpose: Detects stable key ordering for incoming array values

use crate::composition::ChildItem;

/// Detects ordering of string keys based on equality to reference values.
///
/// When working with array-shaped form values, it is not just the current
/// order of the *values* that matters but that of the *child items* that
/// consume them: in a list of two children, removing the first is not
/// equivalent to removing the second and replacing it with the first. Child
/// values are therefore associated with a key string, and order is
/// maintained as an ordering of those keys.
///
/// Incoming parent values carry no keys, only a value array, so order must
/// be *detected* from each arrival: incoming values are matched to their
/// last known "reference" value, and unmatched values are treated as
/// entirely new children and given freshly generated keys.
pub struct KeyOrderDetector<T> {
    reference_values: Vec<(String, T)>,
    key_gen: Box<dyn FnMut(&T) -> String>,
    value_equals: Box<dyn Fn(&T, &T) -> bool>,
}

impl<T: Clone + PartialEq> KeyOrderDetector<T> {
    /// A detector matching by value equality.
    pub fn new(key_gen: impl FnMut(&T) -> String + 'static) -> Self {
        Self::with_equality(key_gen, |a, b| a == b)
    }

    /// A detector with an incrementing-counter key generator.
    pub fn sequential() -> Self {
        let mut next = 0u64;
        Self::new(move |_| {
            let key = next.to_string();
            next += 1;
            key
        })
    }

    /// A detector generating collision-free random keys.
    pub fn with_uuid_keys() -> Self {
        Self::new(|_| uuid::Uuid::new_v4().to_string())
    }
}

impl<T: Clone> KeyOrderDetector<T> {
    /// A detector with caller-supplied equality, for values whose identity
    /// is narrower than whole-value equality.
    pub fn with_equality(
        key_gen: impl FnMut(&T) -> String + 'static,
        value_equals: impl Fn(&T, &T) -> bool + 'static,
    ) -> Self {
        Self {
            reference_values: Vec::new(),
            key_gen: Box::new(key_gen),
            value_equals: Box::new(value_equals),
        }
    }

    /// Replaces the reference mapping wholesale, e.g. after the parent's
    /// authoritative form value changed structurally.
    pub fn set_reference_values(&mut self, values: impl IntoIterator<Item = (String, T)>) {
        self.reference_values = values.into_iter().collect();
    }

    /// Assigns each incoming value a stable key, in input order.
    ///
    /// Matching runs against a snapshot of the reference mapping and each
    /// reference is consumable at most once per pass, so duplicates resolve
    /// first-come-first-served. Every assignment - matched or generated -
    /// is recorded as a future reference value, which makes detection
    /// idempotent: an unchanged array keyifies identically next time.
    pub fn keyify_by_reference_value(&mut self, array_value: &[T]) -> Vec<ChildItem<T>> {
        let snapshot: Vec<(String, T)> = self.reference_values.clone();
        let mut consumed = vec![false; snapshot.len()];
        let mut generated = 0usize;
        let mut items = Vec::with_capacity(array_value.len());
        for child_value in array_value {
            let mut matched: Option<String> = None;
            for (i, (key, reference_value)) in snapshot.iter().enumerate() {
                if !consumed[i] && (self.value_equals)(child_value, reference_value) {
                    consumed[i] = true;
                    matched = Some(key.clone());
                    break;
                }
            }
            let key = match matched {
                Some(key) => key,
                None => {
                    generated += 1;
                    (self.key_gen)(child_value)
                }
            };
            self.upsert_reference(key.clone(), child_value.clone());
            items.push(ChildItem {
                key,
                value: child_value.clone(),
            });
        }
        if generated > 0 {
            tracing::trace!("key detection generated {generated} new keys");
        }
        items
    }

    fn upsert_reference(&mut self, key: String, value: T) {
        match self
            .reference_values
            .iter_mut()
            .find(|(existing, _)| *existing == key)
        {
            Some(entry) => entry.1 = value,
            None => self.reference_values.push((key, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key_gen_from(initial: u64) -> impl FnMut(&&str) -> String {
        let mut next = initial;
        move |_| {
            let key = next.to_string();
            next += 1;
            key
        }
    }

    fn pairs<T: Clone>(items: &[ChildItem<T>]) -> Vec<(String, T)> {
        items
            .iter()
            .map(|item| (item.key.clone(), item.value.clone()))
            .collect()
    }

    #[test]
    fn test_generates_keys_for_new_values() {
        let mut detector = KeyOrderDetector::new(key_gen_from(0));
        let keyified = detector.keyify_by_reference_value(&["item0", "item1"]);
        assert_eq!(
            pairs(&keyified),
            vec![("0".to_owned(), "item0"), ("1".to_owned(), "item1")]
        );
    }

    #[test]
    fn test_key_generation_is_idempotent() {
        let mut detector = KeyOrderDetector::new(key_gen_from(0));
        let first = detector.keyify_by_reference_value(&["item0"]);
        let second = detector.keyify_by_reference_value(&["item0"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_values_resolve_first_come_first_served() {
        let mut detector = KeyOrderDetector::new(key_gen_from(0));
        let keyified = detector.keyify_by_reference_value(&["item", "item"]);
        assert_eq!(
            pairs(&keyified),
            vec![("0".to_owned(), "item"), ("1".to_owned(), "item")]
        );
    }

    #[test]
    fn test_recognizes_reordering_by_reference_value() {
        let mut detector = KeyOrderDetector::new(key_gen_from(2));
        detector.set_reference_values([("0".to_owned(), "item0"), ("1".to_owned(), "item1")]);
        let keyified = detector.keyify_by_reference_value(&["item1", "item0"]);
        assert_eq!(
            pairs(&keyified),
            vec![("1".to_owned(), "item1"), ("0".to_owned(), "item0")]
        );
    }

    #[test]
    fn test_changed_values_get_fresh_keys() {
        let mut detector = KeyOrderDetector::new(key_gen_from(2));
        detector.set_reference_values([("0".to_owned(), "item0"), ("1".to_owned(), "item1")]);
        let keyified = detector.keyify_by_reference_value(&["newItem0", "item1"]);
        assert_eq!(
            pairs(&keyified),
            vec![("2".to_owned(), "newItem0"), ("1".to_owned(), "item1")]
        );
    }

    #[test]
    fn test_uses_the_provided_equality() {
        #[derive(Clone)]
        struct Row {
            id: u32,
            text: &'static str,
        }
        let mut next = 1u64;
        let mut detector = KeyOrderDetector::with_equality(
            move |_: &Row| {
                let key = next.to_string();
                next += 1;
                key
            },
            |a: &Row, b: &Row| a.id == b.id,
        );
        detector.set_reference_values([(
            "0".to_owned(),
            Row {
                id: 0,
                text: "before",
            },
        )]);
        let keyified = detector.keyify_by_reference_value(&[Row {
            id: 0,
            text: "after",
        }]);
        assert_eq!(keyified[0].key, "0");
        assert_eq!(keyified[0].value.text, "after");
    }

    #[test]
    fn test_sequential_detector_counts_from_zero() {
        let mut detector = KeyOrderDetector::sequential();
        let keyified = detector.keyify_by_reference_value(&["a", "b"]);
        assert_eq!(keyified[0].key, "0");
        assert_eq!(keyified[1].key, "1");
    }

    #[test]
    fn test_uuid_detector_generates_distinct_keys() {
        let mut detector = KeyOrderDetector::with_uuid_keys();
        let keyified = detector.keyify_by_reference_value(&["a", "b"]);
        assert_ne!(keyified[0].key, keyified[1].key);
    }
}
