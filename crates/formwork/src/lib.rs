// File: formwork/src/lib.rs
// Purpose: Umbrella crate re-exporting the formwork components

//! # formwork
//!
//! A composable form-state and validation engine.
//!
//! Form state is modelled as a tree of [`FormValue`]s: every node - scalar
//! field, keyed group, or dynamically sized array - carries a base value and
//! a [`Validity`]. Composite nodes can be split into child controls and
//! child edits recombined into the parent, with validation errors merged
//! per-child without disturbing siblings.
//!
//! ## Quick start
//!
//! ```rust
//! use formwork::{ControlHandle, FormValue, GroupComposite, GroupValue, SplitControl};
//! use std::rc::Rc;
//!
//! // A "name" group with two string children.
//! let parent = ControlHandle::<GroupValue<String>, String> {
//!     value: Some(FormValue::unvalidated(GroupValue::from([
//!         ("first".to_owned(), "Ada".to_owned()),
//!         ("last".to_owned(), "Lovelace".to_owned()),
//!     ]))),
//!     on_change: Rc::new(|next| { let _ = next; }),
//! };
//! let split: SplitControl<GroupComposite<String, String>> = SplitControl::new(parent);
//! let first = split.child("first".to_owned());
//! assert_eq!(first.value.unwrap().value, "Ada");
//! ```
//!
//! ## Architecture
//!
//! This crate is a convenience wrapper that re-exports two component crates:
//!
//! - **`formwork-core`** - the composition engine: error model, validity,
//!   extract/recombine strategies, control splitting, keyed item
//!   composition, key-order detection, and value consumers.
//! - **`formwork-validation`** - the validator contract, a ready-made error
//!   type, validator combination, and plain validator builders.
//!
//! Most users should use this parent crate; the components can be depended
//! on individually for fine-grained control.

pub use formwork_core::*;

// Re-export the validation toolkit under its own namespace
pub use formwork_validation as validation;

/// The types most consumers need, in one import.
pub mod prelude {
    pub use formwork_core::{
        ArrayComposite, ChildItem, CompositionChange, ControlError, ControlHandle, FormValue,
        GroupComposite, GroupValue, KeyOrderDetector, KeyedItemComposition, SparseSlots,
        SplitControl, Validator, Validity, ValueConsumer, ValueModel,
    };
    pub use formwork_validation::{SimpleValidationError, ValidationError};
}
