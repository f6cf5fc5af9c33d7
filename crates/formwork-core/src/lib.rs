// File: formwork-core/src/lib.rs
// Purpose: Main entry point for the formwork composition engine

//! # formwork-core
//!
//! A composable form-state and validation engine. It models a tree of form
//! values - scalars, groups, arrays - where each node carries both a base
//! value and a validity, and provides the machinery to split a parent node's
//! interface into child interfaces (and recombine child changes back into
//! the parent) without either side knowing the other's shape.
//!
//! ## Quick start
//!
//! ```rust
//! use formwork_core::{ControlHandle, FormValue, GroupComposite, GroupValue, SplitControl};
//! use std::rc::Rc;
//!
//! let parent = ControlHandle::<GroupValue<String>, String> {
//!     value: Some(FormValue::unvalidated(GroupValue::from([
//!         ("first".to_owned(), "Ada".to_owned()),
//!         ("last".to_owned(), "Lovelace".to_owned()),
//!     ]))),
//!     on_change: Rc::new(|next| println!("parent is now {:?}", next.value)),
//! };
//! let split: SplitControl<GroupComposite<String, String>> = SplitControl::new(parent);
//! let first = split.child("first".to_owned());
//! assert_eq!(first.value.unwrap().value, "Ada");
//! (first.on_change)(FormValue::unvalidated("Grace".to_owned()));
//! ```
//!
//! ## Modules
//!
//! - [`error`] - the recursive field/group/array error union and its merge
//!   operations
//! - [`validity`] / [`value`] - the `Validity` sum and the `FormValue` pair
//! - [`sparse`] - integer-keyed storage with genuinely absent slots
//! - [`composite`] - the extract/recombine strategies for groups and arrays
//! - [`split`] / [`sequencer`] - splitting a parent control into children,
//!   with writes serialized against the latest applied value
//! - [`detector`] / [`composition`] - stable key detection and the keyed
//!   item composition for dynamically sized collections
//! - [`consumer`] / [`collective`] / [`ordered`] - the value-consumer
//!   boundary and the per-key aggregates built on it
//! - [`model`] / [`form`] - validator-driven value models and the form root
//! - [`stream`] / [`handler`] / [`translate`] - the broadcast primitive and
//!   handler plumbing the rest is wired with

pub mod collective;
pub mod composite;
pub mod composition;
pub mod consumer;
pub mod detector;
pub mod error;
pub mod form;
pub mod handle;
pub mod handler;
pub mod model;
pub mod ordered;
pub mod sequencer;
pub mod sparse;
pub mod split;
pub mod stream;
pub mod translate;
pub mod validity;
pub mod value;

// Re-export main types
pub use collective::CollectiveValueConsumer;
pub use composite::{ArrayComposite, CompositeStrategy, GroupComposite};
pub use composition::{ChildItem, CompositionChange, KeyedItemComposition};
pub use consumer::{ValueAdapter, ValueConsumer};
pub use detector::KeyOrderDetector;
pub use error::{
    add_arrayed_error, add_grouped_error, ArrayError, ControlError, FieldError, GroupError,
};
pub use form::{
    intercept_validated_submit, FormModel, FormSubmission, SubmitError, SubmitFailure,
};
pub use handle::{ControlChannel, ControlHandle};
pub use handler::{
    combine_handlers, combine_interceptors, filter_handler, intercept_handler,
    listener_interceptor, Handler, HandlerInterceptor,
};
pub use model::{ControlModel, Validator, ValueModel};
pub use ordered::{split_array_consumer, OrderedCollectiveConsumer};
pub use sequencer::ChangeSequencer;
pub use sparse::SparseSlots;
pub use split::{ChannelSplit, SplitControl};
pub use stream::{Publisher, Source, Subscription};
pub use translate::{translate_control_handle, translate_value_consumer};
pub use validity::Validity;
pub use value::{FormValue, GroupValue};
