// File: formwork-core/src/form.rs
// Purpose: Form root model, submissions, and the validated-submit guard

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ControlModel;
use crate::stream::{Publisher, Source, Subscription};
use crate::value::FormValue;

/// A form submission: the validated form value plus a `submit_value` that
/// distinguishes different submit options (e.g. "save" vs "save and close").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission<T, S> {
    pub value: T,
    pub submit_value: S,
}

/// Why a triggered submit was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmitError {
    #[error("no form value has been produced yet")]
    MissingValue,
    #[error("the current form value is invalid")]
    InvalidValue,
}

/// A rejected submit, reported on the form's failure channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFailure<S> {
    pub submit_value: S,
    pub reason: SubmitError,
}

/// The root of a form: owns the control model, tracks its latest reported
/// value, and turns submit triggers into either a submission or a reported
/// failure.
pub struct FormModel<T, S, E> {
    control_model: ControlModel<T, E>,
    latest_value: Rc<RefCell<Option<FormValue<T, E>>>>,
    valid_submits: Publisher<FormSubmission<T, S>>,
    failed_submits: Publisher<SubmitFailure<S>>,
    tracking: Option<Subscription>,
}

impl<T: Clone + 'static, S: Clone + 'static, E: Clone + 'static> FormModel<T, S, E> {
    pub fn new() -> Self {
        let control_model = ControlModel::new();
        let latest_value = Rc::new(RefCell::new(None));
        let tracking = control_model.changes().subscribe({
            let latest_value = Rc::clone(&latest_value);
            move |form_value: &FormValue<T, E>| {
                *latest_value.borrow_mut() = Some(form_value.clone());
            }
        });
        Self {
            control_model,
            latest_value,
            valid_submits: Publisher::new(),
            failed_submits: Publisher::new(),
            tracking: Some(tracking),
        }
    }

    /// The control model that the form's controls report into.
    pub fn control(&self) -> &ControlModel<T, E> {
        &self.control_model
    }

    /// Submits the latest value if there is one and it is valid; otherwise
    /// the rejection is reported on the failure channel.
    pub fn trigger_submit(&self, submit_value: S) {
        let latest = self.latest_value.borrow().clone();
        match latest {
            Some(form_value) if form_value.validity.is_valid() => {
                self.valid_submits.send(&FormSubmission {
                    value: form_value.value,
                    submit_value,
                });
            }
            Some(_) => {
                tracing::debug!("submit rejected: current form value is invalid");
                self.failed_submits.send(&SubmitFailure {
                    submit_value,
                    reason: SubmitError::InvalidValue,
                });
            }
            None => {
                tracing::debug!("submit rejected: no form value produced yet");
                self.failed_submits.send(&SubmitFailure {
                    submit_value,
                    reason: SubmitError::MissingValue,
                });
            }
        }
    }

    /// Validated submissions.
    pub fn submissions(&self) -> Source<FormSubmission<T, S>> {
        self.valid_submits.source()
    }

    /// Rejected submits, with the reason.
    pub fn failures(&self) -> Source<SubmitFailure<S>> {
        self.failed_submits.source()
    }

    /// Stops tracking the control model.
    pub fn dispose(mut self) {
        if let Some(tracking) = self.tracking.take() {
            tracking.unsubscribe();
        }
    }
}

impl<T: Clone + 'static, S: Clone + 'static, E: Clone + 'static> Default for FormModel<T, S, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the submit action only when the value is valid. Trusting validity
/// here is what lets downstream code receive the value as "the real thing".
pub fn intercept_validated_submit<T, E>(
    form_value: &FormValue<T, E>,
    on_valid_submit: impl FnOnce(&T),
) {
    if form_value.validity.is_valid() {
        on_valid_submit(&form_value.value);
    }
}
