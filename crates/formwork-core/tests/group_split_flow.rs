// File: formwork-core/tests/group_split_flow.rs
// Purpose: End-to-end splitting flows over group and array parents

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use formwork_core::{
    add_grouped_error, ArrayComposite, ControlError, ControlHandle, FormModel, FormValue,
    GroupComposite, GroupValue, SparseSlots, SplitControl, SubmitError, Validator, Validity,
    ValueModel,
};

fn field_error(code: &str) -> ControlError<String> {
    ControlError::field(vec![code.to_owned()])
}

fn name_parent() -> FormValue<GroupValue<String>, String> {
    let with_first = add_grouped_error(None, Some(field_error("first-wrong")), "first");
    let full = add_grouped_error(with_first.as_ref(), Some(field_error("last-wrong")), "last");
    FormValue {
        value: GroupValue::from([
            ("first".to_owned(), "Firsty".to_owned()),
            ("last".to_owned(), "Lastson".to_owned()),
        ]),
        validity: Validity::for_error(full.map(ControlError::Group)),
    }
}

type Written<T> = Rc<RefCell<Vec<FormValue<T, String>>>>;

fn recording_handle<T: Clone + 'static>(
    value: Option<FormValue<T, String>>,
) -> (Written<T>, ControlHandle<T, String>) {
    let written = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&written);
    let handle = ControlHandle {
        value,
        on_change: Rc::new(move |next: FormValue<T, String>| sink.borrow_mut().push(next)),
    };
    (written, handle)
}

#[test]
fn test_group_child_carries_its_value_and_error_slice() {
    let (_written, handle) = recording_handle(Some(name_parent()));
    let split: SplitControl<GroupComposite<String, String>> = SplitControl::new(handle);
    let first = split.child("first".to_owned());
    assert_eq!(
        first.value,
        Some(FormValue {
            value: "Firsty".to_owned(),
            validity: Validity::for_error(Some(field_error("first-wrong"))),
        })
    );
}

#[test]
fn test_group_child_change_rebuilds_the_parent_with_siblings_intact() {
    let (written, handle) = recording_handle(Some(name_parent()));
    let split: SplitControl<GroupComposite<String, String>> = SplitControl::new(handle);
    (split.child("first".to_owned()).on_change)(FormValue {
        value: "Secondy".to_owned(),
        validity: Validity::invalid(field_error("first-still-wrong")),
    });

    let expected_error = {
        let with_first = add_grouped_error(None, Some(field_error("first-still-wrong")), "first");
        add_grouped_error(with_first.as_ref(), Some(field_error("last-wrong")), "last")
    };
    assert_eq!(
        *written.borrow(),
        vec![FormValue {
            value: GroupValue::from([
                ("first".to_owned(), "Secondy".to_owned()),
                ("last".to_owned(), "Lastson".to_owned()),
            ]),
            validity: Validity::for_error(expected_error.map(ControlError::Group)),
        }]
    );
}

#[test]
fn test_array_child_write_into_a_hole_keeps_earlier_slots_absent() {
    let (written, handle) = recording_handle::<SparseSlots<String>>(Some(FormValue::unvalidated(
        SparseSlots::new(),
    )));
    let split: SplitControl<ArrayComposite<String, String>> = SplitControl::new(handle);
    (split.child(1).on_change)(FormValue::unvalidated("second".to_owned()));

    let result = &written.borrow()[0].value;
    assert!(!result.has(0));
    assert!(result.has(1));
    assert_eq!(result.len(), 2);
}

#[test]
fn test_field_edits_flow_through_split_into_a_submission() {
    // A name form: two validated fields feeding one group parent, whose
    // value lands in the form root for submission.
    let form: Rc<FormModel<GroupValue<String>, &'static str, String>> = Rc::new(FormModel::new());
    let submissions = Rc::new(RefCell::new(Vec::new()));
    drop(form.submissions().subscribe({
        let submissions = Rc::clone(&submissions);
        move |submission: &formwork_core::FormSubmission<GroupValue<String>, &'static str>| {
            submissions.borrow_mut().push(submission.clone())
        }
    }));
    let failures = Rc::new(RefCell::new(Vec::new()));
    drop(form.failures().subscribe({
        let failures = Rc::clone(&failures);
        move |failure: &formwork_core::SubmitFailure<&'static str>| {
            failures.borrow_mut().push(failure.clone())
        }
    }));

    let parent = ControlHandle::<GroupValue<String>, String> {
        value: None,
        on_change: {
            let form = Rc::clone(&form);
            Rc::new(move |next| form.control().on_value_change(next))
        },
    };
    let split: SplitControl<GroupComposite<String, String>> = SplitControl::new(parent);

    let required: Validator<String, String> = Rc::new(|value: Option<&String>| match value {
        Some(v) if !v.is_empty() => None,
        _ => Some(vec!["required".to_owned()]),
    });

    for key in ["first", "last"] {
        let child = split.child(key.to_owned());
        let field = ValueModel::new(String::new(), Some(Rc::clone(&required)));
        drop(field.form_values().subscribe({
            let child = child.clone();
            move |form_value: &Option<FormValue<String, String>>| {
                if let Some(form_value) = form_value.clone() {
                    (child.on_change)(form_value);
                }
            }
        }));
        field.set_value(format!("{key}-filled"));
    }

    form.trigger_submit("save");
    assert_eq!(*failures.borrow(), vec![]);
    assert_eq!(
        *submissions.borrow(),
        vec![formwork_core::FormSubmission {
            value: GroupValue::from([
                ("first".to_owned(), "first-filled".to_owned()),
                ("last".to_owned(), "last-filled".to_owned()),
            ]),
            submit_value: "save",
        }]
    );
}

#[test]
fn test_invalid_field_blocks_the_submission_with_a_reported_failure() {
    let form: Rc<FormModel<GroupValue<String>, &'static str, String>> = Rc::new(FormModel::new());
    let failures = Rc::new(RefCell::new(Vec::new()));
    drop(form.failures().subscribe({
        let failures = Rc::clone(&failures);
        move |failure: &formwork_core::SubmitFailure<&'static str>| {
            failures.borrow_mut().push(failure.clone())
        }
    }));

    let parent = ControlHandle::<GroupValue<String>, String> {
        value: None,
        on_change: {
            let form = Rc::clone(&form);
            Rc::new(move |next| form.control().on_value_change(next))
        },
    };
    let split: SplitControl<GroupComposite<String, String>> = SplitControl::new(parent);
    (split.child("first".to_owned()).on_change)(FormValue {
        value: String::new(),
        validity: Validity::invalid(field_error("required")),
    });

    form.trigger_submit("save");
    assert_eq!(failures.borrow()[0].reason, SubmitError::InvalidValue);
}

#[test]
fn test_submit_before_any_value_reports_missing() {
    let form: FormModel<GroupValue<String>, &'static str, String> = FormModel::new();
    let failures = Rc::new(RefCell::new(Vec::new()));
    drop(form.failures().subscribe({
        let failures = Rc::clone(&failures);
        move |failure: &formwork_core::SubmitFailure<&'static str>| {
            failures.borrow_mut().push(failure.clone())
        }
    }));
    form.trigger_submit("save");
    assert_eq!(failures.borrow()[0].reason, SubmitError::MissingValue);
}

#[test]
fn test_empty_field_then_fix_ends_valid() {
    // A field whose error is cleared must also clear its slot in the group
    // error, collapsing the whole thing back to valid.
    let (written, handle) = recording_handle::<GroupValue<String>>(None);
    let split: SplitControl<GroupComposite<String, String>> = SplitControl::new(handle);
    let child = split.child("only".to_owned());
    (child.on_change)(FormValue {
        value: String::new(),
        validity: Validity::invalid(field_error("required")),
    });
    (child.on_change)(FormValue::unvalidated("filled".to_owned()));

    let written = written.borrow();
    assert!(!written[0].validity.is_valid());
    assert!(written[1].validity.is_valid());
}
