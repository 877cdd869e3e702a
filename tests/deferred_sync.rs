use std::cell::RefCell;
use std::rc::Rc;

use mdc_textfield::prelude::*;
use serde_json::json;

fn attached(document: &Document) -> (TextField, Rc<RefCell<Vec<FieldValue>>>) {
    let field = TextField::new(document);
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    field.register_on_change(Box::new(move |value: &FieldValue| {
        sink.borrow_mut().push(value.clone());
    }));
    field.attach().unwrap();
    (field, changes)
}

#[test]
fn native_input_catches_up_on_the_next_macrotask() {
    let document = Document::new(EventLoop::new());
    let (field, changes) = attached(&document);

    field.set_value("hello");
    assert_eq!(field.value(), FieldValue::from("hello"));
    assert_eq!(field.input().value(), "");

    document.event_loop().tick();
    assert_eq!(field.input().value(), "hello");
    assert_eq!(*changes.borrow(), vec![FieldValue::from("hello")]);
}

#[test]
fn model_writes_are_silent() {
    let document = Document::new(EventLoop::new());
    let (field, changes) = attached(&document);

    field.write_value(&json!(12));
    document.event_loop().run_until_idle().unwrap();
    assert_eq!(field.input().value(), "12");
    assert!(changes.borrow().is_empty());
}

#[test]
fn number_fields_coerce_user_text() {
    let document = Document::new(EventLoop::new());
    let (field, changes) = attached(&document);
    field.set_type(InputType::Number);
    document.event_loop().run_until_idle().unwrap();

    field.input().type_text("3.5");
    field.input().type_text("nope");
    document.event_loop().run_until_idle().unwrap();

    assert_eq!(field.value(), FieldValue::Null);
    assert!(field.is_bad_input());
    assert_eq!(*changes.borrow(), vec![FieldValue::Null, FieldValue::Null]);
}

#[test]
fn clearing_a_required_field_rearms_validation() {
    let document = Document::new(EventLoop::new());
    let (field, _changes) = attached(&document);
    field.set_required(true);
    field.set_value("x");
    document.event_loop().run_until_idle().unwrap();
    assert!(field.valid());

    field.set_value("");
    document.event_loop().tick();
    assert!(!field.required_attribute());
    assert!(field.required());

    document.event_loop().run_until_idle().unwrap();
    assert!(field.required_attribute());
    assert!(!field.valid());
}
