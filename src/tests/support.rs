use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::dom::Document;
use crate::field::{FieldValue, Foundation, TextField, TextFieldAdapter};
use crate::runtime::EventLoop;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Init,
    Destroy,
    SetValue(FieldValue),
    SetDisabled(bool),
    SetValid(bool),
    NotchOutline(bool),
    SetUseNativeValidation(bool),
}

/// Foundation double that records every call and performs only the
/// adapter writes the host relies on.
pub struct RecordingFoundation {
    adapter: Rc<dyn TextFieldAdapter>,
    calls: Rc<RefCell<Vec<Call>>>,
    valid: Cell<bool>,
}

impl Foundation for RecordingFoundation {
    fn init(&self) {
        self.calls.borrow_mut().push(Call::Init);
    }

    fn destroy(&self) {
        self.calls.borrow_mut().push(Call::Destroy);
    }

    fn set_value(&self, value: &FieldValue) {
        self.calls.borrow_mut().push(Call::SetValue(value.clone()));
        self.adapter.set_native_input_value(&value.to_native());
    }

    fn is_disabled(&self) -> bool {
        self.adapter
            .get_native_input()
            .is_some_and(|native| native.disabled)
    }

    fn set_disabled(&self, disabled: bool) {
        self.calls.borrow_mut().push(Call::SetDisabled(disabled));
        self.adapter.set_native_input_disabled(disabled);
    }

    fn set_valid(&self, is_valid: bool) {
        self.calls.borrow_mut().push(Call::SetValid(is_valid));
        self.valid.set(is_valid);
    }

    fn is_valid(&self) -> bool {
        self.valid.get()
    }

    fn notch_outline(&self, open_notch: bool) {
        self.calls.borrow_mut().push(Call::NotchOutline(open_notch));
        if !self.adapter.has_outline() {
            return;
        }
        if open_notch {
            self.adapter
                .notch_outline(self.adapter.get_label_width(), self.adapter.is_rtl());
        } else {
            self.adapter.close_outline();
        }
    }

    fn set_use_native_validation(&self, use_native_validation: bool) {
        self.calls
            .borrow_mut()
            .push(Call::SetUseNativeValidation(use_native_validation));
    }
}

#[derive(Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
    built: Rc<Cell<usize>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn set_values(&self) -> Vec<FieldValue> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::SetValue(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| *call == wanted)
            .count()
    }

    /// How many foundations the factory built.
    pub fn built(&self) -> usize {
        self.built.get()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

pub fn document() -> Document {
    Document::new(EventLoop::new())
}

pub fn recording_field(document: &Document) -> (TextField, Recorder) {
    let recorder = Recorder::default();
    let factory_recorder = recorder.clone();
    let field = TextField::builder(document)
        .foundation(move |adapter| {
            factory_recorder.built.set(factory_recorder.built.get() + 1);
            Rc::new(RecordingFoundation {
                adapter,
                calls: Rc::clone(&factory_recorder.calls),
                valid: Cell::new(true),
            }) as Rc<dyn Foundation>
        })
        .build();
    (field, recorder)
}

pub fn flush(document: &Document) {
    document
        .event_loop()
        .run_until_idle()
        .expect("event loop settles");
}
