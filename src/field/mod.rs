//! Host controller of a Material text field.
//!
//! [`TextField`] owns the rendered view, the ripple and the foundation. Its
//! setters store configuration synchronously, request a re-render as a
//! microtask and defer foundation writes that depend on rendered attributes
//! to the next macrotask. Deferred writes are tagged with a generation so a
//! later write to the same property supersedes an earlier pending one.

pub mod accessor;
pub mod adapter;
pub mod config;
pub mod error;
pub mod foundation;
pub mod value;
pub mod view;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::{debug, trace};

use crate::dom::{Document, Element, EventHandler, handler};
use crate::options::TextFieldOptions;
use crate::runtime::{ChangeDetector, EventEmitter};
use crate::widgets::{HelperText, Ripple, TextFieldIcon};

pub use accessor::{ControlValueAccessor, OnChange, OnTouched};
pub use adapter::{HostAdapter, NativeInput, TextFieldAdapter};
pub use config::FieldConfig;
pub use error::FieldError;
pub use foundation::{Foundation, FoundationFactory, TextFieldFoundation, default_factory};
pub use value::{FieldValue, InputType};
pub use view::FieldView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Constructed,
    Attached,
    Destroyed,
}

/// Generation bookkeeping for one deferred property.
#[derive(Debug, Default)]
struct SyncSlot {
    scheduled: Cell<u64>,
    synced: Cell<u64>,
}

impl SyncSlot {
    fn bump(&self) -> u64 {
        let generation = self.scheduled.get() + 1;
        self.scheduled.set(generation);
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.scheduled.get() == generation
    }

    /// The foundation already reflects the latest generation.
    fn mark_synced(&self) {
        self.synced.set(self.scheduled.get());
    }

    /// True once per generation.
    fn claim(&self, generation: u64) -> bool {
        if self.synced.get() == generation {
            return false;
        }
        self.synced.set(generation);
        true
    }
}

pub struct TextFieldBuilder {
    document: Document,
    id_prefix: String,
    multiline: bool,
    factory: FoundationFactory,
}

impl TextFieldBuilder {
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
            id_prefix: TextFieldOptions::default().id_prefix().to_string(),
            multiline: false,
            factory: default_factory(),
        }
    }

    pub fn options(mut self, options: &TextFieldOptions) -> Self {
        self.id_prefix = options.id_prefix().to_string();
        self
    }

    /// Multi-line variant: a `textarea` under an `mdc-textarea` host. Never
    /// gets a ripple.
    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    pub fn foundation(
        mut self,
        factory: impl Fn(Rc<dyn TextFieldAdapter>) -> Rc<dyn Foundation> + 'static,
    ) -> Self {
        self.factory = Rc::new(factory);
        self
    }

    pub fn build(self) -> TextField {
        let uid = config::next_uid(&self.id_prefix);
        let inner = Rc::new(FieldInner {
            view: Rc::new(FieldView::new(&self.document, self.multiline)),
            document: self.document,
            config: RefCell::new(FieldConfig::new(uid)),
            factory: self.factory,
            foundation: RefCell::new(None),
            lifecycle: Cell::new(Lifecycle::Constructed),
            ripple: Ripple::new(),
            helper_text: RefCell::new(None),
            detector: ChangeDetector::new(),
            value_sync: SyncSlot::default(),
            disabled_sync: SyncSlot::default(),
            rearm_holds: Cell::new(0),
            template_listeners: RefCell::new(Vec::new()),
            on_change: RefCell::new(None),
            on_touched: RefCell::new(None),
            change: EventEmitter::new(),
            blur: EventEmitter::new(),
        });
        TextField { inner }
    }
}

/// A Material text field bound to a [`Document`].
///
/// Dropping the handle destroys the field.
pub struct TextField {
    inner: Rc<FieldInner>,
}

struct FieldInner {
    document: Document,
    view: Rc<FieldView>,
    config: RefCell<FieldConfig>,
    factory: FoundationFactory,
    foundation: RefCell<Option<Rc<dyn Foundation>>>,
    lifecycle: Cell<Lifecycle>,
    ripple: Ripple,
    helper_text: RefCell<Option<Weak<HelperText>>>,
    detector: ChangeDetector,
    value_sync: SyncSlot,
    disabled_sync: SyncSlot,
    rearm_holds: Cell<u32>,
    template_listeners: RefCell<Vec<(&'static str, EventHandler)>>,
    on_change: RefCell<Option<Rc<dyn Fn(&FieldValue)>>>,
    on_touched: RefCell<Option<Rc<dyn Fn()>>>,
    change: EventEmitter<FieldValue>,
    blur: EventEmitter<FieldValue>,
}

impl fmt::Debug for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextField")
            .field("id", &self.id())
            .field("lifecycle", &self.inner.lifecycle.get())
            .field("config", &*self.inner.config.borrow())
            .finish()
    }
}

impl TextField {
    pub fn new(document: &Document) -> Self {
        TextFieldBuilder::new(document).build()
    }

    pub fn builder(document: &Document) -> TextFieldBuilder {
        TextFieldBuilder::new(document)
    }

    // --- lifecycle --------------------------------------------------------

    /// Build the DOM, construct and initialize the foundation, and apply the
    /// configuration staged so far.
    pub fn attach(&self) -> Result<(), FieldError> {
        let inner = &self.inner;
        match inner.lifecycle.get() {
            Lifecycle::Attached => return Err(FieldError::AlreadyAttached { id: self.id() }),
            Lifecycle::Destroyed => return Err(FieldError::Destroyed { id: self.id() }),
            Lifecycle::Constructed => {}
        }

        inner.view.mount();
        inner.bind_template();
        inner.lifecycle.set(Lifecycle::Attached);
        inner.render();

        let helper_text = inner.helper_text.borrow().clone();
        let adapter: Rc<dyn TextFieldAdapter> =
            Rc::new(HostAdapter::new(Rc::clone(&inner.view), helper_text));
        let foundation = (inner.factory)(adapter);
        *inner.foundation.borrow_mut() = Some(Rc::clone(&foundation));
        foundation.init();

        let staged = inner.config.borrow().clone();
        if !staged.use_native_validation {
            foundation.set_use_native_validation(false);
        }
        if let Some(valid) = staged.valid {
            foundation.set_valid(valid);
        }
        if staged.disabled {
            foundation.set_disabled(true);
        }
        inner.disabled_sync.mark_synced();
        if !staged.value.to_native().is_empty() {
            foundation.set_value(&staged.value);
        }
        inner.value_sync.mark_synced();

        inner.apply_ripple_policy();
        debug!(id = %staged.id(), "text field attached");
        Ok(())
    }

    /// Release the ripple, then the foundation. Idempotent; destroying a
    /// field that was never attached only prevents a later attach.
    pub fn destroy(&self) {
        self.inner.destroy();
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.lifecycle.get()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.lifecycle.get() == Lifecycle::Attached
    }

    /// Render now instead of waiting for the scheduled check.
    pub fn detect_changes(&self) {
        self.inner.render();
    }

    // --- value --------------------------------------------------------------

    pub fn value(&self) -> FieldValue {
        self.inner.config.borrow().value.clone()
    }

    /// Property-style assignment: ignored when the coerced value is
    /// unchanged, otherwise propagated and reported like an edit.
    pub fn set_value(&self, value: impl Into<FieldValue>) {
        let coerced = value.into().coerce(self.input_type());
        if coerced == self.value() {
            return;
        }
        self.inner.store_value(coerced, true);
    }

    /// Store `value`, then hand it to the foundation on the next macrotask.
    /// `user_input` decides whether the change callback fires.
    pub fn set_value_with(&self, value: impl Into<FieldValue>, user_input: bool) {
        let coerced = value.into().coerce(self.input_type());
        self.inner.store_value(coerced, user_input);
    }

    /// Input event from the native element.
    pub fn on_input(&self, value: &str) {
        self.inner.on_input(value);
    }

    pub fn on_blur(&self) {
        self.inner.on_blur();
    }

    pub fn is_bad_input(&self) -> bool {
        self.inner.view.input().validity().bad_input
    }

    /// No native value and no unparsable input.
    pub fn empty(&self) -> bool {
        self.inner.view.input().value().is_empty() && !self.is_bad_input()
    }

    pub fn focused(&self) -> bool {
        self.inner.view.is_interactive() && self.inner.view.input().is_focused()
    }

    /// Focus the input unless the field is disabled.
    pub fn focus(&self) -> bool {
        if self.disabled() {
            return false;
        }
        self.inner.view.input().focus()
    }

    pub fn select_all(&self) {
        self.inner.view.input().select();
    }

    // --- validity -----------------------------------------------------------

    /// Foundation validity once attached; the staged override (or `true`)
    /// before.
    pub fn valid(&self) -> bool {
        match self.inner.foundation() {
            Some(foundation) => foundation.is_valid(),
            None => self.inner.config.borrow().valid.unwrap_or(true),
        }
    }

    pub fn set_valid(&self, valid: bool) {
        self.inner.config.borrow_mut().valid = Some(valid);
        if let Some(foundation) = self.inner.foundation() {
            foundation.set_valid(valid);
        }
        self.inner.mark_for_check();
    }

    pub fn use_native_validation(&self) -> bool {
        self.inner.config.borrow().use_native_validation
    }

    pub fn set_use_native_validation(&self, use_native_validation: bool) {
        self.inner.config.borrow_mut().use_native_validation = use_native_validation;
        if let Some(foundation) = self.inner.foundation() {
            foundation.set_use_native_validation(use_native_validation);
        }
        self.inner.mark_for_check();
    }

    // --- configuration ------------------------------------------------------

    pub fn id(&self) -> String {
        self.inner.config.borrow().id().to_string()
    }

    /// An empty id restores the generated one.
    pub fn set_id(&self, id: impl Into<String>) {
        self.inner.config.borrow_mut().id = Some(id.into());
        self.inner.mark_for_check();
    }

    pub fn input_type(&self) -> InputType {
        self.inner.config.borrow().input_type
    }

    pub fn set_type(&self, input_type: InputType) {
        self.inner.config.borrow_mut().input_type = input_type;
        self.inner.mark_for_check();
    }

    pub fn set_type_str(&self, name: &str) -> Result<(), FieldError> {
        self.set_type(name.parse()?);
        Ok(())
    }

    pub fn outlined(&self) -> bool {
        self.inner.config.borrow().outlined
    }

    /// Swap the line ripple for a notched outline or back. With a value
    /// present the notch is opened on the next macrotask, once the outline
    /// has been rendered.
    pub fn set_outlined(&self, outlined: bool) {
        let inner = &self.inner;
        let has_value = {
            let mut config = inner.config.borrow_mut();
            config.outlined = outlined;
            config.value.is_truthy()
        };

        if outlined && has_value {
            let weak = Rc::downgrade(inner);
            inner.document.event_loop().set_timeout(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let open = inner.config.borrow().value.is_truthy();
                if let Some(foundation) = inner.foundation() {
                    trace!(open, "deferred outline notch");
                    foundation.notch_outline(open);
                }
            });
        }

        inner.apply_ripple_policy();
        inner.mark_for_check();
    }

    pub fn disabled(&self) -> bool {
        self.inner.config.borrow().disabled
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.set_disabled_state(disabled);
    }

    /// The configured flag, unaffected by an in-flight re-arm.
    pub fn required(&self) -> bool {
        self.inner.config.borrow().required
    }

    pub fn set_required(&self, required: bool) {
        self.inner.config.borrow_mut().required = required;
        self.inner.mark_for_check();
    }

    pub fn fullwidth(&self) -> bool {
        self.inner.config.borrow().fullwidth
    }

    /// Fullwidth fields show the label as placeholder.
    pub fn set_fullwidth(&self, fullwidth: bool) {
        {
            let mut config = self.inner.config.borrow_mut();
            config.fullwidth = fullwidth;
            config.placeholder = if fullwidth { config.label.clone() } else { None };
        }
        self.inner.mark_for_check();
    }

    pub fn dense(&self) -> bool {
        self.inner.config.borrow().dense
    }

    pub fn set_dense(&self, dense: bool) {
        self.inner.config.borrow_mut().dense = dense;
        self.inner.mark_for_check();
    }

    pub fn label(&self) -> String {
        self.inner.config.borrow().label().to_string()
    }

    pub fn set_label(&self, label: impl Into<String>) {
        self.inner.config.borrow_mut().label = Some(label.into());
        self.inner.mark_for_check();
    }

    pub fn placeholder(&self) -> String {
        self.inner.config.borrow().placeholder().to_string()
    }

    pub fn set_placeholder(&self, placeholder: impl Into<String>) {
        self.inner.config.borrow_mut().placeholder = Some(placeholder.into());
        self.inner.mark_for_check();
    }

    pub fn set_tab_index(&self, tab_index: i32) {
        self.update(|config| config.tab_index = tab_index);
    }

    pub fn set_pattern(&self, pattern: Option<String>) {
        self.update(|config| config.pattern = pattern);
    }

    pub fn set_maxlength(&self, maxlength: Option<u32>) {
        self.update(|config| config.maxlength = maxlength);
    }

    pub fn set_minlength(&self, minlength: Option<u32>) {
        self.update(|config| config.minlength = minlength);
    }

    pub fn set_max(&self, max: Option<f64>) {
        self.update(|config| config.max = max);
    }

    pub fn set_min(&self, min: Option<f64>) {
        self.update(|config| config.min = min);
    }

    pub fn set_size(&self, size: Option<u32>) {
        self.update(|config| config.size = size);
    }

    pub fn set_step(&self, step: Option<f64>) {
        self.update(|config| config.step = step);
    }

    /// Snapshot of the staged configuration.
    pub fn config(&self) -> FieldConfig {
        self.inner.config.borrow().clone()
    }

    fn update(&self, apply: impl FnOnce(&mut FieldConfig)) {
        apply(&mut self.inner.config.borrow_mut());
        self.inner.mark_for_check();
    }

    // --- companions ---------------------------------------------------------

    pub fn helper_text(&self) -> Option<Rc<HelperText>> {
        self.inner.helper_text.borrow().as_ref()?.upgrade()
    }

    /// Only the reference current at attach is handed to the foundation.
    pub fn set_helper_text(&self, helper_text: Option<&Rc<HelperText>>) {
        *self.inner.helper_text.borrow_mut() = helper_text.map(Rc::downgrade);
        self.inner.mark_for_check();
    }

    pub fn add_icon(&self, icon: Rc<TextFieldIcon>) {
        self.inner.view.add_icon(icon, self.is_attached());
        self.inner.mark_for_check();
    }

    pub fn remove_icon(&self, icon: &Rc<TextFieldIcon>) -> bool {
        let removed = self.inner.view.remove_icon(icon);
        self.inner.mark_for_check();
        removed
    }

    pub fn leading_icon(&self) -> Option<Rc<TextFieldIcon>> {
        self.inner
            .view
            .icons()
            .iter()
            .find(|icon| icon.is_leading())
            .cloned()
    }

    pub fn trailing_icon(&self) -> Option<Rc<TextFieldIcon>> {
        self.inner
            .view
            .icons()
            .iter()
            .find(|icon| icon.is_trailing())
            .cloned()
    }

    pub fn ripple_attached(&self) -> bool {
        self.inner.ripple.attached()
    }

    // --- outputs ------------------------------------------------------------

    /// Confirmed user-driven value changes.
    pub fn change_events(&self) -> &EventEmitter<FieldValue> {
        &self.inner.change
    }

    /// Blur of the input, carrying the current value.
    pub fn blur_events(&self) -> &EventEmitter<FieldValue> {
        &self.inner.blur
    }

    // --- handles ------------------------------------------------------------

    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    pub fn view(&self) -> &FieldView {
        &self.inner.view
    }

    pub fn host(&self) -> &Element {
        self.inner.view.host()
    }

    pub fn input(&self) -> &Element {
        self.inner.view.input()
    }

    pub fn foundation(&self) -> Option<Rc<dyn Foundation>> {
        self.inner.foundation()
    }

    /// Rendered `required` attribute, which lags the configured flag while
    /// a re-arm is in flight.
    pub fn required_attribute(&self) -> bool {
        self.inner.view.input().has_attribute("required")
    }
}

impl Drop for TextField {
    fn drop(&mut self) {
        self.inner.destroy();
    }
}

impl ControlValueAccessor for TextField {
    /// Model writes never report back through `on_change`.
    fn write_value(&self, value: &Value) {
        self.set_value_with(FieldValue::from_model(value), false);
    }

    fn register_on_change(&self, on_change: OnChange) {
        *self.inner.on_change.borrow_mut() = Some(Rc::from(on_change));
    }

    fn register_on_touched(&self, on_touched: OnTouched) {
        *self.inner.on_touched.borrow_mut() = Some(Rc::from(on_touched));
    }

    fn set_disabled_state(&self, disabled: bool) {
        self.inner.set_disabled_state(disabled);
    }
}

impl FieldInner {
    fn foundation(&self) -> Option<Rc<dyn Foundation>> {
        self.foundation.borrow().clone()
    }

    fn is_attached(&self) -> bool {
        self.lifecycle.get() == Lifecycle::Attached
    }

    fn bind_template(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let on_blur = handler(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.on_blur();
            }
        });
        let weak = Rc::downgrade(self);
        let on_input = handler(move |_| {
            if let Some(inner) = weak.upgrade() {
                let value = inner.view.input().value();
                inner.on_input(&value);
            }
        });

        let input = self.view.input();
        let mut listeners = self.template_listeners.borrow_mut();
        for (event_type, listener) in [("blur", on_blur), ("input", on_input)] {
            input.add_event_listener(event_type, Rc::clone(&listener));
            listeners.push((event_type, listener));
        }
    }

    fn on_input(self: &Rc<Self>, value: &str) {
        let input_type = self.config.borrow().input_type;
        self.store_value(FieldValue::from(value).coerce(input_type), true);
    }

    fn on_blur(self: &Rc<Self>) {
        let on_touched = self.on_touched.borrow().clone();
        if let Some(on_touched) = on_touched {
            on_touched();
        }
        let value = self.config.borrow().value.clone();
        self.blur.emit(&value);
        self.mark_for_check();
    }

    fn store_value(self: &Rc<Self>, value: FieldValue, user_input: bool) {
        self.config.borrow_mut().value = value;
        let generation = self.value_sync.bump();
        self.mark_for_check();

        let weak = Rc::downgrade(self);
        self.document.event_loop().set_timeout(move || {
            if let Some(inner) = weak.upgrade() {
                inner.flush_value(generation, user_input);
            }
        });
    }

    fn flush_value(self: &Rc<Self>, generation: u64, user_input: bool) {
        if self.lifecycle.get() == Lifecycle::Destroyed {
            return;
        }
        let current = self.value_sync.is_current(generation);
        let value = self.config.borrow().value.clone();
        if !current {
            trace!(generation, "value write superseded");
        } else if let Some(foundation) = self.foundation()
            && self.value_sync.claim(generation)
        {
            foundation.set_value(&value);
        }

        // Every user-driven write reports, carrying the latest value.
        if user_input {
            let on_change = self.on_change.borrow().clone();
            if let Some(on_change) = on_change {
                on_change(&value);
            }
            self.change.emit(&value);
        }

        if current && self.config.borrow().required && value.is_falsy() {
            self.rearm_required();
        }
    }

    /// Drop the rendered `required` attribute for one turn so the input
    /// re-evaluates its validity, then restore it.
    fn rearm_required(self: &Rc<Self>) {
        self.rearm_holds.set(self.rearm_holds.get() + 1);
        trace!(holds = self.rearm_holds.get(), "required suspended");
        self.mark_for_check();

        let weak = Rc::downgrade(self);
        self.document.event_loop().set_timeout(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner
                .rearm_holds
                .set(inner.rearm_holds.get().saturating_sub(1));
            trace!(holds = inner.rearm_holds.get(), "required restored");
            inner.mark_for_check();
        });
    }

    fn set_disabled_state(self: &Rc<Self>, disabled: bool) {
        self.config.borrow_mut().disabled = disabled;
        let generation = self.disabled_sync.bump();

        let weak = Rc::downgrade(self);
        self.document.event_loop().set_timeout(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if !inner.disabled_sync.is_current(generation) {
                trace!(generation, "disabled write superseded");
                return;
            }
            let disabled = inner.config.borrow().disabled;
            if let Some(foundation) = inner.foundation()
                && inner.disabled_sync.claim(generation)
            {
                foundation.set_disabled(disabled);
            }
        });

        self.mark_for_check();
    }

    fn apply_ripple_policy(&self) {
        if !self.is_attached() {
            return;
        }
        let wanted = !self.config.borrow().outlined && !self.view.is_multiline();
        if wanted {
            if !self.ripple.attached() {
                self.ripple
                    .attach_to(self.view.host(), false, self.view.input());
            }
        } else {
            self.ripple.destroy();
        }
    }

    fn mark_for_check(self: &Rc<Self>) {
        if !self.is_attached() {
            return;
        }
        let weak = Rc::downgrade(self);
        self.detector
            .mark_for_check(self.document.event_loop(), move || {
                if let Some(inner) = weak.upgrade() {
                    inner.detector.begin_check();
                    inner.render();
                }
            });
    }

    fn render(&self) {
        if !self.is_attached() {
            return;
        }
        let config = self.config.borrow().clone();
        let required = config.required && self.rearm_holds.get() == 0;
        self.view.render(&config, required);
    }

    fn destroy(&self) {
        match self.lifecycle.replace(Lifecycle::Destroyed) {
            Lifecycle::Destroyed => return,
            Lifecycle::Constructed => {
                debug!(id = %self.config.borrow().id(), "text field destroyed before attach");
                return;
            }
            Lifecycle::Attached => {}
        }

        self.ripple.destroy();
        let foundation = self.foundation.borrow_mut().take();
        if let Some(foundation) = foundation {
            foundation.destroy();
        }

        let listeners = std::mem::take(&mut *self.template_listeners.borrow_mut());
        for (event_type, listener) in &listeners {
            self.view.input().remove_event_listener(event_type, listener);
        }
        self.view.unmount();
        debug!(id = %self.config.borrow().id(), "text field destroyed");
    }
}
