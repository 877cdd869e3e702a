use std::cell::Cell;
use std::rc::Rc;

use super::support::{document, flush};
use crate::dom::{Document, Event, EventHandler, MutationObserver, Platform, TextMetrics};
use crate::field::adapter::AttributeChangeHandler;
use crate::field::foundation::constants::css_classes;
use crate::field::{
    Foundation, NativeInput, TextField, TextFieldAdapter, TextFieldFoundation,
};
use crate::runtime::EventLoop;
use crate::widgets::{HelperText, HelperTextFoundation, IconFoundation, TextFieldIcon};

fn labelled(doc: &Document, label: &str) -> TextField {
    let field = TextField::new(doc);
    field.set_label(label);
    field
}

fn label_floating(field: &TextField) -> bool {
    field
        .view()
        .label()
        .as_ref()
        .is_some_and(|label| label.is_floating())
}

fn label_shaking(field: &TextField) -> bool {
    field
        .view()
        .label()
        .as_ref()
        .is_some_and(|label| label.is_shaking())
}

fn line_ripple_active(field: &TextField) -> bool {
    field
        .view()
        .line_ripple()
        .as_ref()
        .is_some_and(|line_ripple| line_ripple.is_active())
}

/// Delegates to the host adapter, counting label floats and outline notches.
struct CountingAdapter {
    inner: Rc<dyn TextFieldAdapter>,
    floats: Rc<Cell<usize>>,
    notches: Rc<Cell<usize>>,
}

impl TextFieldAdapter for CountingAdapter {
    fn add_class(&self, class_name: &str) {
        self.inner.add_class(class_name);
    }
    fn remove_class(&self, class_name: &str) {
        self.inner.remove_class(class_name);
    }
    fn has_class(&self, class_name: &str) -> bool {
        self.inner.has_class(class_name)
    }
    fn register_text_field_interaction_handler(&self, event_type: &str, handler: EventHandler) {
        self.inner
            .register_text_field_interaction_handler(event_type, handler);
    }
    fn deregister_text_field_interaction_handler(&self, event_type: &str, handler: &EventHandler) {
        self.inner
            .deregister_text_field_interaction_handler(event_type, handler);
    }
    fn register_input_interaction_handler(&self, event_type: &str, handler: EventHandler) {
        self.inner.register_input_interaction_handler(event_type, handler);
    }
    fn deregister_input_interaction_handler(&self, event_type: &str, handler: &EventHandler) {
        self.inner
            .deregister_input_interaction_handler(event_type, handler);
    }
    fn register_validation_attribute_change_handler(
        &self,
        handler: AttributeChangeHandler,
    ) -> MutationObserver {
        self.inner.register_validation_attribute_change_handler(handler)
    }
    fn deregister_validation_attribute_change_handler(&self, observer: Option<&MutationObserver>) {
        self.inner
            .deregister_validation_attribute_change_handler(observer);
    }
    fn is_focused(&self) -> bool {
        self.inner.is_focused()
    }
    fn is_rtl(&self) -> bool {
        self.inner.is_rtl()
    }
    fn activate_line_ripple(&self) {
        self.inner.activate_line_ripple();
    }
    fn deactivate_line_ripple(&self) {
        self.inner.deactivate_line_ripple();
    }
    fn set_line_ripple_transform_origin(&self, normalized_x: f64) {
        self.inner.set_line_ripple_transform_origin(normalized_x);
    }
    fn shake_label(&self, should_shake: bool) {
        self.inner.shake_label(should_shake);
    }
    fn float_label(&self, should_float: bool) {
        if should_float {
            self.floats.set(self.floats.get() + 1);
        }
        self.inner.float_label(should_float);
    }
    fn has_label(&self) -> bool {
        self.inner.has_label()
    }
    fn get_label_width(&self) -> f64 {
        self.inner.get_label_width()
    }
    fn has_outline(&self) -> bool {
        self.inner.has_outline()
    }
    fn notch_outline(&self, label_width: f64, is_rtl: bool) {
        self.notches.set(self.notches.get() + 1);
        self.inner.notch_outline(label_width, is_rtl);
    }
    fn close_outline(&self) {
        self.inner.close_outline();
    }
    fn get_native_input(&self) -> Option<NativeInput> {
        self.inner.get_native_input()
    }
    fn set_native_input_value(&self, value: &str) {
        self.inner.set_native_input_value(value);
    }
    fn set_native_input_disabled(&self, disabled: bool) {
        self.inner.set_native_input_disabled(disabled);
    }
    fn helper_text(&self) -> Option<Rc<dyn HelperTextFoundation>> {
        self.inner.helper_text()
    }
    fn icon(&self) -> Option<Rc<dyn IconFoundation>> {
        self.inner.icon()
    }
}

#[test]
fn init_marks_the_host_upgraded_and_destroy_unbinds() {
    let doc = document();
    let field = labelled(&doc, "Name");
    field.attach().unwrap();
    assert!(field.host().has_class(css_classes::UPGRADED));
    assert!(field.input().listener_count("focus") > 0);

    field.destroy();
    assert!(!field.host().has_class(css_classes::UPGRADED));
    for event_type in ["focus", "blur", "input", "mousedown", "touchstart"] {
        assert_eq!(field.input().listener_count(event_type), 0, "{event_type}");
    }
    assert_eq!(field.host().listener_count("click"), 0);
    assert_eq!(field.host().listener_count("keydown"), 0);
}

#[test]
fn focus_floats_the_label_and_activates_the_line_ripple() {
    let doc = document();
    let field = labelled(&doc, "Name");
    field.attach().unwrap();
    assert!(!label_floating(&field));

    assert!(field.focus());
    assert!(field.host().has_class(css_classes::FOCUSED));
    assert!(label_floating(&field));
    assert!(line_ripple_active(&field));

    field.input().blur();
    assert!(!field.host().has_class(css_classes::FOCUSED));
    assert!(!label_floating(&field));
    assert!(!line_ripple_active(&field));
}

#[test]
fn a_filled_field_keeps_its_label_floated() {
    let doc = document();
    let field = labelled(&doc, "Name");
    field.attach().unwrap();
    field.set_value("Ada");
    flush(&doc);
    assert!(label_floating(&field));

    field.focus();
    field.input().blur();
    assert!(label_floating(&field));
}

#[test]
fn pattern_mismatch_shakes_the_label_once_blurred() {
    let doc = document();
    let field = labelled(&doc, "Code");
    field.set_pattern(Some("[0-9]+".to_string()));
    field.attach().unwrap();

    field.focus();
    field.input().type_text("abc");
    flush(&doc);
    assert!(field.host().has_class(css_classes::INVALID));
    assert!(!label_shaking(&field));

    field.input().blur();
    assert!(!field.valid());
    assert!(label_shaking(&field));

    field.focus();
    field.input().type_text("123");
    field.input().blur();
    flush(&doc);
    assert!(field.valid());
    assert!(!field.host().has_class(css_classes::INVALID));
    assert!(!label_shaking(&field));
}

#[test]
fn custom_validity_replaces_native_validation() {
    let doc = document();
    let field = labelled(&doc, "Name");
    field.set_use_native_validation(false);
    field.set_valid(false);
    field.attach().unwrap();

    assert!(!field.valid());
    assert!(field.host().has_class(css_classes::INVALID));
    assert!(label_shaking(&field));

    field.set_valid(true);
    assert!(field.valid());
    assert!(!field.host().has_class(css_classes::INVALID));
}

#[test]
fn native_validity_wins_while_enabled() {
    let doc = document();
    let field = TextField::new(&doc);
    field.set_required(true);
    field.attach().unwrap();
    field.set_valid(true);
    assert!(!field.valid());

    field.set_value("present");
    flush(&doc);
    assert!(field.valid());
}

#[test]
fn whitelisted_attribute_changes_restyle_validity() {
    let doc = document();
    let field = labelled(&doc, "Code");
    field.set_pattern(Some("[0-9]+".to_string()));
    field.attach().unwrap();
    field.focus();
    field.input().type_text("abc");
    field.input().blur();
    flush(&doc);
    assert!(field.host().has_class(css_classes::INVALID));

    field.set_tab_index(-1);
    flush(&doc);
    assert!(field.host().has_class(css_classes::INVALID));

    field.set_maxlength(Some(10));
    flush(&doc);
    assert!(!field.host().has_class(css_classes::INVALID));
}

#[test]
fn disabling_takes_the_icon_out_of_the_tab_order() {
    let doc = document();
    let field = TextField::new(&doc);
    let icon = TextFieldIcon::trailing(&doc, "clear");
    field.add_icon(Rc::clone(&icon));
    field.attach().unwrap();

    field.set_disabled(true);
    flush(&doc);
    assert!(field.host().has_class(css_classes::DISABLED));
    assert_eq!(icon.element().attribute("tabindex").as_deref(), Some("-1"));

    field.set_disabled(false);
    flush(&doc);
    assert!(!field.host().has_class(css_classes::DISABLED));
    assert_eq!(icon.element().attribute("tabindex").as_deref(), Some("0"));
}

#[test]
fn helper_text_follows_focus_and_validity() {
    let doc = document();
    let helper = Rc::new(HelperText::new(&doc, "Digits only"));
    helper.set_validation(true);
    let field = labelled(&doc, "Code");
    field.set_pattern(Some("[0-9]+".to_string()));
    field.set_helper_text(Some(&helper));
    field.attach().unwrap();
    assert!(helper.is_hidden());

    field.focus();
    assert!(!helper.is_hidden());

    field.input().type_text("abc");
    field.input().blur();
    assert_eq!(helper.element().attribute("role").as_deref(), Some("alert"));
    assert!(!helper.is_hidden());
}

#[test]
fn pointer_down_centres_the_line_ripple() {
    let doc = document();
    let field = TextField::new(&doc);
    field.attach().unwrap();

    field
        .input()
        .dispatch_event(&Event::pointer("mousedown", 24.0));
    let view = field.view();
    let line_ripple = view.line_ripple();
    assert_eq!(
        line_ripple
            .as_ref()
            .and_then(|line_ripple| line_ripple.element().style("transform-origin")),
        Some("24px center".to_string())
    );
}

#[test]
fn host_interaction_is_ignored_while_disabled() {
    let doc = document();
    let field = labelled(&doc, "Name");
    field.attach().unwrap();
    field.set_disabled(true);
    flush(&doc);

    field.host().click();
    field.input().dispatch_event(&Event::new("input"));
    assert!(field.host().has_class(css_classes::FOCUSED));

    let doc = document();
    let field = labelled(&doc, "Name");
    field.attach().unwrap();
    field.host().click();
    field.input().dispatch_event(&Event::new("input"));
    assert!(!field.host().has_class(css_classes::FOCUSED));
}

#[test]
fn outline_notch_scales_the_label_width() {
    let doc = document();
    let field = labelled(&doc, "Name");
    field.set_outlined(true);
    field.set_value("Ada");
    field.attach().unwrap();

    let notch = field
        .view()
        .outline()
        .as_ref()
        .and_then(|outline| outline.notch_width());
    // 4 columns * 8px * 0.75 + 8px padding
    assert_eq!(notch, Some(32.0));
}

#[test]
fn dense_outline_uses_the_dense_scale() {
    let doc = document();
    let field = labelled(&doc, "Name");
    field.set_outlined(true);
    field.set_dense(true);
    field.set_value("Ada");
    field.attach().unwrap();

    let notch = field
        .view()
        .outline()
        .as_ref()
        .and_then(|outline| outline.notch_width())
        .unwrap_or_default();
    assert!((notch - (32.0 * 0.923 + 8.0)).abs() < 1e-9);
}

#[test]
fn rtl_hosts_notch_from_the_right() {
    let doc = document();
    let field = labelled(&doc, "Name");
    field.host().set_attribute("dir", "rtl");
    field.set_outlined(true);
    field.set_value("Ada");
    field.attach().unwrap();

    let view = field.view();
    let outline = view.outline();
    assert_eq!(
        outline
            .as_ref()
            .and_then(|outline| outline.element().attribute("dir")),
        Some("rtl".to_string())
    );
}

#[test]
fn headless_documents_report_no_focus_or_direction() {
    let doc = Document::with_environment(EventLoop::new(), Platform::Headless, TextMetrics::default());
    let field = labelled(&doc, "Name");
    field.host().set_attribute("dir", "rtl");
    field.set_outlined(true);
    field.set_value("Ada");
    field.input().focus();
    field.attach().unwrap();

    assert!(!field.focused());
    assert!(!field.host().has_class(css_classes::FOCUSED));
    let view = field.view();
    let outline = view.outline();
    assert_eq!(
        outline
            .as_ref()
            .and_then(|outline| outline.element().attribute("dir")),
        None
    );
}

#[test]
fn an_input_focused_before_attach_is_styled_on_init() {
    let doc = document();
    let field = labelled(&doc, "Name");
    field.input().focus();
    field.attach().unwrap();

    assert!(field.host().has_class(css_classes::FOCUSED));
    assert!(label_floating(&field));
    assert!(field.foundation().is_some_and(|foundation| foundation.is_valid()));
}

#[test]
fn foundation_init_and_destroy_are_idempotent() {
    let doc = document();
    let field = TextField::new(&doc);
    field.attach().unwrap();
    let Some(foundation) = field.foundation() else {
        panic!("attached field has a foundation");
    };

    foundation.init();
    assert_eq!(field.input().listener_count("mousedown"), 2);

    foundation.destroy();
    foundation.destroy();
    assert!(!field.host().has_class(css_classes::UPGRADED));
    assert_eq!(field.input().listener_count("input"), 1);
}

#[test]
fn focused_and_filled_input_is_floated_once_on_init() {
    let doc = document();
    let floats = Rc::new(Cell::new(0));
    let notches = Rc::new(Cell::new(0));
    let (float_count, notch_count) = (Rc::clone(&floats), Rc::clone(&notches));
    let field = TextField::builder(&doc)
        .foundation(move |inner| {
            let adapter: Rc<dyn TextFieldAdapter> = Rc::new(CountingAdapter {
                inner,
                floats: Rc::clone(&float_count),
                notches: Rc::clone(&notch_count),
            });
            TextFieldFoundation::new(adapter) as Rc<dyn Foundation>
        })
        .build();
    field.set_label("Name");
    field.set_outlined(true);
    field.input().set_value("Ada");
    field.input().focus();
    field.attach().unwrap();

    assert!(field.host().has_class(css_classes::FOCUSED));
    assert!(label_floating(&field));
    assert_eq!(floats.get(), 1);
    assert_eq!(notches.get(), 1);
}
