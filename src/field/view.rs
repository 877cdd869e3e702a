use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use super::config::FieldConfig;
use super::foundation::constants::css_classes;
use crate::dom::{Document, Element};
use crate::widgets::{FloatingLabel, LineRipple, NotchedOutline, TextFieldIcon};

pub const HOST_TAG: &str = "mdc-text-field";
pub const TEXTAREA_HOST_TAG: &str = "mdc-textarea";

/// Rendered DOM of a text field: host, native input and whichever companion
/// widgets the current configuration calls for.
pub struct FieldView {
    document: Document,
    host: Element,
    input: Element,
    multiline: bool,
    label: RefCell<Option<FloatingLabel>>,
    line_ripple: RefCell<Option<LineRipple>>,
    outline: RefCell<Option<NotchedOutline>>,
    icons: RefCell<Vec<Rc<TextFieldIcon>>>,
}

impl fmt::Debug for FieldView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldView")
            .field("host", &self.host)
            .field("input", &self.input)
            .field("label", &self.label.borrow().is_some())
            .field("line_ripple", &self.line_ripple.borrow().is_some())
            .field("outline", &self.outline.borrow().is_some())
            .field("icons", &self.icons.borrow().len())
            .finish()
    }
}

impl FieldView {
    pub(crate) fn new(document: &Document, multiline: bool) -> Self {
        let host = document.create_element(if multiline { TEXTAREA_HOST_TAG } else { HOST_TAG });
        host.add_class(css_classes::ROOT);
        let input = document.create_element(if multiline { "textarea" } else { "input" });
        input.add_class(css_classes::INPUT);
        Self {
            document: document.clone(),
            host,
            input,
            multiline,
            label: RefCell::new(None),
            line_ripple: RefCell::new(None),
            outline: RefCell::new(None),
            icons: RefCell::new(Vec::new()),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn host(&self) -> &Element {
        &self.host
    }

    pub fn input(&self) -> &Element {
        &self.input
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn is_interactive(&self) -> bool {
        self.document.platform().is_interactive()
    }

    pub fn label(&self) -> Ref<'_, Option<FloatingLabel>> {
        self.label.borrow()
    }

    pub fn line_ripple(&self) -> Ref<'_, Option<LineRipple>> {
        self.line_ripple.borrow()
    }

    pub fn outline(&self) -> Ref<'_, Option<NotchedOutline>> {
        self.outline.borrow()
    }

    pub fn icons(&self) -> Ref<'_, Vec<Rc<TextFieldIcon>>> {
        self.icons.borrow()
    }

    pub(crate) fn add_icon(&self, icon: Rc<TextFieldIcon>, mounted: bool) {
        if mounted {
            self.host.append_child(icon.element());
        }
        self.icons.borrow_mut().push(icon);
    }

    pub(crate) fn remove_icon(&self, icon: &Rc<TextFieldIcon>) -> bool {
        let removed = {
            let mut icons = self.icons.borrow_mut();
            let before = icons.len();
            icons.retain(|candidate| !Rc::ptr_eq(candidate, icon));
            icons.len() != before
        };
        if removed {
            icon.element().remove();
        }
        removed
    }

    /// Insert the input and the projected icons into the host. Leading icons
    /// go before the input.
    pub(crate) fn mount(&self) {
        let icons = self.icons.borrow().clone();
        for icon in icons.iter().filter(|icon| icon.is_leading()) {
            self.host.append_child(icon.element());
        }
        self.host.append_child(&self.input);
        for icon in icons.iter().filter(|icon| !icon.is_leading()) {
            self.host.append_child(icon.element());
        }
    }

    pub(crate) fn unmount(&self) {
        if let Some(line_ripple) = self.line_ripple.borrow_mut().take() {
            line_ripple.destroy();
        }
    }

    /// Bring the DOM in line with `config`. `required` is the attribute
    /// value to render, which differs from the configured flag while a
    /// re-arm is in progress.
    pub(crate) fn render(&self, config: &FieldConfig, required: bool) {
        self.render_host(config);
        self.sync_label(config);
        self.sync_companion(config.outlined);
        self.render_input(config, required);
    }

    fn render_host(&self, config: &FieldConfig) {
        let (leading, trailing) = {
            let icons = self.icons.borrow();
            (
                icons.iter().any(|icon| icon.is_leading()),
                icons.iter().any(|icon| icon.is_trailing()),
            )
        };
        let host = &self.host;
        host.toggle_class(css_classes::OUTLINED, config.outlined);
        host.toggle_class(css_classes::DENSE, config.dense);
        host.toggle_class(css_classes::FULLWIDTH, config.fullwidth);
        host.toggle_class(css_classes::TEXTAREA, self.multiline);
        host.toggle_class(css_classes::WITH_LEADING_ICON, leading);
        host.toggle_class(css_classes::WITH_TRAILING_ICON, trailing);
    }

    fn render_input(&self, config: &FieldConfig, required: bool) {
        let input = &self.input;
        input.set_attribute("id", config.id());
        if !self.multiline {
            input.set_attribute("type", config.input_type.as_str());
        }
        input.set_attribute("tabindex", &config.tab_index.to_string());
        input.set_optional_attribute(
            "pattern",
            config.pattern.as_deref().filter(|pattern| !pattern.is_empty()),
        );
        input.set_optional_attribute(
            "placeholder",
            Some(config.placeholder()).filter(|placeholder| !placeholder.is_empty()),
        );
        input.set_optional_attribute("maxlength", config.maxlength.map(|n| n.to_string()).as_deref());
        input.set_optional_attribute("minlength", config.minlength.map(|n| n.to_string()).as_deref());
        input.set_optional_attribute("max", config.max.map(|n| n.to_string()).as_deref());
        input.set_optional_attribute("min", config.min.map(|n| n.to_string()).as_deref());
        input.set_optional_attribute("size", config.size.map(|n| n.to_string()).as_deref());
        input.set_optional_attribute("step", config.step.map(|n| n.to_string()).as_deref());
        input.toggle_attribute("required", required);
        // Last: disabling the focused input blurs it, which runs listeners
        // that read the view.
        input.toggle_attribute("disabled", config.disabled);
    }

    fn sync_label(&self, config: &FieldConfig) {
        if !config.has_label() {
            let removed = self.label.borrow_mut().take();
            if let Some(label) = removed {
                label.element().remove();
            }
            return;
        }

        let mut slot = self.label.borrow_mut();
        match slot.as_ref() {
            Some(label) => label.sync(config.id(), config.label()),
            None => {
                let label = FloatingLabel::new(&self.document, config.id(), config.label());
                self.host.append_child(label.element());
                *slot = Some(label);
            }
        }
    }

    /// Exactly one of line ripple and notched outline exists.
    fn sync_companion(&self, outlined: bool) {
        if outlined {
            let removed = self.line_ripple.borrow_mut().take();
            if let Some(line_ripple) = removed {
                line_ripple.destroy();
                line_ripple.element().remove();
                trace!(host = self.host.node_id(), "line ripple removed");
            }
            if self.outline.borrow().is_none() {
                let outline = NotchedOutline::new(&self.document);
                self.host.append_child(outline.element());
                *self.outline.borrow_mut() = Some(outline);
                trace!(host = self.host.node_id(), "notched outline created");
            }
        } else {
            let removed = self.outline.borrow_mut().take();
            if let Some(outline) = removed {
                outline.element().remove();
                trace!(host = self.host.node_id(), "notched outline removed");
            }
            if self.line_ripple.borrow().is_none() {
                let line_ripple = LineRipple::new(&self.document);
                self.host.append_child(line_ripple.element());
                *self.line_ripple.borrow_mut() = Some(line_ripple);
                trace!(host = self.host.node_id(), "line ripple created");
            }
        }
    }
}
