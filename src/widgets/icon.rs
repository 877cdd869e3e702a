use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::dom::{Document, Element, Event, EventHandler, handler};
use crate::runtime::EventEmitter;

pub const ROOT: &str = "mdc-text-field__icon";

/// The part of an icon the text field foundation drives.
pub trait IconFoundation {
    fn set_disabled(&self, disabled: bool);
    fn set_aria_label(&self, label: &str);
    fn set_content(&self, content: &str);
}

/// Leading or trailing icon projected into a text field. The `leading` and
/// `trailing` markers decide how the field treats it.
pub struct TextFieldIcon {
    root: Element,
    leading: Cell<bool>,
    trailing: Cell<bool>,
    saved_tab_index: RefCell<Option<String>>,
    interaction: EventHandler,
    actions: EventEmitter<()>,
}

impl fmt::Debug for TextFieldIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextFieldIcon")
            .field("root", &self.root)
            .field("leading", &self.leading.get())
            .field("trailing", &self.trailing.get())
            .finish()
    }
}

impl TextFieldIcon {
    pub fn new(document: &Document, name: &str) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<TextFieldIcon>| {
            let root = document.create_element("i");
            root.add_class("material-icons");
            root.add_class(ROOT);
            root.set_attribute("tabindex", "0");
            root.set_attribute("role", "button");
            root.set_text_content(name);

            let icon = this.clone();
            let interaction = handler(move |event: &Event| {
                let activates = event.event_type() == "click" || event.key_name() == Some("Enter");
                if !activates {
                    return;
                }
                if let Some(icon) = icon.upgrade() {
                    icon.actions.emit(&());
                }
            });
            root.add_event_listener("click", Rc::clone(&interaction));
            root.add_event_listener("keydown", Rc::clone(&interaction));

            Self {
                saved_tab_index: RefCell::new(root.attribute("tabindex")),
                root,
                leading: Cell::new(false),
                trailing: Cell::new(false),
                interaction,
                actions: EventEmitter::new(),
            }
        })
    }

    pub fn leading(document: &Document, name: &str) -> Rc<Self> {
        let icon = Self::new(document, name);
        icon.set_leading(true);
        icon
    }

    pub fn trailing(document: &Document, name: &str) -> Rc<Self> {
        let icon = Self::new(document, name);
        icon.set_trailing(true);
        icon
    }

    pub fn element(&self) -> &Element {
        &self.root
    }

    pub fn is_leading(&self) -> bool {
        self.leading.get()
    }

    pub fn is_trailing(&self) -> bool {
        self.trailing.get()
    }

    pub fn set_leading(&self, leading: bool) {
        self.leading.set(leading);
    }

    pub fn set_trailing(&self, trailing: bool) {
        self.trailing.set(trailing);
    }

    /// Fired on click or Enter.
    pub fn actions(&self) -> &EventEmitter<()> {
        &self.actions
    }

    pub fn destroy(&self) {
        self.root.remove_event_listener("click", &self.interaction);
        self.root.remove_event_listener("keydown", &self.interaction);
    }
}

impl IconFoundation for TextFieldIcon {
    fn set_disabled(&self, disabled: bool) {
        if disabled {
            self.root.set_attribute("tabindex", "-1");
            self.root.remove_attribute("role");
        } else {
            let saved = self.saved_tab_index.borrow().clone();
            self.root
                .set_optional_attribute("tabindex", saved.as_deref());
            self.root.set_attribute("role", "button");
        }
    }

    fn set_aria_label(&self, label: &str) {
        self.root.set_attribute("aria-label", label);
    }

    fn set_content(&self, content: &str) {
        self.root.set_text_content(content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::EventLoop;

    #[test]
    fn disabling_removes_the_icon_from_tab_order() {
        let document = Document::new(EventLoop::new());
        let icon = TextFieldIcon::trailing(&document, "clear");
        icon.set_disabled(true);
        assert_eq!(icon.element().attribute("tabindex").as_deref(), Some("-1"));
        assert_eq!(icon.element().attribute("role"), None);

        icon.set_disabled(false);
        assert_eq!(icon.element().attribute("tabindex").as_deref(), Some("0"));
        assert_eq!(icon.element().attribute("role").as_deref(), Some("button"));
    }

    #[test]
    fn click_and_enter_emit_actions() {
        let document = Document::new(EventLoop::new());
        let icon = TextFieldIcon::leading(&document, "search");
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        icon.actions().subscribe(move |_| sink.set(sink.get() + 1));

        icon.element().click();
        icon.element().dispatch_event(&Event::key("Enter"));
        icon.element().dispatch_event(&Event::key("Tab"));
        assert_eq!(count.get(), 2);

        icon.destroy();
        icon.element().click();
        assert_eq!(count.get(), 2);
    }
}
