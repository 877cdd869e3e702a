use std::fmt;
use std::rc::Rc;

use crate::dom::{Document, Element, EventHandler, handler};

pub const ROOT: &str = "mdc-line-ripple";
pub const ACTIVE: &str = "mdc-line-ripple--active";
pub const DEACTIVATING: &str = "mdc-line-ripple--deactivating";

/// Underline indicator used by filled (non-outlined) text fields.
pub struct LineRipple {
    root: Element,
    transition_end: EventHandler,
}

impl fmt::Debug for LineRipple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineRipple").field("root", &self.root).finish()
    }
}

impl LineRipple {
    pub fn new(document: &Document) -> Self {
        let root = document.create_element("div");
        root.add_class(ROOT);

        let weak_root = root.downgrade();
        let transition_end = handler(move |_| {
            let Some(root) = weak_root.upgrade() else {
                return;
            };
            if root.has_class(DEACTIVATING) {
                root.remove_class(ACTIVE);
                root.remove_class(DEACTIVATING);
            }
        });
        root.add_event_listener("transitionend", Rc::clone(&transition_end));

        Self {
            root,
            transition_end,
        }
    }

    pub fn element(&self) -> &Element {
        &self.root
    }

    pub fn activate(&self) {
        self.root.remove_class(DEACTIVATING);
        self.root.add_class(ACTIVE);
    }

    /// Starts the deactivation transition; `transitionend` finishes it.
    pub fn deactivate(&self) {
        self.root.add_class(DEACTIVATING);
    }

    pub fn set_ripple_center(&self, x_coordinate: f64) {
        self.root
            .set_style("transform-origin", &format!("{x_coordinate}px center"));
    }

    pub fn is_active(&self) -> bool {
        self.root.has_class(ACTIVE) && !self.root.has_class(DEACTIVATING)
    }

    pub fn destroy(&self) {
        self.root
            .remove_event_listener("transitionend", &self.transition_end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Event;
    use crate::runtime::EventLoop;

    #[test]
    fn deactivation_completes_on_transition_end() {
        let document = Document::new(EventLoop::new());
        let ripple = LineRipple::new(&document);
        ripple.activate();
        assert!(ripple.is_active());

        ripple.deactivate();
        assert!(!ripple.is_active());
        assert!(ripple.element().has_class(ACTIVE));

        ripple.element().dispatch_event(&Event::new("transitionend"));
        assert!(!ripple.element().has_class(ACTIVE));
        assert!(!ripple.element().has_class(DEACTIVATING));
    }

    #[test]
    fn ripple_center_sets_transform_origin() {
        let document = Document::new(EventLoop::new());
        let ripple = LineRipple::new(&document);
        ripple.set_ripple_center(42.5);
        assert_eq!(
            ripple.element().style("transform-origin").as_deref(),
            Some("42.5px center")
        );
        ripple.destroy();
        assert_eq!(ripple.element().listener_count("transitionend"), 0);
    }
}
