use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::dom::{Element, EventHandler, WeakElement, handler};

pub const UPGRADED: &str = "mdc-ripple-upgraded";
pub const UNBOUNDED: &str = "mdc-ripple-upgraded--unbounded";
pub const BG_FOCUSED: &str = "mdc-ripple-upgraded--background-focused";
pub const FG_ACTIVATION: &str = "mdc-ripple-upgraded--foreground-activation";

/// Ripple feedback service. The visual effect itself is out of scope: the
/// service only tracks attachment and toggles the state classes a
/// stylesheet animates.
#[derive(Default)]
pub struct Ripple {
    attachment: RefCell<Option<Attachment>>,
}

struct Attachment {
    surface: Element,
    scope: Element,
    listeners: Vec<(&'static str, EventHandler)>,
}

impl fmt::Debug for Ripple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ripple")
            .field("attached", &self.attached())
            .finish()
    }
}

fn toggle(surface: &WeakElement, class: &'static str, on: bool) -> EventHandler {
    let surface = surface.clone();
    handler(move |_| {
        if let Some(surface) = surface.upgrade() {
            surface.toggle_class(class, on);
        }
    })
}

impl Ripple {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to `surface`, reacting to interaction on `scope`. No-op when
    /// already attached.
    pub fn attach_to(&self, surface: &Element, unbounded: bool, scope: &Element) {
        if self.attached() {
            return;
        }
        surface.add_class(UPGRADED);
        if unbounded {
            surface.add_class(UNBOUNDED);
        }

        let weak_surface = surface.downgrade();
        let listeners = vec![
            ("focus", toggle(&weak_surface, BG_FOCUSED, true)),
            ("blur", toggle(&weak_surface, BG_FOCUSED, false)),
            ("mousedown", toggle(&weak_surface, FG_ACTIVATION, true)),
            ("mouseup", toggle(&weak_surface, FG_ACTIVATION, false)),
        ];
        for (event_type, listener) in &listeners {
            scope.add_event_listener(event_type, Rc::clone(listener));
        }

        trace!(surface = surface.node_id(), "ripple attached");
        *self.attachment.borrow_mut() = Some(Attachment {
            surface: surface.clone(),
            scope: scope.clone(),
            listeners,
        });
    }

    /// Detach and clear every ripple class. Idempotent.
    pub fn destroy(&self) {
        let Some(attachment) = self.attachment.borrow_mut().take() else {
            return;
        };
        for (event_type, listener) in &attachment.listeners {
            attachment.scope.remove_event_listener(event_type, listener);
        }
        for class in [UPGRADED, UNBOUNDED, BG_FOCUSED, FG_ACTIVATION] {
            attachment.surface.remove_class(class);
        }
        trace!(surface = attachment.surface.node_id(), "ripple destroyed");
    }

    pub fn attached(&self) -> bool {
        self.attachment.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::runtime::EventLoop;

    #[test]
    fn attach_and_destroy_are_idempotent() {
        let document = Document::new(EventLoop::new());
        let host = document.create_element("div");
        let input = document.create_element("input");
        host.append_child(&input);
        let ripple = Ripple::new();

        ripple.attach_to(&host, false, &input);
        ripple.attach_to(&host, false, &input);
        assert!(ripple.attached());
        assert_eq!(input.listener_count("focus"), 1);

        input.focus();
        assert!(host.has_class(BG_FOCUSED));

        ripple.destroy();
        ripple.destroy();
        assert!(!ripple.attached());
        assert!(!host.has_class(UPGRADED));
        assert!(!host.has_class(BG_FOCUSED));
        assert_eq!(input.listener_count("focus"), 0);
    }
}
