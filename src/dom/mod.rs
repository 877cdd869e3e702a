//! Headless DOM: just enough of the browser object model for a text field to
//! run against. Single-threaded; all handles are `Rc` based.

mod document;
mod element;
mod event;
mod observer;
mod validity;

pub use document::{Document, Platform, TextMetrics};
pub use element::{Direction, Element, WeakElement};
pub use event::{Event, EventHandler, handler};
pub use observer::MutationObserver;
pub use validity::ValidityState;

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::runtime::EventLoop;

    fn document() -> Document {
        Document::new(EventLoop::new())
    }

    #[test]
    fn listeners_are_keyed_by_handler_identity() {
        let doc = document();
        let input = doc.create_element("input");
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let on_input = handler(move |_| counter.set(counter.get() + 1));

        assert!(input.add_event_listener("input", Rc::clone(&on_input)));
        assert!(!input.add_event_listener("input", Rc::clone(&on_input)));
        input.type_text("a");
        assert_eq!(hits.get(), 1);

        assert!(input.remove_event_listener("input", &on_input));
        assert!(!input.remove_event_listener("input", &on_input));
        input.type_text("ab");
        assert_eq!(hits.get(), 1);
        assert_eq!(input.listener_count("input"), 0);
    }

    #[test]
    fn click_bubbles_but_focus_does_not() {
        let doc = document();
        let host = doc.create_element("div");
        let input = doc.create_element("input");
        host.append_child(&input);

        let seen = Rc::new(RefCell::new(Vec::new()));
        for kind in ["click", "focus"] {
            let log = Rc::clone(&seen);
            host.add_event_listener(
                kind,
                handler(move |event| log.borrow_mut().push(event.event_type().to_string())),
            );
        }

        input.click();
        input.focus();
        assert_eq!(*seen.borrow(), vec!["click".to_string()]);
    }

    #[test]
    fn disabling_the_active_element_blurs_it() {
        let doc = document();
        let input = doc.create_element("input");
        let blurred = Rc::new(Cell::new(false));
        let flag = Rc::clone(&blurred);
        input.add_event_listener("blur", handler(move |_| flag.set(true)));

        assert!(input.focus());
        assert_eq!(doc.active_element(), Some(input.clone()));
        input.toggle_attribute("disabled", true);

        assert!(blurred.get());
        assert!(!input.is_focused());
        assert!(!input.focus());
    }

    #[test]
    fn mutation_records_are_delivered_in_a_microtask() {
        let doc = document();
        let input = doc.create_element("input");
        let delivered = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&delivered);
        let observer = MutationObserver::new(doc.event_loop(), move |names: &[String]| {
            sink.borrow_mut().push(names.to_vec());
        });
        observer.observe(&input);

        input.set_attribute("pattern", "[0-9]+");
        input.toggle_attribute("required", true);
        input.toggle_attribute("required", true);
        assert!(delivered.borrow().is_empty());

        doc.event_loop().perform_microtask_checkpoint();
        assert_eq!(
            *delivered.borrow(),
            vec![vec!["pattern".to_string(), "required".to_string()]]
        );

        observer.disconnect();
        input.remove_attribute("pattern");
        doc.event_loop().perform_microtask_checkpoint();
        assert_eq!(delivered.borrow().len(), 1);
        assert!(!observer.is_observing());
    }

    #[test]
    fn direction_is_inherited_from_ancestors() {
        let doc = document();
        let root = doc.create_element("div");
        let host = doc.create_element("div");
        root.append_child(&host);
        assert_eq!(host.computed_direction(), Direction::Ltr);
        root.set_attribute("dir", "rtl");
        assert_eq!(host.computed_direction(), Direction::Rtl);
        host.set_style("direction", "ltr");
        assert_eq!(host.computed_direction(), Direction::Ltr);
    }

    #[test]
    fn number_inputs_sanitize_their_value() {
        let doc = document();
        let input = doc.create_element("input");
        input.set_attribute("type", "number");
        input.type_text("4x");
        assert_eq!(input.value(), "");
        assert!(input.validity().bad_input);
        input.set_value("42");
        assert_eq!(input.value(), "42");
        assert!(input.validity().valid());
    }
}
