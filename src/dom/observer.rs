use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::element::{Element, WeakElement};
use crate::runtime::EventLoop;

/// Attribute mutation observer. Records are batched and delivered to the
/// callback in a microtask, as attribute names in mutation order.
#[derive(Clone)]
pub struct MutationObserver {
    inner: Rc<ObserverInner>,
}

pub(crate) struct ObserverInner {
    callback: Box<dyn Fn(&[String])>,
    event_loop: EventLoop,
    records: RefCell<Vec<String>>,
    targets: RefCell<Vec<WeakElement>>,
}

impl fmt::Debug for MutationObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationObserver")
            .field("targets", &self.inner.targets.borrow().len())
            .field("pending", &self.inner.records.borrow().len())
            .finish()
    }
}

impl MutationObserver {
    pub fn new(event_loop: &EventLoop, callback: impl Fn(&[String]) + 'static) -> Self {
        Self {
            inner: Rc::new(ObserverInner {
                callback: Box::new(callback),
                event_loop: event_loop.clone(),
                records: RefCell::new(Vec::new()),
                targets: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn observe(&self, target: &Element) {
        let already = self
            .inner
            .targets
            .borrow()
            .iter()
            .any(|existing| existing.upgrade().as_ref() == Some(target));
        if already {
            return;
        }
        target.add_observer(Rc::downgrade(&self.inner));
        self.inner.targets.borrow_mut().push(target.downgrade());
    }

    /// Stops observation and drops undelivered records. Safe to call on an
    /// observer that observes nothing.
    pub fn disconnect(&self) {
        let targets = std::mem::take(&mut *self.inner.targets.borrow_mut());
        for target in targets.iter().filter_map(WeakElement::upgrade) {
            target.remove_observer(&self.inner);
        }
        self.inner.records.borrow_mut().clear();
    }

    pub fn take_records(&self) -> Vec<String> {
        std::mem::take(&mut *self.inner.records.borrow_mut())
    }

    pub fn is_observing(&self) -> bool {
        self.inner
            .targets
            .borrow()
            .iter()
            .any(|target| target.upgrade().is_some())
    }
}

impl ObserverInner {
    pub(crate) fn enqueue(this: &Rc<Self>, attribute: &str) {
        let first = {
            let mut records = this.records.borrow_mut();
            records.push(attribute.to_string());
            records.len() == 1
        };
        if !first {
            return;
        }
        let observer: Weak<ObserverInner> = Rc::downgrade(this);
        this.event_loop.queue_microtask(move || {
            let Some(inner) = observer.upgrade() else {
                return;
            };
            let records = std::mem::take(&mut *inner.records.borrow_mut());
            if !records.is_empty() {
                (inner.callback)(&records);
            }
        });
    }
}
