use std::cell::Cell;

use super::EventLoop;

/// Coalesces "please re-render" requests into one microtask per turn.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    scheduled: Cell<bool>,
    checks: Cell<u64>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `check` unless a check is already pending.
    pub fn mark_for_check(&self, event_loop: &EventLoop, check: impl FnOnce() + 'static) -> bool {
        if self.scheduled.replace(true) {
            return false;
        }
        event_loop.queue_microtask(check);
        true
    }

    /// Called by the check itself before it renders, so that renders which
    /// trigger further changes can queue a follow-up check.
    pub fn begin_check(&self) {
        self.scheduled.set(false);
        self.checks.set(self.checks.get() + 1);
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled.get()
    }

    pub fn checks(&self) -> u64 {
        self.checks.get()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn repeated_marks_collapse_into_one_check() {
        let event_loop = EventLoop::new();
        let detector = Rc::new(ChangeDetector::new());
        let runs = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let detector_ref = Rc::clone(&detector);
            let runs_ref = Rc::clone(&runs);
            detector.mark_for_check(&event_loop, move || {
                detector_ref.begin_check();
                runs_ref.set(runs_ref.get() + 1);
            });
        }

        assert!(detector.is_scheduled());
        event_loop.perform_microtask_checkpoint();
        assert_eq!(runs.get(), 1);
        assert_eq!(detector.checks(), 1);
        assert!(!detector.is_scheduled());
    }
}
