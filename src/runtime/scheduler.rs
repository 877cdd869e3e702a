use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::{trace, warn};

pub const DEFAULT_TURN_LIMIT: usize = 10_000;

type Task = Box<dyn FnOnce()>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("event loop did not settle within {limit} turns")]
    TurnLimitExceeded { limit: usize },
}

/// Identifier handed out for every scheduled macrotask, mostly for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// Single-threaded event loop with a macrotask queue (`set_timeout`) and a
/// microtask queue. Every macrotask is followed by a microtask checkpoint.
#[derive(Clone)]
pub struct EventLoop {
    inner: Rc<LoopInner>,
}

struct LoopInner {
    macrotasks: RefCell<VecDeque<(TaskId, Task)>>,
    microtasks: RefCell<VecDeque<Task>>,
    next_id: Cell<u64>,
    turns: Cell<u64>,
    turn_limit: usize,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("pending_tasks", &self.pending_tasks())
            .field("pending_microtasks", &self.pending_microtasks())
            .field("turns", &self.inner.turns.get())
            .finish()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        Self::with_turn_limit(DEFAULT_TURN_LIMIT)
    }

    pub fn with_turn_limit(turn_limit: usize) -> Self {
        Self {
            inner: Rc::new(LoopInner {
                macrotasks: RefCell::new(VecDeque::new()),
                microtasks: RefCell::new(VecDeque::new()),
                next_id: Cell::new(0),
                turns: Cell::new(0),
                turn_limit: turn_limit.max(1),
            }),
        }
    }

    /// Queue `task` behind everything already scheduled.
    pub fn set_timeout(&self, task: impl FnOnce() + 'static) -> TaskId {
        let id = TaskId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .macrotasks
            .borrow_mut()
            .push_back((id, Box::new(task)));
        trace!(task = id.0, "macrotask scheduled");
        id
    }

    pub fn queue_microtask(&self, task: impl FnOnce() + 'static) {
        self.inner.microtasks.borrow_mut().push_back(Box::new(task));
    }

    /// Drain the microtask queue, including microtasks queued while draining.
    pub fn perform_microtask_checkpoint(&self) -> usize {
        let mut ran = 0usize;
        loop {
            let next = self.inner.microtasks.borrow_mut().pop_front();
            let Some(task) = next else {
                break;
            };
            task();
            ran += 1;
            if ran >= self.inner.turn_limit {
                warn!(limit = self.inner.turn_limit, "microtask checkpoint hit the turn limit");
                break;
            }
        }
        ran
    }

    /// Run the oldest macrotask followed by a microtask checkpoint.
    pub fn run_next_task(&self) -> bool {
        let next = self.inner.macrotasks.borrow_mut().pop_front();
        let Some((id, task)) = next else {
            return false;
        };
        trace!(task = id.0, "macrotask running");
        task();
        self.inner.turns.set(self.inner.turns.get() + 1);
        self.perform_microtask_checkpoint();
        true
    }

    /// One turn: flush microtasks, then run exactly the macrotasks that were
    /// queued when the tick started. Tasks they schedule wait for the next tick.
    pub fn tick(&self) -> usize {
        self.perform_microtask_checkpoint();
        let due = self.inner.macrotasks.borrow().len();
        let mut ran = 0usize;
        for _ in 0..due {
            if self.run_next_task() {
                ran += 1;
            }
        }
        ran
    }

    pub fn run_until_idle(&self) -> Result<usize, SchedulerError> {
        self.perform_microtask_checkpoint();
        let mut ran = 0usize;
        while self.pending_tasks() > 0 {
            if ran >= self.inner.turn_limit {
                warn!(limit = self.inner.turn_limit, "event loop did not settle");
                return Err(SchedulerError::TurnLimitExceeded {
                    limit: self.inner.turn_limit,
                });
            }
            self.run_next_task();
            ran += 1;
        }
        Ok(ran)
    }

    pub fn pending_tasks(&self) -> usize {
        self.inner.macrotasks.borrow().len()
    }

    pub fn pending_microtasks(&self) -> usize {
        self.inner.microtasks.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending_tasks() == 0 && self.pending_microtasks() == 0
    }

    pub fn turn_limit(&self) -> usize {
        self.inner.turn_limit
    }
}
