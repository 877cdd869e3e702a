mod change;
mod emitter;
mod scheduler;

pub use change::ChangeDetector;
pub use emitter::{EventEmitter, Subscription};
pub use scheduler::{DEFAULT_TURN_LIMIT, EventLoop, SchedulerError, TaskId};
