pub mod clock;
pub mod computer;
pub mod retry;
pub mod scheduler;

pub use clock::{Clock, SystemClock};
pub use computer::{EventKind, ScheduledEvent, compute_schedule, next_upcoming};
pub use retry::{RetryController, RetryDue, RetryOutcome, RetryPolicy};
pub use scheduler::{EventScheduler, Fired};
