use chrono::{DateTime, Local};

/// Wall-clock source. Swapped for a fixed clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Clock that only moves when told to.
    pub struct ManualClock {
        now: Mutex<DateTime<Local>>,
    }

    impl ManualClock {
        pub fn new(now: DateTime<Local>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        pub fn set(&self, now: DateTime<Local>) {
            *self.now.lock().unwrap() = now;
        }

        pub fn advance(&self, by: chrono::Duration) {
            let mut guard = self.now.lock().unwrap();
            *guard += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Local> {
            *self.now.lock().unwrap()
        }
    }
}
