pub mod clock {
    use chrono::{DateTime, TimeDelta, Utc};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Point in time used for goal arrival and frame stamping
    pub type Timestamp = DateTime<Utc>;

    /// Source of "now" for the controller
    pub trait Clock {
        fn now(&self) -> Timestamp;
    }

    /// Wall clock in UTC
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> Timestamp {
            Utc::now()
        }
    }

    /// Clock that only moves when told to.
    ///
    /// Shared through `Rc` so a test or a simulated host can advance time
    /// while the controller holds its own handle.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        now: Cell<Timestamp>,
    }

    impl ManualClock {
        // Constructor for ManualClock
        pub fn new(start: Timestamp) -> ManualClock {
            ManualClock {
                now: Cell::new(start),
            }
        }

        /// Clock starting at the unix epoch
        pub fn at_epoch() -> ManualClock {
            ManualClock::new(DateTime::<Utc>::UNIX_EPOCH)
        }

        /// Method to move time forward
        pub fn advance(&self, delta: TimeDelta) {
            self.now.set(self.now.get() + delta);
        }

        /// Method to move time forward by whole milliseconds
        pub fn advance_ms(&self, ms: i64) {
            self.advance(TimeDelta::milliseconds(ms));
        }

        /// Method for jumping to an absolute time
        pub fn set(&self, at: Timestamp) {
            self.now.set(at);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Timestamp {
            self.now.get()
        }
    }

    impl<C: Clock + ?Sized> Clock for Rc<C> {
        fn now(&self) -> Timestamp {
            (**self).now()
        }
    }

    impl<C: Clock + ?Sized> Clock for &C {
        fn now(&self) -> Timestamp {
            (**self).now()
        }
    }

}

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
