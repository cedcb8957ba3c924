use chrono::{Local, NaiveDateTime};

/// Source of the wall-clock time used for default date/time fields and capture names.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// The host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

impl Clock for NaiveDateTime {
    fn now(&self) -> NaiveDateTime {
        *self
    }
}
