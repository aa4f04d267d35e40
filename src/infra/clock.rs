use chrono::{Local, NaiveDateTime};
use crate::domain::ports::Clock;

/// Local wall-clock time; lessons are stored in the same fixed locale.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
