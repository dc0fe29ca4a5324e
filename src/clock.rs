use chrono::{DateTime, Local, NaiveDate, Utc};
use std::sync::Mutex;

/// Source of "now" for rollover checks and export stamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// The host's local calendar day.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Noon local time on the given day, far from any DST edge.
    pub fn at_day(day: NaiveDate) -> Self {
        Self::new(local_noon(day))
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = now;
    }

    pub fn set_day(&self, day: NaiveDate) {
        self.set(local_noon(day));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn local_noon(day: NaiveDate) -> DateTime<Local> {
    let noon = day.and_hms_opt(12, 0, 0).expect("12:00:00 is a valid time");
    noon.and_local_timezone(Local)
        .earliest()
        .unwrap_or_else(|| noon.and_utc().with_timezone(&Local))
}
