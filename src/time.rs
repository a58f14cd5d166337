// Clock abstraction and report timestamp formatting

use chrono::{Local, NaiveDateTime};
use std::cell::Cell;
use std::time::{Duration, Instant};

/// Textual layout of every timestamp in the report: `DD.MM.YYYY HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Render a timestamp the way report cells show it.
pub fn format_timestamp(moment: &NaiveDateTime) -> String {
    moment.format(TIMESTAMP_FORMAT).to_string()
}

/// Source of wall-clock and monotonic readings.
pub trait Clock {
    /// Local wall-clock time, used for display.
    fn now(&self) -> NaiveDateTime;

    /// Monotonic reading, used for elapsed-time measurement.
    fn instant(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }

    fn instant(&self) -> Instant {
        (**self).instant()
    }
}

/// Clock that only moves when told to.
///
/// Both readings advance together, so a test can script a run and get
/// exact timestamps and elapsed times back.
#[derive(Debug)]
pub struct ManualClock {
    wall: Cell<NaiveDateTime>,
    base: Instant,
    offset: Cell<Duration>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            wall: Cell::new(start),
            base: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
        let step = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        self.wall.set(self.wall.get() + step);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.wall.get()
    }

    fn instant(&self) -> Instant {
        self.base + self.offset.get()
    }
}
