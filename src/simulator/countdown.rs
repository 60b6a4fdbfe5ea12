use std::fmt;

use time::{macros::datetime, OffsetDateTime};

const MS_PER_SECOND: i128 = 1_000;
const MS_PER_MINUTE: i128 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i128 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i128 = 24 * MS_PER_HOUR;

/// Target used when none is configured.
pub const DEFAULT_TARGET: OffsetDateTime = datetime!(2027-01-01 00:00:00 UTC);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Running {
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    Ended,
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Running {
                days,
                hours,
                minutes,
                seconds,
            } => write!(f, "{days}d {hours}h {minutes}m {seconds}s"),
            Remaining::Ended => f.write_str("Mining event ended"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    target: OffsetDateTime,
}

impl Countdown {
    pub fn new(target: OffsetDateTime) -> Self {
        Self { target }
    }

    pub fn target(&self) -> OffsetDateTime {
        self.target
    }

    /// Split the millisecond distance to the target with integer division.
    /// A target at or before `now` is `Ended`.
    pub fn remaining_at(&self, now: OffsetDateTime) -> Remaining {
        let distance = (self.target - now).whole_milliseconds();
        if distance <= 0 {
            return Remaining::Ended;
        }
        Remaining::Running {
            days: (distance / MS_PER_DAY) as i64,
            hours: ((distance % MS_PER_DAY) / MS_PER_HOUR) as i64,
            minutes: ((distance % MS_PER_HOUR) / MS_PER_MINUTE) as i64,
            seconds: ((distance % MS_PER_MINUTE) / MS_PER_SECOND) as i64,
        }
    }

    pub fn remaining(&self) -> Remaining {
        self.remaining_at(OffsetDateTime::now_utc())
    }
}
