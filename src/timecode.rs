// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Fixed-width local timestamps (`YYYYMMDDTHHMMSS`) and minute arithmetic.

use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// On-disk timestamp format: local time, second precision, 15 characters.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";
const TIMESTAMP_LEN: usize = 15;

/// A local wall-clock instant as stored in the punch log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Current local time, truncated to whole seconds.
    pub fn now() -> Self {
        Timestamp(Local::now().naive_local().trunc_subsecs(0))
    }

    /// Parses a stored timestamp. Surrounding whitespace (e.g. the trailing
    /// newline of a closed record) is ignored; anything else must match
    /// `YYYYMMDDTHHMMSS` exactly.
    pub fn parse(s: &str) -> Result<Self> {
        let t = s.trim();
        let shape_ok = t.len() == TIMESTAMP_LEN
            && t.bytes().enumerate().all(|(i, b)| {
                if i == 8 {
                    b == b'T'
                } else {
                    b.is_ascii_digit()
                }
            });
        if !shape_ok {
            return Err(Error::MalformedTimestamp(s.to_string()));
        }
        NaiveDateTime::parse_from_str(t, TIMESTAMP_FORMAT)
            .map(Timestamp)
            .map_err(|_| Error::MalformedTimestamp(s.to_string()))
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar day of this instant, used as the report key.
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// Unix epoch seconds, interpreting the stored wall-clock time in the local zone.
    /// Ambiguous times (DST fall-back) take the earlier instant; times inside a DST gap
    /// fall back to UTC interpretation.
    fn epoch_seconds(&self) -> i64 {
        self.0
            .and_local_timezone(Local)
            .earliest()
            .map(|dt| dt.timestamp())
            .unwrap_or_else(|| self.0.and_utc().timestamp())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Timestamp::parse(s)
    }
}

/// Whole minutes from `start` to `end`; partial minutes are dropped (floor division).
pub fn minutes_between(start: &Timestamp, end: &Timestamp) -> i64 {
    (end.epoch_seconds() - start.epoch_seconds()).div_euclid(60)
}

/// Renders a minute count as `(H hours M minutes)`, or `(M minutes)` up to and
/// including 60 minutes.
pub fn format_duration(minutes: i64) -> String {
    if minutes > 60 {
        let hours = minutes.div_euclid(60);
        let rest = minutes - hours * 60;
        format!("({} hours {} minutes)", hours, rest)
    } else {
        format!("({} minutes)", minutes)
    }
}
