use crate::error::DecodeError;
use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

/// The zone the instrument writes its wall-clock timestamps in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SourceZone {
    /// Whatever zone the exporter process runs in
    #[default]
    Local,
    Named(Tz),
}

impl SourceZone {
    /// Converts a wall-clock time of this zone into an absolute instant.
    ///
    /// Times repeated by a backwards DST shift resolve to the earlier
    /// instant. Times skipped by a forward shift never happened and
    /// are rejected.
    pub fn to_utc(&self, naive: &NaiveDateTime) -> Result<DateTime<Utc>, DecodeError> {
        match self {
            SourceZone::Local => resolve(Local.from_local_datetime(naive), naive),
            SourceZone::Named(tz) => resolve(tz.from_local_datetime(naive), naive),
        }
    }
}

fn resolve<Z: TimeZone>(
    local: LocalResult<DateTime<Z>>,
    naive: &NaiveDateTime,
) -> Result<DateTime<Utc>, DecodeError> {
    match local {
        LocalResult::Single(instant) => Ok(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(DecodeError::NonexistentLocalTime(naive.to_string())),
    }
}

impl FromStr for SourceZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("local") {
            return Ok(SourceZone::Local);
        }
        s.parse::<Tz>()
            .map(SourceZone::Named)
            .map_err(|err| err.to_string())
    }
}

impl fmt::Display for SourceZone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceZone::Local => write!(f, "local"),
            SourceZone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}
