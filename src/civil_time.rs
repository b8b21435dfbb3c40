use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::DATE_KEY_FORMAT;

lazy_static! {
    static ref OFFSET_RE: Regex =
        Regex::new(r"^([+-])(\d{2}):(\d{2})$").expect("valid offset regex");
}

/// Parse a fixed UTC offset written as `+HH:MM` or `-HH:MM`
pub fn parse_utc_offset(s: &str) -> anyhow::Result<FixedOffset> {
    let cap = OFFSET_RE
        .captures(s.trim())
        .ok_or_else(|| anyhow::anyhow!("offset `{s}` is not of the form +HH:MM"))?;
    let hours: i32 = cap[2].parse()?;
    let minutes: i32 = cap[3].parse()?;
    if minutes >= 60 {
        anyhow::bail!("offset `{s}` has invalid minutes");
    }
    let secs = hours * 3600 + minutes * 60;
    let secs = if &cap[1] == "-" { -secs } else { secs };
    FixedOffset::east_opt(secs).ok_or_else(|| anyhow::anyhow!("offset `{s}` is out of range"))
}

/// An instant viewed as civil time in a fixed offset.
///
/// All day-relative arithmetic (start of day, time-of-day on the same date)
/// is done on the civil date, so callers never touch raw offsets.
#[derive(Debug, Clone, Copy)]
pub struct CivilNow {
    now: DateTime<FixedOffset>,
}

impl CivilNow {
    pub fn from_instant(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now: instant.with_timezone(&offset),
        }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    pub fn date(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// `YYYY-MM-DD` of the civil date
    pub fn date_key(&self) -> String {
        self.date().format(DATE_KEY_FORMAT).to_string()
    }

    /// The instant of `time` on the current civil date
    pub fn at(&self, time: NaiveTime) -> DateTime<FixedOffset> {
        let local = self.date().and_time(time);
        match self.now.offset().from_local_datetime(&local) {
            LocalResult::Single(at) | LocalResult::Ambiguous(at, _) => at,
            LocalResult::None => unreachable!("fixed offsets have no local-time gaps"),
        }
    }

    pub fn start_of_day(&self) -> DateTime<FixedOffset> {
        self.at(NaiveTime::MIN)
    }

    pub fn start_of_day_utc(&self) -> DateTime<Utc> {
        self.start_of_day().with_timezone(&Utc)
    }
}
