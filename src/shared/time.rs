use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, Timelike};

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A minute of the day in `0..1440`.
///
/// Seconds are dropped when converting from a timestamp, so 08:15:59 and
/// 08:15:00 are the same minute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Minute(u16);

impl Minute {
    pub const MIDNIGHT: Self = Self(0);
    pub const LAST: Self = Self(MINUTES_PER_DAY - 1);

    /// Returns `None` if `minute` is not a valid minute of the day.
    pub const fn new(minute: u16) -> Option<Self> {
        if minute < MINUTES_PER_DAY {
            Some(Self(minute))
        } else {
            None
        }
    }

    pub const fn from_hm(hours: u16, minutes: u16) -> Option<Self> {
        if hours < 24 && minutes < 60 {
            Some(Self(hours * 60 + minutes))
        } else {
            None
        }
    }

    pub fn from_datetime<T: Timelike>(time: &T) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    pub const fn as_minutes(&self) -> u16 {
        self.0
    }

    pub const fn as_index(&self) -> usize {
        self.0 as usize
    }

    pub const fn hours(&self) -> u16 {
        self.0 / 60
    }

    pub const fn minutes(&self) -> u16 {
        self.0 % 60
    }

    pub fn to_hm_string(&self) -> String {
        format!("{:02}:{:02}", self.hours(), self.minutes())
    }

    /// 12-hour clock label, e.g. `8:15 AM`.
    pub fn to_short_string(&self) -> String {
        let suffix = if self.hours() < 12 { "AM" } else { "PM" };
        let hours = match self.hours() % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", hours, self.minutes(), suffix)
    }

    pub fn from_hm_str(time: &str) -> Option<Self> {
        let mut split = time.split(':');
        let hours: u16 = split.next()?.parse().ok()?;
        let minutes: u16 = split.next()?.parse().ok()?;
        if split.next().is_some() {
            return None;
        }
        Self::from_hm(hours, minutes)
    }
}

impl Display for Minute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hm_string())
    }
}

impl From<Minute> for u16 {
    fn from(value: Minute) -> Self {
        value.0
    }
}

impl TryFrom<u16> for Minute {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(value)
    }
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Parses a trip feed timestamp into its wall-clock date time.
///
/// Naive timestamps are taken as local wall-clock time. Timestamps with an
/// offset keep the wall-clock time of that offset.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

#[test]
fn parse_unparse_1() {
    let time = "00:00";
    let minute = Minute::from_hm_str(time).unwrap();
    assert_eq!(time, minute.to_hm_string())
}

#[test]
fn parse_unparse_2() {
    let time = "23:59";
    let minute = Minute::from_hm_str(time).unwrap();
    assert_eq!(minute, Minute::LAST);
    assert_eq!(time, minute.to_hm_string())
}

#[test]
fn parse_unparse_3() {
    let time = "08:15";
    let minute = Minute::from_hm_str(time).unwrap();
    assert_eq!(minute.as_minutes(), 495);
    assert_eq!(time, minute.to_hm_string())
}

#[test]
fn invalid_minute_test_1() {
    assert!(Minute::from_hm_str("24:00").is_none());
    assert!(Minute::from_hm_str("12:60").is_none());
    assert!(Minute::from_hm_str("12:0a").is_none());
    assert!(Minute::from_hm_str("12:00:00").is_none());
}

#[test]
fn invalid_minute_test_2() {
    assert!(Minute::new(MINUTES_PER_DAY).is_none());
    assert_eq!(Minute::try_from(1440), Err(1440));
}

#[test]
fn short_string_test() {
    assert_eq!(Minute::MIDNIGHT.to_short_string(), "12:00 AM");
    assert_eq!(Minute::from_hm(8, 5).unwrap().to_short_string(), "8:05 AM");
    assert_eq!(Minute::from_hm(12, 30).unwrap().to_short_string(), "12:30 PM");
    assert_eq!(Minute::LAST.to_short_string(), "11:59 PM");
}

#[test]
fn seconds_are_dropped() {
    let time = parse_timestamp("2024-03-01 08:15:59.870").unwrap();
    assert_eq!(Minute::from_datetime(&time).as_minutes(), 495);
    let time = parse_timestamp("2024-03-01 08:15:00").unwrap();
    assert_eq!(Minute::from_datetime(&time).as_minutes(), 495);
}

#[test]
fn timestamp_formats() {
    let expected = Minute::from_hm(17, 42).unwrap();
    for value in [
        "2024-03-01 17:42:10",
        "2024-03-01T17:42:10.5",
        "2024-03-01 17:42",
        "2024-03-01T17:42:10-05:00",
        " 2024-03-01 17:42:10 ",
    ] {
        let time = parse_timestamp(value).unwrap();
        assert_eq!(Minute::from_datetime(&time), expected, "{value}");
    }
}

#[test]
fn invalid_timestamp() {
    assert!(parse_timestamp("").is_none());
    assert!(parse_timestamp("yesterday").is_none());
    assert!(parse_timestamp("2024-03-01 25:00:00").is_none());
}
