use std::fmt::Display;

use crate::{
    repository::Window,
    shared::time::Minute,
    traffic,
};

/// The time-of-day filter driven by the slider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimeFilter {
    /// Every trip of the day.
    #[default]
    Any,
    /// Trips inside the rolling window around a minute.
    Around(Minute),
}

impl TimeFilter {
    /// The slider value meaning "any time".
    pub const ANY_SENTINEL: i32 = -1;

    /// The window to query, `None` meaning every bucket.
    /// A radius outside `1..=720` is rejected.
    pub fn window(&self, radius: u16) -> Result<Option<Window>, traffic::Error> {
        match self {
            TimeFilter::Any => Ok(None),
            TimeFilter::Around(center) => Window::new(*center, radius)
                .map(Some)
                .ok_or(traffic::Error::InvalidWindowRadius(radius)),
        }
    }

    pub fn to_sentinel(&self) -> i32 {
        match self {
            TimeFilter::Any => Self::ANY_SENTINEL,
            TimeFilter::Around(minute) => minute.as_minutes() as i32,
        }
    }
}

/// Accepts `-1` for [`TimeFilter::Any`] and `0..=1439`. Anything else is a
/// bug in the caller and is rejected instead of wrapped.
impl TryFrom<i32> for TimeFilter {
    type Error = traffic::Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if value == Self::ANY_SENTINEL {
            return Ok(TimeFilter::Any);
        }
        u16::try_from(value)
            .ok()
            .and_then(Minute::new)
            .map(TimeFilter::Around)
            .ok_or(traffic::Error::TimeFilterOutOfRange(value))
    }
}

impl From<Minute> for TimeFilter {
    fn from(value: Minute) -> Self {
        TimeFilter::Around(value)
    }
}

impl From<Option<Minute>> for TimeFilter {
    fn from(value: Option<Minute>) -> Self {
        value.map_or(TimeFilter::Any, TimeFilter::Around)
    }
}

impl Display for TimeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeFilter::Any => f.write_str("any time"),
            TimeFilter::Around(minute) => write!(f, "around {minute}"),
        }
    }
}

#[test]
fn sentinel_test() {
    assert_eq!(TimeFilter::try_from(-1).unwrap(), TimeFilter::Any);
    assert_eq!(TimeFilter::Any.to_sentinel(), -1);
}

#[test]
fn minute_test() {
    let filter = TimeFilter::try_from(1439).unwrap();
    assert_eq!(filter, TimeFilter::Around(Minute::LAST));
    assert_eq!(filter.to_sentinel(), 1439);
    assert_eq!(
        TimeFilter::try_from(0).unwrap(),
        TimeFilter::Around(Minute::MIDNIGHT)
    );
}

#[test]
fn out_of_range_test() {
    for value in [-2, 1440, i32::MIN, i32::MAX] {
        assert!(matches!(
            TimeFilter::try_from(value),
            Err(traffic::Error::TimeFilterOutOfRange(v)) if v == value
        ));
    }
}

#[test]
fn window_radius_test() {
    let filter = TimeFilter::Around(Minute::new(600).unwrap());
    let window = filter.window(15).unwrap().unwrap();
    assert_eq!(window.radius(), 15);
    assert_eq!(window.ranges(), [586..616, 0..0]);
    assert_eq!(TimeFilter::Any.window(60), Ok(None));

    for radius in [0, 721] {
        assert_eq!(
            filter.window(radius),
            Err(traffic::Error::InvalidWindowRadius(radius))
        );
    }
}
