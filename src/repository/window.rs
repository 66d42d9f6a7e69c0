use std::ops::Range;

use crate::shared::time::{MINUTES_PER_DAY, Minute};

pub const DEFAULT_RADIUS: u16 = 60;
pub const MAX_RADIUS: u16 = MINUTES_PER_DAY / 2;

/// A circular range of minutes around a center.
///
/// The window covers `[center - radius + 1, center + radius]`, both ends
/// included and taken modulo a day, so it is exactly `2 * radius` minutes
/// wide. With the default radius a center of 08:00 covers 07:01 to 09:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    center: Minute,
    radius: u16,
}

impl Window {
    /// Returns `None` if the radius is not in `1..=720`.
    pub const fn new(center: Minute, radius: u16) -> Option<Self> {
        if radius == 0 || radius > MAX_RADIUS {
            return None;
        }
        Some(Self { center, radius })
    }

    /// A window with the default radius of 60 minutes.
    pub const fn around(center: Minute) -> Self {
        Self {
            center,
            radius: DEFAULT_RADIUS,
        }
    }

    /// The same window moved to another center.
    pub const fn recentered(&self, center: Minute) -> Self {
        Self {
            center,
            radius: self.radius,
        }
    }

    pub const fn center(&self) -> Minute {
        self.center
    }

    pub const fn radius(&self) -> u16 {
        self.radius
    }

    pub const fn len(&self) -> usize {
        self.radius as usize * 2
    }

    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The first minute inside the window.
    pub fn first(&self) -> Minute {
        let first = (self.center.as_minutes() + MINUTES_PER_DAY - self.radius + 1) % MINUTES_PER_DAY;
        Minute::new(first).unwrap_or_default()
    }

    /// The last minute inside the window.
    pub fn last(&self) -> Minute {
        let last = (self.center.as_minutes() + self.radius) % MINUTES_PER_DAY;
        Minute::new(last).unwrap_or_default()
    }

    /// Does the window straddle midnight.
    pub fn wraps(&self) -> bool {
        self.first() > self.last()
    }

    pub fn contains(&self, minute: Minute) -> bool {
        let offset = (minute.as_minutes() + MINUTES_PER_DAY - self.first().as_minutes())
            % MINUTES_PER_DAY;
        (offset as usize) < self.len()
    }

    /// The bucket ranges covered by the window.
    ///
    /// The first range runs from the first minute up to midnight at most, the
    /// second is the part after midnight and is empty when the window does not
    /// wrap.
    pub fn ranges(&self) -> [Range<usize>; 2] {
        let day = MINUTES_PER_DAY as usize;
        let start = self.first().as_index();
        let end = (start + self.len()) % day;
        if start < end {
            [start..end, 0..0]
        } else {
            [start..day, 0..end]
        }
    }
}

#[test]
fn default_window_bounds() {
    let window = Window::around(Minute::from_hm(8, 0).unwrap());
    assert_eq!(window.first(), Minute::from_hm(7, 1).unwrap());
    assert_eq!(window.last(), Minute::from_hm(9, 0).unwrap());
    assert_eq!(window.ranges(), [421..541, 0..0]);
    assert!(!window.wraps());
}

#[test]
fn wrapping_window_bounds() {
    let window = Window::around(Minute::new(10).unwrap());
    assert_eq!(window.first().as_minutes(), 1391);
    assert_eq!(window.last().as_minutes(), 70);
    assert_eq!(window.ranges(), [1391..1440, 0..71]);
    assert!(window.wraps());
}

#[test]
fn last_minute_window_ends_at_midnight() {
    let window = Window::around(Minute::LAST);
    assert_eq!(window.ranges(), [1380..1440, 0..60]);
    let window = Window::around(Minute::new(1379).unwrap());
    assert_eq!(window.ranges(), [1320..1440, 0..0]);
    assert_eq!(window.last(), Minute::LAST);
    let window = Window::around(Minute::new(1380).unwrap());
    assert_eq!(window.ranges(), [1321..1440, 0..1]);
    assert_eq!(window.last(), Minute::MIDNIGHT);
}

#[test]
fn full_day_window() {
    let window = Window::new(Minute::new(100).unwrap(), MAX_RADIUS).unwrap();
    let [head, tail] = window.ranges();
    assert_eq!(head.len() + tail.len(), MINUTES_PER_DAY as usize);
    assert!((0..MINUTES_PER_DAY).all(|m| window.contains(Minute::new(m).unwrap())));
}

#[test]
fn invalid_radius() {
    assert!(Window::new(Minute::MIDNIGHT, 0).is_none());
    assert!(Window::new(Minute::MIDNIGHT, MAX_RADIUS + 1).is_none());
}

#[test]
fn ranges_agree_with_contains() {
    for radius in [1, 30, DEFAULT_RADIUS, 500] {
        for center in (0..MINUTES_PER_DAY).step_by(7).chain([0, 30, 1410, 1439]) {
            let window = Window::new(Minute::new(center).unwrap(), radius).unwrap();
            let [head, tail] = window.ranges();
            assert_eq!(head.len() + tail.len(), window.len());
            for minute in 0..MINUTES_PER_DAY {
                let in_ranges =
                    head.contains(&(minute as usize)) || tail.contains(&(minute as usize));
                assert_eq!(in_ranges, window.contains(Minute::new(minute).unwrap()));
            }
        }
    }
}
