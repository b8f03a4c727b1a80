//! The fortnight hour ring.
//!
//! Time is quantized into one-hour blocks on a 336-slot ring (two weeks of
//! 24-hour days). Slot 0 is midnight of the first Sunday of a rotation. All
//! rotations are counted from a fixed "prime Sunday" anchor.
//!
//! Arithmetic is done on civil (wall-clock) time in whatever zone label the
//! instant carries, so a DST switch never moves a slot boundary.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Weekday};
use std::fmt;

use crate::days::SUNDAY_FIRST;
use crate::error::{Result, ScheduleError};
use crate::rotation::Week;

/// Hour index on the ring. Canonical values are in `[0, FULL_ROTATION)`, but
/// intermediate results may overflow in either direction.
pub type RingSlot = i64;

pub const HOURS_PER_DAY: i64 = 24;
pub const HOURS_PER_WEEK: i64 = 7 * HOURS_PER_DAY;
pub const FULL_ROTATION: i64 = 2 * HOURS_PER_WEEK;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRing {
    anchor: NaiveDateTime,
}

impl HourRing {
    /// Build a ring anchored at midnight of `anchor`, which must be a Sunday.
    pub fn new(anchor: NaiveDate) -> Result<Self> {
        if anchor.weekday() != Weekday::Sun {
            return Err(ScheduleError::InvalidAnchor(anchor));
        }
        Ok(Self {
            anchor: anchor.and_time(NaiveTime::MIN),
        })
    }

    pub fn anchor(&self) -> NaiveDateTime {
        self.anchor
    }

    /// Slot of the hour block that starts at the next top of the hour.
    ///
    /// An instant exactly on the hour still moves to the following block:
    /// 08:00 and 08:59 both map to the 09:00 block.
    pub fn to_ring_slot<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> RingSlot {
        self.civil_slot(instant.naive_local())
    }

    pub fn civil_slot(&self, civil: NaiveDateTime) -> RingSlot {
        hours_between(self.anchor, upcoming_hour(civil)).rem_euclid(FULL_ROTATION)
    }

    /// Start (civil midnight) of the rotation containing `instant`.
    pub fn zero_sunday_of<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> NaiveDateTime {
        self.rotation_start(instant.naive_local())
    }

    pub fn rotation_start(&self, civil: NaiveDateTime) -> NaiveDateTime {
        let rotations = hours_between(self.anchor, civil).div_euclid(FULL_ROTATION);
        self.anchor + Duration::hours(rotations * FULL_ROTATION)
    }

    /// Civil time at which `slot` begins, counted from `zero_sunday`.
    pub fn instant_of(&self, zero_sunday: NaiveDateTime, slot: RingSlot) -> NaiveDateTime {
        zero_sunday + Duration::hours(slot)
    }

    /// Where in the rotation the current hour falls.
    pub fn position<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> RotationDay {
        let civil = instant.naive_local();
        let slot = hours_between(self.anchor, civil).rem_euclid(FULL_ROTATION);
        let week = if slot < HOURS_PER_WEEK { Week::First } else { Week::Second };
        let day = (slot % HOURS_PER_WEEK) / HOURS_PER_DAY;
        RotationDay {
            week,
            weekday: SUNDAY_FIRST[day as usize],
            hour: civil.hour(),
        }
    }
}

/// A day within the rotation, e.g. "second Thursday".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationDay {
    pub week: Week,
    pub weekday: Weekday,
    pub hour: u32,
}

impl fmt::Display for RotationDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.week, weekday_name(self.weekday))
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Truncate to the hour, then step one hour forward.
pub fn upcoming_hour(civil: NaiveDateTime) -> NaiveDateTime {
    civil.date().and_time(NaiveTime::MIN) + Duration::hours(i64::from(civil.hour()) + 1)
}

/// Whole hours from `from` to `to`, floored.
pub(crate) fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_seconds().div_euclid(3600)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn ring() -> HourRing {
        HourRing::new(NaiveDate::from_ymd_opt(2022, 1, 2).unwrap()).unwrap()
    }

    fn est(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    #[test]
    fn anchor_must_be_sunday() {
        let monday = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        assert_eq!(HourRing::new(monday), Err(ScheduleError::InvalidAnchor(monday)));
    }

    #[test]
    fn on_the_hour_moves_to_next_block() {
        let r = ring();
        // 2022-11-20 is a first-week Sunday for this anchor.
        assert_eq!(r.to_ring_slot(&est(2022, 11, 20, 8, 0)), 9);
        assert_eq!(r.to_ring_slot(&est(2022, 11, 20, 8, 59)), 9);
        assert_eq!(r.to_ring_slot(&est(2022, 11, 26, 22, 0)), 167);
        assert_eq!(r.to_ring_slot(&est(2022, 12, 2, 13, 0)), 302);
    }

    #[test]
    fn last_hour_wraps_to_zero() {
        let r = ring();
        assert_eq!(r.to_ring_slot(&est(2022, 12, 3, 23, 30)), 0);
    }

    #[test]
    fn slot_is_periodic_and_monotonic() {
        let r = ring();
        let start = est(2022, 11, 20, 0, 30);
        let mut previous = -1;
        for h in 0..335 {
            let t = start + Duration::hours(h);
            let slot = r.to_ring_slot(&t);
            assert!(slot > previous, "slot went backwards at hour {h}");
            assert_eq!(slot, r.to_ring_slot(&(t + Duration::hours(FULL_ROTATION))));
            assert_eq!(slot, r.to_ring_slot(&(t - Duration::hours(3 * FULL_ROTATION))));
            previous = slot;
        }
    }

    #[test]
    fn zero_sunday_handles_both_sides_of_anchor() {
        let r = ring();
        let expected = NaiveDate::from_ymd_opt(2022, 11, 20).unwrap().and_time(NaiveTime::MIN);
        assert_eq!(r.zero_sunday_of(&est(2022, 12, 3, 23, 59)), expected);
        assert_eq!(r.zero_sunday_of(&est(2022, 11, 20, 0, 0)), expected);

        let before = NaiveDate::from_ymd_opt(2021, 12, 19).unwrap().and_time(NaiveTime::MIN);
        assert_eq!(r.zero_sunday_of(&est(2022, 1, 1, 12, 0)), before);
    }

    #[test]
    fn instant_of_inverts_slot() {
        let r = ring();
        let now = est(2022, 11, 23, 14, 10);
        let zs = r.zero_sunday_of(&now);
        let slot = r.to_ring_slot(&now);
        assert_eq!(r.instant_of(zs, slot), upcoming_hour(now.naive_local()));
    }

    #[test]
    fn position_names_the_day() {
        let r = ring();
        assert_eq!(r.position(&est(2022, 11, 21, 9, 0)).to_string(), "first Monday");
        assert_eq!(r.position(&est(2022, 12, 1, 18, 0)).to_string(), "second Thursday");
        assert_eq!(r.position(&est(2022, 12, 1, 18, 0)).hour, 18);
    }
}
