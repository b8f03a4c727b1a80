//! Task deadlines: either a fixed civil date-time or a repeating time slot.
//!
//! Formats:
//! - absolute:  `"14:00 12/25/2023 EST"`
//! - repeating: `"18:00 both Tuesday, Thursday"`

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::blocked::generate_blocked_hours;
use crate::days::parse_day_spec;
use crate::error::{Result, ScheduleError};
use crate::ring::{FULL_ROTATION, HourRing, RingSlot, hours_between, upcoming_hour, weekday_name};
use crate::rotation::Rotation;

const ABSOLUTE_FORMAT: &str = "%H:%M %m/%d/%Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deadline {
    Absolute {
        at: DateTime<FixedOffset>,
        /// Zone label as written, e.g. "EST".
        zone: String,
    },
    Repeating {
        hour: u32,
        /// Kept for display; the deadline is the whole hour block.
        minute: u32,
        rotation: Rotation,
        days: Vec<Weekday>,
    },
}

/// A deadline placed on the ring relative to some "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDeadline {
    /// Slot measured from the start of now's rotation.
    pub slot: RingSlot,
    /// Whole rotations between now's rotation and the deadline's. Negative
    /// for deadlines in an earlier rotation.
    pub intervening_fortnights: i64,
}

impl ResolvedDeadline {
    pub fn absolute_slot(&self) -> RingSlot {
        self.slot + self.intervening_fortnights * FULL_ROTATION
    }
}

impl Deadline {
    /// Parse a raw deadline, trying the absolute format first.
    pub fn parse(raw: &str) -> Result<Self> {
        match parse_absolute(raw) {
            Some(deadline) => Ok(deadline),
            None => parse_repeating(raw),
        }
    }

    pub fn resolve<Tz: TimeZone>(&self, ring: &HourRing, now: &DateTime<Tz>) -> Result<ResolvedDeadline> {
        match self {
            Deadline::Absolute { at, .. } => Ok(resolve_absolute(ring, now.naive_local(), at.naive_local())),
            Deadline::Repeating { hour, rotation, days, .. } => {
                let slots = generate_blocked_hours(days, *rotation, *hour, 1);
                let slot = next_occurrence(&slots, ring.to_ring_slot(now)).ok_or_else(|| {
                    ScheduleError::NoOccurrenceFound {
                        deadline: self.to_string(),
                    }
                })?;
                Ok(ResolvedDeadline {
                    slot,
                    intervening_fortnights: 0,
                })
            }
        }
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deadline::Absolute { at, zone } => write!(f, "{} {}", at.format(ABSOLUTE_FORMAT), zone),
            Deadline::Repeating {
                hour,
                minute,
                rotation,
                days,
            } => {
                let days: Vec<&str> = days.iter().map(|d| weekday_name(*d)).collect();
                write!(f, "{hour:02}:{minute:02} {rotation} {}", days.join(", "))
            }
        }
    }
}

/// Fixed offset for a zone label. Unknown labels get a zero offset; only the
/// civil time feeds the ring.
fn zone_offset(zone: &str) -> Option<FixedOffset> {
    let hours = match zone.to_uppercase().as_str() {
        "EST" | "CDT" => -5,
        "EDT" => -4,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" | "AKDT" => -8,
        "AKST" => -9,
        "HST" => -10,
        _ => 0,
    };
    FixedOffset::east_opt(hours * 3600)
}

fn parse_absolute(raw: &str) -> Option<Deadline> {
    let mut parts = raw.split_whitespace();
    let (time, date, zone) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let civil = NaiveDateTime::parse_from_str(&format!("{time} {date}"), ABSOLUTE_FORMAT).ok()?;
    let at = zone_offset(zone)?.from_local_datetime(&civil).single()?;
    Some(Deadline::Absolute {
        at,
        zone: zone.to_uppercase(),
    })
}

fn parse_clock(s: &str) -> Option<(u32, u32)> {
    let (hour, minute) = s.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    (hour < 24 && minute < 60).then_some((hour, minute))
}

fn parse_repeating(raw: &str) -> Result<Deadline> {
    let malformed = |reason: String| ScheduleError::malformed(raw, reason);

    let (time, rest) = raw
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(|| malformed("expected '<HH:MM> <first|second|both> <days>'".to_string()))?;
    let (hour, minute) =
        parse_clock(time).ok_or_else(|| malformed(format!("'{time}' is not a HH:MM time")))?;

    let (rotation, days) = rest
        .trim_start()
        .split_once(char::is_whitespace)
        .ok_or_else(|| malformed("missing rotation or days".to_string()))?;
    let rotation: Rotation = rotation.parse().map_err(malformed)?;
    let days = parse_day_spec(days)?;

    Ok(Deadline::Repeating {
        hour,
        minute,
        rotation,
        days,
    })
}

/// Walk the deadline's hour block one rotation at a time until it falls in
/// the rotation that contains now's hour block.
fn resolve_absolute(ring: &HourRing, now: NaiveDateTime, deadline: NaiveDateTime) -> ResolvedDeadline {
    let zero_sunday = ring.rotation_start(upcoming_hour(now));
    let rotation = Duration::hours(FULL_ROTATION);

    let mut block = upcoming_hour(deadline);
    let mut intervening_fortnights = 0;
    while block - rotation >= zero_sunday {
        block -= rotation;
        intervening_fortnights += 1;
    }
    while block < zero_sunday {
        block += rotation;
        intervening_fortnights -= 1;
    }

    ResolvedDeadline {
        slot: hours_between(zero_sunday, block),
        intervening_fortnights,
    }
}

/// First slot strictly after `upcoming`, looking at most one rotation ahead.
fn next_occurrence(slots: &[RingSlot], upcoming: RingSlot) -> Option<RingSlot> {
    let len = slots.len();
    (0..2 * len)
        .map(|i| slots[i % len] + FULL_ROTATION * (i / len) as i64)
        .find(|slot| *slot > upcoming)
}
