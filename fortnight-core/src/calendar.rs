//! Busy hours for the next full rotation, relative to "now".

use chrono::{DateTime, TimeZone};

use crate::error::Result;
use crate::event::GeneralEvent;
use crate::ring::{FULL_ROTATION, HourRing, RingSlot};

/// Every busy hour of the active events, placed at its next occurrence.
///
/// Slots at or before the upcoming hour are pushed one rotation ahead, so
/// the result spans `(upcoming, upcoming + FULL_ROTATION]`. An event that
/// names a day twice still blocks each hour once; overlapping events are
/// not merged with each other. The first invalid active event aborts the
/// whole calculation.
pub fn next_blocked_hours<Tz: TimeZone>(
    ring: &HourRing,
    now: &DateTime<Tz>,
    events: &[GeneralEvent],
) -> Result<Vec<RingSlot>> {
    let upcoming = ring.to_ring_slot(now);
    let mut slots = Vec::new();

    for event in events.iter().filter(|e| !e.inactive) {
        let mut own: Vec<RingSlot> = event
            .blocked_hours()?
            .into_iter()
            .map(|hour| hour.rem_euclid(FULL_ROTATION))
            .map(|hour| if hour <= upcoming { hour + FULL_ROTATION } else { hour })
            .collect();
        own.sort_unstable();
        own.dedup();
        slots.extend(own);
    }

    slots.sort_unstable();
    Ok(slots)
}

/// Split events, or records wrapping them, into (active, inactive),
/// keeping their relative order.
pub fn split_active<E: AsRef<GeneralEvent>>(events: &[E]) -> (Vec<&E>, Vec<&E>) {
    events.iter().partition(|e| !e.as_ref().inactive)
}
