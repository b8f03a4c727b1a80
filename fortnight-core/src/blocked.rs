//! Expansion of a recurring schedule into the ring slots it occupies.

use chrono::Weekday;

use crate::ring::{HOURS_PER_DAY, RingSlot};
use crate::rotation::Rotation;

/// Ring slots covered by `duration` hours starting at `start_hour` on each of
/// `days`, in the weeks selected by `rotation`.
///
/// Slots are not reduced modulo the ring width: an event starting at 23:00
/// on the second Saturday yields 335, 336, 337... Callers normalize against
/// "now". Output is sorted; duplicates from repeated days are kept.
pub fn generate_blocked_hours(
    days: &[Weekday],
    rotation: Rotation,
    start_hour: u32,
    duration: u32,
) -> Vec<RingSlot> {
    let start = i64::from(start_hour);
    let mut slots = Vec::with_capacity(days.len() * duration as usize * 2);

    for day in days {
        let day_base = HOURS_PER_DAY * i64::from(day.num_days_from_sunday());
        for offset in 0..i64::from(duration) {
            for week in rotation.weeks() {
                slots.push(week.base_slot() + day_base + start + offset);
            }
        }
    }

    slots.sort_unstable();
    slots
}
