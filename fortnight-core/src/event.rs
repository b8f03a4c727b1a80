//! General events: recurring busy blocks on the fortnight calendar.
//!
//! Examples: sleeping every night, classes on first-week Tuesdays and
//! Thursdays, a shift every other Saturday. An event can wrap past midnight
//! or past the end of the rotation.

use serde::{Deserialize, Serialize};

use crate::blocked::generate_blocked_hours;
use crate::days::parse_day_spec;
use crate::error::{Result, ScheduleError};
use crate::ring::RingSlot;
use crate::rotation::Rotation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralEvent {
    pub name: String,
    pub rotation: Option<Rotation>,
    /// Raw day list, e.g. "Sun - Sat" or "Tue, Thur".
    pub days: String,
    /// Hour of day the first block starts (0-23).
    pub start_hour: u32,
    /// Whole hours; partial hours are rounded up by whoever writes the event.
    pub duration_hours: u32,
    /// Inactive events are kept for display but block no hours.
    pub inactive: bool,
}

impl GeneralEvent {
    pub fn new(name: impl Into<String>, rotation: Rotation, days: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rotation: Some(rotation),
            days: days.into(),
            start_hour: 0,
            duration_hours: 1,
            inactive: false,
        }
    }

    pub fn starting_at(mut self, hour: u32) -> Self {
        self.start_hour = hour;
        self
    }

    pub fn lasting(mut self, hours: u32) -> Self {
        self.duration_hours = hours;
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.inactive = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ScheduleError::validation("event", "missing a name"));
        }
        if self.rotation.is_none() {
            return Err(ScheduleError::validation(&self.name, "has no rotation"));
        }
        if self.days.trim().is_empty() {
            return Err(ScheduleError::validation(&self.name, "has no listed days"));
        }
        if self.start_hour > 23 {
            return Err(ScheduleError::validation(
                &self.name,
                format!("start time {} is not an hour of the day", self.start_hour),
            ));
        }
        if self.duration_hours == 0 {
            return Err(ScheduleError::validation(&self.name, "has missing or zero duration"));
        }
        Ok(())
    }

    /// Raw (un-normalized) ring slots this event occupies in one rotation.
    pub fn blocked_hours(&self) -> Result<Vec<RingSlot>> {
        self.validate()?;
        let rotation = self
            .rotation
            .ok_or_else(|| ScheduleError::validation(&self.name, "has no rotation"))?;
        let days = parse_day_spec(&self.days).map_err(|e| e.for_event(&self.name))?;
        Ok(generate_blocked_hours(&days, rotation, self.start_hour, self.duration_hours))
    }
}

impl AsRef<GeneralEvent> for GeneralEvent {
    fn as_ref(&self) -> &GeneralEvent {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sleeping() -> GeneralEvent {
        GeneralEvent::new("sleeping", Rotation::Both, "Sun-Sat")
            .starting_at(23)
            .lasting(8)
    }

    #[test]
    fn sleeping_blocks_eight_hours_a_night() {
        let hours = sleeping().blocked_hours().unwrap();
        assert_eq!(hours.len(), 112);
        assert_eq!(&hours[..8], &[23, 24, 25, 26, 27, 28, 29, 30]);
    }

    #[test]
    fn validation_names_the_missing_field() {
        let mut ev = sleeping();
        ev.duration_hours = 0;
        assert_eq!(
            ev.validate().unwrap_err().to_string(),
            "sleeping: has missing or zero duration"
        );

        let mut ev = sleeping();
        ev.rotation = None;
        assert!(ev.validate().is_err());

        let mut ev = sleeping();
        ev.name = "  ".to_string();
        assert_eq!(ev.validate().unwrap_err().to_string(), "event: missing a name");

        let ev = sleeping().starting_at(24);
        assert!(ev.validate().is_err());
    }

    #[test]
    fn bad_days_carry_the_event_name() {
        let ev = GeneralEvent::new("gym", Rotation::First, "Mon, Caturday");
        let err = ev.blocked_hours().unwrap_err();
        assert_eq!(err.subject(), Some("gym"));
    }
}
