//! Task model for the urgency engine.

use serde::{Deserialize, Serialize};

use crate::deadline::Deadline;
use crate::error::{Result, ScheduleError};
use crate::urgency::{HourStats, Urgency};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,

    /// Raw deadline, absolute ("14:00 12/25/2023 EST") or repeating
    /// ("18:00 both Tuesday, Thursday").
    pub deadline: String,

    /// Zero means the task is done.
    pub estimated_hours: u32,

    /// Derived fields. Rebuilt from scratch on every scheduling pass and
    /// only meaningful for the "now" of that pass.
    #[serde(default)]
    pub urgency: Option<Urgency>,
    #[serde(default)]
    pub stats: Option<HourStats>,
}

/// Where a task is listed after ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskSection {
    Overdue,
    Upcoming,
    Completed,
}

impl Task {
    pub fn new(name: impl Into<String>, deadline: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deadline: deadline.into(),
            estimated_hours: 1,
            urgency: None,
            stats: None,
        }
    }

    pub fn with_estimate(mut self, hours: u32) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ScheduleError::validation("task", "missing a name"));
        }
        if self.deadline.trim().is_empty() {
            return Err(ScheduleError::validation(&self.name, "has no deadline"));
        }
        Ok(())
    }

    pub fn parsed_deadline(&self) -> Result<Deadline> {
        Deadline::parse(&self.deadline).map_err(|e| e.for_task(&self.name))
    }

    pub fn clear_derived(&mut self) {
        self.urgency = None;
        self.stats = None;
    }

    pub fn section(&self) -> TaskSection {
        match self.urgency {
            Some(Urgency::Complete) => TaskSection::Completed,
            Some(u) if u.is_overdue() => TaskSection::Overdue,
            _ => TaskSection::Upcoming,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_name_and_deadline() {
        assert!(Task::new("read", "18:00 both Tue").validate().is_ok());
        assert_eq!(
            Task::new("read", " ").validate().unwrap_err().to_string(),
            "read: has no deadline"
        );
        assert!(Task::new("", "18:00 both Tue").validate().is_err());
    }

    #[test]
    fn bad_deadline_names_the_task() {
        let err = Task::new("essay", "noon-ish").parsed_deadline().unwrap_err();
        assert_eq!(err.subject(), Some("essay"));
    }

    #[test]
    fn section_follows_urgency() {
        let mut t = Task::new("x", "18:00 both Tue");
        assert_eq!(t.section(), TaskSection::Upcoming);
        t.urgency = Some(Urgency::Score(-0.5));
        assert_eq!(t.section(), TaskSection::Overdue);
        t.urgency = Some(Urgency::Complete);
        assert_eq!(t.section(), TaskSection::Completed);
        t.urgency = Some(Urgency::DueNow);
        assert_eq!(t.section(), TaskSection::Upcoming);
    }

    #[test]
    fn derived_fields_round_trip_through_json() {
        let mut t = Task::new("x", "18:00 both Tue").with_estimate(3);
        t.urgency = Some(Urgency::Score(0.25));
        t.stats = Some(HourStats {
            remaining_free_hours: 12,
            busy_hours: 4,
        });
        let json = serde_json::to_string(&t).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);

        let bare: Task =
            serde_json::from_str(r#"{"name":"y","deadline":"18:00 both Tue","estimated_hours":2}"#).unwrap();
        assert_eq!(bare.urgency, None);
    }
}
