use chrono::{DateTime, TimeZone};
use fortnight_core::{
    GeneralEvent, HourRing, ScheduleError, Task, TaskSection, apply_urgency, by_urgency, next_blocked_hours,
};
use serde::{Deserialize, Serialize};

/// Top-level bullets that open a section of the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    OverdueTasks,
    UpcomingTasks,
    CompletedTasks,
    RegularEvents,
    InactiveEvents,
}

impl Heading {
    pub const ALL: [Heading; 5] = [
        Heading::OverdueTasks,
        Heading::UpcomingTasks,
        Heading::CompletedTasks,
        Heading::RegularEvents,
        Heading::InactiveEvents,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Heading::OverdueTasks => "Overdue Tasks",
            Heading::UpcomingTasks => "Upcoming Tasks",
            Heading::CompletedTasks => "Completed Tasks",
            Heading::RegularEvents => "Regular Events",
            Heading::InactiveEvents => "Inactive Events",
        }
    }

    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.title() == title)
    }

    pub fn for_section(section: TaskSection) -> Self {
        match section {
            TaskSection::Overdue => Heading::OverdueTasks,
            TaskSection::Upcoming => Heading::UpcomingTasks,
            TaskSection::Completed => Heading::CompletedTasks,
        }
    }

    pub fn task_section(self) -> Option<TaskSection> {
        match self {
            Heading::OverdueTasks => Some(TaskSection::Overdue),
            Heading::UpcomingTasks => Some(TaskSection::Upcoming),
            Heading::CompletedTasks => Some(TaskSection::Completed),
            Heading::RegularEvents | Heading::InactiveEvents => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskEntry {
    pub task: Task,
    /// Section the task was read from, if it came from a file.
    pub listed_under: Option<TaskSection>,
    /// Lines with fields we don't interpret, kept verbatim.
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventEntry {
    pub event: GeneralEvent,
    pub extra: Vec<String>,
}

impl AsRef<GeneralEvent> for EventEntry {
    fn as_ref(&self) -> &GeneralEvent {
        &self.event
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub tasks: Vec<TaskEntry>,
    pub events: Vec<EventEntry>,
}

impl Outline {
    pub fn events(&self) -> Vec<GeneralEvent> {
        self.events.iter().map(|e| e.event.clone()).collect()
    }

    /// Score every task against the outline's own events and order the
    /// entries most urgent first. Returns per-task failures; an invalid
    /// event fails the whole pass.
    pub fn rank<Tz: TimeZone>(&mut self, ring: &HourRing, now: &DateTime<Tz>) -> fortnight_core::Result<Vec<ScheduleError>> {
        let blocked = next_blocked_hours(ring, now, &self.events())?;

        let failures = self
            .tasks
            .iter_mut()
            .filter_map(|entry| apply_urgency(&mut entry.task, ring, now, &blocked).err())
            .collect();

        self.tasks.sort_by(|a, b| by_urgency(&a.task, &b.task));
        Ok(failures)
    }
}
