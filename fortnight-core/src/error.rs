//! Error types for the scheduling engine.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("unrecognized day or day range '{phrase}'")]
    Parse { phrase: String },

    #[error("{subject}: {reason}")]
    Validation { subject: String, reason: String },

    #[error("malformed deadline '{deadline}': {reason}")]
    MalformedDeadline { deadline: String, reason: String },

    #[error("deadline '{deadline}' never occurs in the rotation")]
    NoOccurrenceFound { deadline: String },

    #[error("anchor {0} is not a Sunday")]
    InvalidAnchor(NaiveDate),

    #[error("task '{task}': {source}")]
    Task {
        task: String,
        #[source]
        source: Box<ScheduleError>,
    },

    #[error("event '{event}': {source}")]
    Event {
        event: String,
        #[source]
        source: Box<ScheduleError>,
    },
}

impl ScheduleError {
    pub(crate) fn validation(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(deadline: &str, reason: impl Into<String>) -> Self {
        Self::MalformedDeadline {
            deadline: deadline.to_string(),
            reason: reason.into(),
        }
    }

    /// Attach the task name, unless the error already carries one.
    pub fn for_task(self, task: &str) -> Self {
        match self {
            Self::Task { .. } => self,
            other => Self::Task {
                task: task.to_string(),
                source: Box::new(other),
            },
        }
    }

    pub fn for_event(self, event: &str) -> Self {
        match self {
            Self::Event { .. } => self,
            other => Self::Event {
                event: event.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Name of the task or event the error belongs to, if known.
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::Task { task, .. } => Some(task),
            Self::Event { event, .. } => Some(event),
            Self::Validation { subject, .. } => Some(subject),
            _ => None,
        }
    }
}

pub type Result<T, E = ScheduleError> = std::result::Result<T, E>;
