//! fortnight-core: two-week rotating calendar and urgency scheduling.
//!
//! Recurring events block hours on a 336-slot ring; each task's urgency is
//! its estimated hours divided by the free hours left before its deadline.

pub mod blocked;
pub mod calendar;
pub mod days;
pub mod deadline;
pub mod error;
pub mod event;
pub mod ring;
pub mod rotation;
pub mod task;
pub mod urgency;

pub use blocked::generate_blocked_hours;
pub use calendar::{next_blocked_hours, split_active};
pub use days::parse_day_spec;
pub use deadline::{Deadline, ResolvedDeadline};
pub use error::{Result, ScheduleError};
pub use event::GeneralEvent;
pub use ring::{FULL_ROTATION, HOURS_PER_DAY, HOURS_PER_WEEK, HourRing, RingSlot, RotationDay};
pub use rotation::{Rotation, Week};
pub use task::{Task, TaskSection};
pub use urgency::{HourStats, Urgency, apply_urgency, by_urgency, calculate_urgency, hours_left, sort_tasks};
