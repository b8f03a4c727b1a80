//! Free hours before each deadline and the resulting urgency ranking.
//!
//! Urgency is estimated work divided by the free (non-busy) hours left:
//! - above 1.0 the task cannot be finished in the remaining free time
//! - negative once the deadline has passed
//! - a task with no estimated hours is complete, whatever its deadline

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::calendar::next_blocked_hours;
use crate::error::{Result, ScheduleError};
use crate::event::GeneralEvent;
use crate::ring::{FULL_ROTATION, HourRing, RingSlot};
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourStats {
    /// Free hours until the deadline; negative once it has passed.
    pub remaining_free_hours: i64,
    /// Busy hours between now and the deadline.
    pub busy_hours: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Urgency {
    /// No estimated hours left.
    Complete,
    /// Zero free hours left before the deadline. Ranked above everything.
    DueNow,
    Score(f64),
}

impl Urgency {
    pub fn from_hours(estimated_hours: u32, remaining_free_hours: i64) -> Self {
        match (estimated_hours, remaining_free_hours) {
            (0, _) => Urgency::Complete,
            (_, 0) => Urgency::DueNow,
            (est, left) => Urgency::Score(f64::from(est) / left as f64),
        }
    }

    /// Descending sort key.
    pub fn rank(&self) -> f64 {
        match self {
            Urgency::Complete => 0.0,
            Urgency::DueNow => f64::INFINITY,
            Urgency::Score(score) => *score,
        }
    }

    pub fn is_overdue(&self) -> bool {
        matches!(self, Urgency::Score(score) if *score < 0.0)
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Urgency::Complete => f.write_str("complete"),
            Urgency::DueNow => f.write_str("due now"),
            Urgency::Score(score) => write!(f, "{score:.2}"),
        }
    }
}

/// Free and busy hours between now and the task's deadline.
///
/// `blocked` must be sorted. It is walked repeatedly, each pass shifted one
/// rotation later, until a busy hour at or past the deadline is reached.
pub fn hours_left<Tz: TimeZone>(
    task: &Task,
    ring: &HourRing,
    now: &DateTime<Tz>,
    blocked: &[RingSlot],
) -> Result<HourStats> {
    task.validate()?;
    let resolved = task
        .parsed_deadline()?
        .resolve(ring, now)
        .map_err(|e| e.for_task(&task.name))?;

    let now_slot = ring.to_ring_slot(now);
    let deadline_slot = resolved.absolute_slot();

    let mut stats = HourStats {
        remaining_free_hours: deadline_slot - now_slot,
        busy_hours: 0,
    };

    let len = blocked.len();
    let passes = blocked
        .iter()
        .cycle()
        .enumerate()
        .map(|(i, slot)| slot + FULL_ROTATION * (i / len) as i64);
    for slot in passes {
        if slot >= deadline_slot {
            break;
        }
        if slot < now_slot {
            continue;
        }
        stats.remaining_free_hours -= 1;
        stats.busy_hours += 1;
    }

    Ok(stats)
}

/// Recompute one task's derived fields against a pre-built busy list.
pub fn apply_urgency<Tz: TimeZone>(
    task: &mut Task,
    ring: &HourRing,
    now: &DateTime<Tz>,
    blocked: &[RingSlot],
) -> Result<()> {
    task.clear_derived();
    let stats = hours_left(task, ring, now, blocked)?;
    task.urgency = Some(Urgency::from_hours(task.estimated_hours, stats.remaining_free_hours));
    task.stats = Some(stats);
    Ok(())
}

pub fn calculate_urgency<Tz: TimeZone>(
    task: &mut Task,
    ring: &HourRing,
    now: &DateTime<Tz>,
    events: &[GeneralEvent],
) -> Result<()> {
    let blocked = next_blocked_hours(ring, now, events)?;
    apply_urgency(task, ring, now, &blocked)
}

/// Recompute every task and order them most urgent first.
///
/// An invalid event fails the whole pass. A task that cannot be scored keeps
/// its place in the list, sorted after all scored tasks, with its derived
/// fields cleared; its error is returned so the caller can report it.
/// Ties keep input order.
pub fn sort_tasks<Tz: TimeZone>(
    tasks: &mut [Task],
    ring: &HourRing,
    now: &DateTime<Tz>,
    events: &[GeneralEvent],
) -> Result<Vec<ScheduleError>> {
    let blocked = next_blocked_hours(ring, now, events)?;

    let failures = tasks
        .iter_mut()
        .filter_map(|task| apply_urgency(task, ring, now, &blocked).err())
        .collect();

    tasks.sort_by(by_urgency);
    Ok(failures)
}

/// Most urgent first; unscored tasks last.
pub fn by_urgency(a: &Task, b: &Task) -> Ordering {
    rank_of(b).total_cmp(&rank_of(a))
}

fn rank_of(task: &Task) -> f64 {
    task.urgency.map_or(f64::NEG_INFINITY, |u| u.rank())
}
