//! Outline writer and change detection.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use fortnight_core::{GeneralEvent, HourRing, TaskSection, split_active};

use crate::types::{EventEntry, Heading, Outline, TaskEntry};

const UPDATE_FMT: &str = "%H:%M %m/%d/%Y";
const SECTION_ORDER: [TaskSection; 3] = [TaskSection::Overdue, TaskSection::Upcoming, TaskSection::Completed];

/// Render a ranked outline back to the file format.
///
/// Task sections are written overdue, upcoming, completed; empty sections
/// are left out. Within a section tasks keep the outline's order, so call
/// [`Outline::rank`] first.
pub fn render_outline<Tz>(outline: &Outline, ring: &HourRing, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = format!("Updated at {}: {}\n", now.format(UPDATE_FMT), ring.position(now));

    for section in SECTION_ORDER {
        let entries: Vec<&TaskEntry> = outline.tasks.iter().filter(|e| e.task.section() == section).collect();
        if entries.is_empty() {
            continue;
        }
        out.push_str(&format!("- {}\n", Heading::for_section(section).title()));
        for entry in entries {
            push_task(&mut out, entry);
        }
    }

    let (active, inactive) = split_active(&outline.events);
    for (heading, events) in [(Heading::RegularEvents, active), (Heading::InactiveEvents, inactive)] {
        if events.is_empty() {
            continue;
        }
        out.push_str(&format!("- {}\n", heading.title()));
        for entry in events {
            push_event(&mut out, entry);
        }
    }

    out
}

fn push_task(out: &mut String, entry: &TaskEntry) {
    let task = &entry.task;
    out.push_str(&format!("\t- {}\n", task.name));
    out.push_str(&format!("\t\t- Deadline; {}\n", task.deadline));
    out.push_str(&format!("\t\t- Estimated Hours; {}\n", task.estimated_hours));
    for line in &entry.extra {
        out.push_str(&format!("{line}\n"));
    }
    match (task.urgency, task.stats) {
        (Some(urgency), Some(stats)) => {
            out.push_str(&format!(
                "\t\t- *urgency {urgency} | {} free hours | {} busy*\n",
                stats.remaining_free_hours, stats.busy_hours
            ));
        }
        _ => {
            out.push_str("\t\t- *not scheduled*\n");
        }
    }
}

fn push_event(out: &mut String, entry: &EventEntry) {
    let GeneralEvent {
        name,
        rotation,
        days,
        start_hour,
        duration_hours,
        ..
    } = &entry.event;
    out.push_str(&format!("\t- {name}\n"));
    if let Some(rotation) = rotation {
        out.push_str(&format!("\t\t- Rotation; {rotation}\n"));
    }
    out.push_str(&format!("\t\t- Days; {days}\n"));
    out.push_str(&format!("\t\t- Start Time; {start_hour}\n"));
    out.push_str(&format!("\t\t- Duration; {duration_hours}\n"));
    for line in &entry.extra {
        out.push_str(&format!("{line}\n"));
    }
}

/// Task names and sections in the order [`render_outline`] writes them.
pub fn ranking(outline: &Outline) -> Vec<(String, TaskSection)> {
    SECTION_ORDER
        .into_iter()
        .flat_map(|section| {
            outline
                .tasks
                .iter()
                .filter(move |e| e.task.section() == section)
                .map(move |e| (e.task.name.clone(), section))
        })
        .collect()
}

/// Task names and sections in the order they were read from a file.
fn listing(outline: &Outline) -> Vec<(String, TaskSection)> {
    outline
        .tasks
        .iter()
        .map(|e| (e.task.name.clone(), e.listed_under.unwrap_or_else(|| e.task.section())))
        .collect()
}

/// Whether writing `current` would move any task relative to how
/// `previous` was laid out on disk.
pub fn ordering_changed(previous: &Outline, current: &Outline) -> bool {
    listing(previous) != ranking(current)
}
