//! One scheduling pass over the to-do file: read, rank, maybe write back.

use anyhow::{Context, Result};
use chrono::DateTime;
use chrono_tz::Tz;
use fortnight_core::{HourRing, ScheduleError};
use fortnight_outline::{Outline, ordering_changed, parse_outline, render_outline};
use std::path::Path;
use tracing::{info, warn};

use crate::state::{read_tasks_file, write_tasks_file};

#[derive(Debug)]
pub struct Pass {
    /// Tasks most urgent first, with derived fields filled in.
    pub outline: Outline,
    /// Tasks that could not be scored, each naming its task.
    pub failures: Vec<ScheduleError>,
    /// New file contents, when the file should be rewritten.
    pub rewrite: Option<String>,
}

/// Rank `text` as of `now`. The rewrite is only produced when the order
/// of tasks or their sections moved, or when `force` is set.
pub fn rank_text(text: &str, ring: &HourRing, now: &DateTime<Tz>, force: bool) -> Result<Pass> {
    let previous = parse_outline(text).context("read outline")?;
    let mut outline = previous.clone();
    let failures = outline.rank(ring, now).context("build calendar")?;

    for failure in &failures {
        warn!(task = failure.subject().unwrap_or("?"), error = %failure, "task not scheduled");
    }

    let rewrite = (force || ordering_changed(&previous, &outline)).then(|| render_outline(&outline, ring, now));

    Ok(Pass {
        outline,
        failures,
        rewrite,
    })
}

/// Run a pass against the file on disk, writing it back when needed.
pub fn refresh_file(path: &Path, ring: &HourRing, now: &DateTime<Tz>, force: bool) -> Result<Pass> {
    let text = read_tasks_file(path)?;
    let pass = rank_text(&text, ring, now, force).with_context(|| format!("refresh {}", path.display()))?;

    match &pass.rewrite {
        Some(contents) => {
            write_tasks_file(path, contents)?;
            info!(path = %path.display(), tasks = pass.outline.tasks.len(), "updated to-do file");
        }
        None => info!(path = %path.display(), "ordering unchanged; file left alone"),
    }

    Ok(pass)
}

/// Plain-text table for `fortnight rank`.
pub fn format_table(pass: &Pass) -> String {
    let mut out = format!("{:>3}  {:>9}  {:>6}  {:>5}  {:<9}  {}\n", "#", "urgency", "free", "busy", "section", "task");
    for (i, entry) in pass.outline.tasks.iter().enumerate() {
        let task = &entry.task;
        let urgency = task.urgency.map_or_else(|| "-".to_string(), |u| u.to_string());
        let (free, busy) = task.stats.map_or_else(
            || ("-".to_string(), "-".to_string()),
            |s| (s.remaining_free_hours.to_string(), s.busy_hours.to_string()),
        );
        out.push_str(&format!(
            "{:>3}  {:>9}  {:>6}  {:>5}  {:<9}  {}\n",
            i + 1,
            urgency,
            free,
            busy,
            format!("{:?}", task.section()).to_lowercase(),
            task.name
        ));
    }
    for failure in &pass.failures {
        out.push_str(&format!("  ! {failure}\n"));
    }
    out
}
