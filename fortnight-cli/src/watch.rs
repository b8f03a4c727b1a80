//! Keep the to-do file ranked: on startup, at every top of the hour, and
//! shortly after the user stops editing it.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use fortnight_core::HourRing;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::refresh::refresh_file;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Startup,
    TopOfHour,
    FileChanged,
}

/// Time left until the next top of the hour.
pub fn until_next_hour<Z: TimeZone>(now: &DateTime<Z>) -> Duration {
    let into_hour = u64::from(now.minute()) * 60 + u64::from(now.second());
    Duration::from_secs(3600 - into_hour)
}

pub async fn run(path: PathBuf, ring: HourRing, tz: Tz, write_delay: Duration) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<Trigger>(16);

    // Editors often replace the file instead of writing in place, so watch
    // the directory and filter on the file name.
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let (raw_tx, raw_rx) = mpsc::channel::<()>(64);
    let target = path.clone();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) if touches(&event, &target) => {
                let _ = raw_tx.blocking_send(());
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "file watcher error"),
        },
        notify::Config::default(),
    )
    .context("start file watcher")?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("watch {}", dir.display()))?;

    info!(path = %path.display(), delay_secs = write_delay.as_secs(), "watching to-do file");

    tokio::spawn(debounce(raw_rx, tx.clone(), write_delay));
    tokio::spawn(hourly(tx.clone(), tz));
    tx.send(Trigger::Startup).await.context("queue startup pass")?;

    loop {
        tokio::select! {
            trigger = rx.recv() => {
                let Some(trigger) = trigger else { break };
                let now = Utc::now().with_timezone(&tz);
                debug!(?trigger, "refresh pass");
                if let Err(e) = refresh_file(&path, &ring, &now, false) {
                    error!("refresh failed: {e:#}");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("stopping watcher");
                break;
            }
        }
    }

    drop(watcher);
    Ok(())
}

fn touches(event: &Event, target: &Path) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event.paths.iter().any(|p| p.file_name() == target.file_name())
}

/// Forward one trigger once `delay` has passed with no new write events.
async fn debounce(mut raw: mpsc::Receiver<()>, out: mpsc::Sender<Trigger>, delay: Duration) {
    while raw.recv().await.is_some() {
        loop {
            match tokio::time::timeout(delay, raw.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => return,
                Err(_) => break,
            }
        }
        if out.send(Trigger::FileChanged).await.is_err() {
            return;
        }
    }
}

async fn hourly(out: mpsc::Sender<Trigger>, tz: Tz) {
    loop {
        let now = Utc::now().with_timezone(&tz);
        tokio::time::sleep(until_next_hour(&now)).await;
        if out.send(Trigger::TopOfHour).await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;

    #[test]
    fn sleeps_until_the_next_hour() {
        let at = |h, m, s| New_York.with_ymd_and_hms(2022, 11, 26, h, m, s).unwrap();
        assert_eq!(until_next_hour(&at(22, 0, 0)), Duration::from_secs(3600));
        assert_eq!(until_next_hour(&at(22, 59, 59)), Duration::from_secs(1));
        assert_eq!(until_next_hour(&at(9, 30, 0)), Duration::from_secs(1800));
    }

    #[tokio::test(start_paused = true)]
    async fn bursts_of_writes_collapse_into_one_pass() {
        let (raw_tx, raw_rx) = mpsc::channel(8);
        let (tx, mut rx) = mpsc::channel(8);
        tokio::spawn(debounce(raw_rx, tx, Duration::from_secs(20)));

        for _ in 0..3 {
            raw_tx.send(()).await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(rx.recv().await, Some(Trigger::FileChanged));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn only_our_file_counts() {
        let target = Path::new("/notes/To Do List.md");
        let ours = Event::new(notify::EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(PathBuf::from("/notes/To Do List.md"));
        let other = Event::new(notify::EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(PathBuf::from("/notes/journal.md"));
        let read = Event::new(notify::EventKind::Access(notify::event::AccessKind::Any))
            .add_path(PathBuf::from("/notes/To Do List.md"));
        assert!(touches(&ours, target));
        assert!(!touches(&other, target));
        assert!(!touches(&read, target));
    }
}
