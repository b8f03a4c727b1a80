//! Outline reader.
//!
//! Expected shape (tabs for indentation):
//!
//! ```text
//! Updated at 14:05 11/20/2022: first Sunday
//! - Upcoming Tasks
//! 	- Write report
//! 		- Deadline; 16:00 11/28/2022 EST
//! 		- Estimated Hours; 6
//! 		- *urgency 0.05 | 120 free hours | 64 busy*
//! - Regular Events
//! 	- Sleeping
//! 		- Rotation; both
//! 		- Days; Sun - Sat
//! 		- Start Time; 23
//! 		- Duration; 8
//! ```
//!
//! Depth 0 opens a section, depth 1 starts a record, deeper lines are
//! `Key; Value` fields. Generated `*...*` lines are dropped.

use fortnight_core::{GeneralEvent, Task};
use regex::Regex;

use crate::error::{OutlineError, Result};
use crate::types::{EventEntry, Heading, Outline, TaskEntry};

enum Record {
    Task(TaskEntry),
    Event(EventEntry),
}

impl Record {
    fn open(heading: Heading, name: &str) -> Self {
        match heading.task_section() {
            Some(section) => Record::Task(TaskEntry {
                task: Task {
                    name: name.to_string(),
                    deadline: String::new(),
                    estimated_hours: 0,
                    urgency: None,
                    stats: None,
                },
                listed_under: Some(section),
                extra: Vec::new(),
            }),
            None => Record::Event(EventEntry {
                event: GeneralEvent {
                    name: name.to_string(),
                    rotation: None,
                    days: String::new(),
                    start_hour: 0,
                    duration_hours: 0,
                    inactive: heading == Heading::InactiveEvents,
                },
                extra: Vec::new(),
            }),
        }
    }
}

fn depth(line: &str) -> usize {
    line.chars().take_while(|c| *c == '\t').count()
}

/// Strip indentation, the bullet and trailing whitespace.
fn content(line: &str) -> &str {
    line.trim().trim_start_matches('-').trim()
}

fn number(line: usize, field: &'static str, value: &str) -> Result<u32> {
    value.parse().map_err(|_| OutlineError::InvalidField {
        line,
        field,
        value: value.to_string(),
    })
}

pub fn parse_outline(text: &str) -> Result<Outline> {
    let generated_re = Regex::new(r"^\t{2}- \*(.+)\*\s*$")?;
    let field_re = Regex::new(r"^(?P<key>[^;]+);\s*(?P<value>.*)$")?;

    let mut outline = Outline::default();
    let mut heading: Option<Heading> = None;
    let mut record: Option<Record> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let depth = depth(line);
        if depth <= 1 {
            if let Some(done) = record.take() {
                push_record(&mut outline, done);
            }
        }

        match depth {
            0 => {
                heading = Heading::from_title(content(line));
                tracing::debug!(line = line_no, heading = ?heading, "outline section");
            }
            1 => {
                if let Some(h) = heading {
                    record = Some(Record::open(h, content(line)));
                }
            }
            _ => {
                let Some(open) = record.as_mut() else {
                    if heading.is_some() {
                        tracing::warn!(line = line_no, "field outside of any task or event; ignoring");
                    }
                    continue;
                };
                if generated_re.is_match(line) {
                    continue;
                }
                let body = content(line);
                let (key, value) = match field_re.captures(body) {
                    Some(caps) => (
                        caps["key"].trim().to_string(),
                        caps["value"].trim().to_string(),
                    ),
                    None => (String::new(), String::new()),
                };
                if !apply_field(open, line_no, &key, &value)? {
                    extra_lines(open).push(line.trim_end().to_string());
                }
            }
        }
    }

    if let Some(done) = record.take() {
        push_record(&mut outline, done);
    }

    Ok(outline)
}

fn push_record(outline: &mut Outline, record: Record) {
    match record {
        Record::Task(entry) => {
            tracing::debug!(task = %entry.task.name, deadline = %entry.task.deadline, "parsed task");
            outline.tasks.push(entry);
        }
        Record::Event(entry) => {
            tracing::debug!(event = %entry.event.name, inactive = entry.event.inactive, "parsed event");
            outline.events.push(entry);
        }
    }
}

fn extra_lines(record: &mut Record) -> &mut Vec<String> {
    match record {
        Record::Task(entry) => &mut entry.extra,
        Record::Event(entry) => &mut entry.extra,
    }
}

/// Store a known field. Returns false for fields this record doesn't use.
fn apply_field(record: &mut Record, line: usize, key: &str, value: &str) -> Result<bool> {
    match record {
        Record::Task(entry) => match key {
            "Deadline" => entry.task.deadline = value.to_string(),
            "Estimated Hours" => entry.task.estimated_hours = number(line, "estimated hours", value)?,
            _ => return Ok(false),
        },
        Record::Event(entry) => {
            let event = &mut entry.event;
            match key {
                "Rotation" => {
                    let rotation = value.parse().map_err(|_| OutlineError::InvalidField {
                        line,
                        field: "rotation",
                        value: value.to_string(),
                    })?;
                    event.rotation = Some(rotation);
                }
                "Days" => event.days = value.to_string(),
                "Start Time" => event.start_hour = number(line, "start time", value)?,
                "Duration" => event.duration_hours = number(line, "duration", value)?,
                "Inactive" => {
                    let inactive: bool = value.to_lowercase().parse().map_err(|_| OutlineError::InvalidField {
                        line,
                        field: "inactive flag",
                        value: value.to_string(),
                    })?;
                    event.inactive |= inactive;
                }
                _ => return Ok(false),
            }
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortnight_core::{Rotation, TaskSection};
    use std::io;
    use std::sync::{Arc, Mutex};

    const SAMPLE: &str = "Updated at 09:00 11/20/2022: first Sunday
- Just a list of things
- Upcoming Tasks
\t- Task1
\t\t- Deadline; 14:00 first Monday
\t\t- Estimated Hours; 10
\t\t- *urgency 0.30 | 33 free hours | 0 busy*
\t- Task2
\t\t- Deadline; 14:00 12/25/2023 EST
\t\t- Estimated Hours; 10
\t\t- Notes; bring the library copy
\t\t\t- chapter 3 especially
- Completed Tasks
\t- Old thing
\t\t- Deadline; 09:00 both Monday
\t\t- Estimated Hours; 0
- Regular Events
\t- Sleeping
\t\t- Rotation; both
\t\t- Days; Sun - Sat
\t\t- Start Time; 23
\t\t- Duration; 7
\t- Conjugate
\t\t- Rotation; first
\t\t- Days; Tue, Thur
\t\t- Start Time; 16
\t\t- Duration; 2
\t\t- Inactive; TRUE
- Inactive Events
\t- Choir
\t\t- Rotation; second
\t\t- Days; Wed
\t\t- Start Time; 19
\t\t- Duration; 2
";

    #[test]
    fn parses_tasks_and_events() {
        let outline = parse_outline(SAMPLE).unwrap();

        assert_eq!(outline.tasks.len(), 3);
        let t1 = &outline.tasks[0];
        assert_eq!(t1.task.name, "Task1");
        assert_eq!(t1.task.deadline, "14:00 first Monday");
        assert_eq!(t1.task.estimated_hours, 10);
        assert_eq!(t1.listed_under, Some(TaskSection::Upcoming));
        assert!(t1.extra.is_empty(), "generated line should be dropped");

        let t2 = &outline.tasks[1];
        assert_eq!(
            t2.extra,
            vec![
                "\t\t- Notes; bring the library copy".to_string(),
                "\t\t\t- chapter 3 especially".to_string(),
            ]
        );
        assert_eq!(outline.tasks[2].listed_under, Some(TaskSection::Completed));

        let names: Vec<&str> = outline.events.iter().map(|e| e.event.name.as_str()).collect();
        assert_eq!(names, vec!["Sleeping", "Conjugate", "Choir"]);
        let sleeping = &outline.events[0].event;
        assert_eq!(sleeping.rotation, Some(Rotation::Both));
        assert_eq!(sleeping.days, "Sun - Sat");
        assert_eq!((sleeping.start_hour, sleeping.duration_hours), (23, 7));
        assert!(!sleeping.inactive);
        assert!(outline.events[1].event.inactive);
        assert!(outline.events[2].event.inactive);
    }

    #[test]
    fn ignores_records_outside_known_sections() {
        let text = "- Background Perspective Stuff\n\t- Be kind\n\t\t- Deadline; never\n";
        let outline = parse_outline(text).unwrap();
        assert!(outline.tasks.is_empty());
        assert!(outline.events.is_empty());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn warnings_while_parsing(text: &str) -> String {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || parse_outline(text).unwrap());
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn ignored_sections_parse_quietly() {
        let text = "- Background Perspective Stuff\n\t- Be kind\n\t\t- Deadline; never\n\t\t- Often; yes\n";
        assert_eq!(warnings_while_parsing(text), "");

        let stray = "- Upcoming Tasks\n\t\t- Deadline; 18:00 both Friday\n";
        assert!(warnings_while_parsing(stray).contains("field outside of any task or event"));
    }

    #[test]
    fn bad_numbers_report_the_line() {
        let text = "- Upcoming Tasks\n\t- Essay\n\t\t- Estimated Hours; lots\n";
        let err = parse_outline(text).unwrap_err();
        assert_eq!(err.to_string(), "line 3: invalid estimated hours 'lots'");

        let text = "- Regular Events\n\t- Gym\n\t\t- Rotation; weekly\n";
        assert!(matches!(
            parse_outline(text).unwrap_err(),
            OutlineError::InvalidField { field: "rotation", .. }
        ));
    }

    #[test]
    fn missing_estimate_means_zero() {
        let text = "- Upcoming Tasks\n\t- Essay\n\t\t- Deadline; 18:00 both Friday\n";
        let outline = parse_outline(text).unwrap();
        assert_eq!(outline.tasks[0].task.estimated_hours, 0);
    }
}
