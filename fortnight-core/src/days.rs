//! Day list parsing: "Sun-Sat", "Tue, Thur", "Sat-Monday".

use chrono::Weekday;

use crate::error::{Result, ScheduleError};

/// Weekdays indexed from Sunday = 0.
pub const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let day = match name.trim().to_lowercase().as_str() {
        "sun" | "sunday" => Weekday::Sun,
        "mon" | "monday" => Weekday::Mon,
        "tue" | "tues" | "tuesday" => Weekday::Tue,
        "wed" | "wednesday" => Weekday::Wed,
        "thu" | "thur" | "thursday" => Weekday::Thu,
        "fri" | "friday" => Weekday::Fri,
        "sat" | "saturday" => Weekday::Sat,
        _ => return None,
    };
    Some(day)
}

/// Parse a comma-separated list of weekdays and weekday ranges.
///
/// Ranges walk forward from the first day to the second, wrapping past
/// Saturday when needed. The result keeps walk order and is not
/// de-duplicated. Any unknown phrase fails the whole list.
pub fn parse_day_spec(spec: &str) -> Result<Vec<Weekday>> {
    let mut days = Vec::new();

    for phrase in spec.split(',') {
        let unknown = || ScheduleError::Parse {
            phrase: phrase.trim().to_string(),
        };

        match phrase.split_once('-') {
            Some((from, to)) => {
                let from = weekday_from_name(from).ok_or_else(unknown)?;
                let to = weekday_from_name(to).ok_or_else(unknown)?;

                let start = from.num_days_from_sunday() as usize;
                let mut end = to.num_days_from_sunday() as usize;
                if end < start {
                    end += 7;
                }
                days.extend((start..=end).map(|i| SUNDAY_FIRST[i % 7]));
            }
            None => days.push(weekday_from_name(phrase).ok_or_else(unknown)?),
        }
    }

    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Weekday::*;

    #[test]
    fn single_days_and_abbreviations() {
        assert_eq!(parse_day_spec("Monday").unwrap(), vec![Mon]);
        assert_eq!(parse_day_spec("mon").unwrap(), vec![Mon]);
        assert_eq!(parse_day_spec("Tue, Thu").unwrap(), vec![Tue, Thu]);
        assert_eq!(parse_day_spec("TUES,thur").unwrap(), vec![Tue, Thu]);
    }

    #[test]
    fn ranges_walk_forward() {
        assert_eq!(parse_day_spec("Monday - Friday").unwrap(), vec![Mon, Tue, Wed, Thu, Fri]);
        assert_eq!(
            parse_day_spec("Sun-Sat").unwrap(),
            vec![Sun, Mon, Tue, Wed, Thu, Fri, Sat]
        );
    }

    #[test]
    fn ranges_wrap_past_saturday() {
        assert_eq!(parse_day_spec("Sat-Monday").unwrap(), vec![Sat, Sun, Mon]);
        assert_eq!(parse_day_spec("fri - tue").unwrap(), vec![Fri, Sat, Sun, Mon, Tue]);
    }

    #[test]
    fn same_day_range_is_one_day() {
        assert_eq!(parse_day_spec("Wed-Wed").unwrap(), vec![Wed]);
    }

    #[test]
    fn duplicates_are_kept() {
        assert_eq!(parse_day_spec("Mon-Wed, Tue").unwrap(), vec![Mon, Tue, Wed, Tue]);
    }

    #[test]
    fn unknown_phrase_fails_whole_list() {
        let err = parse_day_spec("Mon, Funday").unwrap_err();
        assert_eq!(err, ScheduleError::Parse { phrase: "Funday".to_string() });

        let err = parse_day_spec("Mon-Someday").unwrap_err();
        assert_eq!(err, ScheduleError::Parse { phrase: "Mon-Someday".to_string() });

        assert!(parse_day_spec("").is_err());
        assert!(parse_day_spec("Mon,").is_err());
    }
}
