//! Which half of the fortnight a recurring item applies to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ring::HOURS_PER_WEEK;

/// One of the two calendar weeks in a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Week {
    First,
    Second,
}

impl Week {
    /// Ring slot of Sunday midnight in this week.
    pub fn base_slot(self) -> i64 {
        match self {
            Week::First => 0,
            Week::Second => HOURS_PER_WEEK,
        }
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Week::First => f.write_str("first"),
            Week::Second => f.write_str("second"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    First,
    Second,
    Both,
}

impl Rotation {
    pub fn includes(self, week: Week) -> bool {
        matches!(
            (self, week),
            (Rotation::Both, _) | (Rotation::First, Week::First) | (Rotation::Second, Week::Second)
        )
    }

    pub fn weeks(self) -> impl Iterator<Item = Week> {
        [Week::First, Week::Second]
            .into_iter()
            .filter(move |w| self.includes(*w))
    }
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(Rotation::First),
            "second" => Ok(Rotation::Second),
            "both" => Ok(Rotation::Both),
            other => Err(format!(
                "rotation must be first, second or both, got '{other}'"
            )),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::First => f.write_str("first"),
            Rotation::Second => f.write_str("second"),
            Rotation::Both => f.write_str("both"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("FIRST".parse::<Rotation>(), Ok(Rotation::First));
        assert_eq!(" Second ".parse::<Rotation>(), Ok(Rotation::Second));
        assert_eq!("both".parse::<Rotation>(), Ok(Rotation::Both));
        assert!("third".parse::<Rotation>().is_err());
    }

    #[test]
    fn both_covers_each_week_once() {
        let weeks: Vec<Week> = Rotation::Both.weeks().collect();
        assert_eq!(weeks, vec![Week::First, Week::Second]);
        assert_eq!(Rotation::Second.weeks().collect::<Vec<_>>(), vec![Week::Second]);
    }
}
