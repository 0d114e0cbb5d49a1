use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Calendar month bucket key, rendered as `YYYY-MM`.
///
/// Ordering is chronological, so a `BTreeMap<MonthKey, _>` iterates oldest
/// month first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return None;
        }
        Some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(format!("month must use YYYY-MM format; got \"{trimmed}\""));
        }
        let year = trimmed[..4]
            .parse::<i32>()
            .map_err(|_| format!("month must use YYYY-MM format; got \"{trimmed}\""))?;
        let month = trimmed[5..]
            .parse::<u32>()
            .map_err(|_| format!("month must use YYYY-MM format; got \"{trimmed}\""))?;
        Self::new(year, month).ok_or_else(|| format!("month `{trimmed}` is not a calendar month"))
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<MonthKey>().map_err(serde::de::Error::custom)
    }
}
