//! Calendar keys and the per-day block store.
//!
//! A [`DaySchedule`] can only be built through [`DaySchedule::from_blocks`],
//! which sorts by start time, so every value of the type is chronologically
//! ordered. Date keys are plain calendar days with no timezone attached.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::block::TimeBlock;
use crate::error::ValidationError;

/// A calendar day, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn month_key(self) -> MonthKey {
        MonthKey {
            first: self.0.with_day(1).unwrap_or(self.0),
        }
    }

    /// 0 = Sunday .. 6 = Saturday.
    pub fn weekday_from_sunday(self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// 1-based ordinal of this weekday within its month ("2nd Friday" = 2).
    pub fn weekday_occurrence(self) -> u32 {
        (self.day() - 1) / 7 + 1
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| ValidationError::MalformedKey {
                kind: "date",
                value: s.to_string(),
            })
    }
}

/// A calendar month, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    first: NaiveDate,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    pub fn month(self) -> u32 {
        self.first.month()
    }

    pub fn first_day(self) -> DateKey {
        DateKey(self.first)
    }

    /// The given day of this month, if the month has it.
    pub fn day(self, day: u32) -> Option<DateKey> {
        self.first.with_day(day).map(DateKey)
    }

    pub fn contains(self, date: DateKey) -> bool {
        date.month_key() == self
    }

    pub fn days(self) -> impl Iterator<Item = DateKey> {
        (1..=31).map_while(move |d| self.day(d))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedKey {
            kind: "month",
            value: s.to_string(),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(malformed)?;
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        MonthKey::new(year, month).ok_or_else(malformed)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// One day's blocks, always sorted by start time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TimeBlock>", into = "Vec<TimeBlock>")]
pub struct DaySchedule {
    blocks: Vec<TimeBlock>,
}

impl DaySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schedule, stable-sorting by start time.
    pub fn from_blocks(mut blocks: Vec<TimeBlock>) -> Self {
        blocks.sort_by_key(|b| b.start);
        Self { blocks }
    }

    pub fn blocks(&self) -> &[TimeBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<TimeBlock> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeBlock> {
        self.blocks.iter()
    }

    /// Block at `index`, or an out-of-bounds error naming this schedule.
    pub fn block(&self, index: usize) -> Result<&TimeBlock, ValidationError> {
        self.blocks
            .get(index)
            .ok_or_else(|| ValidationError::out_of_bounds("schedule", index, self.blocks.len()))
    }

    /// True when no two blocks share a minute.
    pub fn is_non_overlapping(&self) -> bool {
        self.blocks.windows(2).all(|w| w[0].end <= w[1].start)
    }
}

impl From<Vec<TimeBlock>> for DaySchedule {
    fn from(blocks: Vec<TimeBlock>) -> Self {
        Self::from_blocks(blocks)
    }
}

impl From<DaySchedule> for Vec<TimeBlock> {
    fn from(schedule: DaySchedule) -> Self {
        schedule.blocks
    }
}

impl<'a> IntoIterator for &'a DaySchedule {
    type Item = &'a TimeBlock;
    type IntoIter = std::slice::Iter<'a, TimeBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockTime;

    fn block(title: &str, start: u32, end: u32) -> TimeBlock {
        TimeBlock::new(
            ClockTime::from_minutes(start),
            ClockTime::from_minutes(end),
            title,
            "Work",
            "bg-red-500",
        )
    }

    #[test]
    fn from_blocks_sorts_stably() {
        let day = DaySchedule::from_blocks(vec![
            block("late", 600, 660),
            block("tie-a", 540, 560),
            block("tie-b", 540, 600),
        ]);
        let titles: Vec<_> = day.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["tie-a", "tie-b", "late"]);
    }

    #[test]
    fn deserializing_restores_order() {
        let json = serde_json::to_string(&vec![block("b", 600, 660), block("a", 60, 120)]).unwrap();
        let day: DaySchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(day.blocks()[0].title, "a");
    }

    #[test]
    fn block_out_of_range_is_an_error() {
        let day = DaySchedule::from_blocks(vec![block("a", 0, 15)]);
        assert!(day.block(0).is_ok());
        assert!(matches!(
            day.block(3),
            Err(ValidationError::OutOfBounds { index: 3, len: 1, .. })
        ));
    }

    #[test]
    fn date_key_round_trips_text() {
        let key: DateKey = "2024-03-09".parse().unwrap();
        assert_eq!(key.to_string(), "2024-03-09");
        assert_eq!(key.month_key().to_string(), "2024-03");
        assert!("2024-02-30".parse::<DateKey>().is_err());
    }

    #[test]
    fn weekday_occurrence_counts_from_one() {
        // 2024-04-30 is the 5th Tuesday of April 2024.
        let key: DateKey = "2024-04-30".parse().unwrap();
        assert_eq!(key.weekday_from_sunday(), 2);
        assert_eq!(key.weekday_occurrence(), 5);
        assert_eq!("2024-04-07".parse::<DateKey>().unwrap().weekday_occurrence(), 1);
        assert_eq!("2024-04-08".parse::<DateKey>().unwrap().weekday_occurrence(), 2);
    }

    #[test]
    fn month_key_parses_and_iterates() {
        let month: MonthKey = "2024-02".parse().unwrap();
        assert_eq!(month.days().count(), 29);
        assert!(month.contains("2024-02-29".parse().unwrap()));
        assert!(!month.contains("2024-03-01".parse().unwrap()));
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("202402".parse::<MonthKey>().is_err());
    }

    #[test]
    fn keys_serialize_as_map_keys() {
        let mut map = std::collections::BTreeMap::new();
        map.insert("2024-01-05".parse::<DateKey>().unwrap(), "2024-01-02".parse::<DateKey>().unwrap());
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"2024-01-05":"2024-01-02"}"#);

        let mut months = std::collections::BTreeMap::new();
        months.insert("2024-02".parse::<MonthKey>().unwrap(), "2024-01".parse::<MonthKey>().unwrap());
        let json = serde_json::to_string(&months).unwrap();
        let back: std::collections::BTreeMap<MonthKey, MonthKey> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, months);
    }
}
