use crate::consts::{
    CENTURY_BASE_1900, CENTURY_BASE_2000, CENTURY_CYCLE, CENTURY_MARKER_1900, CENTURY_MARKER_2000,
    DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE, MAX_MONTH,
    MAX_YEAR, MIN_YEAR, ORGANISATION_DAY_OFFSET,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU16;
use std::num::NonZeroU8;

/// Reasons a (year, month, day) triple is not a real calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CalendarError {
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
}

impl std::error::Error for CalendarError {}

/// A year value guaranteed to be in the range `MIN_YEAR..=MAX_YEAR` (1900..=2099)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Creates a new Year, validating that it lies within `MIN_YEAR..=MAX_YEAR`
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidYear` if the value is out of range.
    pub fn new(value: u16) -> Result<Self, CalendarError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&value) {
            return Err(CalendarError::InvalidYear(value));
        }
        NonZeroU16::new(value)
            .map(Self)
            .ok_or(CalendarError::InvalidYear(value))
    }

    /// Returns the year value as u16
    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl TryFrom<u16> for Year {
    type Error = CalendarError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, CalendarError> {
        let non_zero = NonZeroU8::new(value).ok_or(CalendarError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(CalendarError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Month {
    type Error = CalendarError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day-of-month value guaranteed to be valid for a given year and month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub struct Day(NonZeroU8);

impl Day {
    /// Creates a new Day, validating that it's non-zero and exists in the given year and month.
    /// The month must already be validated.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidDay` if the value is 0 or past the end of the month.
    pub fn new(value: u8, year: Year, month: Month) -> Result<Self, CalendarError> {
        let invalid = CalendarError::InvalidDay {
            year: year.get(),
            month: month.get(),
            day: value,
        };
        let non_zero = NonZeroU8::new(value).ok_or(invalid)?;
        if value > days_in_month(year.get(), month.get()) {
            return Err(invalid);
        }
        Ok(Self(non_zero))
    }

    /// Returns the day value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.0.get()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The date a kennitala encodes: date of birth for individuals,
/// date of registration for organisations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct EmbeddedDate {
    year: Year,
    month: Month,
    day: Day,
}

impl EmbeddedDate {
    /// Builds a date, rejecting any triple that does not exist on the
    /// Gregorian calendar.
    ///
    /// # Errors
    /// Returns the first `CalendarError` among year, month and day.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, CalendarError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        let day = Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    pub const fn year(&self) -> Year {
        self.year
    }

    pub const fn month(&self) -> Month {
        self.month
    }

    pub const fn day(&self) -> Day {
        self.day
    }

    /// Returns `(year, month, day)`
    pub const fn to_tuple(&self) -> (u16, u8, u8) {
        (self.year.get(), self.month.get(), self.day.get())
    }
}

/// Century indicated by the last digit of a kennitala.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Century {
    /// Marker `9`, years 1900-1999
    #[display(fmt = "1900s")]
    Nineteenth,
    /// Marker `0`, years 2000-2099
    #[display(fmt = "2000s")]
    TwentyFirst,
}

impl Century {
    /// Decodes a century marker digit. Only `9` and `0` are defined.
    pub const fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            CENTURY_MARKER_1900 => Some(Self::Nineteenth),
            CENTURY_MARKER_2000 => Some(Self::TwentyFirst),
            _ => None,
        }
    }

    pub const fn marker(self) -> u8 {
        match self {
            Self::Nineteenth => CENTURY_MARKER_1900,
            Self::TwentyFirst => CENTURY_MARKER_2000,
        }
    }

    pub const fn base_year(self) -> u16 {
        match self {
            Self::Nineteenth => CENTURY_BASE_1900,
            Self::TwentyFirst => CENTURY_BASE_2000,
        }
    }

    /// Expands a two-digit year-within-century to a full year
    pub const fn full_year(self, year_in_century: u8) -> u16 {
        self.base_year() + year_in_century as u16
    }
}

/// Whether a kennitala belongs to a person or an organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[display(fmt = "individual")]
    Individual,
    #[display(fmt = "organisation")]
    Organisation,
}

impl EntityKind {
    /// Splits the two-digit day field into the entity kind and the real
    /// day-of-month. Organisations carry the day shifted by `ORGANISATION_DAY_OFFSET`.
    pub const fn from_day_field(day_field: u8) -> (Self, u8) {
        if day_field >= ORGANISATION_DAY_OFFSET {
            (Self::Organisation, day_field - ORGANISATION_DAY_OFFSET)
        } else {
            (Self::Individual, day_field)
        }
    }
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
