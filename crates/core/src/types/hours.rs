//! Business hours for a store.

use chrono::{NaiveTime, Weekday};

/// Errors that can occur when parsing [`BusinessHours`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HoursError {
    #[error("day is required")]
    MissingDay,
    #[error("unknown day: {0}")]
    UnknownDay(String),
    #[error("{0} must be a time like 09:30")]
    InvalidTime(&'static str),
}

/// Opening hours for one day of the week.
///
/// A closing time earlier than the opening time means the store closes
/// after midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub day: Weekday,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
}

impl BusinessHours {
    /// Parse one row of the business-hours table.
    ///
    /// Times accept `HH:MM` and `HH:MM:SS`; days accept full or short
    /// English names in any case.
    ///
    /// # Errors
    ///
    /// Returns [`HoursError`] for a missing or unknown day, or an unparseable time.
    pub fn parse(day: &str, opens_at: &str, closes_at: &str) -> Result<Self, HoursError> {
        let day = day.trim();
        if day.is_empty() {
            return Err(HoursError::MissingDay);
        }
        let day = day
            .parse::<Weekday>()
            .map_err(|_| HoursError::UnknownDay(day.to_owned()))?;

        Ok(Self {
            day,
            opens_at: parse_time(opens_at).ok_or(HoursError::InvalidTime("opening time"))?,
            closes_at: parse_time(closes_at).ok_or(HoursError::InvalidTime("closing time"))?,
        })
    }

    /// Returns true when the closing time falls on the next calendar day.
    #[must_use]
    pub fn is_overnight(&self) -> bool {
        self.closes_at < self.opens_at
    }

    /// Day name as sent to the backend, e.g. `Monday`.
    #[must_use]
    pub const fn day_name(&self) -> &'static str {
        weekday_name(self.day)
    }

    /// Opening time as `HH:MM`.
    #[must_use]
    pub fn opens_at_hhmm(&self) -> String {
        self.opens_at.format("%H:%M").to_string()
    }

    /// Closing time as `HH:MM`.
    #[must_use]
    pub fn closes_at_hhmm(&self) -> String {
        self.closes_at.format("%H:%M").to_string()
    }
}

/// Full English name of a weekday.
#[must_use]
pub const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}
