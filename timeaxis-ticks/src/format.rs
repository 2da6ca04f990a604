use std::fmt::{Display, Write};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use timeaxis_intervals::units::{day, hour, minute, month, second, week_sunday, year};
use timeaxis_intervals::TimeInterval;

use crate::error::TickError;

/// Coarsest calendar boundary a tick lands on, which decides how much of the
/// date its label needs to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelGranularity {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

pub fn label_granularity<Tz: TimeZone>(date: &DateTime<Tz>) -> LabelGranularity {
    if second().floor(date) < *date {
        LabelGranularity::Millisecond
    } else if minute().floor(date) < *date {
        LabelGranularity::Second
    } else if hour().floor(date) < *date {
        LabelGranularity::Minute
    } else if day().floor(date) < *date {
        LabelGranularity::Hour
    } else if month().floor(date) < *date {
        if week_sunday().floor(date) < *date {
            LabelGranularity::Day
        } else {
            LabelGranularity::Week
        }
    } else if year().floor(date) < *date {
        LabelGranularity::Month
    } else {
        LabelGranularity::Year
    }
}

/// strftime patterns for tick labels, one per [`LabelGranularity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickFormats {
    pub millisecond: String,
    pub second: String,
    pub minute: String,
    pub hour: String,
    pub day: String,
    pub week: String,
    pub month: String,
    pub year: String,
}

impl Default for TickFormats {
    fn default() -> Self {
        Self {
            millisecond: "%H:%M:%S%.3f".to_string(),
            second: "%H:%M:%S".to_string(),
            minute: "%H:%M".to_string(),
            hour: "%H:%M".to_string(),
            day: "%a %d".to_string(),
            week: "%b %d".to_string(),
            month: "%b".to_string(),
            year: "%b %Y".to_string(),
        }
    }
}

impl TickFormats {
    pub fn pattern(&self, granularity: LabelGranularity) -> &str {
        match granularity {
            LabelGranularity::Millisecond => &self.millisecond,
            LabelGranularity::Second => &self.second,
            LabelGranularity::Minute => &self.minute,
            LabelGranularity::Hour => &self.hour,
            LabelGranularity::Day => &self.day,
            LabelGranularity::Week => &self.week,
            LabelGranularity::Month => &self.month,
            LabelGranularity::Year => &self.year,
        }
    }

    /// Reject patterns chrono cannot parse.
    pub fn validate(&self) -> Result<(), TickError> {
        let patterns = [
            &self.millisecond,
            &self.second,
            &self.minute,
            &self.hour,
            &self.day,
            &self.week,
            &self.month,
            &self.year,
        ];
        match patterns
            .into_iter()
            .find(|pattern| StrftimeItems::new(pattern).any(|item| item == Item::Error))
        {
            Some(pattern) => Err(TickError::InvalidFormat(pattern.to_string())),
            None => Ok(()),
        }
    }

    /// Label for a tick, in the tick's own timezone.
    pub fn format<Tz>(&self, date: &DateTime<Tz>) -> Result<String, TickError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let pattern = self.pattern(label_granularity(date));
        let mut label = String::new();
        write!(label, "{}", date.format(pattern))
            .map_err(|_| TickError::InvalidFormat(pattern.to_string()))?;
        Ok(label)
    }
}

/// Label for a tick using the default patterns.
pub fn tick_format<Tz>(date: &DateTime<Tz>) -> Result<String, TickError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    TickFormats::default().format(date)
}
