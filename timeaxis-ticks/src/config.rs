use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::TickError;
use crate::format::TickFormats;

/// Parse an IANA timezone name. "UTC" is accepted in any case.
pub fn parse_timezone(timezone: &str) -> Result<Tz, TickError> {
    if timezone.eq_ignore_ascii_case("utc") {
        return Ok(Tz::UTC);
    }
    Tz::from_str(timezone).map_err(|_| TickError::InvalidTimezone(timezone.to_string()))
}

/// Settings for a time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Approximate number of ticks wanted.
    pub count: usize,
    /// IANA name of the display timezone, UTC when unset.
    pub timezone: Option<String>,
    pub formats: TickFormats,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            count: 10,
            timezone: None,
            formats: TickFormats::default(),
        }
    }
}

impl TickConfig {
    /// Wide charts get ten ticks, narrow ones five.
    pub fn for_width(width: f32) -> Self {
        let count = if width > 520.0 { 10 } else { 5 };
        Self::default().with_count(count)
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn with_formats(mut self, formats: TickFormats) -> Self {
        self.formats = formats;
        self
    }
}
