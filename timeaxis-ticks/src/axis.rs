use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

use crate::config::{parse_timezone, TickConfig};
use crate::error::TickError;
use crate::planner::ticks_in_timezone;

/// A configured time axis: ticks and labels in one display timezone.
#[derive(Debug, Clone)]
pub struct TimeAxis {
    config: TickConfig,
    timezone: Tz,
}

impl TimeAxis {
    /// Resolve the configured timezone and check the label patterns.
    pub fn new(config: TickConfig) -> Result<Self, TickError> {
        let timezone = match &config.timezone {
            Some(name) => parse_timezone(name)?,
            None => Tz::UTC,
        };
        config.formats.validate()?;
        Ok(Self { config, timezone })
    }

    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn ticks<Src: TimeZone>(
        &self,
        start: &DateTime<Src>,
        stop: &DateTime<Src>,
    ) -> Vec<DateTime<Tz>> {
        ticks_in_timezone(start, stop, self.config.count, &self.timezone)
    }

    pub fn label<Src: TimeZone>(&self, date: &DateTime<Src>) -> Result<String, TickError> {
        self.config.formats.format(&date.with_timezone(&self.timezone))
    }

    pub fn labeled_ticks<Src: TimeZone>(
        &self,
        start: &DateTime<Src>,
        stop: &DateTime<Src>,
    ) -> Result<Vec<(DateTime<Tz>, String)>, TickError> {
        self.ticks(start, stop)
            .into_iter()
            .map(|tick| {
                let label = self.config.formats.format(&tick)?;
                Ok((tick, label))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::TickFormats;
    use chrono::{Duration, Utc};

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults_to_utc() {
        let axis = TimeAxis::new(TickConfig::default()).unwrap();
        assert_eq!(axis.timezone(), Tz::UTC);
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = TickConfig::default().with_timezone("Atlantis/Capital");
        assert_eq!(
            TimeAxis::new(config).unwrap_err(),
            TickError::InvalidTimezone("Atlantis/Capital".to_string())
        );
    }

    #[test]
    fn test_labeled_ticks_daily() {
        let axis = TimeAxis::new(TickConfig::for_width(300.0)).unwrap();
        assert_eq!(axis.config().count, 5);
        let labeled = axis
            .labeled_ticks(&utc(2023, 1, 1, 0), &utc(2023, 1, 5, 0))
            .unwrap();
        let labels: Vec<&str> = labeled.iter().map(|(_, label)| label.as_str()).collect();
        assert_eq!(labels, vec!["Jan 2023", "Mon 02", "Tue 03", "Wed 04"]);
    }

    #[test]
    fn test_custom_formats() {
        let formats = TickFormats {
            day: "%d/%m".to_string(),
            ..Default::default()
        };
        let axis = TimeAxis::new(TickConfig::for_width(300.0).with_formats(formats)).unwrap();
        assert_eq!(axis.config().formats.day, "%d/%m");
        let labeled = axis
            .labeled_ticks(&utc(2023, 1, 1, 0), &utc(2023, 1, 5, 0))
            .unwrap();
        assert_eq!(labeled[1].1, "02/01");
    }

    #[test]
    fn test_rejects_bad_formats() {
        let formats = TickFormats {
            month: "%Q".to_string(),
            ..Default::default()
        };
        assert_eq!(
            TimeAxis::new(TickConfig::default().with_formats(formats)).unwrap_err(),
            TickError::InvalidFormat("%Q".to_string())
        );
    }

    #[test]
    fn test_labeled_ticks_in_zone() {
        let config = TickConfig::default()
            .with_count(12)
            .with_timezone("Asia/Kolkata");
        let axis = TimeAxis::new(config).unwrap();
        let labeled = axis
            .labeled_ticks(&utc(2023, 1, 1, 0), &utc(2023, 1, 1, 12))
            .unwrap();
        // Kolkata is UTC+05:30, so hourly ticks start on the next local hour
        assert_eq!(labeled[0].1, "06:00");
        assert_eq!(
            labeled[0].0.with_timezone(&Utc),
            utc(2023, 1, 1, 0) + Duration::minutes(30)
        );
        assert_eq!(axis.label(&utc(2023, 1, 1, 0)).unwrap(), "05:30");
    }
}
