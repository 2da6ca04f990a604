use std::fmt::{self, Debug};
use std::sync::Arc;

use chrono::{DateTime, TimeZone};

use crate::interval::TimeInterval;

type FloorFn<Tz> = Arc<dyn Fn(&DateTime<Tz>) -> DateTime<Tz> + Send + Sync>;
type OffsetFn<Tz> = Arc<dyn Fn(&DateTime<Tz>, i64) -> DateTime<Tz> + Send + Sync>;
type CountFn<Tz> = Arc<dyn Fn(&DateTime<Tz>, &DateTime<Tz>) -> i64 + Send + Sync>;
type FieldFn<Tz> = Arc<dyn Fn(&DateTime<Tz>) -> i64 + Send + Sync>;

/// An interval assembled from plain functions.
#[derive(Clone)]
pub struct CustomInterval<Tz: TimeZone> {
    floor: FloorFn<Tz>,
    offset: OffsetFn<Tz>,
    count: Option<CountFn<Tz>>,
    field: Option<FieldFn<Tz>>,
}

/// Assemble an interval from a flooring function and an offsetting function.
///
/// `floor` must be idempotent and `offset` must land on the same grid after
/// flooring. Attach `count` or `field` with [`CustomInterval::with_count`] and
/// [`CustomInterval::with_field`] when the result will be used with
/// [`TimeInterval::every`].
pub fn build_interval<Tz, F, O>(floor: F, offset: O) -> CustomInterval<Tz>
where
    Tz: TimeZone,
    F: Fn(&DateTime<Tz>) -> DateTime<Tz> + Send + Sync + 'static,
    O: Fn(&DateTime<Tz>, i64) -> DateTime<Tz> + Send + Sync + 'static,
{
    CustomInterval {
        floor: Arc::new(floor),
        offset: Arc::new(offset),
        count: None,
        field: None,
    }
}

impl<Tz: TimeZone> CustomInterval<Tz> {
    pub fn with_count<C>(mut self, count: C) -> Self
    where
        C: Fn(&DateTime<Tz>, &DateTime<Tz>) -> i64 + Send + Sync + 'static,
    {
        self.count = Some(Arc::new(count));
        self
    }

    pub fn with_field<F>(mut self, field: F) -> Self
    where
        F: Fn(&DateTime<Tz>) -> i64 + Send + Sync + 'static,
    {
        self.field = Some(Arc::new(field));
        self
    }
}

impl<Tz: TimeZone> Debug for CustomInterval<Tz> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomInterval")
            .field("count", &self.count.is_some())
            .field("field", &self.field.is_some())
            .finish_non_exhaustive()
    }
}

impl<Tz: TimeZone> TimeInterval<Tz> for CustomInterval<Tz> {
    fn floor(&self, date: &DateTime<Tz>) -> DateTime<Tz> {
        (self.floor)(date)
    }

    fn offset(&self, date: &DateTime<Tz>, step: i64) -> DateTime<Tz> {
        (self.offset)(date, step)
    }

    fn count(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<i64> {
        self.count.as_ref().map(|count| count(start, end))
    }

    fn field(&self, date: &DateTime<Tz>) -> Option<i64> {
        self.field.as_ref().map(|field| field(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn ten_minutes() -> CustomInterval<Utc> {
        const PERIOD_MS: i64 = 10 * 60 * 1000;
        build_interval(
            |d: &DateTime<Utc>| {
                let millis = d.timestamp_millis();
                d.clone() - Duration::milliseconds(millis.rem_euclid(PERIOD_MS))
            },
            |d: &DateTime<Utc>, step| d.clone() + Duration::milliseconds(step * PERIOD_MS),
        )
        .with_count(|start: &DateTime<Utc>, end: &DateTime<Utc>| {
            (end.timestamp_millis() - start.timestamp_millis()).div_euclid(PERIOD_MS)
        })
    }

    #[test]
    fn test_custom_floor_ceil_range() {
        let interval = ten_minutes();
        let input = Utc.with_ymd_and_hms(2023, 1, 1, 6, 34, 0).unwrap();
        assert_eq!(
            interval.floor(&input),
            Utc.with_ymd_and_hms(2023, 1, 1, 6, 30, 0).unwrap()
        );
        assert_eq!(
            interval.ceil(&input),
            Utc.with_ymd_and_hms(2023, 1, 1, 6, 40, 0).unwrap()
        );

        let stop = Utc.with_ymd_and_hms(2023, 1, 1, 7, 30, 0).unwrap();
        assert_eq!(interval.range(&input, &stop, 1).len(), 5);
    }

    #[test]
    fn test_custom_every_uses_count() {
        let half_hours = ten_minutes().every(3);
        let input = Utc.with_ymd_and_hms(2023, 1, 1, 6, 55, 0).unwrap();
        assert_eq!(
            half_hours.floor(&input),
            Utc.with_ymd_and_hms(2023, 1, 1, 6, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_custom_optional_functions() {
        let plain = build_interval(
            |d: &DateTime<Utc>| d.clone(),
            |d: &DateTime<Utc>, step| d.clone() + Duration::milliseconds(step),
        );
        let now = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(plain.count(&now, &now), None);
        assert_eq!(plain.field(&now), None);

        let with_field = plain.with_field(|d: &DateTime<Utc>| d.timestamp_millis());
        assert_eq!(with_field.field(&now), Some(now.timestamp_millis()));
    }
}
