use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use rstest::rstest;
use timeaxis_ticks::{ticks, ticks_in_timezone, LabelGranularity, TickConfig, TimeAxis};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
}

#[rstest]
#[case(Duration::hours(1))]
#[case(Duration::days(1))]
#[case(Duration::days(30))]
#[case(Duration::days(365))]
fn tick_count_tracks_requested_count(#[case] span: Duration) {
    let start = start();
    let stop = start + span;
    for count in 5..=20 {
        let generated = ticks(&start, &stop, count);
        assert!(
            !generated.is_empty() && generated.len() >= count / 3 && generated.len() <= count * 3,
            "{} ticks for count {count} over {span}",
            generated.len()
        );
        assert!(generated.windows(2).all(|w| w[0] < w[1]));
        assert!(generated.iter().all(|t| *t >= start && *t < stop));
    }
}

#[rstest]
#[case(Duration::minutes(7))]
#[case(Duration::hours(30))]
#[case(Duration::days(90))]
#[case(Duration::days(3650))]
fn reversed_span_gives_reversed_ticks(#[case] span: Duration) {
    let start = start() + Duration::seconds(17);
    let stop = start + span;
    let forward = ticks(&start, &stop, 10);
    let mut backward = ticks(&stop, &start, 10);
    backward.reverse();
    assert_eq!(forward, backward);
}

#[test]
fn daily_ticks_land_on_local_midnight() {
    let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
    let generated = ticks_in_timezone(&start(), &(start() + Duration::days(4)), 5, &tokyo);
    assert_eq!(generated.len(), 4);
    for tick in &generated {
        assert_eq!((tick.hour(), tick.minute()), (0, 0));
        // Tokyo midnight is 15:00 UTC the day before
        assert_eq!(tick.with_timezone(&Utc).hour(), 15);
    }
}

#[test]
fn daily_ticks_across_spring_forward() {
    let new_york = Tz::America__New_York;
    let start = new_york.with_ymd_and_hms(2023, 3, 10, 0, 0, 0).unwrap();
    let stop = new_york.with_ymd_and_hms(2023, 3, 15, 0, 0, 0).unwrap();
    let generated = ticks(&start, &stop, 5);
    assert_eq!(generated.len(), 5);
    assert!(generated.iter().all(|t| t.hour() == 0));

    let gaps: Vec<i64> = generated
        .windows(2)
        .map(|w| (w[1] - w[0]).num_hours())
        .collect();
    assert_eq!(gaps, vec![24, 24, 23, 24]);
}

#[test]
fn hourly_ticks_across_half_hour_fall_back() {
    let lord_howe = Tz::Australia__Lord_Howe;
    let start = Utc.with_ymd_and_hms(2023, 4, 1, 12, 0, 0).unwrap();
    let stop = start + Duration::hours(8);
    let generated = ticks_in_timezone(&start, &stop, 10, &lord_howe);
    let local: Vec<String> = generated
        .iter()
        .map(|t| t.format("%H:%M%:z").to_string())
        .collect();
    assert_eq!(
        local,
        vec![
            "23:00+11:00",
            "00:00+11:00",
            "01:00+11:00",
            "01:00+10:30",
            "02:00+10:30",
            "03:00+10:30",
            "04:00+10:30",
            "05:00+10:30",
            "06:00+10:30",
        ]
    );
}

#[test]
fn config_from_json() {
    let config: TickConfig = serde_json::from_str(
        r#"{"count": 6, "timezone": "Europe/Berlin", "formats": {"day": "%d.%m"}}"#,
    )
    .unwrap();
    assert_eq!(config.count, 6);
    assert_eq!(config.formats.day, "%d.%m");
    assert_eq!(config.formats.hour, "%H:%M");

    let axis = TimeAxis::new(config).unwrap();
    let labeled = axis
        .labeled_ticks(&start(), &(start() + Duration::days(5)))
        .unwrap();
    let labels: Vec<&str> = labeled.iter().map(|(_, label)| label.as_str()).collect();
    // Berlin midnight on the 6th is still before 00:00 UTC
    assert_eq!(labels, vec!["02.01", "03.01", "04.01", "05.01", "06.01"]);
}

#[test]
fn empty_config_uses_defaults() {
    let config: TickConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, TickConfig::default());
}

#[test]
fn granularity_serializes_lowercase() {
    assert_eq!(
        serde_json::to_string(&LabelGranularity::Millisecond).unwrap(),
        r#""millisecond""#
    );
}
