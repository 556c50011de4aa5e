use super::*;

const SAMPLE_TS: i64 = 1542837407796;

#[test]
fn test_decompose_sample_event_utc() {
    let parts = decompose(SAMPLE_TS, TimeBasis::Utc).unwrap();
    assert_eq!(
        parts,
        TimeParts {
            hour: 21,
            day: 21,
            week: 47,
            month: 11,
            year: 2018,
            weekday: 3,
        }
    );
}

#[test]
fn test_decompose_is_deterministic() {
    let first = decompose(SAMPLE_TS, TimeBasis::Utc);
    for _ in 0..10 {
        assert_eq!(decompose(SAMPLE_TS, TimeBasis::Utc), first);
    }
    assert_eq!(
        decompose(SAMPLE_TS, TimeBasis::Local),
        decompose(SAMPLE_TS, TimeBasis::Local)
    );
}

#[test]
fn test_decompose_epoch_start() {
    let parts = decompose(0, TimeBasis::Utc).unwrap();
    assert_eq!(parts.year, 1970);
    assert_eq!(parts.month, 1);
    assert_eq!(parts.day, 1);
    assert_eq!(parts.hour, 0);
    assert_eq!(parts.week, 1);
    // 1970-01-01 was a Thursday
    assert_eq!(parts.weekday, 4);
}

#[test]
fn test_decompose_iso_week_crosses_year() {
    // 2021-01-01 belongs to ISO week 53 of 2020
    let parts = decompose(1609459200000, TimeBasis::Utc).unwrap();
    assert_eq!(parts.year, 2021);
    assert_eq!(parts.month, 1);
    assert_eq!(parts.week, 53);
    assert_eq!(parts.weekday, 5);
}

#[test]
fn test_decompose_negative_millis() {
    let parts = decompose(-1, TimeBasis::Utc).unwrap();
    assert_eq!(parts.year, 1969);
    assert_eq!(parts.month, 12);
    assert_eq!(parts.day, 31);
    assert_eq!(parts.hour, 23);
}

#[test]
fn test_decompose_out_of_range() {
    assert_eq!(decompose(i64::MAX, TimeBasis::Utc), None);
    assert_eq!(decompose(i64::MIN, TimeBasis::Local), None);
}

#[test]
fn test_epoch_seconds_floors() {
    assert_eq!(epoch_seconds(SAMPLE_TS), 1542837407);
    assert_eq!(epoch_seconds(1999), 1);
    assert_eq!(epoch_seconds(0), 0);
    assert_eq!(epoch_seconds(-1), -1);
    assert_eq!(epoch_seconds(-1000), -1);
    assert_eq!(epoch_seconds(-1001), -2);
}

#[test]
fn test_start_time_keeps_millis() {
    let t = start_time(SAMPLE_TS).unwrap();
    assert_eq!(t.timestamp(), 1542837407);
    assert_eq!(t.timestamp_subsec_millis(), 796);
    assert_eq!(t.to_rfc3339(), "2018-11-21T21:56:47.796+00:00");
}

#[test]
fn test_start_time_agrees_with_decompose_utc() {
    let t = start_time(SAMPLE_TS).unwrap();
    let parts = decompose(SAMPLE_TS, TimeBasis::Utc).unwrap();
    assert_eq!(t.year(), parts.year);
    assert_eq!(t.month() as i32, parts.month);
}

#[test]
fn test_time_basis_parse() {
    let basis: TimeBasis = serde_yaml::from_str("local").unwrap();
    assert_eq!(basis, TimeBasis::Local);
    assert_eq!(TimeBasis::default(), TimeBasis::Utc);
    assert_eq!(TimeBasis::Utc.to_string(), "utc");
}
