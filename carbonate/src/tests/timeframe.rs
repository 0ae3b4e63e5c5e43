use crate::{CarbonateError, TimeRange};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn range(start: NaiveDate, end: NaiveDate) -> TimeRange {
    TimeRange::new(start, end).unwrap()
}

#[test]
fn test_year_covers_every_day() {
    let y2010 = TimeRange::year(2010).unwrap();
    assert_eq!(y2010.start(), date(2010, 1, 1));
    assert_eq!(y2010.end(), date(2010, 12, 31));
    assert_eq!(y2010.days(), 365);
    assert_eq!(TimeRange::year(2012).unwrap().days(), 366);
}

#[test]
fn test_start_after_end_rejected() {
    assert!(matches!(
        TimeRange::new(date(2010, 2, 1), date(2010, 1, 1)),
        Err(CarbonateError::InvalidTimeRange(_))
    ));
}

#[test]
fn test_single_day_range() {
    let day = range(date(2010, 3, 1), date(2010, 3, 1));
    assert_eq!(day.days(), 1);
    assert!(!day.is_empty());
    assert!(day.contains(date(2010, 3, 1)));
}

#[test]
fn test_intersect_overlap() {
    let active = range(date(2009, 6, 1), date(2010, 2, 28));
    let timeframe = TimeRange::year(2010).unwrap();

    let overlap = active.intersect(&timeframe);

    assert_eq!(overlap, range(date(2010, 1, 1), date(2010, 2, 28)));
    assert_eq!(overlap.days(), 59);
    assert_eq!(
        overlap.fractional_year_overlap(2010),
        Decimal::from(59) / Decimal::from(365)
    );
}

#[test]
fn test_intersect_disjoint_is_empty_at_later_start() {
    let a = range(date(2008, 1, 1), date(2008, 12, 31));
    let b = TimeRange::year(2010).unwrap();

    let overlap = a.intersect(&b);

    assert!(overlap.is_empty());
    assert_eq!(overlap.days(), 0);
    assert_eq!(overlap.start(), date(2010, 1, 1));
    assert_eq!(overlap.to_string(), "(empty at 2010-01-01)");
}

#[test]
fn test_constrained_collapses_contradictory_dates() {
    let timeframe = TimeRange::year(2010).unwrap();

    let active = TimeRange::constrained(date(2010, 9, 1), date(2010, 3, 1), &timeframe);

    assert!(active.is_empty());
    assert_eq!(active.start(), date(2010, 3, 1));
    assert_eq!(active.fractional_year_overlap(2010), Decimal::ZERO);
}

#[test]
fn test_constrained_clips_to_timeframe() {
    let timeframe = TimeRange::year(2010).unwrap();

    let active = TimeRange::constrained(date(2010, 7, 1), date(2012, 1, 1), &timeframe);

    assert_eq!(active, range(date(2010, 7, 1), date(2010, 12, 31)));
}

#[test]
fn test_calendar_year_uses_midpoint() {
    let straddling = range(date(2009, 12, 1), date(2010, 3, 1));
    assert_eq!(straddling.calendar_year(), 2010);
    assert_eq!(TimeRange::year(2011).unwrap().calendar_year(), 2011);
}

#[test]
fn test_parse_year_and_span() {
    let year: TimeRange = "2010".parse().unwrap();
    assert_eq!(year, TimeRange::year(2010).unwrap());

    let span: TimeRange = "2010-01-01..2010-06-30".parse().unwrap();
    assert_eq!(span.days(), 181);
    assert_eq!(span.to_string(), "2010-01-01..2010-06-30");

    assert!("last year".parse::<TimeRange>().is_err());
    assert!("2010-06-30..2010-01-01".parse::<TimeRange>().is_err());
}

#[test]
fn test_out_of_range_year_rejected() {
    assert!(matches!(
        "2147483647".parse::<TimeRange>(),
        Err(CarbonateError::InvalidTimeRange(_))
    ));
    assert!(matches!(
        TimeRange::year(i32::MAX),
        Err(CarbonateError::InvalidTimeRange(_))
    ));
    assert!(TimeRange::year(i32::MIN).is_err());
}
