use calldesk::models::ProductType;
use calldesk::services::business_days::{
    add_business_days, is_business_day, is_holiday, is_weekend, promise_date_from,
    required_business_days,
};
use chrono::{Duration, NaiveDate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn business_day_predicate_equals_definition() {
    let mut day = date(2024, 1, 1);
    let end = date(2027, 1, 1);
    while day < end {
        assert_eq!(
            is_business_day(day),
            !is_weekend(day) && !is_holiday(day),
            "{}",
            day
        );
        day += Duration::days(1);
    }
}

#[test]
fn advancing_zero_days_is_identity() {
    for anchor in [date(2025, 6, 13), date(2025, 6, 14), date(2025, 12, 25)] {
        assert_eq!(add_business_days(anchor, 0), anchor);
    }
}

#[test]
fn advancing_is_strictly_increasing() {
    let anchor = date(2025, 12, 19);
    let mut previous = anchor;
    for n in 1..=20 {
        let advanced = add_business_days(anchor, n);
        assert!(advanced > previous);
        previous = advanced;
    }
}

#[test]
fn friday_advances_to_monday() {
    // 2025-08-01 is a Friday; the following Monday is not a holiday.
    assert_eq!(add_business_days(date(2025, 8, 1), 1), date(2025, 8, 4));
}

#[test]
fn result_is_strictly_after_start_for_positive_n() {
    let anchor = date(2025, 12, 24);
    for n in 1..=10 {
        assert!(add_business_days(anchor, n) > anchor);
    }
}

#[test]
fn cartao_promise_skips_natal_and_weekends() {
    // From Dec 23 2025, six business days: Dec 24, Dec 26, Dec 29, Dec 30,
    // Dec 31, Jan 2 (Dec 25 and Jan 1 are holidays).
    assert_eq!(
        promise_date_from(date(2025, 12, 23), ProductType::Cartao),
        date(2026, 1, 2)
    );
}

#[test]
fn habitacional_gets_nine_business_days() {
    assert_eq!(required_business_days(ProductType::Habitacional), 9);
    assert_eq!(
        promise_date_from(date(2025, 12, 23), ProductType::Habitacional),
        date(2026, 1, 7)
    );
}

#[test]
fn holiday_lookup_matches_fixed_table() {
    assert!(is_holiday(date(2025, 1, 1)));
    assert!(!is_holiday(date(2025, 1, 2)));
}

#[test]
fn carnival_2026_is_skipped() {
    // Carnaval Mon/Tue fall on Feb 16-17 2026. From Friday Feb 13, one
    // business day lands on Wednesday Feb 18.
    assert_eq!(add_business_days(date(2026, 2, 13), 1), date(2026, 2, 18));
}

#[test]
fn years_outside_tables_only_skip_weekends() {
    // 2030-12-23 is a Monday; with no holiday table for 2030, Dec 25 counts
    // as a working day.
    assert_eq!(add_business_days(date(2030, 12, 23), 3), date(2030, 12, 26));
}
