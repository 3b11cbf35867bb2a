//! Business-day arithmetic for service-level promise dates.
//!
//! Weekends and the tabulated national holidays are non-working days. The
//! holiday tables are hand-maintained per calendar year; dates in years
//! without a table are never treated as holidays, so the tables must be
//! extended once a year.

use crate::models::ProductType;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

// (month, day) pairs per year. Movable feasts (Carnaval, Sexta-feira Santa,
// Corpus Christi) are entered as the concrete dates they fall on.
const HOLIDAYS_2024: &[(u32, u32)] = &[
    (1, 1),   // Confraternizacao Universal
    (2, 12),  // Carnaval
    (2, 13),  // Carnaval
    (3, 29),  // Sexta-feira Santa
    (4, 21),  // Tiradentes
    (5, 1),   // Dia do Trabalho
    (5, 30),  // Corpus Christi
    (9, 7),   // Independencia
    (10, 12), // Nossa Senhora Aparecida
    (11, 2),  // Finados
    (11, 15), // Proclamacao da Republica
    (11, 20), // Consciencia Negra
    (12, 25), // Natal
];

const HOLIDAYS_2025: &[(u32, u32)] = &[
    (1, 1),
    (3, 3),
    (3, 4),
    (4, 18),
    (4, 21),
    (5, 1),
    (6, 19),
    (9, 7),
    (10, 12),
    (11, 2),
    (11, 15),
    (11, 20),
    (12, 25),
];

const HOLIDAYS_2026: &[(u32, u32)] = &[
    (1, 1),
    (2, 16),
    (2, 17),
    (4, 3),
    (4, 21),
    (5, 1),
    (6, 4),
    (9, 7),
    (10, 12),
    (11, 2),
    (11, 15),
    (11, 20),
    (12, 25),
];

fn holidays_for_year(year: i32) -> &'static [(u32, u32)] {
    match year {
        2024 => HOLIDAYS_2024,
        2025 => HOLIDAYS_2025,
        2026 => HOLIDAYS_2026,
        _ => &[],
    }
}

/// Exact calendar-day match against the year's holiday table.
pub fn is_holiday(date: NaiveDate) -> bool {
    holidays_for_year(date.year())
        .iter()
        .any(|&(month, day)| date.month() == month && date.day() == day)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// A date counts toward business-day arithmetic iff it is neither a weekend
/// nor a listed holiday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !is_weekend(date) && !is_holiday(date)
}

/// Walk forward one calendar day at a time, counting business days only.
/// The start date itself is not counted; `n == 0` returns `start`.
pub fn add_business_days(start: NaiveDate, n: u32) -> NaiveDate {
    let mut date = start;
    let mut counted = 0;
    while counted < n {
        date += Duration::days(1);
        if is_business_day(date) {
            counted += 1;
        }
    }
    date
}

/// Business days granted per product category.
pub fn required_business_days(product: ProductType) -> u32 {
    match product {
        ProductType::Cartao => 6,
        ProductType::Comercial | ProductType::Habitacional => 9,
    }
}

/// Latest allowable promise date for a product, anchored at `anchor`.
pub fn promise_date_from(anchor: NaiveDate, product: ProductType) -> NaiveDate {
    add_business_days(anchor, required_business_days(product))
}

/// Promise date anchored at today's local calendar date.
pub fn promise_date(product: ProductType) -> NaiveDate {
    promise_date_from(chrono::Local::now().date_naive(), product)
}
