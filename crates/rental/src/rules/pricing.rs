//! Rental price estimates.

use chrono::NaiveDate;
use serde::Serialize;

/// Rentals of at least this many days get [`LONG_RENTAL_DISCOUNT`].
pub const LONG_RENTAL_DAYS: i64 = 3;

/// Fraction taken off long rentals.
pub const LONG_RENTAL_DISCOUNT: f64 = 0.10;

/// A price estimate for a date range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub daily_rate: f64,
    pub days: i64,
    /// Rate times days, before any discount.
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
}

impl PriceQuote {
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.discount > 0.0
    }
}

/// Whole days between pickup and return, never less than one.
#[must_use]
pub fn rental_days(pickup: NaiveDate, return_date: NaiveDate) -> i64 {
    (return_date - pickup).num_days().max(1)
}

/// Price a rental at `daily_rate`.
#[must_use]
pub fn quote(daily_rate: f64, pickup: NaiveDate, return_date: NaiveDate) -> PriceQuote {
    let days = rental_days(pickup, return_date);
    #[allow(clippy::cast_precision_loss)]
    let subtotal = daily_rate * days as f64;
    let discount = if days >= LONG_RENTAL_DAYS {
        subtotal * LONG_RENTAL_DISCOUNT
    } else {
        0.0
    };

    PriceQuote {
        daily_rate,
        days,
        subtotal,
        discount,
        total: subtotal - discount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_rental_days_minimum_one() {
        assert_eq!(rental_days(date(10), date(10)), 1);
        assert_eq!(rental_days(date(10), date(5)), 1);
        assert_eq!(rental_days(date(10), date(11)), 1);
        assert_eq!(rental_days(date(10), date(17)), 7);
    }

    #[test]
    fn test_short_rental_has_no_discount() {
        let q = quote(50.0, date(1), date(3));
        assert_eq!(q.days, 2);
        assert!((q.total - 100.0).abs() < f64::EPSILON);
        assert!(!q.is_discounted());
    }

    #[test]
    fn test_three_days_is_discounted() {
        let q = quote(50.0, date(1), date(4));
        assert_eq!(q.days, 3);
        assert!((q.subtotal - 150.0).abs() < 1e-9);
        assert!((q.discount - 15.0).abs() < 1e-9);
        assert!((q.total - 135.0).abs() < 1e-9);
        assert!(q.is_discounted());
    }

    #[test]
    fn test_same_day_charges_one_day() {
        let q = quote(80.0, date(5), date(5));
        assert_eq!(q.days, 1);
        assert!((q.total - 80.0).abs() < 1e-9);
    }
}
