//! Calendar month periods and the filter that buckets entries into them.
//!
//! All bucketing happens in UTC. An entry recorded at `2025-03-31T23:30-05:00`
//! belongs to April because that is its UTC calendar month, no matter which
//! timezone the caller runs in.

use std::fmt::Display;

use serde::Serialize;
use time::{Date, Month, OffsetDateTime, UtcOffset};

use crate::{Entry, Error, RawEntry};

/// Anything with a creation timestamp that can be bucketed by month.
pub trait Dated {
    /// When the item was recorded.
    fn created_at(&self) -> OffsetDateTime;
}

impl Dated for Entry {
    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Dated for RawEntry {
    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn created_at(&self) -> OffsetDateTime {
        (**self).created_at()
    }
}

/// A calendar month, e.g. March 2025.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
    year: i32,
    month: u8,
}

impl Period {
    /// Create a period for `month` (1-indexed) of `year`.
    ///
    /// # Errors
    /// Returns [Error::InvalidPeriod] if `month` is not in 1 to 12.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(Error::InvalidPeriod { year, month })
        }
    }

    /// The period that `timestamp` falls in, evaluated in UTC.
    pub fn containing(timestamp: OffsetDateTime) -> Self {
        let timestamp = timestamp.to_offset(UtcOffset::UTC);

        Self {
            year: timestamp.year(),
            month: u8::from(timestamp.month()),
        }
    }

    /// The period containing the current instant in UTC.
    pub fn current() -> Self {
        Self::containing(OffsetDateTime::now_utc())
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month, 1-indexed.
    pub fn month(&self) -> u8 {
        self.month
    }

    /// The month before this one.
    pub fn previous(&self) -> Self {
        match self.month {
            1 => Self {
                year: self.year - 1,
                month: 12,
            },
            month => Self {
                year: self.year,
                month: month - 1,
            },
        }
    }

    /// The month after this one.
    pub fn next(&self) -> Self {
        match self.month {
            12 => Self {
                year: self.year + 1,
                month: 1,
            },
            month => Self {
                year: self.year,
                month: month + 1,
            },
        }
    }

    /// Whether `item` was recorded during this period.
    ///
    /// Only the UTC calendar year and month are compared, the day and time
    /// of day are ignored.
    pub fn contains<T: Dated + ?Sized>(&self, item: &T) -> bool {
        Self::containing(item.created_at()) == *self
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Selects the entries recorded in `month` (1-indexed) of `year`.
///
/// The result keeps the relative order of `entries`. A `month` outside 1 to 12
/// yields no entries rather than an error, since callers are expected to pick
/// the month from a bounded selector.
pub fn filter_by_month<T: Dated>(entries: &[T], year: i32, month: u8) -> Vec<&T> {
    match Period::new(year, month) {
        Ok(period) => filter_by_period(entries, period),
        Err(error) => {
            tracing::debug!("Returning no entries: {error}");
            Vec::new()
        }
    }
}

/// Selects the entries recorded during `period`, keeping their relative order.
pub fn filter_by_period<T: Dated>(entries: &[T], period: Period) -> Vec<&T> {
    entries.iter().filter(|entry| period.contains(*entry)).collect()
}

/// Orders entries from the most to the least recently recorded.
///
/// Entries with equal timestamps keep their relative order.
pub fn newest_first<'a, T, I>(entries: I) -> Vec<&'a T>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut sorted: Vec<&T> = entries.into_iter().collect();
    sorted.sort_by_key(|entry| std::cmp::Reverse(entry.created_at()));
    sorted
}

/// The creation timestamp for a new entry dated on a calendar day: midnight
/// UTC of that day.
///
/// # Errors
/// Returns [Error::InvalidDate] if the date does not exist.
pub fn utc_midnight(year: i32, month: u8, day: u8) -> Result<OffsetDateTime, Error> {
    let invalid_date = || Error::InvalidDate { year, month, day };

    let month_of_year = Month::try_from(month).map_err(|_| invalid_date())?;

    Date::from_calendar_date(year, month_of_year, day)
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| invalid_date())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use test_case::test_case;
    use time::{OffsetDateTime, macros::datetime};

    use super::{Period, filter_by_month, newest_first, utc_midnight};
    use crate::{Entry, EntryType, Error};

    fn create_test_entry(id: &str, created_at: OffsetDateTime) -> Entry {
        Entry::build(Decimal::from(100), EntryType::Expense, created_at)
            .finalize(id)
            .unwrap()
    }

    #[test]
    fn filter_keeps_only_entries_in_month_in_input_order() {
        let entries = vec![
            create_test_entry("a", datetime!(2025-03-20 12:00 UTC)),
            create_test_entry("b", datetime!(2025-04-01 0:00 UTC)),
            create_test_entry("c", datetime!(2025-03-01 0:00 UTC)),
            create_test_entry("d", datetime!(2024-03-15 0:00 UTC)),
            create_test_entry("e", datetime!(2025-03-31 23:59:59 UTC)),
        ];

        let filtered = filter_by_month(&entries, 2025, 3);

        let ids: Vec<&str> = filtered.iter().map(|entry| entry.id.as_ref()).collect();
        assert_eq!(ids, vec!["a", "c", "e"]);
    }

    #[test]
    fn filter_does_not_modify_input() {
        let entries = vec![
            create_test_entry("a", datetime!(2025-04-01 0:00 UTC)),
            create_test_entry("b", datetime!(2025-03-01 0:00 UTC)),
        ];
        let before = entries.clone();

        let _ = filter_by_month(&entries, 2025, 3);

        assert_eq!(entries, before);
    }

    #[test_case(0 ; "zero")]
    #[test_case(13 ; "thirteen")]
    #[test_case(255 ; "max")]
    fn filter_returns_nothing_for_invalid_month(month: u8) {
        let entries = vec![create_test_entry("a", datetime!(2025-03-20 12:00 UTC))];

        assert!(filter_by_month(&entries, 2025, month).is_empty());
    }

    #[test]
    fn filter_handles_empty_input() {
        let entries: Vec<Entry> = Vec::new();

        assert!(filter_by_month(&entries, 2025, 3).is_empty());
    }

    #[test_case(datetime!(2025-03-31 23:30 -05:00), 2025, 4 ; "late evening behind UTC rolls forward")]
    #[test_case(datetime!(2025-04-01 08:00 +09:00), 2025, 3 ; "early morning ahead of UTC rolls back")]
    #[test_case(datetime!(2025-01-01 00:30 +01:00), 2024, 12 ; "new year rolls back a year")]
    #[test_case(datetime!(2025-03-15 12:00 UTC), 2025, 3 ; "mid month")]
    fn periods_are_evaluated_in_utc(timestamp: OffsetDateTime, year: i32, month: u8) {
        assert_eq!(Period::containing(timestamp), Period::new(year, month).unwrap());
    }

    #[test]
    fn period_rejects_invalid_month() {
        assert_eq!(
            Period::new(2025, 13),
            Err(Error::InvalidPeriod {
                year: 2025,
                month: 13
            })
        );
    }

    #[test]
    fn period_navigation_wraps_years() {
        let january = Period::new(2025, 1).unwrap();
        let december = Period::new(2024, 12).unwrap();

        assert_eq!(january.previous(), december);
        assert_eq!(december.next(), january);
        assert_eq!(
            Period::new(2025, 6).unwrap().next(),
            Period::new(2025, 7).unwrap()
        );
    }

    #[test]
    fn period_displays_as_year_and_month() {
        assert_eq!(Period::new(2025, 3).unwrap().to_string(), "2025-03");
    }

    #[test]
    fn newest_first_sorts_descending_and_is_stable() {
        let entries = vec![
            create_test_entry("old", datetime!(2025-03-01 0:00 UTC)),
            create_test_entry("tie-1", datetime!(2025-03-10 0:00 UTC)),
            create_test_entry("new", datetime!(2025-03-20 0:00 UTC)),
            create_test_entry("tie-2", datetime!(2025-03-10 0:00 UTC)),
        ];

        let sorted = newest_first(&entries);

        let ids: Vec<&str> = sorted.iter().map(|entry| entry.id.as_ref()).collect();
        assert_eq!(ids, vec!["new", "tie-1", "tie-2", "old"]);
    }

    #[test]
    fn utc_midnight_creates_start_of_day() {
        assert_eq!(
            utc_midnight(2025, 3, 5).unwrap(),
            datetime!(2025-03-05 0:00 UTC)
        );
    }

    #[test]
    fn utc_midnight_rejects_impossible_dates() {
        assert_eq!(
            utc_midnight(2025, 4, 31),
            Err(Error::InvalidDate {
                year: 2025,
                month: 4,
                day: 31
            })
        );
        assert!(utc_midnight(2025, 0, 1).is_err());
    }
}
