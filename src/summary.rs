//! Monthly summaries of income, expenses and their category breakdowns.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    CategoryTotals, ChartSeries, ColorScheme, Entry, LedgerConfig, MalformedEntry,
    MalformedReason, Period, RawEntry, aggregate_by_category, classify, filter_by_month,
    filter_by_period,
};

/// The totals and category breakdowns for one month.
///
/// A summary is rebuilt from the full entry snapshot whenever the entries or
/// the selected month change, it is never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// The calendar year.
    pub year: i32,
    /// The calendar month, 1-indexed.
    pub month: u8,
    /// The sum of all income in the month.
    pub income_total: Decimal,
    /// The sum of all expenses in the month.
    pub expense_total: Decimal,
    /// `income_total - expense_total`.
    pub balance: Decimal,
    /// Income per category.
    pub income_by_category: CategoryTotals,
    /// Expenses per category.
    pub expense_by_category: CategoryTotals,
    /// The number of entries recorded in the month, including malformed ones.
    pub entry_count: usize,
    /// Entries recorded in the month that were left out of the totals.
    pub malformed: Vec<MalformedEntry>,
}

impl MonthlySummary {
    /// The chart series for the income breakdown, `None` if there was no
    /// income in the month.
    pub fn income_chart(&self, color_scheme: &ColorScheme) -> Option<ChartSeries> {
        ChartSeries::from_totals(&self.income_by_category, color_scheme)
    }

    /// The chart series for the expense breakdown, `None` if there were no
    /// expenses in the month.
    pub fn expense_chart(&self, color_scheme: &ColorScheme) -> Option<ChartSeries> {
        ChartSeries::from_totals(&self.expense_by_category, color_scheme)
    }
}

/// Summarizes the entries recorded in `month` (1-indexed) of `year`.
///
/// Entries are validated one at a time. Malformed entries in the month are
/// left out of every total, listed in [MonthlySummary::malformed] and counted
/// in [MonthlySummary::entry_count]; the rest of the month is still
/// summarized. An entry whose amount would push the total for its type past
/// [Decimal::MAX] is reported the same way. A `month` outside 1 to 12 gives an
/// empty summary.
pub fn summarize_month(
    entries: &[RawEntry],
    year: i32,
    month: u8,
    config: &LedgerConfig,
) -> MonthlySummary {
    let in_month = filter_by_month(entries, year, month);

    let mut valid = Vec::with_capacity(in_month.len());
    let mut malformed = Vec::new();

    for raw_entry in &in_month {
        match raw_entry.validate() {
            Ok(entry) => valid.push(entry),
            Err(error) => {
                tracing::warn!("Leaving entry out of the {year}-{month:02} summary: {error}");
                malformed.push(error);
            }
        }
    }

    let mut summary = build_summary(year, month, &valid, &config.fallback_category);
    summary.entry_count = in_month.len();
    malformed.append(&mut summary.malformed);
    summary.malformed = malformed;

    summary
}

/// Summarizes already validated entries recorded during `period`.
///
/// Entries that would overflow the total for their type are listed in
/// [MonthlySummary::malformed].
pub fn summarize_entries(
    entries: &[Entry],
    period: Period,
    config: &LedgerConfig,
) -> MonthlySummary {
    let in_period = filter_by_period(entries, period);

    build_summary(
        period.year(),
        period.month(),
        in_period,
        &config.fallback_category,
    )
}

fn build_summary<'a, I>(year: i32, month: u8, entries: I, fallback_category: &str) -> MonthlySummary
where
    I: IntoIterator<Item = &'a Entry>,
{
    let classified = classify(entries);
    let entry_count = classified.income.len() + classified.expense.len();

    let mut overflowed = Vec::new();
    let (income, income_total) = admit_within_range(classified.income, &mut overflowed);
    let (expense, expense_total) = admit_within_range(classified.expense, &mut overflowed);

    MonthlySummary {
        year,
        month,
        income_total,
        expense_total,
        // Both totals lie in 0..=Decimal::MAX, so the difference cannot overflow.
        balance: income_total - expense_total,
        income_by_category: aggregate_by_category(income, fallback_category),
        expense_by_category: aggregate_by_category(expense, fallback_category),
        entry_count,
        malformed: overflowed,
    }
}

/// Keeps the entries whose amounts can be added to the running total, in
/// order, and reports the rest as malformed.
fn admit_within_range<'a>(
    entries: Vec<&'a Entry>,
    malformed: &mut Vec<MalformedEntry>,
) -> (Vec<&'a Entry>, Decimal) {
    let mut total = Decimal::ZERO;
    let mut admitted = Vec::with_capacity(entries.len());

    for entry in entries {
        match total.checked_add(entry.amount) {
            Some(sum) => {
                total = sum;
                admitted.push(entry);
            }
            None => {
                let error = MalformedEntry {
                    id: entry.id.clone(),
                    reason: MalformedReason::AmountOverflow(entry.amount),
                };
                tracing::warn!("Leaving entry out of the summary: {error}");
                malformed.push(error);
            }
        }
    }

    (admitted, total)
}
