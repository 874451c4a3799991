//! Entry classification and per-category rollups.
//!
//! Provides functions to split entries into income and expenses, sum their
//! amounts and group them by category for the summary and chart views.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{Entry, EntryType};

/// The label used for entries without a category.
pub const DEFAULT_FALLBACK_CATEGORY: &str = "uncategorized";

/// Entries split by type.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Classified<'a> {
    /// Entries of type [EntryType::Income].
    pub income: Vec<&'a Entry>,
    /// Entries of type [EntryType::Expense], including legacy payments.
    pub expense: Vec<&'a Entry>,
}

/// Splits entries into income and expenses, keeping their relative order.
pub fn classify<'a, I>(entries: I) -> Classified<'a>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut classified = Classified::default();

    for entry in entries {
        match entry.entry_type {
            EntryType::Income => classified.income.push(entry),
            EntryType::Expense => classified.expense.push(entry),
        }
    }

    classified
}

/// Sums the amounts of `entries`, or `None` if the sum exceeds [Decimal::MAX].
pub fn sum_amounts<'a, I>(entries: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries
        .into_iter()
        .try_fold(Decimal::ZERO, |total, entry| total.checked_add(entry.amount))
}

/// The accumulated amount for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category label.
    pub category: String,
    /// The sum of the amounts of the entries in the category.
    pub amount: Decimal,
}

/// Per-category sums for one entry type within a period.
///
/// Categories are unique. They iterate in lexical order with the fallback
/// label for uncategorized entries last, so the order only depends on which
/// categories are present and not on the order of the entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    totals: Vec<CategoryTotal>,
}

impl CategoryTotals {
    /// Whether there are no categories, i.e. no entries were aggregated.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// The number of categories.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// The total for `category`, if any entries had that category.
    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.totals
            .iter()
            .find(|total| total.category == category)
            .map(|total| total.amount)
    }

    /// The category totals in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, CategoryTotal> {
        self.totals.iter()
    }

    /// The sum of all category totals, saturating at [Decimal::MAX].
    pub fn sum(&self) -> Decimal {
        self.totals
            .iter()
            .fold(Decimal::ZERO, |sum, total| sum.saturating_add(total.amount))
    }
}

impl<'a> IntoIterator for &'a CategoryTotals {
    type Item = &'a CategoryTotal;
    type IntoIter = std::slice::Iter<'a, CategoryTotal>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.totals.len()))?;

        for total in &self.totals {
            map.serialize_entry(&total.category, &total.amount)?;
        }

        map.end()
    }
}

/// Groups entries by category and sums their amounts.
///
/// Entries without a category are grouped under `fallback_category`, which is
/// sorted after every named category.
///
/// Totals saturate at [Decimal::MAX]. Summaries never get that far since
/// they leave out entries that would overflow the total for their type.
pub fn aggregate_by_category<'a, I>(entries: I, fallback_category: &str) -> CategoryTotals
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut totals_by_category: BTreeMap<&str, Decimal> = BTreeMap::new();

    for entry in entries {
        let total = totals_by_category
            .entry(entry.category_or(fallback_category))
            .or_insert(Decimal::ZERO);
        *total = total.saturating_add(entry.amount);
    }

    let fallback_total = totals_by_category.remove(fallback_category);

    let mut totals: Vec<CategoryTotal> = totals_by_category
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_owned(),
            amount,
        })
        .collect();

    if let Some(amount) = fallback_total {
        totals.push(CategoryTotal {
            category: fallback_category.to_owned(),
            amount,
        });
    }

    CategoryTotals { totals }
}
