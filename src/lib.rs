//! household_ledger summarizes a personal household ledger by month.
//!
//! Given the full list of a user's income and expense entries, the library
//! selects the entries of one calendar month, splits them into income and
//! expenses, sums them per category and produces the data for the summary
//! cards and the category charts.
//!
//! The library is stateless: every function takes the complete entry
//! snapshot and a [LedgerConfig], and returns freshly built values. Fetching
//! entries, persisting the category list and drawing the charts are left to
//! the caller.
//!
//! ```
//! use household_ledger::{LedgerConfig, load_json, summarize_month};
//! use rust_decimal::Decimal;
//!
//! let snapshot = load_json(
//!     r#"[
//!         {"id": 1, "amount": 500, "category": "food", "type": "expense", "createdAt": "2025-03-05T00:00:00Z"},
//!         {"id": 2, "amount": 300, "category": "food", "type": "payment", "createdAt": "2025-03-20T00:00:00Z"},
//!         {"id": 3, "amount": 2000, "category": "salary", "type": "income", "createdAt": "2025-03-01T00:00:00Z"}
//!     ]"#
//!     .as_bytes(),
//! )
//! .unwrap();
//!
//! let summary = summarize_month(&snapshot.entries, 2025, 3, &LedgerConfig::default());
//!
//! assert_eq!(summary.expense_total, Decimal::from(800));
//! assert_eq!(summary.balance, Decimal::from(1200));
//! ```

#![warn(missing_docs)]

mod aggregation;
mod category_set;
mod chart;
mod config;
mod entry;
mod error;
mod period;
pub mod report;
mod snapshot;
mod summary;

pub use aggregation::{
    CategoryTotal, CategoryTotals, Classified, DEFAULT_FALLBACK_CATEGORY, aggregate_by_category,
    classify, sum_amounts,
};
pub use category_set::{CategoryName, CategorySet};
pub use chart::{ChartPoint, ChartSeries, ColorScheme, DEFAULT_PALETTE, doughnut_chart};
pub use config::{DEFAULT_CATEGORIES, LedgerConfig};
pub use entry::{
    Entry, EntryBuilder, EntryId, EntryType, LEGACY_EXPENSE_TAG, MalformedEntry, MalformedReason,
    RawEntry, parse_timestamp,
};
pub use error::Error;
pub use period::{
    Dated, Period, filter_by_month, filter_by_period, newest_first, utc_midnight,
};
pub use snapshot::{Snapshot, load_csv, load_json, load_path};
pub use summary::{MonthlySummary, summarize_entries, summarize_month};
