//! Plain text rendering of monthly summaries for the command line.
//!
//! This is presentation only. The summary itself carries unformatted
//! amounts, currency symbols and number formatting are added here.

use rust_decimal::{Decimal, RoundingStrategy};
use time::UtcOffset;

use crate::{CategoryTotals, Entry, MonthlySummary};

const NO_DATA: &str = "No data";

/// Formats `amount` with thousands separators and two decimal places.
///
/// Works on the decimal digits directly, so every amount an entry can hold is
/// written out in full rather than in scientific notation.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    if rounded.is_zero() {
        return "0.00".to_owned();
    }

    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut formatted = String::with_capacity(digits.len() + whole.len() / 3 + 1);

    if rounded.is_sign_negative() {
        formatted.push('-');
    }

    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }

    formatted.push('.');
    formatted.push_str(fraction);

    formatted
}

/// Renders the totals and category breakdowns of `summary`.
pub fn render_summary(summary: &MonthlySummary) -> String {
    let mut lines = vec![
        format!("{:04}-{:02}", summary.year, summary.month),
        format!("  Income    +{}", format_amount(summary.income_total)),
        format!("  Expenses  -{}", format_amount(summary.expense_total)),
        format!("  Balance    {}", format_amount(summary.balance)),
        String::new(),
        "Expense breakdown".to_owned(),
    ];

    lines.extend(breakdown_lines(&summary.expense_by_category));
    lines.push("Income breakdown".to_owned());
    lines.extend(breakdown_lines(&summary.income_by_category));

    if !summary.malformed.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{} of {} entries were left out:",
            summary.malformed.len(),
            summary.entry_count
        ));
        lines.extend(
            summary
                .malformed
                .iter()
                .map(|malformed| format!("  {malformed}")),
        );
    }

    lines.join("\n")
}

fn breakdown_lines(totals: &CategoryTotals) -> Vec<String> {
    if totals.is_empty() {
        return vec![format!("  {NO_DATA}")];
    }

    let width = totals
        .iter()
        .map(|total| total.category.chars().count())
        .max()
        .unwrap_or_default();

    totals
        .iter()
        .map(|total| {
            format!(
                "  {:<width$}  {}",
                total.category,
                format_amount(total.amount)
            )
        })
        .collect()
}

/// Renders one line per entry: UTC date, type, category and amount.
///
/// Entries are listed in the order given, callers usually pass them through
/// [crate::newest_first] first.
pub fn render_entries(entries: &[&Entry], fallback_category: &str) -> String {
    if entries.is_empty() {
        return NO_DATA.to_owned();
    }

    entries
        .iter()
        .map(|entry| {
            format!(
                "{}  {:<7}  {}  {}",
                entry.created_at.to_offset(UtcOffset::UTC).date(),
                entry.entry_type.as_str(),
                entry.category_or(fallback_category),
                format_amount(entry.amount)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use test_case::test_case;
    use time::macros::datetime;

    use super::{format_amount, render_entries, render_summary};
    use crate::{EntryId, LedgerConfig, RawEntry, summarize_month};

    fn create_raw_entry(id: &str, amount: serde_json::Value, category: &str, entry_type: &str) -> RawEntry {
        RawEntry {
            id: EntryId::new(id),
            amount: Some(amount),
            category: Some(category.to_owned()),
            entry_type: Some(entry_type.to_owned()),
            created_at: datetime!(2025-03-05 0:00 UTC),
        }
    }

    #[test_case(Decimal::ZERO, "0.00" ; "zero")]
    #[test_case(Decimal::from(1200), "1,200.00" ; "thousands")]
    #[test_case(Decimal::new(1230, 2), "12.30" ; "trailing zero")]
    #[test_case(Decimal::new(-1250, 2), "-12.50" ; "negative")]
    #[test_case(Decimal::new(5, 3), "0.01" ; "half cent rounds up")]
    #[test_case(Decimal::new(-4, 3), "0.00" ; "tiny negative rounds to zero")]
    #[test_case(Decimal::from(1_000_000_000_000_i64), "1,000,000,000,000.00" ; "one trillion")]
    #[test_case(Decimal::from(999), "999.00" ; "no separator below one thousand")]
    fn format_amount_writes_full_digits(amount: Decimal, want: &str) {
        assert_eq!(format_amount(amount), want);
    }

    #[test]
    fn format_amount_handles_largest_amount() {
        assert_eq!(
            format_amount(Decimal::MAX),
            "79,228,162,514,264,337,593,543,950,335.00"
        );
    }

    #[test]
    fn render_summary_lists_totals_and_breakdowns() {
        let entries = vec![
            create_raw_entry("1", json!(800), "food", "expense"),
            create_raw_entry("2", json!(2000), "salary", "income"),
        ];
        let summary = summarize_month(&entries, 2025, 3, &LedgerConfig::default());

        let report = render_summary(&summary);

        assert!(report.starts_with("2025-03"), "got report: {report}");
        assert!(report.contains("food"), "got report: {report}");
        assert!(report.contains("salary"), "got report: {report}");
        assert!(!report.contains("No data"), "got report: {report}");
        assert!(!report.contains("left out"), "got report: {report}");
    }

    #[test]
    fn render_summary_shows_placeholder_and_malformed_entries() {
        let entries = vec![
            create_raw_entry("1", json!(800), "food", "expense"),
            create_raw_entry("2", json!(10), "gift", "bonus"),
        ];
        let summary = summarize_month(&entries, 2025, 3, &LedgerConfig::default());

        let report = render_summary(&summary);

        assert!(report.contains("No data"), "got report: {report}");
        assert!(report.contains("1 of 2 entries were left out"), "got report: {report}");
        assert!(report.contains("entry 2 is malformed"), "got report: {report}");
    }

    #[test]
    fn render_entries_shows_date_type_and_fallback_category() {
        let entry = create_raw_entry("1", json!(800), "", "payment")
            .validate()
            .unwrap();

        let text = render_entries(&[&entry], "uncategorized");

        assert!(text.starts_with("2025-03-05  expense  uncategorized"), "got: {text}");
    }

    #[test]
    fn render_entries_handles_empty_list() {
        assert_eq!(render_entries(&[], "uncategorized"), "No data");
    }
}
