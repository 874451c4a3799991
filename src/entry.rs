//! Ledger entries.
//!
//! Entries arrive from the entry source as [RawEntry] values whose fields may
//! be missing or hold the wrong kind of data. [RawEntry::validate] turns them
//! into [Entry] values, normalizing the legacy `payment` type tag on the way,
//! or into a [MalformedEntry] describing what was wrong.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::Error;

/// The type tag an older schema revision used for expenses.
pub const LEGACY_EXPENSE_TAG: &str = "payment";

const NAIVE_TIMESTAMP_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const NAIVE_TIMESTAMP_SUBSECOND_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// Whether an entry records money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money earned, e.g. wages.
    Income,
    /// Money spent.
    Expense,
}

impl EntryType {
    /// The canonical type tag.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }
}

impl FromStr for EntryType {
    type Err = MalformedReason;

    /// Parse a type tag, mapping the legacy [LEGACY_EXPENSE_TAG] to
    /// [EntryType::Expense].
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "income" => Ok(EntryType::Income),
            "expense" | LEGACY_EXPENSE_TAG => Ok(EntryType::Expense),
            other => Err(MalformedReason::UnknownType(other.to_owned())),
        }
    }
}

impl Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The opaque identifier of an entry.
///
/// Numeric IDs are accepted when deserializing and stored as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Create an entry ID from its text form.
    pub fn new(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(id) => Ok(EntryId(id)),
            Value::Number(id) => Ok(EntryId(id.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected a string or number for the entry ID, got {other}"
            ))),
        }
    }
}

/// An entry as supplied by the entry source, before validation.
///
/// Only the ID and timestamp are required to decode a row. Everything else
/// is checked by [RawEntry::validate].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEntry {
    /// The ID of the entry.
    pub id: EntryId,
    /// The amount as it was stored, expected to be a number or numeric string.
    #[serde(default)]
    pub amount: Option<Value>,
    /// The category label, may be empty.
    #[serde(default)]
    pub category: Option<String>,
    /// The type tag, expected to be `income`, `expense` or `payment`.
    #[serde(default, rename = "type")]
    pub entry_type: Option<String>,
    /// When the entry was recorded.
    #[serde(
        rename = "createdAt",
        alias = "created_at",
        deserialize_with = "deserialize_timestamp"
    )]
    pub created_at: OffsetDateTime,
}

/// A validated income or expense entry.
///
/// To create a new `Entry`, use [Entry::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The ID of the entry.
    pub id: EntryId,
    /// The magnitude of the entry. Never negative, the direction of the money
    /// is given by `entry_type`.
    pub amount: Decimal,
    /// The category label, `None` if the entry is uncategorized.
    pub category: Option<String>,
    /// Income or expense.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// When the entry was recorded.
    #[serde(
        rename = "createdAt",
        serialize_with = "time::serde::rfc3339::serialize",
        deserialize_with = "deserialize_timestamp"
    )]
    pub created_at: OffsetDateTime,
}

/// Why an entry could not be used for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MalformedReason {
    /// The entry has no amount.
    #[error("amount is missing")]
    MissingAmount,

    /// The amount is present but is not a number.
    #[error("amount {0} is not a number")]
    NonNumericAmount(String),

    /// The amount is negative. Entries store a magnitude and the type gives
    /// the direction.
    #[error("amount {0} is negative")]
    NegativeAmount(Decimal),

    /// Adding the amount to the month's total for its type would exceed the
    /// largest representable amount.
    #[error("amount {0} pushes the total past the largest representable amount")]
    AmountOverflow(Decimal),

    /// The entry has no type tag.
    #[error("type is missing")]
    MissingType,

    /// The type tag is not `income`, `expense` or `payment`.
    #[error("type \"{0}\" is not one of income, expense or payment")]
    UnknownType(String),
}

/// An entry that was excluded from aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("entry {id} is malformed: {reason}")]
pub struct MalformedEntry {
    /// The ID of the offending entry.
    pub id: EntryId,
    /// What was wrong with it.
    pub reason: MalformedReason,
}

// ============================================================================
// VALIDATION
// ============================================================================

impl RawEntry {
    /// Check the fields of the entry and normalize them.
    ///
    /// The legacy `payment` tag becomes [EntryType::Expense] and a blank
    /// category becomes `None`.
    ///
    /// # Errors
    /// Returns a [MalformedEntry] if the amount is missing, not a number or
    /// negative, or if the type tag is missing or unknown.
    pub fn validate(&self) -> Result<Entry, MalformedEntry> {
        let malformed = |reason| MalformedEntry {
            id: self.id.clone(),
            reason,
        };

        let amount = parse_amount(self.amount.as_ref()).map_err(malformed)?;
        let entry_type = match self.entry_type.as_deref() {
            Some(tag) => tag.parse::<EntryType>(),
            None => Err(MalformedReason::MissingType),
        }
        .map_err(malformed)?;

        Ok(Entry {
            id: self.id.clone(),
            amount,
            category: normalize_category(self.category.as_deref()),
            entry_type,
            created_at: self.created_at,
        })
    }
}

fn parse_amount(value: Option<&Value>) -> Result<Decimal, MalformedReason> {
    let text = match value {
        None | Some(Value::Null) => return Err(MalformedReason::MissingAmount),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(text)) if text.trim().is_empty() => {
            return Err(MalformedReason::MissingAmount);
        }
        Some(Value::String(text)) => text.trim().to_owned(),
        Some(other) => return Err(MalformedReason::NonNumericAmount(other.to_string())),
    };

    let amount = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| MalformedReason::NonNumericAmount(text.clone()))?;

    if amount < Decimal::ZERO {
        Err(MalformedReason::NegativeAmount(amount))
    } else {
        Ok(amount)
    }
}

fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .map(str::to_owned)
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl Entry {
    /// Create a new entry.
    ///
    /// Shortcut for [EntryBuilder] for discoverability.
    pub fn build(amount: Decimal, entry_type: EntryType, created_at: OffsetDateTime) -> EntryBuilder {
        EntryBuilder {
            amount,
            entry_type,
            created_at,
            category: None,
        }
    }

    /// The category label, or `fallback` if the entry is uncategorized.
    pub fn category_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.category.as_deref().unwrap_or(fallback)
    }
}

/// A builder for creating [Entry] instances.
///
/// # Examples
///
/// ```
/// use household_ledger::{Entry, EntryType, utc_midnight};
/// use rust_decimal::Decimal;
///
/// let created_at = utc_midnight(2025, 3, 5).unwrap();
/// let entry = Entry::build(Decimal::from(500), EntryType::Expense, created_at)
///     .category("food")
///     .finalize("42")
///     .unwrap();
///
/// assert_eq!(entry.category.as_deref(), Some("food"));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct EntryBuilder {
    /// The magnitude of the entry.
    pub amount: Decimal,
    /// Income or expense.
    pub entry_type: EntryType,
    /// When the entry was recorded.
    ///
    /// New entries dated on a calendar day use midnight UTC of that day, see
    /// [crate::utc_midnight].
    pub created_at: OffsetDateTime,
    /// The category label, blank labels are stored as `None`.
    pub category: Option<String>,
}

impl EntryBuilder {
    /// Set the category for the entry.
    pub fn category(mut self, category: &str) -> Self {
        self.category = normalize_category(Some(category));
        self
    }

    /// Build the final [Entry] with the ID given by the entry source.
    ///
    /// # Errors
    /// Returns a [MalformedEntry] if the amount is negative.
    pub fn finalize(self, id: impl Into<EntryId>) -> Result<Entry, MalformedEntry> {
        let id = id.into();

        if self.amount < Decimal::ZERO {
            return Err(MalformedEntry {
                id,
                reason: MalformedReason::NegativeAmount(self.amount),
            });
        }

        Ok(Entry {
            id,
            amount: self.amount,
            category: self.category,
            entry_type: self.entry_type,
            created_at: self.created_at,
        })
    }
}

// ============================================================================
// TIMESTAMPS
// ============================================================================

/// Parse an entry timestamp.
///
/// RFC 3339 timestamps keep their offset. Date-times without an offset, as
/// produced by `timestamp without time zone` columns, and bare dates are read
/// as UTC. A space may separate the date and time.
///
/// # Errors
/// Returns [Error::InvalidTimestamp] if `text` matches none of these formats.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, Error> {
    let text = text.trim();

    if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(timestamp);
    }

    let naive = text.replacen(' ', "T", 1);

    PrimitiveDateTime::parse(&naive, NAIVE_TIMESTAMP_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(&naive, NAIVE_TIMESTAMP_SUBSECOND_FORMAT))
        .map(PrimitiveDateTime::assume_utc)
        .or_else(|_| Date::parse(text, DATE_FORMAT).map(|date| date.midnight().assume_utc()))
        .map_err(|_| Error::InvalidTimestamp(text.to_owned()))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text).map_err(serde::de::Error::custom)
}
