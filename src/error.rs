//! Defines the crate level error type.

/// The errors that may occur when working with ledger data.
///
/// Problems with individual entries are not errors, see
/// [crate::MalformedEntry]. They are reported alongside the summary instead
/// of aborting aggregation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A period was requested with a month outside of 1 to 12.
    #[error("{month} is not a valid month (year {year})")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month, expected to be 1-indexed.
        month: u8,
    },

    /// A calendar date that does not exist, e.g. the 31st of April.
    #[error("{year}-{month:02}-{day:02} is not a valid date")]
    InvalidDate {
        /// The requested year.
        year: i32,
        /// The requested month, 1-indexed.
        month: u8,
        /// The requested day of the month.
        day: u8,
    },

    /// A timestamp string could not be parsed.
    ///
    /// Accepted formats are RFC 3339 and ISO 8601 date-times without an
    /// offset, which are read as UTC.
    #[error("could not parse timestamp \"{0}\"")]
    InvalidTimestamp(String),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The entry snapshot could not be read as a whole.
    ///
    /// Individual rows that fail to decode do not cause this error, they
    /// are skipped and counted instead.
    #[error("could not read the entry snapshot: {0}")]
    InvalidSnapshot(String),

    /// The snapshot file extension does not match a supported format.
    #[error("unsupported snapshot format \"{0}\", expected .json or .csv")]
    UnsupportedSnapshotFormat(String),

    /// The configuration could not be parsed or holds an invalid value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A saved category list could not be parsed.
    #[error("invalid category list: {0}")]
    InvalidCategoryList(String),

    /// An I/O error while reading or writing a file.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}
