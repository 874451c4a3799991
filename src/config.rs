//! Settings that the caller passes into every summary.
//!
//! The library holds no state of its own. Anything that would otherwise be
//! ambient, such as the label for uncategorized entries or the chart colors,
//! lives in a [LedgerConfig] that is handed to each call.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{ColorScheme, DEFAULT_FALLBACK_CATEGORY, Error};

/// The categories offered before the user has saved their own list.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "food",
    "daily goods",
    "transport",
    "entertainment",
    "fixed costs",
    "salary",
    "other",
];

/// Configuration for summaries, charts and the category list.
///
/// Missing fields take their default values when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// The label that entries without a category are grouped under.
    pub fallback_category: String,
    /// How chart colors are assigned.
    pub color_scheme: ColorScheme,
    /// The category list offered when none has been saved.
    pub default_categories: Vec<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            fallback_category: DEFAULT_FALLBACK_CATEGORY.to_owned(),
            color_scheme: ColorScheme::default(),
            default_categories: DEFAULT_CATEGORIES
                .iter()
                .map(|&category| category.to_owned())
                .collect(),
        }
    }
}

impl LedgerConfig {
    /// Parse a config from JSON.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] if `text` is not a valid config, or if
    /// the fallback category is blank.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(text).map_err(|error| Error::InvalidConfig(error.to_string()))?;

        if config.fallback_category.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "fallback_category cannot be empty".to_owned(),
            ));
        }

        Ok(config)
    }

    /// Read a JSON config file.
    ///
    /// # Errors
    /// Returns [Error::Io] if the file cannot be read, or
    /// [Error::InvalidConfig] if it is not a valid config.
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
