//! The list of category labels offered when recording an entry.
//!
//! The set is independent of the entries: a category may be offered without
//! any entries using it, and entries may use categories that are not offered.
//! Persisting the set is left to the caller, it serializes as a JSON array.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, LedgerConfig};

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl TryFrom<String> for CategoryName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CategoryName::new(&value)
    }
}

impl From<CategoryName> for String {
    fn from(value: CategoryName) -> Self {
        value.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered list of unique category names.
///
/// [CategorySet::add] and [CategorySet::remove] consume the set and return
/// the updated one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CategoryName>", into = "Vec<CategoryName>")]
pub struct CategorySet {
    names: Vec<CategoryName>,
}

impl CategorySet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The set offered before the user has saved their own,
    /// [LedgerConfig::default_categories].
    pub fn with_defaults(config: &LedgerConfig) -> Self {
        config
            .default_categories
            .iter()
            .map(String::as_str)
            .fold(Self::new(), Self::add)
    }

    /// Appends `label` to the end of the set.
    ///
    /// Surrounding whitespace is removed first. Nothing changes if the label
    /// is blank or already in the set (compared case-sensitively).
    #[must_use]
    pub fn add(mut self, label: &str) -> Self {
        let Ok(name) = CategoryName::new(label) else {
            tracing::debug!("Ignoring blank category label");
            return self;
        };

        if !self.names.contains(&name) {
            self.names.push(name);
        }

        self
    }

    /// Removes `label` from the set, if present.
    #[must_use]
    pub fn remove(mut self, label: &str) -> Self {
        let label = label.trim();
        self.names.retain(|name| name.as_ref() != label);
        self
    }

    /// Whether `label` is in the set.
    pub fn contains(&self, label: &str) -> bool {
        let label = label.trim();
        self.names.iter().any(|name| name.as_ref() == label)
    }

    /// Returns `selected` if it is still in the set, so that callers can
    /// clear a selection that refers to a removed category.
    pub fn retain_selection<'a>(&self, selected: Option<&'a str>) -> Option<&'a str> {
        selected.filter(|label| self.contains(label))
    }

    /// The category names in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(CategoryName::as_ref)
    }

    /// The number of categories.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the set has no categories.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl From<Vec<CategoryName>> for CategorySet {
    fn from(names: Vec<CategoryName>) -> Self {
        names.into_iter().collect()
    }
}

impl From<CategorySet> for Vec<CategoryName> {
    fn from(set: CategorySet) -> Self {
        set.names
    }
}

impl FromIterator<CategoryName> for CategorySet {
    fn from_iter<T: IntoIterator<Item = CategoryName>>(iter: T) -> Self {
        let mut names: Vec<CategoryName> = Vec::new();

        for name in iter {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        Self { names }
    }
}
