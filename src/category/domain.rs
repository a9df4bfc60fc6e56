//! Core category domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, auth::UserID};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from user input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation, e.g. when reading from the database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// Whether two names would look like the same category to the user.
    pub fn eq_ignore_case(&self, other: &CategoryName) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hex colour of the form `#rrggbb`, stored lower-cased.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryColor(String);

impl CategoryColor {
    /// Parse a colour from the form's colour picker.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidCategoryColor] unless `color` is `#` followed by six hex digits.
    pub fn new(color: &str) -> Result<Self, Error> {
        let color = color.trim();

        let is_hex_color = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());

        if is_hex_color {
            Ok(Self(color.to_ascii_lowercase()))
        } else {
            Err(Error::InvalidCategoryColor(color.to_owned()))
        }
    }

    pub fn new_unchecked(color: &str) -> Self {
        Self(color.to_owned())
    }
}

impl Default for CategoryColor {
    fn default() -> Self {
        Self("#4f46e5".to_owned())
    }
}

impl AsRef<str> for CategoryColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A user-defined group of notes, e.g. 'Work' or 'Shopping'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub owner: UserID,
    pub name: CategoryName,
    pub color: CategoryColor,
    pub created_at: OffsetDateTime,
}

/// Form data for category creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    /// The notes page filter the form was submitted from, so the sidebar keeps its selection.
    #[serde(default)]
    pub current_filter: Option<String>,
}


#[cfg(test)]
mod category_color_tests {
    use crate::Error;

    use super::CategoryColor;

    #[test]
    fn accepts_hex_color() {
        assert_eq!(CategoryColor::new("#FF00aa").unwrap().as_ref(), "#ff00aa");
    }

    #[test]
    fn rejects_other_formats() {
        for color in ["red", "#fff", "ff00aa", "#gg00aa", "#ff00aa00"] {
            assert_eq!(
                CategoryColor::new(color),
                Err(Error::InvalidCategoryColor(color.to_owned())),
                "{color} should be rejected"
            );
        }
    }

    #[test]
    fn default_is_indigo() {
        assert_eq!(CategoryColor::default().as_ref(), "#4f46e5");
    }
}
