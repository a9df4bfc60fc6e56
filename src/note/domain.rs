//! Core note domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{
    OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::{Error, auth::UserID, category::CategoryId};

/// Database identifier for a note.
pub type NoteId = i64;

/// The legacy display date, e.g. "17.10.2026, 09:05:03".
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day].[month].[year], [hour]:[minute]:[second]");

/// The text of a note, trimmed and guaranteed to be non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteText(String);

impl NoteText {
    /// Create note text from user input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyNoteText] if `text` is empty or only whitespace.
    pub fn new(text: &str) -> Result<Self, Error> {
        let text = text.trim();

        if text.is_empty() {
            Err(Error::EmptyNoteText)
        } else {
            Ok(Self(text.to_owned()))
        }
    }

    pub fn new_unchecked(text: &str) -> Self {
        Self(text.to_owned())
    }
}

impl AsRef<str> for NoteText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for NoteText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A text note owned by a single user.
///
/// Notes written by older clients may lack `created_at` and only carry the
/// `display_date` string, so both are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub owner: UserID,
    pub text: NoteText,
    pub category_id: Option<CategoryId>,
    pub created_at: Option<OffsetDateTime>,
    pub display_date: Option<String>,
}

/// Format `timestamp` as a display date in the local timezone.
pub fn format_display_date(timestamp: OffsetDateTime, local_offset: UtcOffset) -> String {
    timestamp
        .to_offset(local_offset)
        .format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|error| {
            tracing::warn!("could not format display date for {timestamp}: {error}");
            String::new()
        })
}

/// Parse a display date, interpreting it in the local timezone.
///
/// Returns `None` when `text` is not of the form `dd.mm.yyyy, HH:MM:SS`.
pub fn parse_display_date(text: &str, local_offset: UtcOffset) -> Option<OffsetDateTime> {
    PrimitiveDateTime::parse(text.trim(), DISPLAY_DATE_FORMAT)
        .ok()
        .map(|date_time| date_time.assume_offset(local_offset))
}

/// Form data for creating a note.
#[derive(Debug, Serialize, Deserialize)]
pub struct NoteFormData {
    #[serde(default)]
    pub text: String,
    /// The selected category ID, or an empty string for no category.
    #[serde(default)]
    pub category_id: String,
    /// The list filter the note was created under, so the refreshed list keeps it.
    #[serde(default)]
    pub current_filter: Option<String>,
}


#[cfg(test)]
mod display_date_tests {
    use time::{UtcOffset, macros::datetime};

    use super::{format_display_date, parse_display_date};

    #[test]
    fn formats_in_local_offset() {
        let offset = UtcOffset::from_hms(13, 0, 0).unwrap();

        let got = format_display_date(datetime!(2026-10-16 20:05:03 UTC), offset);

        assert_eq!(got, "17.10.2026, 09:05:03");
    }

    #[test]
    fn parses_in_local_offset() {
        let offset = UtcOffset::from_hms(13, 0, 0).unwrap();

        let got = parse_display_date("17.10.2026, 09:05:03", offset);

        assert_eq!(got, Some(datetime!(2026-10-16 20:05:03 UTC)));
    }

    #[test]
    fn rejects_other_formats() {
        for text in ["", "2026-10-17 09:05:03", "17/10/2026, 09:05:03", "yesterday"] {
            assert_eq!(parse_display_date(text, UtcOffset::UTC), None, "{text}");
        }
    }
}
