//! Loading a user's notes for the notes page.
//!
//! Notes are fetched newest first with an ordered query. If that query fails,
//! for example because the composite index it needs has not been created, the
//! same filter is fetched without ordering and sorted in memory instead.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, ToSql};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    auth::UserID,
    category::CategoryId,
    db::index_exists,
    note::{
        Note,
        db::{COMPOSITE_INDEX_NAME, NOTE_COLUMNS, map_note_row},
        parse_display_date,
    },
};

/// Which notes to show in the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Uncategorized,
    Category(CategoryId),
}

impl CategoryFilter {
    /// Whether a note with `category_id` belongs in the list.
    pub fn matches(&self, category_id: Option<CategoryId>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Uncategorized => category_id.is_none(),
            CategoryFilter::Category(id) => category_id == Some(*id),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim() {
            "all" => Ok(CategoryFilter::All),
            "uncategorized" => Ok(CategoryFilter::Uncategorized),
            other => other
                .parse()
                .map(CategoryFilter::Category)
                .map_err(|_| Error::InvalidCategoryFilter(text.to_owned())),
        }
    }
}

/// Formats the filter as it appears in the `category` query parameter.
impl Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Uncategorized => write!(f, "uncategorized"),
            CategoryFilter::Category(id) => write!(f, "{id}"),
        }
    }
}

/// The order to sort notes in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Most recently created first.
    NewestFirst,
}

/// A request for one user's notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteQuery {
    pub owner: UserID,
    pub filter: CategoryFilter,
    /// `None` returns the notes in whatever order the store produces.
    pub order: Option<SortOrder>,
}

/// Somewhere notes can be fetched from.
pub trait NoteSource {
    fn fetch(&self, query: &NoteQuery) -> Result<Vec<Note>, Error>;
}

/// Fetches notes from the SQLite database.
///
/// Ordered queries are only served when the composite index exists, the same
/// way hosted document stores refuse ordered queries without an index.
pub struct SqliteNoteStore<'a> {
    connection: &'a Connection,
}

impl<'a> SqliteNoteStore<'a> {
    pub fn new(connection: &'a Connection) -> Self {
        Self { connection }
    }
}

impl NoteSource for SqliteNoteStore<'_> {
    fn fetch(&self, query: &NoteQuery) -> Result<Vec<Note>, Error> {
        let order_clause = match query.order {
            Some(SortOrder::NewestFirst) => {
                if !index_exists(self.connection, COMPOSITE_INDEX_NAME)? {
                    return Err(Error::MissingIndex(COMPOSITE_INDEX_NAME.to_owned()));
                }

                "ORDER BY created_at DESC"
            }
            None => "",
        };

        let owner_id = query.owner.as_i64();
        let (filter_clause, category_id) = match query.filter {
            CategoryFilter::All => ("", None),
            CategoryFilter::Uncategorized => ("AND category_id IS NULL", None),
            CategoryFilter::Category(id) => ("AND category_id = :category_id", Some(id)),
        };

        let mut params: Vec<(&str, &dyn ToSql)> = vec![(":owner", &owner_id)];
        if let Some(category_id) = &category_id {
            params.push((":category_id", category_id));
        }

        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM note WHERE user_id = :owner {filter_clause} {order_clause}"
        );

        self.connection
            .prepare(&sql)?
            .query_map(params.as_slice(), map_note_row)?
            .map(|maybe_note| maybe_note.map_err(|error| error.into()))
            .collect()
    }
}

/// Which query produced a list of notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPath {
    /// The store sorted the notes.
    Ordered,
    /// The ordered query failed and the notes were sorted in memory.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedNotes {
    pub notes: Vec<Note>,
    pub path: QueryPath,
}

/// Load `owner`'s notes matching `filter`, newest first.
///
/// The ordered query is tried first. On any error the unordered query is
/// run instead and the notes are sorted by [effective_timestamp]. Display
/// dates are interpreted in `local_offset`.
///
/// # Errors
///
/// Returns the unordered query's error if both queries fail.
pub fn load_notes(
    source: &impl NoteSource,
    owner: UserID,
    filter: CategoryFilter,
    local_offset: UtcOffset,
) -> Result<LoadedNotes, Error> {
    let ordered_query = NoteQuery {
        owner,
        filter,
        order: Some(SortOrder::NewestFirst),
    };

    match source.fetch(&ordered_query) {
        Ok(notes) => Ok(LoadedNotes {
            notes,
            path: QueryPath::Ordered,
        }),
        Err(error) => {
            tracing::warn!(
                "Ordered note query for filter '{filter}' failed, sorting in memory instead: {error}"
            );

            let mut notes = source.fetch(&NoteQuery {
                order: None,
                ..ordered_query
            })?;
            sort_newest_first(&mut notes, local_offset);

            Ok(LoadedNotes {
                notes,
                path: QueryPath::Fallback,
            })
        }
    }
}

/// The notes from `notes` that belong under `filter`, in their original order.
pub fn visible_notes<'a>(notes: &'a [Note], filter: &CategoryFilter) -> Vec<&'a Note> {
    notes
        .iter()
        .filter(|note| filter.matches(note.category_id))
        .collect()
}

/// The time a note was created.
///
/// The server timestamp is used when present, otherwise the display date is
/// parsed in `local_offset`. Returns `None` if neither is usable.
pub fn effective_timestamp(note: &Note, local_offset: UtcOffset) -> Option<OffsetDateTime> {
    note.created_at.or_else(|| {
        note.display_date
            .as_deref()
            .and_then(|display_date| parse_display_date(display_date, local_offset))
    })
}

/// Sort `notes` newest first. Notes without a usable timestamp go last.
fn sort_newest_first(notes: &mut [Note], local_offset: UtcOffset) {
    notes.sort_by_cached_key(|note| std::cmp::Reverse(effective_timestamp(note, local_offset)));
}
