//! Database operations for notes.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    category::CategoryId,
    note::{Note, NoteId, NoteText},
};

/// The index that ordered note queries rely on.
pub const COMPOSITE_INDEX_NAME: &str = "idx_note_owner_category_created";

/// The columns selected by every note query, in the order [map_note_row] expects.
pub(crate) const NOTE_COLUMNS: &str = "id, user_id, text, category_id, created_at, display_date";

/// Initialize the note table.
///
/// `created_at` and `display_date` are nullable because notes from older
/// clients may carry only one of them. `category_id` is not a foreign key,
/// handlers check it belongs to the note's owner and category deletion
/// clears it in the same batch.
pub fn create_note_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS note (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            text TEXT NOT NULL,
            category_id INTEGER,
            created_at TEXT,
            display_date TEXT
        )",
        (),
    )?;

    Ok(())
}

/// Create the index over owner, category and creation time used by ordered note queries.
pub fn create_composite_index(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        &format!(
            "CREATE INDEX IF NOT EXISTS {COMPOSITE_INDEX_NAME} \
            ON note(user_id, category_id, created_at DESC)"
        ),
        (),
    )?;

    Ok(())
}

/// Drop the composite index so ordered note queries fall back to sorting in memory.
pub fn drop_composite_index(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(&format!("DROP INDEX IF EXISTS {COMPOSITE_INDEX_NAME}"), ())?;

    Ok(())
}

/// Insert a note and return it with its generated ID.
pub fn insert_note(
    owner: UserID,
    text: NoteText,
    category_id: Option<CategoryId>,
    created_at: Option<OffsetDateTime>,
    display_date: Option<String>,
    connection: &Connection,
) -> Result<Note, Error> {
    connection.execute(
        "INSERT INTO note (user_id, text, category_id, created_at, display_date) \
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            owner.as_i64(),
            text.as_ref(),
            category_id,
            created_at,
            display_date.as_deref(),
        ),
    )?;

    Ok(Note {
        id: connection.last_insert_rowid(),
        owner,
        text,
        category_id,
        created_at,
        display_date,
    })
}

/// Retrieve one of `owner`'s notes by ID.
#[cfg(test)]
pub fn get_note(owner: UserID, note_id: NoteId, connection: &Connection) -> Result<Note, Error> {
    connection
        .prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM note WHERE id = ?1 AND user_id = ?2"
        ))?
        .query_row((note_id, owner.as_i64()), map_note_row)
        .map_err(|error| error.into())
}

/// Delete one of `owner`'s notes.
///
/// # Errors
///
/// Returns [Error::DeleteMissingNote] if the note does not exist or belongs to someone else.
pub fn delete_note(owner: UserID, note_id: NoteId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM note WHERE id = ?1 AND user_id = ?2",
        (note_id, owner.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingNote);
    }

    Ok(())
}

/// The IDs of `owner`'s notes that reference `category_id`.
pub fn get_note_ids_in_category(
    owner: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Vec<NoteId>, Error> {
    connection
        .prepare("SELECT id FROM note WHERE user_id = ?1 AND category_id = ?2 ORDER BY id")?
        .query_map((owner.as_i64(), category_id), |row| row.get(0))?
        .map(|maybe_id| maybe_id.map_err(|error| error.into()))
        .collect()
}

pub(crate) fn map_note_row(row: &Row) -> Result<Note, rusqlite::Error> {
    let raw_text: String = row.get(2)?;

    Ok(Note {
        id: row.get(0)?,
        owner: UserID::new(row.get(1)?),
        text: NoteText::new_unchecked(&raw_text),
        category_id: row.get(3)?,
        created_at: row.get(4)?,
        display_date: row.get(5)?,
    })
}
