//! Database operations for categories.
//!
//! Every query is scoped to the owning user. Categories are deleted through a
//! [WriteBatch](crate::batch::WriteBatch) together with their notes' references.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryColor, CategoryId, CategoryName},
};

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id, created_at);",
    )?;

    Ok(())
}

/// Create a category and return it with its generated ID.
///
/// Names are not unique in the table. Callers check for duplicates first.
pub fn create_category(
    owner: UserID,
    name: CategoryName,
    color: CategoryColor,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (user_id, name, color, created_at) VALUES (?1, ?2, ?3, ?4);",
        (owner.as_i64(), name.as_ref(), color.as_ref(), created_at),
    )?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        owner,
        name,
        color,
        created_at,
    })
}

/// Retrieve one of `owner`'s categories by ID.
pub fn get_category(
    owner: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, color, created_at FROM category \
            WHERE id = :id AND user_id = :user_id;",
        )?
        .query_row(
            &[(":id", &category_id), (":user_id", &owner.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of `owner`'s categories, oldest first.
pub fn get_categories(owner: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, color, created_at FROM category \
            WHERE user_id = ?1 ORDER BY created_at ASC, id ASC;",
        )?
        .query_map([owner.as_i64()], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(2)?;
    let raw_color: String = row.get(3)?;

    Ok(Category {
        id: row.get(0)?,
        owner: UserID::new(row.get(1)?),
        name: CategoryName::new_unchecked(&raw_name),
        color: CategoryColor::new_unchecked(&raw_color),
        created_at: row.get(4)?,
    })
}
