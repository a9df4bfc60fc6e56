//! Groups several writes so they are committed together or not at all.

use rusqlite::Connection;

use crate::{Error, auth::UserID, category::CategoryId, note::NoteId};

/// A single write in a [WriteBatch].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Point one of `owner`'s notes at a category, or at none.
    UpdateNoteCategory {
        owner: UserID,
        note_id: NoteId,
        category_id: Option<CategoryId>,
    },
    /// Delete one of `owner`'s categories.
    DeleteCategory {
        owner: UserID,
        category_id: CategoryId,
    },
}

/// An ordered list of writes applied in a single SQL transaction.
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: BatchOp) {
        self.ops.push(op);
    }

    /// Apply every write in order, rolling all of them back if any one fails.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [Error::NotFound] if a note to update does not exist or belongs to someone else,
    /// - [Error::DeleteMissingCategory] if the category to delete does not exist,
    /// - [Error::SqlError] for any other SQL error.
    pub fn commit(self, connection: &Connection) -> Result<(), Error> {
        // The connection is already behind the app's mutex, so there are no nested transactions.
        let transaction = connection.unchecked_transaction()?;

        for op in &self.ops {
            match op {
                BatchOp::UpdateNoteCategory {
                    owner,
                    note_id,
                    category_id,
                } => {
                    let rows_affected = transaction.execute(
                        "UPDATE note SET category_id = ?1 WHERE id = ?2 AND user_id = ?3",
                        (category_id, note_id, owner.as_i64()),
                    )?;

                    if rows_affected == 0 {
                        return Err(Error::NotFound);
                    }
                }
                BatchOp::DeleteCategory { owner, category_id } => {
                    let rows_affected = transaction.execute(
                        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
                        (category_id, owner.as_i64()),
                    )?;

                    if rows_affected == 0 {
                        return Err(Error::DeleteMissingCategory);
                    }
                }
            }
        }

        transaction.commit()?;

        Ok(())
    }
}
