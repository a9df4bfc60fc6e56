//! Creates the application's tables and indexes.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, auth::create_user_table, category::create_category_table, note};

/// Options that control how the database schema is created.
#[derive(Debug, Clone, Copy)]
pub struct DbOptions {
    /// Whether to create the composite index that ordered note queries need.
    ///
    /// Without it, note lists are fetched unordered and sorted in memory.
    pub composite_index: bool,
}

impl Default for DbOptions {
    fn default() -> Self {
        Self {
            composite_index: true,
        }
    }
}

/// Create the tables if they do not already exist, and create or drop the
/// composite note index to match `options`.
///
/// # Errors
/// Returns an error if any of the SQL statements fail.
pub fn initialize(connection: &Connection, options: DbOptions) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    note::create_note_table(&transaction)?;

    if options.composite_index {
        note::create_composite_index(&transaction)?;
    } else {
        note::drop_composite_index(&transaction)?;
    }

    transaction.commit()?;

    Ok(())
}

/// Check whether an index named `index_name` exists.
pub fn index_exists(connection: &Connection, index_name: &str) -> Result<bool, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(1) FROM sqlite_master WHERE type = 'index' AND name = ?1",
        [index_name],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use crate::note::COMPOSITE_INDEX_NAME;

    use super::{DbOptions, index_exists, initialize};

    #[test]
    fn creates_composite_index_by_default() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection, DbOptions::default()).expect("Could not initialize database");

        assert_eq!(index_exists(&connection, COMPOSITE_INDEX_NAME), Ok(true));
    }

    #[test]
    fn skips_composite_index_when_disabled() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(
            &connection,
            DbOptions {
                composite_index: false,
            },
        )
        .expect("Could not initialize database");

        assert_eq!(index_exists(&connection, COMPOSITE_INDEX_NAME), Ok(false));
    }

    #[test]
    fn disabling_composite_index_drops_existing_index() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection, DbOptions::default()).unwrap();

        initialize(
            &connection,
            DbOptions {
                composite_index: false,
            },
        )
        .expect("Could not initialize database");

        assert_eq!(index_exists(&connection, COMPOSITE_INDEX_NAME), Ok(false));
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection, DbOptions::default()).unwrap();

        assert!(initialize(&connection, DbOptions::default()).is_ok());
    }
}
