//! Text notes, the notes page and the resilient note query.

mod create;
mod db;
mod delete;
mod domain;
mod page;
mod query;
mod view;

pub use create::create_note_endpoint;
pub use db::{
    COMPOSITE_INDEX_NAME, create_composite_index, create_note_table, delete_note,
    drop_composite_index, get_note_ids_in_category, insert_note,
};
pub use delete::delete_note_endpoint;
pub use domain::{
    Note, NoteFormData, NoteId, NoteText, format_display_date, parse_display_date,
};
pub use page::{NotesState, get_note_list, get_notes_page};
pub use query::{
    CategoryFilter, LoadedNotes, NoteQuery, NoteSource, QueryPath, SortOrder, SqliteNoteStore,
    effective_timestamp, load_notes, visible_notes,
};

#[cfg(test)]
pub use db::get_note;
