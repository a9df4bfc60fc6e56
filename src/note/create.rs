//! Note creation endpoint.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::UtcOffset;

use crate::{
    Error,
    auth::UserID,
    category::{CategoryId, get_category},
    note::{
        CategoryFilter, NoteFormData, NoteText, format_display_date, insert_note,
        page::{NotesState, note_list_error_response, render_note_list},
    },
    timezone::{now_utc_millis, require_local_offset},
};

/// Save a note from the editor and respond with the refreshed note list.
///
/// The note gets both a server timestamp and a display date in the
/// configured timezone.
pub async fn create_note_endpoint(
    State(state): State<NotesState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<NoteFormData>,
) -> Response {
    let text = match NoteText::new(&form.text) {
        Ok(text) => text,
        Err(error) => return error.into_alert_response(),
    };

    let current_filter = form
        .current_filter
        .as_deref()
        .and_then(|filter| filter.parse().ok())
        .unwrap_or(CategoryFilter::All);

    let local_offset = match require_local_offset(&state.local_timezone) {
        Ok(offset) => offset,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_note(
        user_id,
        text,
        &form.category_id,
        local_offset,
        &connection,
    ) {
        if !matches!(error, Error::InvalidCategory(_)) {
            tracing::error!("An unexpected error occurred while creating a note: {error}");
        }
        return error.into_alert_response();
    }

    match render_note_list(user_id, &current_filter, local_offset, &connection) {
        Ok(list) => list.into_response(),
        Err(error) => note_list_error_response(error),
    }
}

fn create_note(
    user_id: UserID,
    text: NoteText,
    raw_category_id: &str,
    local_offset: UtcOffset,
    connection: &Connection,
) -> Result<(), Error> {
    let category_id = parse_category_id(raw_category_id)?;

    if let Some(category_id) = category_id {
        match get_category(user_id, category_id, connection) {
            Ok(_) => {}
            Err(Error::NotFound) => return Err(Error::InvalidCategory(Some(category_id))),
            Err(error) => return Err(error),
        }
    }

    let created_at = now_utc_millis();
    let display_date = format_display_date(created_at, local_offset);

    insert_note(
        user_id,
        text,
        category_id,
        Some(created_at),
        Some(display_date),
        connection,
    )?;

    Ok(())
}

/// An empty string means no category.
fn parse_category_id(raw_category_id: &str) -> Result<Option<CategoryId>, Error> {
    let raw_category_id = raw_category_id.trim();

    if raw_category_id.is_empty() {
        return Ok(None);
    }

    raw_category_id
        .parse()
        .map(Some)
        .map_err(|_| Error::InvalidCategory(None))
}
