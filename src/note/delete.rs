//! Note deletion endpoint.

use axum::{
    Extension,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    auth::UserID,
    note::{
        CategoryFilter, NoteId, delete_note,
        page::{NotesState, note_list_error_response, render_note_list},
    },
    timezone::require_local_offset,
};

#[derive(Debug, Default, Deserialize)]
pub struct DeleteNoteQuery {
    pub current_filter: Option<String>,
}

/// Delete one of the user's notes and respond with the refreshed note list.
pub async fn delete_note_endpoint(
    State(state): State<NotesState>,
    Extension(user_id): Extension<UserID>,
    Path(note_id): Path<NoteId>,
    Query(query): Query<DeleteNoteQuery>,
) -> Response {
    let current_filter = query
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

    match delete_note(user_id, note_id, &connection) {
        Ok(()) => {}
        Err(Error::DeleteMissingNote) => return Error::DeleteMissingNote.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting note {note_id}: {error}");
            return error.into_alert_response();
        }
    }

    match render_note_list(user_id, &current_filter, local_offset, &connection) {
        Ok(list) => list.into_response(),
        Err(error) => note_list_error_response(error),
    }
}

#[cfg(test)]
mod delete_note_endpoint_tests {
    use axum::{
        Extension,
        extract::{FromRef, Path, Query, State},
        http::StatusCode,
    };

    use crate::{
        Error,
        auth::UserID,
        note::{NoteText, get_note, insert_note, page::NotesState},
        test_utils::{get_test_state, parse_html_fragment},
        timezone::now_utc_millis,
    };

    use super::{DeleteNoteQuery, delete_note_endpoint};

    const OWNER: UserID = UserID::new(1);

    fn add_note(state: &NotesState, owner: UserID, text: &str) -> i64 {
        let connection = state.db_connection.lock().unwrap();
        insert_note(
            owner,
            NoteText::new_unchecked(text),
            None,
            Some(now_utc_millis()),
            None,
            &connection,
        )
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn deletes_note_and_returns_list() {
        let state = NotesState::from_ref(&get_test_state());
        let note_id = add_note(&state, OWNER, "Buy milk");

        let response = delete_note_endpoint(
            State(state.clone()),
            Extension(OWNER),
            Path(note_id),
            Query(DeleteNoteQuery {
                current_filter: Some("uncategorized".to_owned()),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert!(html.html().contains("No notes yet. Start writing!"));
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_note(OWNER, note_id, &connection), Err(Error::NotFound));
    }

    #[tokio::test]
    async fn cannot_delete_another_users_note() {
        let state = NotesState::from_ref(&get_test_state());
        let note_id = add_note(&state, UserID::new(2), "Theirs");

        let response = delete_note_endpoint(
            State(state.clone()),
            Extension(OWNER),
            Path(note_id),
            Query(DeleteNoteQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let connection = state.db_connection.lock().unwrap();
        assert!(get_note(UserID::new(2), note_id, &connection).is_ok());
    }
}
