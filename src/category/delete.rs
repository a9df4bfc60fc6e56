//! Category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::{HxRedirect, HxRefresh};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    batch::{BatchOp, WriteBatch},
    category::{CategoryId, view::notes_link},
    note::{CategoryFilter, get_note_ids_in_category},
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteCategoryQuery {
    pub current_filter: Option<String>,
}

/// Delete a category and move its notes to "uncategorized".
///
/// The notes are updated and the category deleted in one batch, so either
/// all of it happens or none of it does. If the user is looking at the
/// deleted category they are sent back to all notes, otherwise the page is
/// refreshed.
pub async fn delete_category_endpoint(
    State(state): State<DeleteCategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    Query(query): Query<DeleteCategoryQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let note_ids = match get_note_ids_in_category(user_id, category_id, &connection) {
        Ok(note_ids) => note_ids,
        Err(error) => {
            tracing::error!("Could not get the notes in category {category_id}: {error}");
            return error.into_alert_response();
        }
    };

    let note_count = note_ids.len();
    let mut batch = WriteBatch::new();
    for note_id in note_ids {
        batch.push(BatchOp::UpdateNoteCategory {
            owner: user_id,
            note_id,
            category_id: None,
        });
    }
    batch.push(BatchOp::DeleteCategory {
        owner: user_id,
        category_id,
    });

    match batch.commit(&connection) {
        Ok(()) => {
            tracing::info!(
                "Deleted category {category_id} and uncategorized {note_count} of its notes"
            );
        }
        Err(Error::DeleteMissingCategory) => {
            return Error::DeleteMissingCategory.into_alert_response();
        }
        Err(error) => {
            tracing::error!("Could not delete category {category_id}: {error}");
            return error.into_alert_response();
        }
    }

    let current_filter = query
        .current_filter
        .as_deref()
        .and_then(|filter| filter.parse::<CategoryFilter>().ok());

    if current_filter == Some(CategoryFilter::Category(category_id)) {
        (HxRedirect(notes_link(&CategoryFilter::All)), StatusCode::OK).into_response()
    } else {
        (HxRefresh(true), StatusCode::OK).into_response()
    }
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::UserID,
        category::{Category, CategoryColor, CategoryName, create_category, get_category},
        db::{DbOptions, initialize},
        note::{NoteText, get_note, insert_note},
        test_utils::{assert_hx_redirect, get_header, parse_html_fragment},
        timezone::now_utc_millis,
    };

    use super::{DeleteCategoryQuery, DeleteCategoryState, delete_category_endpoint};

    const OWNER: UserID = UserID::new(1);

    fn get_state() -> DeleteCategoryState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection, DbOptions::default()).expect("Could not initialize database");

        DeleteCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn add_category(state: &DeleteCategoryState, owner: UserID, name: &str) -> Category {
        let connection = state.db_connection.lock().unwrap();
        create_category(
            owner,
            CategoryName::new_unchecked(name),
            CategoryColor::default(),
            now_utc_millis(),
            &connection,
        )
        .unwrap()
    }

    fn add_note(state: &DeleteCategoryState, owner: UserID, category_id: Option<i64>) -> i64 {
        let connection = state.db_connection.lock().unwrap();
        insert_note(
            owner,
            NoteText::new_unchecked("note"),
            category_id,
            Some(now_utc_millis()),
            None,
            &connection,
        )
        .unwrap()
        .id
    }

    fn query(filter: &str) -> Query<DeleteCategoryQuery> {
        Query(DeleteCategoryQuery {
            current_filter: Some(filter.to_owned()),
        })
    }

    #[tokio::test]
    async fn deleting_category_uncategorizes_its_notes() {
        let state = get_state();
        let work = add_category(&state, OWNER, "Work");
        let home = add_category(&state, OWNER, "Home");
        let work_notes = [
            add_note(&state, OWNER, Some(work.id)),
            add_note(&state, OWNER, Some(work.id)),
            add_note(&state, OWNER, Some(work.id)),
        ];
        let home_note = add_note(&state, OWNER, Some(home.id));

        let response = delete_category_endpoint(
            State(state.clone()),
            Extension(OWNER),
            Path(work.id),
            query("all"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-refresh"), "true");
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_category(OWNER, work.id, &connection), Err(Error::NotFound));
        for note_id in work_notes {
            assert_eq!(get_note(OWNER, note_id, &connection).unwrap().category_id, None);
        }
        assert_eq!(
            get_note(OWNER, home_note, &connection).unwrap().category_id,
            Some(home.id)
        );
    }

    #[tokio::test]
    async fn deleting_the_viewed_category_redirects_to_all_notes() {
        let state = get_state();
        let work = add_category(&state, OWNER, "Work");

        let response = delete_category_endpoint(
            State(state),
            Extension(OWNER),
            Path(work.id),
            query(&work.id.to_string()),
        )
        .await;

        assert_hx_redirect(&response, "/notes?category=all");
    }

    #[tokio::test]
    async fn cannot_delete_another_users_category() {
        let state = get_state();
        let theirs = add_category(&state, UserID::new(2), "Theirs");
        let their_note = add_note(&state, UserID::new(2), Some(theirs.id));

        let response = delete_category_endpoint(
            State(state.clone()),
            Extension(OWNER),
            Path(theirs.id),
            query("all"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert!(html.html().contains("Could not delete category"));
        let connection = state.db_connection.lock().unwrap();
        assert!(get_category(UserID::new(2), theirs.id, &connection).is_ok());
        assert_eq!(
            get_note(UserID::new(2), their_note, &connection)
                .unwrap()
                .category_id,
            Some(theirs.id)
        );
    }

    #[tokio::test]
    async fn deleting_missing_category_returns_not_found() {
        let state = get_state();

        let response = delete_category_endpoint(
            State(state),
            Extension(OWNER),
            Path(404),
            Query(DeleteCategoryQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
