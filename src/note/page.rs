//! The notes page and the note list fragment.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use axum_htmx::{HxReswap, SwapOption};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::UtcOffset;

use crate::{
    AppState, Error,
    auth::{UserID, get_user_by_id},
    category::{category_select, category_sidebar, get_categories, new_category_form},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    note::{
        CategoryFilter, QueryPath, SqliteNoteStore, load_notes,
        view::{NOTE_LIST_ID, note_list, note_list_link},
    },
    theme::Theme,
    timezone::require_local_offset,
};

/// The state needed for the notes page and the note list.
#[derive(Debug, Clone)]
pub struct NotesState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for NotesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The `category` query parameter of the notes page and note list.
#[derive(Debug, Default, Deserialize)]
pub struct NotesQuery {
    pub category: Option<String>,
}

impl NotesQuery {
    /// A missing parameter means all notes.
    pub fn filter(&self) -> Result<CategoryFilter, Error> {
        match self.category.as_deref() {
            None | Some("") => Ok(CategoryFilter::All),
            Some(text) => text.parse(),
        }
    }
}

/// Load and render `user_id`'s notes for `filter`.
pub(crate) fn render_note_list(
    user_id: UserID,
    filter: &CategoryFilter,
    local_offset: UtcOffset,
    connection: &Connection,
) -> Result<Markup, Error> {
    let categories = get_categories(user_id, connection)?;
    let loaded = load_notes(
        &SqliteNoteStore::new(connection),
        user_id,
        *filter,
        local_offset,
    )?;

    if loaded.path == QueryPath::Fallback {
        tracing::debug!("Sorted {} notes in memory", loaded.notes.len());
    }

    Ok(note_list(&loaded.notes, filter, &categories, local_offset))
}

/// Respond with a failed list load as a notification, leaving the displayed list alone.
pub(crate) fn note_list_error_response(error: Error) -> Response {
    tracing::error!("Could not load notes: {error}");
    let response = error.into_alert_response();

    (HxReswap(SwapOption::None), response).into_response()
}

/// The note list as an HTML fragment, used to refresh the list in place.
pub async fn get_note_list(
    State(state): State<NotesState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<NotesQuery>,
) -> Response {
    let filter = match query.filter() {
        Ok(filter) => filter,
        Err(error) => return error.into_alert_response(),
    };

    let local_offset = match require_local_offset(&state.local_timezone) {
        Ok(offset) => offset,
        Err(error) => return note_list_error_response(error),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return note_list_error_response(Error::DatabaseLockError);
        }
    };

    match render_note_list(user_id, &filter, local_offset, &connection) {
        Ok(list) => list.into_response(),
        Err(error) => note_list_error_response(error),
    }
}

/// Render the notes page for the signed in user.
pub async fn get_notes_page(
    State(state): State<NotesState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
    Query(query): Query<NotesQuery>,
) -> Response {
    let filter = match query.filter() {
        Ok(filter) => filter,
        Err(error) => return error.into_response(),
    };

    let local_offset = match require_local_offset(&state.local_timezone) {
        Ok(offset) => offset,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let user = match get_user_by_id(user_id, &connection) {
        Ok(user) => user,
        Err(error) => {
            tracing::error!("Could not get signed in user {user_id}: {error}");
            return error.into_response();
        }
    };

    let categories = match get_categories(user_id, &connection) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Could not get categories for user {user_id}: {error}");
            return error.into_response();
        }
    };

    // If loading fails here the list loads itself, so the error shows up as a notification.
    let list = match render_note_list(user_id, &filter, local_offset, &connection) {
        Ok(list) => list,
        Err(error) => {
            tracing::error!("Could not load notes for user {user_id}: {error}");
            note_list_placeholder(&filter)
        }
    };

    let selected_category = match filter {
        CategoryFilter::Category(id) => Some(id),
        _ => None,
    };

    let theme = Theme::from_jar(&jar);
    let content = html! {
        header class="app-header"
        {
            h1 class="app-title" { "Notes" }

            div class="app-actions"
            {
                button
                    type="button"
                    id="install-button"
                    class=(BUTTON_SECONDARY_STYLE)
                    hidden
                {
                    "Install app"
                }

                button
                    type="button"
                    class="btn-icon theme-toggle"
                    title="Toggle theme"
                    aria-label="Toggle theme"
                    hx-post=(endpoints::THEME_API)
                {
                    (theme.toggle_icon())
                }

                span class="user-email" { (user.email) }

                a href=(endpoints::SIGN_OUT) class=(BUTTON_SECONDARY_STYLE) { "Sign out" }
            }
        }

        div class=(PAGE_CONTAINER_STYLE)
        {
            aside class="sidebar-container"
            {
                (category_sidebar(&categories, &filter, false))
                (new_category_form(&filter, None))
            }

            main class="notes-main"
            {
                form
                    id="note-editor"
                    class="note-editor"
                    hx-post=(endpoints::NOTES_API)
                    hx-target={ "#" (NOTE_LIST_ID) }
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    hx-disabled-elt="find button[type=submit]"
                    "hx-on::after-request"="if (event.detail.successful) this.querySelector('textarea').value = ''"
                {
                    input type="hidden" name="current_filter" value=(filter);

                    textarea
                        name="text"
                        class=(FORM_TEXT_INPUT_STYLE)
                        rows="4"
                        placeholder="Write a note... (Ctrl+Enter to save)"
                        aria-label="Note text"
                        data-submit-on-ctrl-enter
                        required
                    {}

                    div class="editor-actions"
                    {
                        (category_select(&categories, selected_category, false))

                        button type="reset" class=(BUTTON_SECONDARY_STYLE) { "Clear" }

                        button type="submit" class=(BUTTON_PRIMARY_STYLE)
                        {
                            span class="htmx-indicator" { (loading_spinner()) }
                            "Save"
                        }
                    }
                }

                (list)
            }
        }
    };

    (StatusCode::OK, base("My Notes", theme, &content)).into_response()
}

/// An empty list that loads itself as soon as it is on the page.
fn note_list_placeholder(filter: &CategoryFilter) -> Markup {
    html! {
        section
            id=(NOTE_LIST_ID)
            class="note-list"
            hx-get=(note_list_link(filter))
            hx-trigger="load"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
        {
            (loading_spinner())
        }
    }
}
