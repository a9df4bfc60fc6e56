//! Category creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::UserID,
    category::{
        CategoryColor, CategoryName, create_category,
        db::get_categories,
        domain::CategoryFormData,
        view::{category_select, category_sidebar, new_category_form},
    },
    note::CategoryFilter,
    timezone::now_utc_millis,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle the new category form.
///
/// Invalid or duplicate names are shown under the form without writing
/// anything. On success the form is cleared and the sidebar and the editor's
/// category picker are swapped out-of-band.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let current_filter = form
        .current_filter
        .as_deref()
        .and_then(|filter| filter.parse().ok())
        .unwrap_or_default();

    let (name, color) = match validate(&form) {
        Ok(fields) => fields,
        Err(error) => {
            return new_category_form(&current_filter, Some(&error.to_string())).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let mut categories = match get_categories(user_id, &connection) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Could not load categories for user {user_id}: {error}");
            return error.into_alert_response();
        }
    };

    // Checked against the list just loaded, so two simultaneous requests can both pass.
    if categories
        .iter()
        .any(|category| category.name.eq_ignore_case(&name))
    {
        let error = Error::DuplicateCategoryName(name.to_string());
        return new_category_form(&current_filter, Some(&error.to_string())).into_response();
    }

    let category = match create_category(user_id, name, color, now_utc_millis(), &connection) {
        Ok(category) => category,
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a category: {error}");
            return error.into_alert_response();
        }
    };

    let selected = match current_filter {
        CategoryFilter::Category(id) => Some(id),
        _ => None,
    };
    let message = format!("Category \"{}\" created", category.name);
    categories.push(category);

    html! {
        (new_category_form(&current_filter, None))
        (category_sidebar(&categories, &current_filter, true))
        (category_select(&categories, selected, true))
        (Alert::SuccessSimple { message }.into_html())
    }
    .into_response()
}

fn validate(form: &CategoryFormData) -> Result<(CategoryName, CategoryColor), Error> {
    let name = CategoryName::new(&form.name)?;
    let color = match form.color.as_deref() {
        Some(color) if !color.trim().is_empty() => CategoryColor::new(color)?,
        _ => CategoryColor::default(),
    };

    Ok((name, color))
}
