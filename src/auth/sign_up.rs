//! Handler for creating an account from the sign-in form.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    auth::{
        AuthErrorKind, PasswordHash,
        password::check_password_length,
        provider,
        sign_in::{
            EMPTY_FIELDS_ERROR_MSG, FormError, SignInData, SignInState, parse_redirect_url,
            sign_in_form, signed_in_response,
        },
    },
    endpoints,
};

/// Create an account with the email and password from the sign-in form and sign it in.
///
/// Empty fields and short passwords are rejected before the user store is touched.
pub async fn post_sign_up(
    State(state): State<SignInState>,
    jar: PrivateCookieJar,
    Form(form): Form<SignInData>,
) -> Response {
    let redirect_url = parse_redirect_url(form.redirect_url.as_deref());

    if form.has_empty_fields() {
        return sign_in_form(
            &form.email,
            Some(FormError::Password(EMPTY_FIELDS_ERROR_MSG)),
            redirect_url.as_deref(),
        )
        .into_response();
    }

    if let Err(error) = check_password_length(&form.password) {
        let message = error.to_string();
        return sign_in_form(
            &form.email,
            Some(FormError::Password(&message)),
            redirect_url.as_deref(),
        )
        .into_response();
    }

    let result = match state.db_connection.lock() {
        Ok(connection) => provider::sign_up(
            &connection,
            &form.email,
            &form.password,
            PasswordHash::DEFAULT_COST,
        ),
        Err(_) => {
            tracing::error!("Could not acquire the database lock to sign up");
            Err(AuthErrorKind::NetworkRequestFailed)
        }
    };

    match result {
        Ok(user) => signed_in_response(
            jar,
            user.id,
            state.cookie_duration,
            redirect_url.as_deref().unwrap_or(endpoints::NOTES_VIEW),
        ),
        Err(kind) => {
            let message = kind.message();
            sign_in_form(
                &form.email,
                Some(FormError::for_kind(&kind, &message)),
                redirect_url.as_deref(),
            )
            .into_response()
        }
    }
}
