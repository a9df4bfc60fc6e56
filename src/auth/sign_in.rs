//! The sign-in page and the handler for sign-in requests.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState,
    auth::{
        AuthErrorKind, SignInThrottle, UserID, invalidate_auth_cookie, normalize_redirect_url,
        provider, set_auth_cookie,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, auth_card, base, email_input,
        loading_spinner, password_input,
    },
    theme::Theme,
};

/// Shown when either field of the form is left empty.
pub const EMPTY_FIELDS_ERROR_MSG: &str = "Fill in all fields";

/// Which field an error message is shown under.
pub(super) enum FormError<'a> {
    Email(&'a str),
    Password(&'a str),
}

impl<'a> FormError<'a> {
    /// Malformed emails are reported on the email field, everything else on the password field.
    pub(super) fn for_kind(kind: &AuthErrorKind, message: &'a str) -> Self {
        match kind {
            AuthErrorKind::InvalidEmail
            | AuthErrorKind::UserNotFound
            | AuthErrorKind::EmailAlreadyInUse => FormError::Email(message),
            _ => FormError::Password(message),
        }
    }
}

/// The sign-in form. "Log in" submits to the sign-in endpoint and "Create account"
/// posts the same fields to the sign-up endpoint.
pub(super) fn sign_in_form(
    email: &str,
    error: Option<FormError>,
    redirect_url: Option<&str>,
) -> Markup {
    let (email_error, password_error) = match error {
        Some(FormError::Email(message)) => (Some(message), None),
        Some(FormError::Password(message)) => (None, Some(message)),
        None => (None, None),
    };

    html! {
        form
            hx-post=(endpoints::SIGN_IN_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="find button"
            class="auth-form"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (email_input(email, email_error))
            (password_input("", 0, password_error))

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="htmx-indicator" id="indicator" { (loading_spinner()) }
                "Log in"
            }

            button
                type="button"
                hx-post=(endpoints::SIGN_UP_API)
                class=(BUTTON_SECONDARY_STYLE)
            {
                "Create account"
            }
        }
    }
}

pub(super) fn parse_redirect_url(raw_url: Option<&str>) -> Option<String> {
    let raw_url = raw_url.filter(|url| !url.is_empty())?;
    let redirect_url = normalize_redirect_url(raw_url);

    if redirect_url.is_none() {
        tracing::warn!("Ignoring invalid redirect URL: {raw_url}");
    }

    redirect_url
}

/// The query string of the sign-in page.
#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// Display the sign-in page.
pub async fn get_sign_in_page(jar: CookieJar, Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref());
    let form = sign_in_form("", None, redirect_url.as_deref());
    let content = auth_card("Sign in to your notes", &form);

    base("Sign In", Theme::from_jar(&jar), &content).into_response()
}

/// The state needed to sign in or sign up.
#[derive(Debug, Clone)]
pub struct SignInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
    pub sign_in_throttle: Arc<SignInThrottle>,
}

impl FromRef<AppState> for SignInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
            sign_in_throttle: state.sign_in_throttle.clone(),
        }
    }
}

impl FromRef<SignInState> for Key {
    fn from_ref(state: &SignInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the sign-in form.
///
/// Missing fields deserialize as empty strings so they get the same inline
/// message as fields left blank.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SignInData {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Where to go after signing in, only accepted if it is a local path.
    pub redirect_url: Option<String>,
}

impl SignInData {
    pub(super) fn has_empty_fields(&self) -> bool {
        self.email.trim().is_empty() || self.password.is_empty()
    }
}

/// Set the session cookie and send the client on to `redirect_url`.
pub(super) fn signed_in_response(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
    redirect_url: &str,
) -> Response {
    match set_auth_cookie(jar.clone(), user_id, duration) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(redirect_url.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}

/// Handler for sign-in requests via the POST method.
///
/// On success the session cookie is set and the client is redirected to the
/// notes page, or the page it was on before being asked to sign in.
/// Otherwise the form is returned with the reason under the relevant field.
pub async fn post_sign_in(
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

    let result = match state.db_connection.lock() {
        Ok(connection) => provider::sign_in(
            &connection,
            &state.sign_in_throttle,
            &form.email,
            &form.password,
        ),
        Err(_) => {
            tracing::error!("Could not acquire the database lock to sign in");
            Err(AuthErrorKind::NetworkRequestFailed)
        }
    };

    match result {
        Ok(user) => {
            tracing::info!("User {} signed in", user.id);
            signed_in_response(
                jar,
                user.id,
                state.cookie_duration,
                redirect_url.as_deref().unwrap_or(endpoints::NOTES_VIEW),
            )
        }
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


#[cfg(test)]
mod sign_in_tests {
    use axum::{
        Form,
        body::Body,
        extract::State,
        http::{Response, StatusCode},
    };
    use axum_extra::extract::PrivateCookieJar;

    use crate::{
        auth::{AuthErrorKind, provider, set_user_disabled},
        endpoints,
        test_utils::{assert_hx_redirect, get_test_state, must_get_form, parse_html_fragment},
    };

    use super::{EMPTY_FIELDS_ERROR_MSG, SignInData, SignInState, post_sign_in};

    const EMAIL: &str = "me@example.com";
    const PASSWORD: &str = "correct horse battery staple";

    fn state_with_user() -> SignInState {
        let state = get_test_state();
        provider::sign_up(&state.db_connection.lock().unwrap(), EMAIL, PASSWORD, 4)
            .expect("Could not create test user");

        SignInState {
            cookie_key: state.cookie_key,
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection,
            sign_in_throttle: state.sign_in_throttle,
        }
    }

    async fn new_sign_in_request(state: SignInState, form: SignInData) -> Response<Body> {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        post_sign_in(State(state), jar, Form(form)).await
    }

    fn form(email: &str, password: &str) -> SignInData {
        SignInData {
            email: email.to_owned(),
            password: password.to_owned(),
            redirect_url: None,
        }
    }

    async fn assert_form_error(response: Response<Body>, want: &str) {
        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        let error = form
            .select(&scraper::Selector::parse("p.form-error").unwrap())
            .next()
            .expect("no error message")
            .text()
            .collect::<String>();
        assert_eq!(error.trim(), want);
    }

    #[tokio::test]
    async fn sign_in_succeeds_with_valid_credentials() {
        let response = new_sign_in_request(state_with_user(), form(EMAIL, PASSWORD)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::NOTES_VIEW);
        assert!(response.headers().get("set-cookie").is_some());
    }

    #[tokio::test]
    async fn sign_in_redirects_to_requested_url() {
        let mut sign_in_form = form(EMAIL, PASSWORD);
        sign_in_form.redirect_url = Some("/notes?category=uncategorized".to_owned());

        let response = new_sign_in_request(state_with_user(), sign_in_form).await;

        assert_hx_redirect(&response, "/notes?category=uncategorized");
    }

    #[tokio::test]
    async fn empty_fields_are_rejected_before_lookup() {
        let response = new_sign_in_request(state_with_user(), form(EMAIL, "")).await;

        assert_form_error(response, EMPTY_FIELDS_ERROR_MSG).await;
    }

    #[tokio::test]
    async fn wrong_password_shows_message() {
        let response = new_sign_in_request(state_with_user(), form(EMAIL, "wrong horse")).await;

        assert_form_error(response, &AuthErrorKind::WrongPassword.message()).await;
    }

    #[tokio::test]
    async fn unknown_email_shows_message() {
        let response =
            new_sign_in_request(state_with_user(), form("nobody@example.com", PASSWORD)).await;

        assert_form_error(response, &AuthErrorKind::UserNotFound.message()).await;
    }

    #[tokio::test]
    async fn disabled_user_shows_message() {
        let state = state_with_user();
        {
            let connection = state.db_connection.lock().unwrap();
            let user = crate::auth::get_user_by_email(
                &crate::auth::Email::new_unchecked(EMAIL),
                &connection,
            )
            .unwrap();
            set_user_disabled(user.id, true, &connection).unwrap();
        }

        let response = new_sign_in_request(state, form(EMAIL, PASSWORD)).await;

        assert_form_error(response, &AuthErrorKind::UserDisabled.message()).await;
    }
}
