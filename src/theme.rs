//! Light/dark theme preference stored in a cookie.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use axum_htmx::HxRefresh;
use time::Duration;

pub(crate) const COOKIE_THEME: &str = "theme";

/// How long the theme preference is remembered.
const THEME_COOKIE_DURATION: Duration = Duration::days(365);

/// The colour scheme used to render pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Read the theme from the cookie jar, defaulting to [Theme::Light].
    pub fn from_jar(jar: &CookieJar) -> Self {
        match jar.get(COOKIE_THEME).map(|cookie| cookie.value_trimmed()) {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The value for the `theme-color` meta tag, which colours the browser UI of the installed app.
    pub fn theme_color(self) -> &'static str {
        match self {
            Theme::Light => "#4f46e5",
            Theme::Dark => "#6366f1",
        }
    }

    /// The icon on the toggle button, which shows the theme the button switches to.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

/// Switch between the light and dark theme and ask HTMX to reload the page.
pub async fn toggle_theme_endpoint(jar: CookieJar) -> Response {
    let theme = Theme::from_jar(&jar).toggled();
    tracing::debug!("Switching to the {} theme", theme.as_str());

    let jar = jar.add(
        Cookie::build((COOKIE_THEME, theme.as_str()))
            .path("/")
            .max_age(THEME_COOKIE_DURATION)
            .same_site(SameSite::Strict),
    );

    (StatusCode::OK, HxRefresh(true), jar).into_response()
}
