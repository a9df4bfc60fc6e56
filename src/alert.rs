//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as an out-of-band swap into the `#alert-container`
//! element of the base layout, so any HTMX response can carry one alongside
//! its regular content.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// A transient notification shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    SuccessSimple { message: String },
    Error { message: String, details: String },
    ErrorSimple { message: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::SuccessSimple { message } => ("alert alert-success", message, String::new()),
            Alert::Error { message, details } => ("alert alert-error", message, details),
            Alert::ErrorSimple { message } => ("alert alert-error", message, String::new()),
        };

        html! {
            div id="alert-container" hx-swap-oob="true" class="alert-container"
            {
                div class=(style) role="alert" data-dismiss-after="3000"
                {
                    p class="alert-message" { (message) }

                    @if !details.is_empty() {
                        p class="alert-details" { (details) }
                    }

                    button
                        type="button"
                        class="alert-dismiss"
                        aria-label="Dismiss"
                        onclick="this.parentElement.remove()"
                    {
                        "×"
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}

#[cfg(test)]
mod alert_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::test_utils::{assert_valid_html, parse_html_fragment};

    use super::Alert;

    #[tokio::test]
    async fn error_alert_shows_message_and_details() {
        let response = Alert::Error {
            message: "Could not save".to_owned(),
            details: "Operation failed: disk full".to_owned(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let alert = html
            .select(&Selector::parse("#alert-container .alert-error").unwrap())
            .next()
            .expect("No error alert found");
        let text = alert.text().collect::<String>();
        assert!(text.contains("Could not save"));
        assert!(text.contains("Operation failed: disk full"));
    }

    #[tokio::test]
    async fn simple_alert_omits_details() {
        let response = Alert::SuccessSimple {
            message: "Note saved!".to_owned(),
        }
        .into_response();

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let details = html
            .select(&Selector::parse(".alert-details").unwrap())
            .count();
        assert_eq!(details, 0);
    }
}
