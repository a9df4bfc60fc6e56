use maud::{DOCTYPE, Markup, html};

use crate::{endpoints, theme::Theme};

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "btn btn-primary";
pub const BUTTON_SECONDARY_STYLE: &str = "btn btn-secondary";
pub const BUTTON_DELETE_STYLE: &str = "btn-icon btn-delete";

// Form styles
pub const FORM_LABEL_STYLE: &str = "form-label";
pub const FORM_TEXT_INPUT_STYLE: &str = "form-input";

// Page container
pub const PAGE_CONTAINER_STYLE: &str = "page";

/// The colour used for notes without a category.
pub const NEUTRAL_COLOR: &str = "#6b7280";

pub fn base(title: &str, theme: Theme, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" data-theme=(theme.as_str()) class=[(theme == Theme::Dark).then_some("dark")]
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="theme-color" content=(theme.theme_color());
                title { (title) " - Notes" }
                link rel="manifest" href=(endpoints::WEB_MANIFEST);
                link rel="icon" type="image/svg+xml" href="/static/icon.svg";
                link href="/static/styles.css" rel="stylesheet";

                script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4/response-targets.js" {}

                script src="/static/app.js" defer {}
            }

            body hx-ext="response-targets"
            {
                (content)

                // Alert container for out-of-band swaps
                div id="alert-container" class="alert-container" {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class="error-page"
        {
            h1 class="error-code" { (header) }
            p class="error-description" { (description) }
            p class="error-fix" { (fix) }

            a href=(endpoints::ROOT) class=(BUTTON_PRIMARY_STYLE) { "Back to Homepage" }
        }
    );

    base(title, Theme::default(), &content)
}

/// The card layout shared by the sign-in and sign-up forms.
pub fn auth_card(form_title: &str, form: &Markup) -> Markup {
    html! {
        div class="auth-screen"
        {
            a href=(endpoints::ROOT) class="auth-logo"
            {
                img src="/static/icon.svg" alt="logo" width="32" height="32";
                "Notes"
            }

            div class="auth-card"
            {
                h1 class="auth-title" { (form_title) }

                (form)
            }
        }
    }
}

pub fn email_input(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="email" class=(FORM_LABEL_STYLE) { "Email" }

            input
                type="email"
                name="email"
                id="email"
                placeholder="name@example.com"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus
                value=(email);

            @if let Some(error_message) = error_message
            {
                p class="form-error" { (error_message) }
            }
        }
    }
}

pub fn password_input(password: &str, min_length: usize, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="password" class=(FORM_LABEL_STYLE) { "Password" }

            input
                type="password"
                name="password"
                id="password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                value=(password)
                minlength=(min_length);

            @if let Some(error_message) = error_message
            {
                p class="form-error" { (error_message) }
            }
        }
    }
}

pub fn loading_spinner() -> Markup {
    html! {
        span class="spinner" aria-hidden="true" role="status" {}
    }
}
