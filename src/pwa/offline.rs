//! The page cached with the app shell and shown when a page cannot be loaded offline.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base},
    theme::Theme,
};

/// The offline page is cached at install time, so it does not depend on the
/// session or the theme cookie.
pub async fn get_offline_page() -> Markup {
    let content = html! {
        section class="error-page"
        {
            h1 class="error-code" { "Offline" }
            p class="error-description" { "You're offline." }
            p class="error-fix" { "Your notes will load again once you are back online." }

            a href=(endpoints::NOTES_VIEW) class=(BUTTON_PRIMARY_STYLE) { "Try again" }
        }
    };

    base("Offline", Theme::default(), &content)
}

#[cfg(test)]
mod offline_page_tests {
    use axum::response::IntoResponse;
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{assert_content_type, assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::get_offline_page;

    #[tokio::test]
    async fn offline_page_links_back_to_notes() {
        let response = get_offline_page().await.into_response();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let link = html
            .select(&Selector::parse("a.btn").unwrap())
            .next()
            .expect("No link found");
        assert_eq!(link.value().attr("href"), Some(endpoints::NOTES_VIEW));
    }
}
