//! The web app manifest that makes the app installable.

use axum::{Json, http::header::CONTENT_TYPE, response::IntoResponse};
use serde::Serialize;

use crate::{endpoints, theme::Theme};

#[derive(Debug, Serialize)]
struct ManifestIcon {
    src: &'static str,
    sizes: &'static str,
    #[serde(rename = "type")]
    mime_type: &'static str,
}

#[derive(Debug, Serialize)]
struct WebAppManifest {
    name: &'static str,
    short_name: &'static str,
    start_url: &'static str,
    display: &'static str,
    theme_color: &'static str,
    background_color: &'static str,
    icons: [ManifestIcon; 1],
}

fn web_app_manifest() -> WebAppManifest {
    WebAppManifest {
        name: "Notes",
        short_name: "Notes",
        start_url: endpoints::NOTES_VIEW,
        display: "standalone",
        theme_color: Theme::Light.theme_color(),
        background_color: "#ffffff",
        icons: [ManifestIcon {
            src: "/static/icon.svg",
            sizes: "any",
            mime_type: "image/svg+xml",
        }],
    }
}

pub async fn get_web_manifest() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "application/manifest+json")],
        Json(web_app_manifest()),
    )
}
