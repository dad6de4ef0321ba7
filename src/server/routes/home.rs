//! Home page serving the prediction form

use axum::response::Html;

const INTERFACE_HTML: &str = include_str!("../../../ui/interface.html");

/// GET / - Prediction form
pub async fn home() -> Html<&'static str> {
    Html(INTERFACE_HTML)
}
