use axum::response::Html;

/// Serve the upload page
pub async fn handle_index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
