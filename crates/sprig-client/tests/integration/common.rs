use axum::Router;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use tokio::net::TcpListener;

use sprig_client::HttpClient;

/// Latin-1 encoded page; not valid UTF-8.
pub const NON_UTF8_PAGE: &[u8] = b"<html><body>Jos\xE9</body></html>";

pub const IMAGE_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg-payload\xFF\xD9";

/// Profile page in the Linktree layout; `image` is a path on the test server.
pub fn profile_html(base: &str, profile_title: Option<&str>, image: Option<&str>) -> String {
    let name = profile_title
        .map(|n| format!(r#"<div id="profile-title">{n}</div>"#))
        .unwrap_or_default();
    let img = image
        .map(|p| format!(r#"<img data-testid="ProfileImage" src="{base}{p}">"#))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html>
  <head><title>Jane | Linktree</title></head>
  <body>
    {img}
    {name}
    <a data-testid="LinkButton" href="https://example.com"><div><p>My Site</p></div></a>
    <a data-testid="SocialIcon" href="https://instagram.com/jane"><title title="Instagram"></title></a>
  </body>
</html>"#
    )
}

/// Spin up an in-process server with fixture routes. Returns its base URL.
pub async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let app = {
        let b = base.clone();
        let page_a = profile_html(&b, Some("Jane Doe"), None);
        let page_b = profile_html(&b, Some("Jane Doe"), Some("/img/missing.jpg"));
        let page_ok = profile_html(&b, Some("Jane Doe"), Some("/img/ok.jpg"));
        let page_c = profile_html(&b, None, Some("/img/ok.jpg"));

        Router::new()
            .route("/jane", get(move || async move { Html(page_a) }))
            .route("/jane-404-image", get(move || async move { Html(page_b) }))
            .route("/jane-with-image", get(move || async move { Html(page_ok) }))
            .route("/no-profile-title", get(move || async move { Html(page_c) }))
            .route("/empty", get(|| async { Html("") }))
            .route(
                "/latin1",
                get(|| async {
                    ([(header::CONTENT_TYPE, "text/html")], NON_UTF8_PAGE).into_response()
                }),
            )
            .route(
                "/broken",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
            )
            .route(
                "/img/ok.jpg",
                get(|| async { ([(header::CONTENT_TYPE, "image/jpeg")], IMAGE_BYTES).into_response() }),
            )
    };

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    base
}

pub fn local_http() -> HttpClient {
    HttpClient::new().unwrap().allow_private_urls()
}
