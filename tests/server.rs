use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use verse_caption_renderer::CaptionRenderer;
use verse_caption_renderer::caption::CaptionFont;
use verse_caption_renderer::server::{ServerState, router};
use verse_caption_renderer::settings::Settings;

fn app() -> Router {
    router(ServerState::new(
        Settings::default(),
        CaptionRenderer::new(CaptionFont::system().expect("system font")),
    ))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").map(|v| v.as_bytes()),
        Some(&b"*"[..])
    );
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn settings_exposes_defaults() {
    let response = app()
        .oneshot(Request::get("/settings").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(
        json_body(response).await,
        json!({
            "content_font_size": 62,
            "number_font_size": 41,
            "number_content_spacing": 55,
            "line_spacing": 70
        })
    );
}

#[tokio::test]
async fn render_returns_ordered_data_uris() {
    let text = "창세기 1장 1절\n태초에\n--------------------\n창세기 1장 2절\n땅은\n";
    let response = app()
        .oneshot(post_json(
            "/render",
            json!({ "text": text, "content_font_size": "abc" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let images = body["images"].as_array().expect("images");
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["index"], 1);
    assert_eq!(images[0]["file_name"], "01.png");
    assert_eq!(images[1]["file_name"], "02.png");
    assert!(
        images[1]["data_uri"]
            .as_str()
            .expect("data uri")
            .starts_with("data:image/png;base64,")
    );
}

#[tokio::test]
async fn render_of_blank_text_is_empty() {
    let response = app()
        .oneshot(post_json("/render", json!({ "text": "   " })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "images": [] }));
}

#[tokio::test]
async fn render_without_text_is_bad_request() {
    let response = app()
        .oneshot(post_json("/render", json!({})))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().expect("error").contains("required"));
}

#[tokio::test]
async fn archive_bundles_all_captions() {
    let response = app()
        .oneshot(post_json(
            "/render/archive",
            json!({ "text": "창세기 1장 7절\n궁창을 만드사" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
        Some(&b"application/zip"[..])
    );
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn archive_of_blank_text_is_unprocessable() {
    let response = app()
        .oneshot(post_json("/render/archive", json!({ "text": "\n\n" })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn preflight_is_answered_by_cors_layer() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/render")
        .body(Body::empty())
        .expect("request");
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
