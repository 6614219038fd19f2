use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode, header};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tracing::info;

use crate::bundle;
use crate::caption::{CaptionRenderer, RenderSettings, RenderedImage};
use crate::settings;

use super::models::{ErrorResponse, RenderRequest, RenderResponse};
use super::render::{ServerError, render_request, to_response};
use super::state::ServerState;

type HandlerError = (StatusCode, Json<ErrorResponse>);

pub async fn run_server(
    settings: settings::Settings,
    renderer: CaptionRenderer,
    addr: String,
) -> Result<()> {
    let state = ServerState::new(settings, renderer);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind server address: {}", addr))?;
    info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/settings", get(settings_info))
        .route("/render", post(render))
        .route("/render/archive", post(render_archive))
        .with_state(Arc::new(state))
        .layer(axum::middleware::from_fn(cors_middleware))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn cors_middleware(req: Request<Body>, next: Next) -> Result<Response<Body>, StatusCode> {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return Ok(response);
    }
    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    Ok(response)
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("content-type,authorization"),
    );
    headers.insert(
        "access-control-expose-headers",
        HeaderValue::from_static("content-disposition"),
    );
}

async fn settings_info(State(state): State<Arc<ServerState>>) -> Json<RenderSettings> {
    Json(state.settings.render)
}

/// Runs the render on a blocking thread; painting a long file is CPU bound.
async fn render_blocking(
    state: Arc<ServerState>,
    payload: RenderRequest,
    strict: bool,
) -> Result<Vec<RenderedImage>, HandlerError> {
    let result = tokio::task::spawn_blocking(move || {
        render_request(state.as_ref(), &payload, strict)
    })
    .await
    .map_err(|err| {
        into_handler_error(ServerError::internal(format!(
            "server task failed: {}",
            err
        )))
    })?;
    result.map_err(into_handler_error)
}

fn into_handler_error(err: ServerError) -> HandlerError {
    (err.status, Json(ErrorResponse { error: err.message }))
}

async fn render(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, HandlerError> {
    let images = render_blocking(state, payload, false).await?;
    Ok(Json(to_response(&images)))
}

async fn render_archive(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<RenderRequest>,
) -> Result<Response<Body>, HandlerError> {
    let images = render_blocking(state, payload, true).await?;
    let bytes = bundle::zip_archive(&images)
        .map_err(|err| into_handler_error(ServerError::internal(err.to_string())))?;
    let disposition = format!("attachment; filename=\"{}\"", bundle::ARCHIVE_FILE_NAME);
    let mut response = Response::new(Body::from(bytes));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(bundle::ARCHIVE_MIME),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}
