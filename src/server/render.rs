use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::warn;

use crate::caption::{RenderError, RenderedImage};

use super::models::{RenderRequest, RenderResponse, RenderedImagePayload};
use super::state::ServerState;

const RENDER_FAILED_MESSAGE: &str = "failed to render captions";

#[derive(Debug)]
pub(crate) struct ServerError {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl ServerError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<RenderError> for ServerError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::EmptyInput => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: err.to_string(),
            },
            other => {
                warn!("caption render failed: {}", other);
                ServerError::internal(RENDER_FAILED_MESSAGE)
            }
        }
    }
}

pub(crate) fn request_text(request: &RenderRequest) -> Result<String, ServerError> {
    match (request.text.as_ref(), request.data_base64.as_deref()) {
        (Some(_), Some(_)) => Err(ServerError::bad_request(
            "text and data_base64 cannot be provided together",
        )),
        (None, None) => Err(ServerError::bad_request("text or data_base64 is required")),
        (Some(text), None) => Ok(text.clone()),
        (None, Some(encoded)) => {
            let bytes = BASE64
                .decode(encoded.trim())
                .map_err(|err| ServerError::bad_request(format!("invalid base64 data: {}", err)))?;
            String::from_utf8(bytes)
                .map_err(|_| ServerError::bad_request("uploaded file must be UTF-8 text"))
        }
    }
}

/// Renders every caption for the request. `strict` rejects input without sections.
pub(crate) fn render_request(
    state: &ServerState,
    request: &RenderRequest,
    strict: bool,
) -> Result<Vec<RenderedImage>, ServerError> {
    let text = request_text(request)?;
    let settings = request.raw_settings().resolve(state.settings.render);
    let images = if strict {
        state.renderer.render_strict(&text, &settings)?
    } else {
        state.renderer.render(&text, &settings)?
    };
    Ok(images)
}

pub(crate) fn to_response(images: &[RenderedImage]) -> RenderResponse {
    RenderResponse {
        images: images
            .iter()
            .map(|image| RenderedImagePayload {
                index: image.index,
                file_name: image.file_name(),
                data_uri: image.data_uri(),
            })
            .collect(),
    }
}
