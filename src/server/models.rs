use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::caption::RawRenderSettings;

/// Render request. Setting fields accept numbers or strings; anything that is
/// not a valid pixel value falls back to the configured default.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct RenderRequest {
    pub(crate) text: Option<String>,
    pub(crate) data_base64: Option<String>,
    pub(crate) content_font_size: Option<Value>,
    pub(crate) number_font_size: Option<Value>,
    pub(crate) number_content_spacing: Option<Value>,
    pub(crate) line_spacing: Option<Value>,
}

impl RenderRequest {
    pub(crate) fn raw_settings(&self) -> RawRenderSettings {
        RawRenderSettings {
            content_font_size: self.content_font_size.as_ref().map(value_to_raw),
            number_font_size: self.number_font_size.as_ref().map(value_to_raw),
            number_content_spacing: self.number_content_spacing.as_ref().map(value_to_raw),
            line_spacing: self.line_spacing.as_ref().map(value_to_raw),
        }
    }
}

fn value_to_raw(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RenderResponse {
    pub(crate) images: Vec<RenderedImagePayload>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RenderedImagePayload {
    pub(crate) index: usize,
    pub(crate) file_name: String,
    pub(crate) data_uri: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}
