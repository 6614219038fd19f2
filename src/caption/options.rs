use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_CONTENT_FONT_SIZE: u32 = 62;
pub const DEFAULT_NUMBER_FONT_SIZE: u32 = 41;
pub const DEFAULT_NUMBER_CONTENT_SPACING: u32 = 55;
pub const DEFAULT_LINE_SPACING: u32 = 70;

/// Typography for one render call, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub content_font_size: u32,
    pub number_font_size: u32,
    pub number_content_spacing: u32,
    pub line_spacing: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            content_font_size: DEFAULT_CONTENT_FONT_SIZE,
            number_font_size: DEFAULT_NUMBER_FONT_SIZE,
            number_content_spacing: DEFAULT_NUMBER_CONTENT_SPACING,
            line_spacing: DEFAULT_LINE_SPACING,
        }
    }
}

/// User-typed setting values before validation. `None` keeps the base value.
#[derive(Debug, Clone, Default)]
pub struct RawRenderSettings {
    pub content_font_size: Option<String>,
    pub number_font_size: Option<String>,
    pub number_content_spacing: Option<String>,
    pub line_spacing: Option<String>,
}

impl RawRenderSettings {
    /// Applies the raw values over `base`. Anything that is not a valid
    /// integer in range falls back to the base value for that field.
    ///
    /// The field default is whatever `base` carries: the CLI and the server
    /// pass the configured settings, which equal [`RenderSettings::default`]
    /// unless a settings file overrides them.
    pub fn resolve(&self, base: RenderSettings) -> RenderSettings {
        RenderSettings {
            content_font_size: coerce_field(
                "content_font_size",
                self.content_font_size.as_deref(),
                base.content_font_size,
                1,
            ),
            number_font_size: coerce_field(
                "number_font_size",
                self.number_font_size.as_deref(),
                base.number_font_size,
                1,
            ),
            number_content_spacing: coerce_field(
                "number_content_spacing",
                self.number_content_spacing.as_deref(),
                base.number_content_spacing,
                0,
            ),
            line_spacing: coerce_field(
                "line_spacing",
                self.line_spacing.as_deref(),
                base.line_spacing,
                1,
            ),
        }
    }
}

fn coerce_field(name: &str, raw: Option<&str>, fallback: u32, min: u32) -> u32 {
    let Some(raw) = raw else {
        return fallback;
    };
    match parse_pixels(raw) {
        Some(value) if value >= min => value,
        _ => {
            warn!(
                "setting {} has invalid value '{}'; using {}",
                name, raw, fallback
            );
            fallback
        }
    }
}

pub(crate) fn parse_pixels(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}
