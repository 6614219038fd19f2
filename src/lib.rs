use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use tracing::info;

pub mod bundle;
pub mod caption;
pub mod logging;
pub mod server;
pub mod settings;
mod test_util;

pub use caption::{
    CaptionRenderer, PreparedCaption, RawRenderSettings, RenderError, RenderSettings,
    RenderedImage, prepare_captions,
};

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub data: Option<String>,
    pub out_dir: Option<String>,
    pub archive: Option<String>,
    pub raw_settings: RawRenderSettings,
    pub font_path: Option<String>,
    pub font_family: Option<String>,
    pub settings_path: Option<String>,
    pub show_settings: bool,
    pub dry_run: bool,
}

pub const DEFAULT_OUT_DIR: &str = "captions";

/// Layered settings with the per-call font and typography overrides applied.
pub fn effective_settings(config: &Config) -> Result<settings::Settings> {
    let settings_path = config.settings_path.as_deref().map(Path::new);
    let mut settings = settings::load_settings(settings_path)?;
    apply_font_overrides(&mut settings, config);
    settings.render = config.raw_settings.resolve(settings.render);
    Ok(settings)
}

pub fn run(config: Config, input: Option<String>) -> Result<String> {
    let settings = effective_settings(&config)?;
    let render_settings = settings.render;

    if config.show_settings {
        return Ok(format_settings(&settings));
    }

    let text = read_input(config.data.as_deref(), input)?;

    if config.dry_run {
        let captions = prepare_captions(&text);
        return serde_json::to_string_pretty(&captions)
            .with_context(|| "failed to serialize captions");
    }

    let renderer = build_renderer(&settings)?;
    let images = renderer
        .render(&text, &render_settings)
        .with_context(|| "failed to render captions")?;
    if images.is_empty() {
        info!("no caption sections found; nothing written");
        return Ok(String::new());
    }

    let out_dir = PathBuf::from(config.out_dir.as_deref().unwrap_or(DEFAULT_OUT_DIR));
    let mut lines = bundle::write_to_dir(&images, &out_dir)?
        .into_iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>();

    if let Some(archive) = config.archive.as_deref() {
        let path = Path::new(archive);
        let bytes = bundle::zip_archive(&images)?;
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to write archive: {}", path.display()))?;
        lines.push(path.display().to_string());
    }

    Ok(lines.join("\n"))
}

/// Resolves the caption font from settings and builds the SVG-backed renderer.
pub fn build_renderer(settings: &settings::Settings) -> Result<CaptionRenderer> {
    let font = caption::resolve_caption_font(
        settings.font_path.as_deref().map(Path::new),
        settings.font_family.as_deref(),
        caption::caption_fallback_fonts(),
    )?;
    Ok(CaptionRenderer::new(font))
}

fn apply_font_overrides(settings: &mut settings::Settings, config: &Config) {
    if let Some(path) = config.font_path.as_deref().filter(|path| !path.trim().is_empty()) {
        settings.font_path = Some(path.to_string());
    }
    if let Some(family) = config
        .font_family
        .as_deref()
        .filter(|family| !family.trim().is_empty())
    {
        settings.font_family = Some(family.to_string());
    }
}

fn read_input(data: Option<&str>, input: Option<String>) -> Result<String> {
    match data {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read input file: {}", path))?;
            String::from_utf8(bytes).map_err(|_| anyhow!("input file must be UTF-8 text: {}", path))
        }
        None => Ok(input.unwrap_or_default()),
    }
}

fn format_settings(settings: &settings::Settings) -> String {
    let render_settings = &settings.render;
    let mut lines = Vec::new();
    lines.push(format!("content_font_size\t{}", render_settings.content_font_size));
    lines.push(format!("number_font_size\t{}", render_settings.number_font_size));
    lines.push(format!(
        "number_content_spacing\t{}",
        render_settings.number_content_spacing
    ));
    lines.push(format!("line_spacing\t{}", render_settings.line_spacing));
    lines.push(format!(
        "font_path\t{}",
        settings.font_path.as_deref().unwrap_or("-")
    ));
    lines.push(format!(
        "font_family\t{}",
        settings.font_family.as_deref().unwrap_or("-")
    ));
    lines.push(format!("server_addr\t{}", settings.server_addr));
    lines.join("\n")
}
