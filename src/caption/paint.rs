use super::classify::Caption;
use super::error::RenderResult;
use super::options::RenderSettings;
use super::surface::{CANVAS_HEIGHT, CANVAS_WIDTH, Surface, SurfaceFactory};

pub const BASE_X: f32 = 190.0;
pub const TITLE_Y: f32 = 200.0;
pub const OUTLINE_COLOR: &str = "#ffffff";
pub const OUTLINE_WIDTH: f32 = 6.0;
pub const TEXT_COLOR: &str = "#000000";
/// Black fill is drawn this many times at the same spot to thicken the
/// anti-aliased glyph edges against the white outline.
pub const FILL_PASSES: usize = 5;

/// One encoded caption image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// 1-based section index.
    pub index: usize,
    pub png: Vec<u8>,
}

impl RenderedImage {
    pub fn file_name(&self) -> String {
        super::section::file_name_for_index(self.index)
    }

    pub fn data_uri(&self) -> String {
        use base64::Engine;
        use base64::engine::general_purpose::STANDARD as BASE64;
        format!("data:image/png;base64,{}", BASE64.encode(&self.png))
    }
}

/// Draws a caption onto `surface` without encoding it.
pub fn draw_caption<S: Surface>(surface: &mut S, caption: &Caption, settings: &RenderSettings) {
    surface.clear();

    if let Some(title) = caption.title.as_deref().filter(|title| !title.is_empty()) {
        surface.set_font(settings.number_font_size);
        draw_outlined_text(surface, title, BASE_X, TITLE_Y);
    }

    surface.set_font(settings.content_font_size);
    let mut y = TITLE_Y + settings.number_content_spacing as f32;
    for line in &caption.content {
        draw_outlined_text(surface, line, BASE_X, y);
        y += settings.line_spacing as f32;
    }
}

fn draw_outlined_text<S: Surface>(surface: &mut S, text: &str, x: f32, y: f32) {
    surface.stroke_text(text, x, y, OUTLINE_COLOR, OUTLINE_WIDTH);
    for _ in 0..FILL_PASSES {
        surface.fill_text(text, x, y, TEXT_COLOR);
    }
}

pub fn paint_caption<F: SurfaceFactory>(
    factory: &F,
    index: usize,
    caption: &Caption,
    settings: &RenderSettings,
) -> RenderResult<RenderedImage> {
    let mut surface = factory.create(CANVAS_WIDTH, CANVAS_HEIGHT)?;
    draw_caption(&mut surface, caption, settings);
    let png = surface.encode_png()?;
    Ok(RenderedImage { index, png })
}
