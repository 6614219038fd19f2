use std::fmt::Write as _;
use std::io::Cursor;
use tiny_skia::Pixmap;
use usvg::{Options, Tree};

use super::error::{RenderError, RenderResult};
use super::font::CaptionFont;
use super::surface::{Surface, SurfaceFactory};

/// Records draw calls as SVG and rasterizes them with resvg on encode.
pub struct SvgSurface {
    width: u32,
    height: u32,
    font: CaptionFont,
    font_size: u32,
    elements: Vec<String>,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32, font: CaptionFont) -> Self {
        Self {
            width,
            height,
            font,
            font_size: 16,
            elements: Vec::new(),
        }
    }

    /// The SVG document for everything drawn so far.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        for element in &self.elements {
            svg.push_str(element);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn text_open_tag(&self, x: f32, y: f32, paint: &str) -> String {
        let mut tag = format!(
            r#"<text x="{x}" y="{y}" font-size="{size}""#,
            x = x,
            y = y,
            size = self.font_size
        );
        let _ = write!(
            tag,
            r#" font-family="{family}" dominant-baseline="text-before-edge" xml:space="preserve" {paint}>"#,
            family = escape_xml(self.font.family())
        );
        tag
    }

    fn rasterize(&self) -> RenderResult<Pixmap> {
        let options = Options {
            fontdb: self.font.database(),
            ..Options::default()
        };
        let svg = self.to_svg();
        let tree = Tree::from_str(&svg, &options)
            .map_err(|err| RenderError::backend(format!("failed to parse caption SVG: {}", err)))?;
        let mut pixmap = Pixmap::new(self.width, self.height)
            .ok_or_else(|| RenderError::backend("failed to allocate canvas"))?;
        pixmap.fill(tiny_skia::Color::TRANSPARENT);
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self) {
        self.elements.clear();
    }

    fn set_font(&mut self, size_px: u32) {
        self.font_size = size_px;
    }

    fn stroke_text(&mut self, text: &str, x: f32, y: f32, color: &str, line_width: f32) {
        let paint = format!(
            r#"fill="none" stroke="{color}" stroke-width="{width}" stroke-miterlimit="10""#,
            color = escape_xml(color),
            width = line_width
        );
        let element = format!(
            "{}{}</text>",
            self.text_open_tag(x, y, &paint),
            escape_xml(text)
        );
        self.elements.push(element);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: &str) {
        let paint = format!(r#"fill="{}""#, escape_xml(color));
        let element = format!(
            "{}{}</text>",
            self.text_open_tag(x, y, &paint),
            escape_xml(text)
        );
        self.elements.push(element);
    }

    fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let pixmap = self.rasterize()?;
        let mut rgba = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let color = pixel.demultiply();
            rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        let image = image::RgbaImage::from_raw(self.width, self.height, rgba)
            .ok_or_else(|| RenderError::backend("failed to build image buffer from canvas"))?;
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|err| RenderError::backend(format!("failed to encode PNG: {}", err)))?;
        Ok(bytes)
    }
}

/// Hands out [`SvgSurface`]s sharing one font database.
#[derive(Clone)]
pub struct SvgSurfaceFactory {
    font: CaptionFont,
}

impl SvgSurfaceFactory {
    pub fn new(font: CaptionFont) -> Self {
        Self { font }
    }
}

impl SurfaceFactory for SvgSurfaceFactory {
    type Surface = SvgSurface;

    fn create(&self, width: u32, height: u32) -> RenderResult<SvgSurface> {
        if width == 0 || height == 0 {
            return Err(RenderError::backend(format!(
                "invalid canvas size {}x{}",
                width, height
            )));
        }
        Ok(SvgSurface::new(width, height, self.font.clone()))
    }
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
