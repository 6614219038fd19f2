use super::error::RenderResult;

pub const CANVAS_WIDTH: u32 = 1920;
pub const CANVAS_HEIGHT: u32 = 1080;

/// A 2D drawing target with canvas-like text operations.
///
/// Coordinates are in pixels with the origin at the top-left corner. Text is
/// positioned by the top of its em box.
pub trait Surface {
    /// Resets every pixel to fully transparent.
    fn clear(&mut self);

    /// Font size in pixels for the following text draws.
    fn set_font(&mut self, size_px: u32);

    fn stroke_text(&mut self, text: &str, x: f32, y: f32, color: &str, line_width: f32);

    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: &str);

    fn encode_png(&self) -> RenderResult<Vec<u8>>;
}

/// Produces fresh surfaces, one per caption.
pub trait SurfaceFactory {
    type Surface: Surface;

    fn create(&self, width: u32, height: u32) -> RenderResult<Self::Surface>;
}
