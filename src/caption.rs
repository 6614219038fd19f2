//! Verse caption rendering.
//!
//! Raw upload text is split into sections on runs of hyphens, each section is
//! wrapped and separated into a verse label and body lines, and every caption
//! is painted onto its own transparent 1920×1080 canvas.

pub mod classify;
pub mod error;
pub mod font;
pub mod options;
pub mod paint;
pub mod section;
pub mod surface;
pub mod svg;
pub mod wrap;

use serde::Serialize;
use tracing::{debug, info};

pub use classify::{Caption, classify_lines};
pub use error::{RenderError, RenderResult};
pub use font::{CaptionFont, caption_fallback_fonts, resolve_caption_font};
pub use options::{RawRenderSettings, RenderSettings};
pub use paint::RenderedImage;
pub use section::{Section, split_sections};
pub use surface::{CANVAS_HEIGHT, CANVAS_WIDTH, Surface, SurfaceFactory};
pub use svg::{SvgSurface, SvgSurfaceFactory};
pub use wrap::wrap_section;

/// A section after wrapping and classification, ready to paint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedCaption {
    pub index: usize,
    pub title: Option<String>,
    pub content: Vec<String>,
}

impl PreparedCaption {
    fn caption(&self) -> Caption {
        Caption {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

pub fn prepare_captions(raw: &str) -> Vec<PreparedCaption> {
    split_sections(raw)
        .into_iter()
        .map(|section| {
            let caption = classify_lines(&wrap_section(&section.text));
            debug!(
                "section {}: title={:?} lines={}",
                section.index,
                caption.title,
                caption.content.len()
            );
            PreparedCaption {
                index: section.index,
                title: caption.title,
                content: caption.content,
            }
        })
        .collect()
}

pub struct CaptionRenderer<F = SvgSurfaceFactory> {
    factory: F,
}

impl CaptionRenderer<SvgSurfaceFactory> {
    pub fn new(font: CaptionFont) -> Self {
        Self::with_factory(SvgSurfaceFactory::new(font))
    }
}

impl<F: SurfaceFactory> CaptionRenderer<F> {
    pub fn with_factory(factory: F) -> Self {
        Self { factory }
    }

    /// Renders one image per non-blank section, in source order.
    ///
    /// Input without sections yields an empty list. The first failing section
    /// aborts the batch and no partial output is returned.
    pub fn render(&self, raw: &str, settings: &RenderSettings) -> RenderResult<Vec<RenderedImage>> {
        let captions = prepare_captions(raw);
        info!("rendering {} caption(s)", captions.len());
        captions
            .iter()
            .map(|prepared| {
                paint::paint_caption(&self.factory, prepared.index, &prepared.caption(), settings)
            })
            .collect()
    }

    /// Like [`render`](Self::render), but treats input without sections as
    /// [`RenderError::EmptyInput`].
    pub fn render_strict(
        &self,
        raw: &str,
        settings: &RenderSettings,
    ) -> RenderResult<Vec<RenderedImage>> {
        let images = self.render(raw, settings)?;
        if images.is_empty() {
            return Err(RenderError::EmptyInput);
        }
        Ok(images)
    }
}
