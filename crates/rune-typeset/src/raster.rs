//! Glyph rasterization.
//!
//! The layout engine only hands out glyph ids and resolved fonts; turning
//! them into pixels is pluggable through [`GlyphRasterizer`].
//! [`SwashRasterizer`] renders coverage masks (or color images for color
//! glyphs) with swash and applies synthetic bold and italic.

use swash::GlyphId;
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::{Angle, Format, Transform};

use crate::font::{FontData, FontRegistry, SingleScriptFont, Synthesis};

/// Horizontal shear of synthetic italic.
const ITALIC_SKEW_DEGREES: f32 = 14.0;

/// Embolden strength of synthetic bold, as a fraction of the em size.
const BOLD_STRENGTH: f32 = 0.02;

/// Pixel layout of [`RasterizedGlyph::data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphContent {
    /// One coverage byte per pixel.
    Mask,
    /// Four bytes (RGBA) per pixel.
    Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RasterizedGlyph {
    pub glyph_id: GlyphId,
    pub width: u32,
    pub height: u32,
    /// Offset from the pen position to the left edge of the bitmap.
    pub left: i32,
    /// Offset from the baseline up to the top edge of the bitmap.
    pub top: i32,
    pub content: GlyphContent,
    pub data: Vec<u8>,
}

pub trait GlyphRasterizer {
    /// Render `glyph` of `font` at the font's current size. `None` when
    /// the glyph has no image (spaces, for instance).
    fn rasterize(&mut self, font: &FontData, glyph: GlyphId) -> Option<RasterizedGlyph>;

    /// Resolve a run's font through `registry` and render `glyph`.
    fn rasterize_run_glyph(
        &mut self,
        registry: &FontRegistry,
        font: &SingleScriptFont,
        glyph: GlyphId,
    ) -> Option<RasterizedGlyph> {
        let data = registry.get_sub_font_data(font)?;
        self.rasterize(&data, glyph)
    }
}

/// Rasterizer backed by a reusable swash scale context.
pub struct SwashRasterizer {
    context: ScaleContext,
    hint: bool,
}

impl SwashRasterizer {
    pub fn new() -> Self {
        Self {
            context: ScaleContext::new(),
            hint: true,
        }
    }

    pub fn with_hinting(mut self, hint: bool) -> Self {
        self.hint = hint;
        self
    }
}

impl Default for SwashRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphRasterizer for SwashRasterizer {
    fn rasterize(&mut self, font: &FontData, glyph: GlyphId) -> Option<RasterizedGlyph> {
        let size = font.size();
        let flags = font.synthesis().flags;
        let mut scaler = self
            .context
            .builder(font.as_swash_ref())
            .size(size)
            .hint(self.hint)
            .build();

        let mut render = Render::new(&[
            Source::ColorOutline(0),
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::Outline,
            Source::Bitmap(StrikeWith::BestFit),
        ]);
        render.format(Format::Alpha);
        if flags.contains(Synthesis::BOLD) {
            render.embolden(size * BOLD_STRENGTH);
        }
        if flags.contains(Synthesis::ITALIC) {
            render.transform(Some(Transform::skew(
                Angle::from_degrees(ITALIC_SKEW_DEGREES),
                Angle::from_degrees(0.0),
            )));
        }

        let image = render.render(&mut scaler, glyph)?;
        if image.placement.width == 0 || image.placement.height == 0 {
            return None;
        }
        let content = match image.content {
            Content::Color => GlyphContent::Color,
            Content::Mask | Content::SubpixelMask => GlyphContent::Mask,
        };
        Some(RasterizedGlyph {
            glyph_id: glyph,
            width: image.placement.width,
            height: image.placement.height,
            left: image.placement.left,
            top: image.placement.top,
            content,
            data: image.data,
        })
    }
}
