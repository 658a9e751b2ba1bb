use std::fmt;
use std::sync::Arc;

use harfrust::{ShaperData, ShaperInstance};
use swash::{FontRef, GlyphId, Metrics};

use crate::error::{FontError, Result};
use crate::font::source::{FontBytes, MappedFont};
use crate::font::{
    FaceDataHandle, FontMetrics, FontStyle, FontWeight, ScaledFontMetrics, Synthesis,
};

/// Source versus target style of a resolved font, for synthetic emulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisParams {
    pub source_weight: FontWeight,
    pub source_style: FontStyle,
    pub target_weight: FontWeight,
    pub target_style: FontStyle,
    pub flags: Synthesis,
}

/// Shaping-engine tables for one face, built once when the face opens.
pub struct ShapingHandle {
    pub data: ShaperData,
    /// Default (no variations) instance.
    pub instance: ShaperInstance,
}

/// A face opened for shaping and measurement at one size.
///
/// Holds the font program bytes, the parsed swash handle pieces, the
/// shaping-engine tables and the face metrics. Instances live in a
/// per-thread cache and are resized in place when a different size is
/// requested, so cloning one is cheap.
#[derive(Clone)]
pub struct FontData {
    face: FaceDataHandle,
    bytes: FontBytes,
    /// Face index within the font file.
    index: u32,
    /// Offset to the table directory for this face.
    offset: u32,
    /// Cache key used internally by swash.
    key: swash::CacheKey,
    shaping: Arc<ShapingHandle>,
    metrics: FontMetrics,
    size: f32,
    scaled: ScaledFontMetrics,
    synthesis: SynthesisParams,
}

impl fmt::Debug for FontData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontData")
            .field("face", &self.face)
            .field("index", &self.index)
            .field("metrics", &self.metrics)
            .field("size", &self.size)
            .field("synthesis", &self.synthesis)
            .finish_non_exhaustive()
    }
}

impl FontData {
    /// Open `mapped` for shaping. Fails when either swash or the shaping
    /// engine rejects the program.
    pub fn new(
        face: FaceDataHandle,
        mapped: MappedFont,
        size: f32,
        synthesis: SynthesisParams,
    ) -> Result<Self> {
        let MappedFont { bytes, index } = mapped;
        let font = FontRef::from_index(bytes.as_slice(), index as usize)
            .ok_or(FontError::InvalidFont)?;
        let hb_font = harfrust::FontRef::from_index(bytes.as_slice(), index)
            .map_err(|_| FontError::InvalidFont)?;
        let shaping = Arc::new(ShapingHandle {
            data: ShaperData::new(&hb_font),
            instance: ShaperInstance::from_variations(
                &hb_font,
                core::iter::empty::<harfrust::Variation>(),
            ),
        });
        let metrics = Self::metrics_from_swash(&font);
        let (offset, key) = (font.offset, font.key);
        Ok(Self {
            face,
            bytes,
            index,
            offset,
            key,
            shaping,
            metrics,
            size,
            scaled: metrics.scale_to_pixels(size),
            synthesis,
        })
    }

    fn metrics_from_swash(font: &FontRef<'_>) -> FontMetrics {
        // Default (no variation) coordinates.
        let Metrics {
            units_per_em,
            ascent,
            descent,
            leading,
            strikeout_offset,
            underline_offset,
            stroke_size,
            ..
        } = font.metrics(&[]);

        FontMetrics {
            ascent,
            descent,
            line_gap: leading,
            units_per_em,
            strikeout_offset,
            underline_offset,
            stroke_size,
        }
    }

    /// Return a transient `FontRef` for interacting with swash APIs.
    pub fn as_swash_ref(&self) -> FontRef<'_> {
        FontRef {
            data: self.bytes.as_slice(),
            offset: self.offset,
            key: self.key,
        }
    }

    pub fn face(&self) -> FaceDataHandle {
        self.face
    }

    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Shaping-engine tables shared by every clone of this face.
    pub fn shaping(&self) -> &Arc<ShapingHandle> {
        &self.shaping
    }

    /// Em size in pixels the face is shaped at.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Change the em size in place.
    pub fn set_size(&mut self, size: f32) {
        if self.size != size {
            self.size = size;
            self.scaled = self.metrics.scale_to_pixels(size);
        }
    }

    pub fn synthesis(&self) -> SynthesisParams {
        self.synthesis
    }

    pub fn set_synthesis(&mut self, synthesis: SynthesisParams) {
        self.synthesis = synthesis;
    }

    /// Metrics in font units.
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// Metrics in pixels at the current size.
    pub fn scaled_metrics(&self) -> ScaledFontMetrics {
        self.scaled
    }

    /// Pixels per font unit at the current size.
    pub fn scale(&self) -> f32 {
        self.metrics.scale_for(self.size)
    }

    /// Strikethrough position above the baseline and thickness, in pixels.
    pub fn strikethrough(&self) -> (f32, f32) {
        (self.scaled.strikeout_offset, self.scaled.stroke_size)
    }

    /// Nominal glyph for `ch`, or 0 (notdef) when the face lacks it.
    pub fn glyph_id(&self, ch: char) -> GlyphId {
        self.as_swash_ref().charmap().map(ch)
    }

    /// Whether the face has a glyph for `ch`.
    pub fn covers(&self, ch: char) -> bool {
        self.glyph_id(ch) != 0
    }

    /// Horizontal advance of `glyph_id` in pixels at the current size.
    pub fn glyph_advance(&self, glyph_id: GlyphId) -> f32 {
        self.as_swash_ref().glyph_metrics(&[]).advance_width(glyph_id) * self.scale()
    }

    /// Raw bytes of an OpenType table.
    pub fn table(&self, tag: [u8; 4]) -> Option<&[u8]> {
        self.as_swash_ref().table(u32::from_be_bytes(tag))
    }
}
