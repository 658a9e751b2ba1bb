use core::ops::Range;

use swash::GlyphId;

/// One positioned glyph from the shaping engine, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_id: GlyphId,
    /// Byte offset in the source text of the cluster this glyph belongs to.
    pub cluster: usize,
    pub x_advance: f32,
    pub x_offset: f32,
    /// Vertical offset from the baseline; positive is down.
    pub y_offset: f32,
}

/// A run of text shaped with a single face, glyphs in visual order.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedRun {
    /// Byte range in the source text.
    pub range: Range<usize>,
    pub right_to_left: bool,
    pub glyphs: Vec<ShapedGlyph>,
    /// Total advance width in pixels.
    pub advance: f32,
}

impl ShapedRun {
    pub fn empty(range: Range<usize>, right_to_left: bool) -> Self {
        Self {
            range,
            right_to_left,
            glyphs: Vec::new(),
            advance: 0.0,
        }
    }

    /// Accumulate glyph advances onto the byte their cluster starts at.
    ///
    /// `advances` is indexed by byte offset relative to `base`.
    pub fn add_cluster_advances(&self, base: usize, advances: &mut [f32]) {
        for glyph in &self.glyphs {
            if let Some(slot) = glyph.cluster.checked_sub(base).and_then(|i| advances.get_mut(i)) {
                *slot += glyph.x_advance;
            }
        }
    }
}
