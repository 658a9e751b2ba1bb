//! Shaping-engine adapter.

mod shaped_run;
mod shaper;

pub use shaped_run::{ShapedGlyph, ShapedRun};
pub use shaper::TextShaper;

/// Glyph id the layout engine treats as deleted and drops from its
/// output. HarfBuzz-style engines remove deleted glyphs from the buffer
/// themselves, so this only filters ids that can never be real glyphs.
pub const DELETED_GLYPH: swash::GlyphId = 0xFFFF;
