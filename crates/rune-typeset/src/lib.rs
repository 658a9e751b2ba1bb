//! rune-typeset: multi-script text layout.
//!
//! - `font`: family registry, face resolution per script run, font byte sources
//! - `shaping`: harfrust adapter producing positioned glyphs
//! - `bidi`: paragraph direction and per-line visual reordering
//! - `layout`: paragraph splitting, line breaking and the [`LayoutInfo`] result
//! - `cursor`: cursor positions, logical motion, caret geometry and hit testing
//! - `format`: color/decoration runs, their draw-time iterator and inline markup
//! - `raster`: glyph rasterization through swash

pub mod bidi;
pub mod cursor;
pub mod error;
pub mod font;
pub mod format;
pub mod layout;
pub mod raster;
pub mod runs;
pub mod shaping;
pub mod unicode;

pub use cursor::{Caret, CursorAffinity, CursorModel, CursorMovement, CursorPosition};
pub use error::{FontError, RegistrationError};
pub use font::{
    FaceDataHandle, FaceInfo, FamilyInfo, Font, FontData, FontFamily, FontMetrics, FontRegistry,
    FontSource, FontStyle, FontVariant, FontWeight, ScaledFontMetrics, SingleScriptFont,
    SynthesisOptions, SystemFontSource,
};
pub use format::{
    Color, FormattingEvents, FormattingIterator, FormattingRuns, MarkupParser, ParsedText,
    PlainText, StrokeState, TagMarkupParser, TextStyle,
};
pub use layout::{
    LayoutBuilder, LayoutFlags, LayoutInfo, LayoutParams, LineInfo, TextEncoding,
    VerticalAlignment, VisualRun, build_layout,
};
pub use raster::{GlyphRasterizer, RasterizedGlyph, SwashRasterizer};
pub use runs::{BoolRuns, ValueRunBuilder, ValueRuns};
