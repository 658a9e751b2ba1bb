//! Bidirectional (BiDi) text support built on `unicode-bidi`.
//!
//! Paragraph direction detection, embedding levels and per-line visual
//! reordering. Glyph mirroring is left to the shaping engine.

pub mod levels;
pub mod reorder;

pub use levels::{BaseDirection, ParagraphBidi, first_strong_level};
pub use reorder::BidiRun;
pub use unicode_bidi::Level;
