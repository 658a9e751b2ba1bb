//! Unicode helpers: grapheme boundaries and hard break classification.

pub mod graphemes;

pub use graphemes::{
    floor_char_boundary, is_grapheme_boundary, next_grapheme_boundary, prev_grapheme_boundary,
    snap_to_grapheme,
};

pub const LINE_SEPARATOR: char = '\u{2028}';
pub const PARAGRAPH_SEPARATOR: char = '\u{2029}';

/// Characters that end a paragraph.
pub fn is_hard_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR)
}
