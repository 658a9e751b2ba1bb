//! Per-character styling laid over the layout: colors, strokes and
//! decorations, plus the inline markup that produces them.

mod iterator;
pub mod markup;

pub use iterator::{FormattingEvents, FormattingIterator};
pub use markup::{MarkupParser, ParsedText, PlainText, TagMarkupParser};

use crate::font::Font;
use crate::runs::{BoolRuns, ValueRuns};

/// Straight (non-premultiplied) sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB`, `#RRGGBBAA` or a basic color name.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.is_ascii() {
                return None;
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            return match hex.len() {
                6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
                8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
                _ => None,
            };
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "red" => Some(Self::rgb(255, 0, 0)),
            "green" => Some(Self::rgb(0, 255, 0)),
            "blue" => Some(Self::rgb(0, 0, 255)),
            "white" => Some(Self::WHITE),
            "black" => Some(Self::BLACK),
            "yellow" => Some(Self::rgb(255, 255, 0)),
            "cyan" => Some(Self::rgb(0, 255, 255)),
            "magenta" => Some(Self::rgb(255, 0, 255)),
            "gray" | "grey" => Some(Self::rgb(128, 128, 128)),
            "transparent" => Some(Self::TRANSPARENT),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Outline drawn around glyphs. A zero width means no stroke.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrokeState {
    pub color: Color,
    pub width: f32,
}

impl StrokeState {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }

    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.color.a > 0
    }
}

/// Base style markup is applied on top of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub color: Color,
    pub stroke: StrokeState,
}

impl TextStyle {
    pub fn new(font: Font) -> Self {
        Self {
            font,
            color: Color::default(),
            stroke: StrokeState::default(),
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_stroke(mut self, stroke: StrokeState) -> Self {
        self.stroke = stroke;
        self
    }
}

/// Parallel style runs over the same character range.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattingRuns {
    pub font: ValueRuns<Font>,
    pub color: ValueRuns<Color>,
    pub stroke: ValueRuns<StrokeState>,
    pub strikethrough: BoolRuns,
    pub underline: BoolRuns,
}

impl FormattingRuns {
    /// Every axis holding the base style across `[0, length)`.
    pub fn plain(length: usize, style: &TextStyle) -> Self {
        Self {
            font: ValueRuns::single(length, style.font),
            color: ValueRuns::single(length, style.color),
            stroke: ValueRuns::single(length, style.stroke),
            strikethrough: BoolRuns::single(length, false),
            underline: BoolRuns::single(length, false),
        }
    }

    /// Covered length (every axis covers the same range).
    pub fn len(&self) -> usize {
        self.font.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs re-based onto `[offset, offset + length)`.
    pub fn subset(&self, offset: usize, length: usize) -> Self {
        Self {
            font: self.font.get_runs_subset(offset, length),
            color: self.color.get_runs_subset(offset, length),
            stroke: self.stroke.get_runs_subset(offset, length),
            strikethrough: self.strikethrough.subset(offset, length),
            underline: self.underline.subset(offset, length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontFamily;

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(Color::parse("#ff0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("#0000ff80"), Some(Color::rgba(0, 0, 255, 0x80)));
        assert_eq!(Color::parse("Blue"), Some(Color::rgb(0, 0, 255)));
        assert_eq!(Color::parse("#ff"), None);
        assert_eq!(Color::parse("#gggggg"), None);
        assert_eq!(Color::parse("#ééé"), None);
        assert_eq!(Color::parse("invalid"), None);
    }

    #[test]
    fn plain_runs_cover_text() {
        let style = TextStyle::new(Font::new(FontFamily::INVALID, 12.0));
        let runs = FormattingRuns::plain(5, &style);
        assert_eq!(runs.len(), 5);
        assert_eq!(runs.color.get_value(4), Some(&Color::BLACK));
        assert_eq!(runs.underline.get_value(0), Some(false));
        assert!(!runs.stroke.values()[0].is_visible());
    }
}
