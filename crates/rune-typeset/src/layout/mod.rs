//! Paragraph and line layout.
//!
//! [`LayoutBuilder`] turns text plus font runs into a [`LayoutInfo`]: flat
//! glyph arrays grouped into visual runs and lines, ready for drawing and
//! cursor queries.

pub mod builder;
pub mod info;
pub mod line_breaker;
pub mod paragraph;
pub mod prefix_sums;

use bitflags::bitflags;
use rune_config::LayoutConfig;

pub use builder::{LayoutBuilder, build_layout};
pub use info::{LayoutInfo, LineInfo, TextEncoding, VisualRun};
pub use line_breaker::{LineBreak, LineBreakKind};
pub use paragraph::{Paragraph, split_paragraphs};
pub use prefix_sums::PrefixSums;

bitflags! {
    /// Layout request options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LayoutFlags: u8 {
        /// Paragraphs without a strong character default to right-to-left.
        const RIGHT_TO_LEFT = 1 << 0;
        /// Every paragraph takes the default direction, ignoring its text.
        const OVERRIDE_DIRECTION = 1 << 1;
        /// Reserved; laid out horizontally.
        const VERTICAL = 1 << 2;
    }
}

/// Placement of the text block within the area height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
}

impl VerticalAlignment {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "top" => Some(VerticalAlignment::Top),
            "center" | "middle" => Some(VerticalAlignment::Center),
            "bottom" => Some(VerticalAlignment::Bottom),
            _ => None,
        }
    }

    /// Fraction of the free vertical space placed above the text.
    pub fn factor(self) -> f32 {
        match self {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::Center => 0.5,
            VerticalAlignment::Bottom => 1.0,
        }
    }
}

/// Text area and options for one layout request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutParams {
    /// Maximum line width in pixels; 0 disables soft wrapping.
    pub area_width: f32,
    pub area_height: f32,
    pub alignment: VerticalAlignment,
    pub flags: LayoutFlags,
}

impl LayoutParams {
    pub fn with_width(mut self, area_width: f32) -> Self {
        self.area_width = area_width;
        self
    }

    pub fn with_height(mut self, area_height: f32, alignment: VerticalAlignment) -> Self {
        self.area_height = area_height;
        self.alignment = alignment;
        self
    }

    pub fn with_flags(mut self, flags: LayoutFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl From<&LayoutConfig> for LayoutParams {
    fn from(config: &LayoutConfig) -> Self {
        let mut flags = LayoutFlags::empty();
        flags.set(LayoutFlags::RIGHT_TO_LEFT, config.right_to_left);
        flags.set(LayoutFlags::OVERRIDE_DIRECTION, config.override_direction);
        let alignment = VerticalAlignment::parse(&config.vertical_alignment).unwrap_or_else(|| {
            log::warn!(
                "unknown vertical alignment `{}`, using top",
                config.vertical_alignment
            );
            VerticalAlignment::Top
        });
        Self {
            area_width: config.area_width.max(0.0),
            area_height: config.area_height,
            alignment,
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_from_config() {
        let config = LayoutConfig {
            area_width: 200.0,
            area_height: 100.0,
            vertical_alignment: "Center".into(),
            right_to_left: true,
            override_direction: false,
        };
        let params = LayoutParams::from(&config);
        assert_eq!(params.area_width, 200.0);
        assert_eq!(params.alignment, VerticalAlignment::Center);
        assert!(params.flags.contains(LayoutFlags::RIGHT_TO_LEFT));
        assert!(!params.flags.contains(LayoutFlags::OVERRIDE_DIRECTION));
    }

    #[test]
    fn alignment_factors() {
        assert_eq!(VerticalAlignment::Top.factor(), 0.0);
        assert_eq!(VerticalAlignment::Center.factor(), 0.5);
        assert_eq!(VerticalAlignment::Bottom.factor(), 1.0);
        assert_eq!(VerticalAlignment::parse("sideways"), None);
    }
}
