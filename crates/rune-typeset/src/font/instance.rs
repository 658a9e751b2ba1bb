//! Glyph metric access over resolved fonts.
//!
//! [`FontAdapter`] dispatches between a single resolved face and a
//! logical font that picks a face per character through the registry.

use swash::GlyphId;
use unicode_script::UnicodeScript;

use crate::font::data::FontData;
use crate::font::registry::FontRegistry;
use crate::font::{Font, ScaledFontMetrics, SingleScriptFont};

/// Metric queries the layout engine needs from a font.
pub trait FontInstance {
    fn units_per_em(&self) -> u16;

    /// Pixels per font unit.
    fn scale(&self) -> f32;

    /// Nominal glyph for `ch`; 0 when unmapped.
    fn map_char_to_glyph(&self, ch: char) -> GlyphId;

    /// Advance of `glyph` in pixels.
    fn glyph_advance(&self, glyph: GlyphId) -> f32;

    /// Advance of the nominal glyph for `ch` in pixels.
    fn char_advance(&self, ch: char) -> f32 {
        self.glyph_advance(self.map_char_to_glyph(ch))
    }

    /// Raw bytes of an OpenType table.
    fn table(&self, tag: [u8; 4]) -> Option<&[u8]>;

    /// Line metrics in pixels.
    fn line_metrics(&self) -> ScaledFontMetrics;
}

/// One resolved face.
#[derive(Debug, Clone)]
pub struct SingleScriptAdapter {
    data: FontData,
}

impl SingleScriptAdapter {
    pub fn new(data: FontData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &FontData {
        &self.data
    }
}

impl FontInstance for SingleScriptAdapter {
    fn units_per_em(&self) -> u16 {
        self.data.metrics().units_per_em
    }

    fn scale(&self) -> f32 {
        self.data.scale()
    }

    fn map_char_to_glyph(&self, ch: char) -> GlyphId {
        self.data.glyph_id(ch)
    }

    fn glyph_advance(&self, glyph: GlyphId) -> f32 {
        self.data.glyph_advance(glyph)
    }

    fn table(&self, tag: [u8; 4]) -> Option<&[u8]> {
        self.data.table(tag)
    }

    fn line_metrics(&self) -> ScaledFontMetrics {
        self.data.scaled_metrics()
    }
}

/// A logical font that resolves a face per character.
///
/// Glyph-level queries and tables answer for the primary face (the
/// family's own entry for the requested weight and style); character
/// queries go through script and fallback resolution.
pub struct MultiScriptAdapter<'r> {
    registry: &'r FontRegistry,
    font: Font,
    primary: Option<FontData>,
}

impl<'r> MultiScriptAdapter<'r> {
    pub fn new(registry: &'r FontRegistry, font: Font) -> Self {
        let primary = registry.get_font_data(&font);
        Self {
            registry,
            font,
            primary,
        }
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Concrete font a single character would be shaped with.
    pub fn resolve_char(&self, ch: char) -> SingleScriptFont {
        let mut buf = [0u8; 4];
        let text = ch.encode_utf8(&mut buf);
        let (resolved, _) = self
            .registry
            .get_sub_font(&self.font, text, 0, text.len(), ch.script());
        resolved
    }

    fn char_data(&self, ch: char) -> Option<FontData> {
        self.registry.get_sub_font_data(&self.resolve_char(ch))
    }
}

impl FontInstance for MultiScriptAdapter<'_> {
    fn units_per_em(&self) -> u16 {
        self.primary.as_ref().map_or(0, |data| data.metrics().units_per_em)
    }

    fn scale(&self) -> f32 {
        self.primary.as_ref().map_or(0.0, FontData::scale)
    }

    fn map_char_to_glyph(&self, ch: char) -> GlyphId {
        self.char_data(ch).map_or(0, |data| data.glyph_id(ch))
    }

    fn glyph_advance(&self, glyph: GlyphId) -> f32 {
        self.primary
            .as_ref()
            .map_or(0.0, |data| data.glyph_advance(glyph))
    }

    fn char_advance(&self, ch: char) -> f32 {
        self.char_data(ch)
            .map_or(0.0, |data| data.glyph_advance(data.glyph_id(ch)))
    }

    fn table(&self, tag: [u8; 4]) -> Option<&[u8]> {
        self.primary.as_ref()?.table(tag)
    }

    fn line_metrics(&self) -> ScaledFontMetrics {
        self.primary
            .as_ref()
            .map(FontData::scaled_metrics)
            .unwrap_or_default()
    }
}

/// Tagged dispatch over the two adapter kinds.
pub enum FontAdapter<'r> {
    Single(SingleScriptAdapter),
    Multi(MultiScriptAdapter<'r>),
}

impl FontAdapter<'_> {
    fn inner(&self) -> &dyn FontInstance {
        match self {
            FontAdapter::Single(adapter) => adapter,
            FontAdapter::Multi(adapter) => adapter,
        }
    }
}

impl FontInstance for FontAdapter<'_> {
    fn units_per_em(&self) -> u16 {
        self.inner().units_per_em()
    }

    fn scale(&self) -> f32 {
        self.inner().scale()
    }

    fn map_char_to_glyph(&self, ch: char) -> GlyphId {
        self.inner().map_char_to_glyph(ch)
    }

    fn glyph_advance(&self, glyph: GlyphId) -> f32 {
        self.inner().glyph_advance(glyph)
    }

    fn char_advance(&self, ch: char) -> f32 {
        self.inner().char_advance(ch)
    }

    fn table(&self, tag: [u8; 4]) -> Option<&[u8]> {
        self.inner().table(tag)
    }

    fn line_metrics(&self) -> ScaledFontMetrics {
        self.inner().line_metrics()
    }
}

impl FontRegistry {
    /// Adapter over a logical font.
    pub fn adapter(&self, font: Font) -> FontAdapter<'_> {
        FontAdapter::Multi(MultiScriptAdapter::new(self, font))
    }

    /// Adapter over a resolved script-run font, if its face loads.
    pub fn sub_font_adapter(&self, font: &SingleScriptFont) -> Option<FontAdapter<'static>> {
        self.get_sub_font_data(font)
            .map(|data| FontAdapter::Single(SingleScriptAdapter::new(data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::registry::{FaceInfo, FamilyInfo};
    use crate::font::source::MemorySource;
    use crate::font::{FontStyle, FontWeight};

    #[test]
    fn unloadable_font_reports_empty_metrics() {
        let registry = FontRegistry::new(MemorySource::new());
        let family = registry
            .register_family(FamilyInfo {
                name: "Ghost".into(),
                faces: vec![FaceInfo {
                    name: "Ghost".into(),
                    uri: "missing".into(),
                    index: 0,
                    weight: FontWeight::Regular,
                    style: FontStyle::Normal,
                }],
                ..FamilyInfo::default()
            })
            .unwrap();

        let adapter = registry.adapter(Font::new(family, 16.0));
        assert_eq!(adapter.units_per_em(), 0);
        assert_eq!(adapter.map_char_to_glyph('a'), 0);
        assert_eq!(adapter.char_advance('a'), 0.0);
        assert!(adapter.table(*b"head").is_none());
        assert_eq!(adapter.line_metrics(), ScaledFontMetrics::default());
    }
}
