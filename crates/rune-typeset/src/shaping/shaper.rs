use core::ops::Range;

use harfrust::{
    Direction as HbDirection,
    FontRef as HbFontRef,
    Script as HbScript,
    Tag as HbTag,
    UnicodeBuffer as HbUnicodeBuffer,
};
use log::{trace, warn};
use swash::GlyphId;

use crate::font::FontData;
use crate::font::script::{Script, is_neutral};

use super::{ShapedGlyph, ShapedRun};

/// Text shaper built on harfrust (pure-Rust HarfBuzz port).
pub struct TextShaper;

impl TextShaper {
    /// Shape `text[range]` with one resolved face.
    ///
    /// Glyph clusters are byte offsets into `text`. Glyphs come back in
    /// visual order, so right-to-left runs start with their last cluster.
    /// With `small_caps`, lowercase letters are shaped as their uppercase
    /// mapping while keeping their source cluster.
    pub fn shape(
        data: &FontData,
        text: &str,
        range: Range<usize>,
        script: Script,
        right_to_left: bool,
        small_caps: bool,
    ) -> ShapedRun {
        let font_ref = match HbFontRef::from_index(data.bytes(), data.index()) {
            Ok(font_ref) => font_ref,
            Err(err) => {
                warn!("shaping engine rejected face {}: {err:?}", data.face().id());
                return ShapedRun::empty(range, right_to_left);
            }
        };

        let shaping = data.shaping();
        let shaper = shaping
            .data
            .shaper(&font_ref)
            .instance(Some(&shaping.instance))
            .point_size(None)
            .build();

        let mut buffer = HbUnicodeBuffer::new();
        for (offset, ch) in text[range.clone()].char_indices() {
            let cluster = (range.start + offset) as u32;
            if small_caps && ch.is_lowercase() {
                for upper in ch.to_uppercase() {
                    buffer.add(upper, cluster);
                }
            } else {
                buffer.add(ch, cluster);
            }
        }
        buffer.set_direction(if right_to_left {
            HbDirection::RightToLeft
        } else {
            HbDirection::LeftToRight
        });
        if let Some(script) = hb_script(script) {
            buffer.set_script(script);
        }
        // Let harfrust fill in any remaining segment properties.
        buffer.guess_segment_properties();

        let glyph_buffer = shaper.shape(buffer, &[]);
        let infos = glyph_buffer.glyph_infos();
        let positions = glyph_buffer.glyph_positions();

        // harfrust works in design units.
        let scale = data.scale();
        let mut glyphs = Vec::with_capacity(infos.len());
        let mut advance = 0.0f32;
        for (info, pos) in infos.iter().zip(positions.iter()) {
            let x_advance = pos.x_advance as f32 * scale;
            glyphs.push(ShapedGlyph {
                glyph_id: info.glyph_id as GlyphId,
                cluster: info.cluster as usize,
                x_advance,
                x_offset: pos.x_offset as f32 * scale,
                y_offset: -(pos.y_offset as f32) * scale,
            });
            advance += x_advance;
        }
        trace!(
            "shaped {:?} ({:?}, rtl={right_to_left}) into {} glyphs, {advance:.2}px",
            range,
            script,
            glyphs.len()
        );

        ShapedRun {
            range,
            right_to_left,
            glyphs,
            advance,
        }
    }
}

/// Shaping-engine script for a specific Unicode script.
fn hb_script(script: Script) -> Option<HbScript> {
    if is_neutral(script) {
        return None;
    }
    let tag: &[u8; 4] = script.short_name().as_bytes().try_into().ok()?;
    HbScript::from_iso15924_tag(HbTag::new(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_specific_scripts_only() {
        assert!(hb_script(Script::Latin).is_some());
        assert!(hb_script(Script::Arabic).is_some());
        assert!(hb_script(Script::Common).is_none());
        assert!(hb_script(Script::Inherited).is_none());
    }
}
