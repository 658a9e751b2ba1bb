/// Face-level metrics in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Ascent above baseline (positive).
    pub ascent: f32,
    /// Descent below baseline (positive).
    pub descent: f32,
    /// Line gap (leading).
    pub line_gap: f32,
    pub units_per_em: u16,
    /// Distance from baseline to the top of the strikethrough stroke.
    pub strikeout_offset: f32,
    /// Distance from baseline to the top of the underline (negative is below).
    pub underline_offset: f32,
    /// Thickness of underline and strikethrough strokes.
    pub stroke_size: f32,
}

impl FontMetrics {
    /// Pixels per font unit at `font_size` pixels per em.
    pub fn scale_for(&self, font_size: f32) -> f32 {
        if self.units_per_em != 0 {
            font_size / self.units_per_em as f32
        } else {
            1.0
        }
    }

    /// Scale metrics to pixel size, where `font_size` is in pixels per em.
    pub fn scale_to_pixels(&self, font_size: f32) -> ScaledFontMetrics {
        let scale = self.scale_for(font_size);
        ScaledFontMetrics {
            ascent: self.ascent * scale,
            descent: self.descent * scale,
            line_gap: self.line_gap * scale,
            strikeout_offset: self.strikeout_offset * scale,
            underline_offset: self.underline_offset * scale,
            stroke_size: self.stroke_size * scale,
            font_size,
        }
    }
}

/// Face metrics scaled to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScaledFontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
    pub strikeout_offset: f32,
    pub underline_offset: f32,
    pub stroke_size: f32,
    pub font_size: f32,
}

impl ScaledFontMetrics {
    /// Ascent + descent + line gap.
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_units_per_em() {
        let metrics = FontMetrics {
            ascent: 800.0,
            descent: 200.0,
            line_gap: 100.0,
            units_per_em: 1000,
            strikeout_offset: 300.0,
            underline_offset: -100.0,
            stroke_size: 50.0,
        };
        let scaled = metrics.scale_to_pixels(20.0);
        assert!((scaled.ascent - 16.0).abs() < 1e-4);
        assert!((scaled.descent - 4.0).abs() < 1e-4);
        assert!((scaled.line_height() - 22.0).abs() < 1e-4);
        assert!((scaled.stroke_size - 1.0).abs() < 1e-4);
    }

    #[test]
    fn zero_units_per_em_does_not_divide() {
        let metrics = FontMetrics {
            ascent: 10.0,
            descent: 2.0,
            line_gap: 0.0,
            units_per_em: 0,
            strikeout_offset: 0.0,
            underline_offset: 0.0,
            stroke_size: 0.0,
        };
        assert_eq!(metrics.scale_for(16.0), 1.0);
    }
}
