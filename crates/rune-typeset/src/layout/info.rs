use core::ops::Range;

use swash::GlyphId;

use crate::font::SingleScriptFont;

/// Unit of the character indices stored in a [`LayoutInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8 byte offsets (as built).
    #[default]
    Utf8,
    /// UTF-16 code units.
    Utf16,
}

/// A maximal sequence of glyphs sharing one font and one direction.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualRun {
    pub font: SingleScriptFont,
    /// Exclusive end of this run's glyphs in the layout glyph arrays.
    pub glyph_end: usize,
    /// Logical start of the characters the run covers.
    pub char_start: usize,
    /// Logical exclusive end; never less than `char_start`.
    pub char_end: usize,
    /// Length of the paragraph separator following `char_end`, set on the
    /// run that ends a paragraph.
    pub char_end_offset: usize,
    pub right_to_left: bool,
}

/// One laid-out line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineInfo {
    /// Exclusive end of this line's runs in [`LayoutInfo::runs`].
    pub run_end: usize,
    pub width: f32,
    pub ascent: f32,
    /// Bottom of this line measured from the top of the layout.
    pub total_descent: f32,
    /// Horizontal origin of the line.
    pub x: f32,
    /// Logical character range, excluding any paragraph separator.
    pub char_start: usize,
    pub char_end: usize,
    /// Direction of the paragraph the line belongs to.
    pub right_to_left: bool,
}

/// Result of laying out one text.
///
/// `glyphs` and `char_indices` are parallel. `positions` interleaves
/// `(x, y)` pairs: one per glyph plus one after each run holding the
/// run's end pen position, so glyph `g` of run `r` sits at pair `g + r`.
/// `y` values are baselines measured from the top of the layout; add
/// `text_start_y` to place the block inside the text area.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutInfo {
    pub glyphs: Vec<GlyphId>,
    pub char_indices: Vec<usize>,
    pub positions: Vec<f32>,
    pub runs: Vec<VisualRun>,
    pub lines: Vec<LineInfo>,
    pub text_start_y: f32,
    /// Length of the laid-out text in `encoding` units.
    pub text_len: usize,
    pub encoding: TextEncoding,
}

impl LayoutInfo {
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Indices into the glyph arrays covered by `run`.
    pub fn run_glyph_range(&self, run: usize) -> Range<usize> {
        let start = if run == 0 { 0 } else { self.runs[run - 1].glyph_end };
        start..self.runs[run].glyph_end
    }

    /// Position of glyph `glyph` (a glyph-array index) belonging to `run`.
    pub fn glyph_position(&self, run: usize, glyph: usize) -> (f32, f32) {
        self.pair(glyph + run)
    }

    /// Pen position after the last glyph of `run`.
    pub fn run_end_position(&self, run: usize) -> (f32, f32) {
        self.pair(self.runs[run].glyph_end + run)
    }

    /// Pen x before the first glyph of `run`.
    pub fn run_start_x(&self, run: usize) -> f32 {
        let line = self.line_for_run(run);
        if self.line_runs(line).start == run {
            self.lines[line].x
        } else {
            self.run_end_position(run - 1).0
        }
    }

    fn pair(&self, index: usize) -> (f32, f32) {
        (self.positions[2 * index], self.positions[2 * index + 1])
    }

    /// Line containing `run`.
    pub fn line_for_run(&self, run: usize) -> usize {
        self.lines
            .partition_point(|line| line.run_end <= run)
            .min(self.lines.len().saturating_sub(1))
    }

    /// Indices into [`LayoutInfo::runs`] of the runs on `line`.
    pub fn line_runs(&self, line: usize) -> Range<usize> {
        let start = if line == 0 { 0 } else { self.lines[line - 1].run_end };
        start..self.lines[line].run_end
    }

    /// Top of `line` measured from the top of the layout.
    pub fn line_top(&self, line: usize) -> f32 {
        if line == 0 { 0.0 } else { self.lines[line - 1].total_descent }
    }

    pub fn line_height(&self, line: usize) -> f32 {
        self.lines[line].total_descent - self.line_top(line)
    }

    pub fn baseline(&self, line: usize) -> f32 {
        self.line_top(line) + self.lines[line].ascent
    }

    /// Last line starting at or before character `offset`.
    pub fn line_for_offset(&self, offset: usize) -> usize {
        self.lines
            .partition_point(|line| line.char_start <= offset)
            .saturating_sub(1)
    }

    /// Line whose vertical extent contains `y` (relative to the layout
    /// top), clamped to the first and last lines.
    pub fn line_at_y(&self, y: f32) -> usize {
        self.lines
            .partition_point(|line| line.total_descent <= y)
            .min(self.lines.len().saturating_sub(1))
    }

    pub fn text_height(&self) -> f32 {
        self.lines.last().map_or(0.0, |line| line.total_descent)
    }

    pub fn text_width(&self) -> f32 {
        self.lines.iter().map(|line| line.width).fold(0.0, f32::max)
    }

    /// Copy with character indices in UTF-16 code units.
    pub fn to_utf16(&self, text: &str) -> LayoutInfo {
        if self.encoding == TextEncoding::Utf16 {
            return self.clone();
        }
        let mut map = vec![0usize; text.len() + 1];
        let mut units = 0;
        for (offset, ch) in text.char_indices() {
            map[offset] = units;
            units += ch.len_utf16();
        }
        map[text.len()] = units;
        self.reindexed(&map, TextEncoding::Utf16)
    }

    /// Copy with character indices in UTF-8 byte offsets.
    pub fn to_utf8(&self, text: &str) -> LayoutInfo {
        if self.encoding == TextEncoding::Utf8 {
            return self.clone();
        }
        let units: usize = text.chars().map(char::len_utf16).sum();
        let mut map = Vec::with_capacity(units + 1);
        for (offset, ch) in text.char_indices() {
            map.extend(std::iter::repeat_n(offset, ch.len_utf16()));
        }
        map.push(text.len());
        self.reindexed(&map, TextEncoding::Utf8)
    }

    fn reindexed(&self, map: &[usize], encoding: TextEncoding) -> LayoutInfo {
        let at = |index: usize| map.get(index).copied().unwrap_or(map[map.len() - 1]);
        let mut out = self.clone();
        out.encoding = encoding;
        out.text_len = at(self.text_len);
        for index in &mut out.char_indices {
            *index = at(*index);
        }
        for run in &mut out.runs {
            let separator_end = at(run.char_end + run.char_end_offset);
            run.char_start = at(run.char_start);
            run.char_end = at(run.char_end);
            run.char_end_offset = separator_end - run.char_end;
        }
        for line in &mut out.lines {
            line.char_start = at(line.char_start);
            line.char_end = at(line.char_end);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FaceDataHandle, FontFamily, FontStyle, FontWeight, Synthesis};

    fn font() -> SingleScriptFont {
        SingleScriptFont {
            family: FontFamily::INVALID,
            face: FaceDataHandle::INVALID,
            weight: FontWeight::Regular,
            style: FontStyle::Normal,
            size: 10.0,
            synthesis: Synthesis::empty(),
        }
    }

    /// "aé😀\nb": two lines, one run each, 10px per glyph.
    fn sample() -> (String, LayoutInfo) {
        let text = "aé😀\nb".to_string();
        let layout = LayoutInfo {
            glyphs: vec![1, 2, 3, 4],
            char_indices: vec![0, 1, 3, 8],
            positions: vec![
                0.0, 8.0, 10.0, 8.0, 20.0, 8.0, 30.0, 8.0, // run 0 + end
                0.0, 20.0, 10.0, 20.0, // run 1 + end
            ],
            runs: vec![
                VisualRun {
                    font: font(),
                    glyph_end: 3,
                    char_start: 0,
                    char_end: 7,
                    char_end_offset: 1,
                    right_to_left: false,
                },
                VisualRun {
                    font: font(),
                    glyph_end: 4,
                    char_start: 8,
                    char_end: 9,
                    char_end_offset: 0,
                    right_to_left: false,
                },
            ],
            lines: vec![
                LineInfo {
                    run_end: 1,
                    width: 30.0,
                    ascent: 8.0,
                    total_descent: 12.0,
                    x: 0.0,
                    char_start: 0,
                    char_end: 7,
                    right_to_left: false,
                },
                LineInfo {
                    run_end: 2,
                    width: 10.0,
                    ascent: 8.0,
                    total_descent: 24.0,
                    x: 0.0,
                    char_start: 8,
                    char_end: 9,
                    right_to_left: false,
                },
            ],
            text_start_y: 0.0,
            text_len: text.len(),
            encoding: TextEncoding::Utf8,
        };
        (text, layout)
    }

    #[test]
    fn position_queries() {
        let (_, layout) = sample();
        assert_eq!(layout.run_glyph_range(1), 3..4);
        assert_eq!(layout.glyph_position(1, 3), (0.0, 20.0));
        assert_eq!(layout.run_end_position(0), (30.0, 8.0));
        assert_eq!(layout.run_start_x(1), 0.0);
        assert_eq!(layout.line_for_run(1), 1);
        assert_eq!(layout.line_runs(1), 1..2);
        assert_eq!(layout.line_height(1), 12.0);
        assert_eq!(layout.baseline(1), 20.0);
        assert_eq!(layout.text_height(), 24.0);
        assert_eq!(layout.text_width(), 30.0);
    }

    #[test]
    fn offset_and_y_lookup() {
        let (_, layout) = sample();
        assert_eq!(layout.line_for_offset(0), 0);
        assert_eq!(layout.line_for_offset(7), 0);
        assert_eq!(layout.line_for_offset(8), 1);
        assert_eq!(layout.line_at_y(-5.0), 0);
        assert_eq!(layout.line_at_y(13.0), 1);
        assert_eq!(layout.line_at_y(500.0), 1);
    }

    #[test]
    fn utf16_reindexing() {
        let (text, layout) = sample();
        let utf16 = layout.to_utf16(&text);
        assert_eq!(utf16.encoding, TextEncoding::Utf16);
        assert_eq!(utf16.char_indices, vec![0, 1, 2, 5]);
        assert_eq!(utf16.runs[0].char_end, 4);
        assert_eq!(utf16.runs[0].char_end_offset, 1);
        assert_eq!(utf16.runs[1].char_start, 5);
        assert_eq!(utf16.text_len, 6);
        assert_eq!(utf16.positions, layout.positions);
    }

    #[test]
    fn utf8_round_trip_preserves_layout() {
        let (text, layout) = sample();
        let back = layout.to_utf16(&text).to_utf8(&text);
        assert_eq!(back, layout);
    }
}
