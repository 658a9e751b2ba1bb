use core::ops::Range;

use unicode_bidi::Level;

use super::ParagraphBidi;

/// A run of text with a single BiDi embedding level, in visual order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidiRun {
    /// Byte range in the paragraph text.
    pub range: Range<usize>,
    /// Embedding level for this run, after line-level rule L1.
    pub level: Level,
}

impl BidiRun {
    pub fn is_rtl(&self) -> bool {
        self.level.is_rtl()
    }
}

impl ParagraphBidi<'_> {
    /// Level runs of one line in the order they should be rendered.
    ///
    /// `line` is a byte range within the paragraph. Lines crossing an
    /// embedded paragraph boundary (such as U+0085) are reordered piecewise.
    pub fn visual_runs(&self, line: Range<usize>) -> Vec<BidiRun> {
        let mut out = Vec::new();
        for para in &self.info.paragraphs {
            let start = line.start.max(para.range.start);
            let end = line.end.min(para.range.end);
            if start >= end {
                continue;
            }
            let (levels, runs) = self.info.visual_runs(para, start..end);
            out.extend(runs.into_iter().map(|range| BidiRun {
                level: levels[range.start],
                range,
            }));
        }
        out
    }
}
