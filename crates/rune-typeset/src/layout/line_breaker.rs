use core::ops::Range;

use unicode_linebreak::{BreakOpportunity, linebreaks};

use crate::layout::PrefixSums;
use crate::unicode::next_grapheme_boundary;

/// Slack for float accumulation when comparing against the area width.
const WIDTH_EPSILON: f32 = 1e-3;

/// Kind of line break at a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreakKind {
    /// Required line break (e.g., vertical tab or NEL).
    Mandatory,
    /// Optional line break opportunity.
    Opportunity,
}

/// A line break opportunity in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBreak {
    /// Byte offset *after* the break.
    pub offset: usize,
    pub kind: LineBreakKind,
}

/// All UAX-14 break opportunities in `text`, end of text included.
pub fn compute_line_breaks(text: &str) -> Vec<LineBreak> {
    linebreaks(text)
        .map(|(offset, opp)| LineBreak {
            offset,
            kind: match opp {
                BreakOpportunity::Mandatory => LineBreakKind::Mandatory,
                BreakOpportunity::Allowed => LineBreakKind::Opportunity,
            },
        })
        .collect()
}

/// End of `text[start..end]` with trailing whitespace removed.
fn visible_end(text: &str, start: usize, end: usize) -> usize {
    start + text[start..end].trim_end().len()
}

/// Greedy line breaking of one paragraph.
///
/// `widths` holds per-byte advances of `text`. Trailing whitespace hangs
/// past the line end and does not count toward the width. A word wider
/// than `max_width` is split at grapheme boundaries, and every line takes
/// at least one grapheme. `max_width <= 0` disables wrapping.
pub fn break_lines(text: &str, widths: &PrefixSums, max_width: f32) -> Vec<Range<usize>> {
    let len = text.len();
    if max_width <= 0.0 || len == 0 {
        return vec![0..len];
    }
    let limit = max_width + WIDTH_EPSILON;
    let breaks = compute_line_breaks(text);
    let fits = |start: usize, end: usize| widths.width(start..visible_end(text, start, end)) <= limit;

    let mut lines = Vec::new();
    let mut start = 0;
    while start < len {
        let mut best = None;
        for br in breaks.iter().filter(|br| br.offset > start) {
            if !fits(start, br.offset) {
                break;
            }
            best = Some(br.offset);
            if br.kind == LineBreakKind::Mandatory {
                break;
            }
        }

        let end = best.unwrap_or_else(|| {
            // Fall back to grapheme boundaries inside an over-long word.
            let mut end = next_grapheme_boundary(text, start).unwrap_or(len);
            while let Some(next) = next_grapheme_boundary(text, end) {
                if !fits(start, next) {
                    break;
                }
                end = next;
            }
            end
        });
        lines.push(start..end);
        start = end;
    }
    lines
}
