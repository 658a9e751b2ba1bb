use core::ops::Range;

use log::{debug, trace};
use unicode_bidi::{LTR_LEVEL, Level, RTL_LEVEL};

use crate::bidi::{BaseDirection, ParagraphBidi, first_strong_level};
use crate::font::script::{Script, script_runs};
use crate::font::{
    Font, FontData, FontFamily, FontInstance, FontRegistry, ScaledFontMetrics, SingleScriptFont,
    Synthesis,
};
use crate::layout::line_breaker::break_lines;
use crate::layout::{
    LayoutFlags, LayoutInfo, LayoutParams, LineInfo, Paragraph, PrefixSums, VisualRun,
    split_paragraphs,
};
use crate::runs::ValueRuns;
use crate::shaping::{DELETED_GLYPH, ShapedRun, TextShaper};

/// Lay out `text` with `fonts` covering it.
pub fn build_layout(
    registry: &FontRegistry,
    text: &str,
    fonts: &ValueRuns<Font>,
    params: &LayoutParams,
) -> LayoutInfo {
    LayoutBuilder::new(registry, *params).build(text, fonts)
}

/// A maximal logical range shaped with one font at one level and script.
#[derive(Debug, Clone)]
struct Item {
    range: Range<usize>,
    font: SingleScriptFont,
    level: Level,
    script: Script,
}

/// An item clipped to one line, with its shaping result.
struct Piece {
    font: SingleScriptFont,
    shaped: ShapedRun,
    metrics: ScaledFontMetrics,
}

/// Builds [`LayoutInfo`] from text and font runs.
///
/// Each paragraph is split into items by bidi level, script and font,
/// each item is resolved to a concrete face through the registry and
/// shaped to measure it, lines are broken greedily against the area
/// width, and every line is reordered visually and shaped again piece by
/// piece to produce the final glyphs.
pub struct LayoutBuilder<'r> {
    registry: &'r FontRegistry,
    params: LayoutParams,
}

impl<'r> LayoutBuilder<'r> {
    pub fn new(registry: &'r FontRegistry, params: LayoutParams) -> Self {
        Self { registry, params }
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn build(&self, text: &str, fonts: &ValueRuns<Font>) -> LayoutInfo {
        let scripts = script_runs(text);
        self.build_with_scripts(text, fonts, &scripts)
    }

    /// Lay out with caller-supplied script runs.
    pub fn build_with_scripts(
        &self,
        text: &str,
        fonts: &ValueRuns<Font>,
        scripts: &ValueRuns<Script>,
    ) -> LayoutInfo {
        let flags = self.params.flags;
        if flags.contains(LayoutFlags::VERTICAL) {
            debug!("vertical layout requested; laying out horizontally");
        }
        let mut layout = LayoutInfo {
            text_len: text.len(),
            ..LayoutInfo::default()
        };

        let mut default_level = if flags.contains(LayoutFlags::RIGHT_TO_LEFT) {
            RTL_LEVEL
        } else {
            LTR_LEVEL
        };
        let overridden = flags.contains(LayoutFlags::OVERRIDE_DIRECTION);
        let mut latched = overridden;

        for paragraph in split_paragraphs(text) {
            if paragraph.is_empty() {
                let font = font_at(fonts, paragraph.range.start);
                self.push_empty_line(&mut layout, &font, paragraph.range.start, default_level);
                continue;
            }
            let content = &text[paragraph.range.clone()];
            let level = if overridden {
                default_level
            } else {
                first_strong_level(content).unwrap_or(default_level)
            };
            if !latched {
                default_level = level;
                latched = true;
            }
            self.layout_paragraph(&mut layout, text, &paragraph, level, fonts, scripts);
        }

        let free = self.params.area_height - layout.text_height();
        layout.text_start_y = free * self.params.alignment.factor();
        trace!(
            "laid out {} bytes into {} lines, {} runs, {} glyphs",
            text.len(),
            layout.lines.len(),
            layout.runs.len(),
            layout.glyphs.len()
        );
        layout
    }

    fn push_empty_line(&self, layout: &mut LayoutInfo, font: &Font, offset: usize, level: Level) {
        let metrics = self.registry.adapter(*font).line_metrics();
        let right_to_left = level.is_rtl();
        let top = layout.text_height();
        layout.lines.push(LineInfo {
            run_end: layout.runs.len(),
            width: 0.0,
            ascent: metrics.ascent,
            total_descent: top + metrics.line_height(),
            x: self.line_origin(0.0, right_to_left),
            char_start: offset,
            char_end: offset,
            right_to_left,
        });
    }

    fn line_origin(&self, width: f32, right_to_left: bool) -> f32 {
        if right_to_left && self.params.area_width > 0.0 {
            self.params.area_width - width
        } else {
            0.0
        }
    }

    fn layout_paragraph(
        &self,
        layout: &mut LayoutInfo,
        text: &str,
        paragraph: &Paragraph,
        level: Level,
        fonts: &ValueRuns<Font>,
        scripts: &ValueRuns<Script>,
    ) {
        let base = paragraph.range.start;
        let content = &text[paragraph.range.clone()];
        let direction = if level.is_rtl() { BaseDirection::Rtl } else { BaseDirection::Ltr };
        let bidi = ParagraphBidi::new(content, direction);
        let items = self.itemize(text, paragraph.range.clone(), &bidi, fonts, scripts);

        let mut advances = vec![0.0f32; content.len()];
        for item in &items {
            if let Some((_, shaped)) = self.shape(text, item, item.range.clone()) {
                shaped.add_cluster_advances(base, &mut advances);
            }
        }
        let widths = PrefixSums::new(&advances);
        let lines = break_lines(content, &widths, self.params.area_width);

        let last = lines.len().saturating_sub(1);
        for (index, line) in lines.into_iter().enumerate() {
            let separator = if index == last { paragraph.separator_len() } else { 0 };
            self.layout_line(layout, text, base, line, &bidi, &items, separator);
        }
    }

    /// Split a paragraph into items, resolving fonts per script run.
    fn itemize(
        &self,
        text: &str,
        range: Range<usize>,
        bidi: &ParagraphBidi<'_>,
        fonts: &ValueRuns<Font>,
        scripts: &ValueRuns<Script>,
    ) -> Vec<Item> {
        let base = range.start;
        let mut boundaries: Vec<usize> = bidi
            .level_runs()
            .into_iter()
            .map(|(run, _)| base + run.end)
            .collect();
        fonts.for_each_run_in_range(range.start, range.end, |_, limit, _| boundaries.push(limit));
        scripts.for_each_run_in_range(range.start, range.end, |_, limit, _| boundaries.push(limit));
        boundaries.push(range.end);
        boundaries.retain(|&b| b > range.start && b <= range.end);
        boundaries.sort_unstable();
        boundaries.dedup();

        let mut items = Vec::new();
        let mut start = range.start;
        for end in boundaries {
            let font = font_at(fonts, start);
            let script = scripts.get_value(start).copied().unwrap_or(Script::Common);
            let level = bidi.level_at(start - base);
            let mut offset = start;
            while offset < end {
                let (resolved, next) = self.registry.get_sub_font(&font, text, offset, end, script);
                let next = if next > offset {
                    next
                } else {
                    offset + text[offset..].chars().next().map_or(1, char::len_utf8)
                };
                items.push(Item {
                    range: offset..next,
                    font: resolved,
                    level,
                    script,
                });
                offset = next;
            }
            start = end;
        }
        items
    }

    fn shape(&self, text: &str, item: &Item, range: Range<usize>) -> Option<(FontData, ShapedRun)> {
        let data = self.registry.get_sub_font_data(&item.font)?;
        let small_caps = item.font.synthesis.contains(Synthesis::SMALL_CAPS);
        let shaped = TextShaper::shape(&data, text, range, item.script, item.level.is_rtl(), small_caps);
        Some((data, shaped))
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_line(
        &self,
        layout: &mut LayoutInfo,
        text: &str,
        base: usize,
        line: Range<usize>,
        bidi: &ParagraphBidi<'_>,
        items: &[Item],
        separator: usize,
    ) {
        let right_to_left = bidi.is_rtl();
        let char_start = base + line.start;
        let char_end = base + line.end;

        // Visual order: bidi runs left to right, items within a
        // right-to-left run reversed.
        let mut pieces = Vec::new();
        for run in bidi.visual_runs(line) {
            let start = base + run.range.start;
            let end = base + run.range.end;
            let mut in_run: Vec<Piece> = items
                .iter()
                .filter(|item| item.range.start < end && item.range.end > start)
                .map(|item| {
                    let clipped = item.range.start.max(start)..item.range.end.min(end);
                    match self.shape(text, item, clipped.clone()) {
                        Some((data, shaped)) => Piece {
                            font: item.font,
                            shaped,
                            metrics: data.scaled_metrics(),
                        },
                        None => Piece {
                            font: item.font,
                            shaped: ShapedRun::empty(clipped, item.level.is_rtl()),
                            metrics: ScaledFontMetrics::default(),
                        },
                    }
                })
                .collect();
            if run.is_rtl() {
                in_run.reverse();
            }
            pieces.extend(in_run);
        }

        let ascent = pieces.iter().map(|p| p.metrics.ascent).fold(0.0, f32::max);
        let descent = pieces
            .iter()
            .map(|p| p.metrics.descent + p.metrics.line_gap)
            .fold(0.0, f32::max);
        let width: f32 = pieces.iter().map(|p| p.shaped.advance).sum();
        let top = layout.text_height();
        let baseline = top + ascent;
        let origin = self.line_origin(width, right_to_left);

        let mut pen = origin;
        for piece in pieces {
            let y = baseline + piece.font.baseline_shift();
            for glyph in &piece.shaped.glyphs {
                if glyph.glyph_id != DELETED_GLYPH {
                    layout.glyphs.push(glyph.glyph_id);
                    layout.char_indices.push(glyph.cluster);
                    layout.positions.push(pen + glyph.x_offset);
                    layout.positions.push(y + glyph.y_offset);
                }
                pen += glyph.x_advance;
            }
            layout.positions.push(pen);
            layout.positions.push(y);

            let range = piece.shaped.range;
            let char_end_offset = if range.end == char_end { separator } else { 0 };
            layout.runs.push(VisualRun {
                font: piece.font,
                glyph_end: layout.glyphs.len(),
                char_start: range.start,
                char_end: range.end,
                char_end_offset,
                right_to_left: piece.shaped.right_to_left,
            });
        }

        layout.lines.push(LineInfo {
            run_end: layout.runs.len(),
            width,
            ascent,
            total_descent: baseline + descent,
            x: origin,
            char_start,
            char_end,
            right_to_left,
        });
    }
}

/// Font in effect at `offset`; past the end the last run's font applies.
fn font_at(fonts: &ValueRuns<Font>, offset: usize) -> Font {
    fonts
        .get_value(offset)
        .or_else(|| fonts.values().last())
        .copied()
        .unwrap_or_else(|| Font::new(FontFamily::INVALID, 0.0))
}
