use bitflags::bitflags;

use super::{Color, FormattingRuns, StrokeState};
use crate::font::Font;
use crate::runs::Runs;

bitflags! {
    /// Decoration changes reported by [`FormattingIterator::advance_to`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FormattingEvents: u8 {
        const UNDERLINE_BEGIN = 1 << 0;
        const UNDERLINE_END = 1 << 1;
        const STRIKETHROUGH_BEGIN = 1 << 2;
        const STRIKETHROUGH_END = 1 << 3;
    }
}

/// Replays [`FormattingRuns`] glyph by glyph during drawing.
///
/// Each axis keeps its own run cursor, moved forward or backward to the
/// run containing the requested index, so callers can restart at an
/// earlier character for another drawing pass. Decorations are tracked
/// as their current color: a decoration begins when it turns on or its
/// color changes while on, and ends under the mirrored condition, so one
/// rectangle can be drawn per contiguous span.
#[derive(Debug, Clone)]
pub struct FormattingIterator<'a> {
    runs: &'a FormattingRuns,
    font: usize,
    color: usize,
    stroke: usize,
    strikethrough_run: usize,
    underline_run: usize,
    underline: Option<Color>,
    strikethrough: Option<Color>,
}

impl<'a> FormattingIterator<'a> {
    pub fn new(runs: &'a FormattingRuns) -> Self {
        Self {
            runs,
            font: 0,
            color: 0,
            stroke: 0,
            strikethrough_run: 0,
            underline_run: 0,
            underline: None,
            strikethrough: None,
        }
    }

    /// Move every axis to the run containing `index` and report the
    /// decoration changes relative to the previous position.
    ///
    /// Indices past the end resolve to the last run.
    pub fn advance_to(&mut self, index: usize) -> FormattingEvents {
        let runs = self.runs;
        self.font = seek(&runs.font, self.font, index);
        self.color = seek(&runs.color, self.color, index);
        self.stroke = seek(&runs.stroke, self.stroke, index);
        self.strikethrough_run = seek(&runs.strikethrough, self.strikethrough_run, index);
        self.underline_run = seek(&runs.underline, self.underline_run, index);

        let color = self.color();
        let underline = decoration(&runs.underline, self.underline_run, color);
        let strikethrough = decoration(&runs.strikethrough, self.strikethrough_run, color);

        let mut events = FormattingEvents::empty();
        if underline != self.underline {
            events.set(FormattingEvents::UNDERLINE_END, self.underline.is_some());
            events.set(FormattingEvents::UNDERLINE_BEGIN, underline.is_some());
        }
        if strikethrough != self.strikethrough {
            events.set(FormattingEvents::STRIKETHROUGH_END, self.strikethrough.is_some());
            events.set(FormattingEvents::STRIKETHROUGH_BEGIN, strikethrough.is_some());
        }
        self.underline = underline;
        self.strikethrough = strikethrough;
        events
    }

    /// End events for any decoration still open, closing the traversal.
    pub fn finish(&mut self) -> FormattingEvents {
        let mut events = FormattingEvents::empty();
        events.set(FormattingEvents::UNDERLINE_END, self.underline.take().is_some());
        events.set(
            FormattingEvents::STRIKETHROUGH_END,
            self.strikethrough.take().is_some(),
        );
        events
    }

    pub fn font(&self) -> Option<&'a Font> {
        self.runs.font.values().get(self.font)
    }

    pub fn color(&self) -> Color {
        self.runs.color.values().get(self.color).copied().unwrap_or_default()
    }

    pub fn stroke(&self) -> StrokeState {
        self.runs.stroke.values().get(self.stroke).copied().unwrap_or_default()
    }

    /// Color of the open underline, if any.
    pub fn underline(&self) -> Option<Color> {
        self.underline
    }

    /// Color of the open strikethrough, if any.
    pub fn strikethrough(&self) -> Option<Color> {
        self.strikethrough
    }
}

fn seek<R: Runs>(runs: &R, mut run: usize, index: usize) -> usize {
    let count = runs.run_count();
    if count == 0 {
        return 0;
    }
    run = run.min(count - 1);
    while run > 0 && index < runs.run_start(run) {
        run -= 1;
    }
    while run + 1 < count && index >= runs.run_limit(run) {
        run += 1;
    }
    run
}

fn decoration<R: Runs<Value = bool>>(runs: &R, run: usize, color: Color) -> Option<Color> {
    (run < runs.run_count() && runs.run_value(run)).then_some(color)
}
