use crate::cursor::{CursorAffinity, CursorMovement, CursorPosition};
use crate::layout::{LayoutInfo, TextEncoding};
use crate::unicode::snap_to_grapheme;

/// Caret geometry for a cursor position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Caret {
    pub x: f32,
    /// Top of the caret's line, including the layout's `text_start_y`.
    pub top: f32,
    pub height: f32,
    pub line: usize,
}

/// Caret stop inside a run: a logical offset and its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Stop {
    offset: usize,
    x: f32,
}

/// Maps between character offsets and layout geometry.
///
/// Works on a UTF-8 indexed [`LayoutInfo`] and the text it was built
/// from. Coordinates are those of the layout: x from the area's left
/// edge, y from the top of the text area.
pub struct CursorModel<'a> {
    layout: &'a LayoutInfo,
    text: &'a str,
}

impl<'a> CursorModel<'a> {
    pub fn new(layout: &'a LayoutInfo, text: &'a str) -> Self {
        debug_assert_eq!(layout.encoding, TextEncoding::Utf8);
        Self { layout, text }
    }

    pub fn layout(&self) -> &'a LayoutInfo {
        self.layout
    }

    pub fn next_character(&self, pos: CursorPosition) -> CursorPosition {
        self.moved(pos, CursorMovement::next_character)
    }

    pub fn prev_character(&self, pos: CursorPosition) -> CursorPosition {
        self.moved(pos, CursorMovement::prev_character)
    }

    pub fn next_word(&self, pos: CursorPosition) -> CursorPosition {
        self.moved(pos, CursorMovement::next_word)
    }

    pub fn prev_word(&self, pos: CursorPosition) -> CursorPosition {
        self.moved(pos, CursorMovement::prev_word)
    }

    fn moved(&self, pos: CursorPosition, step: fn(&str, usize) -> usize) -> CursorPosition {
        if !pos.is_valid() {
            return pos;
        }
        let offset = step(self.text, pos.offset());
        if offset == pos.offset() {
            pos
        } else {
            CursorPosition::at(offset)
        }
    }

    /// Start of the line the cursor is on.
    pub fn line_start(&self, pos: CursorPosition) -> CursorPosition {
        match self.line_of(pos) {
            Some(line) => CursorPosition::at(self.layout.lines[line].char_start),
            None => pos,
        }
    }

    /// End of the line the cursor is on, before any separator. On a
    /// wrapped line the position keeps to this line via affinity.
    pub fn line_end(&self, pos: CursorPosition) -> CursorPosition {
        let Some(line) = self.line_of(pos) else {
            return pos;
        };
        let info = &self.layout.lines[line];
        let wraps = self
            .layout
            .lines
            .get(line + 1)
            .is_some_and(|next| next.char_start == info.char_end);
        let end = CursorPosition::at(info.char_end);
        if wraps && self.line_of(end) != Some(line) {
            end.with_affinity(CursorAffinity::Opposite)
        } else {
            end
        }
    }

    /// Same x on the line `delta` lines away, clamped to the layout.
    pub fn move_lines(&self, pos: CursorPosition, delta: isize) -> CursorPosition {
        let (Some(line), Some(caret)) = (self.line_of(pos), self.caret(pos)) else {
            return pos;
        };
        let target = line.saturating_add_signed(delta).min(self.layout.lines.len() - 1);
        if target == line {
            return pos;
        }
        self.closest_in_line(target, caret.x)
    }

    fn line_of(&self, pos: CursorPosition) -> Option<usize> {
        if !pos.is_valid() || self.layout.lines.is_empty() {
            return None;
        }
        match self.run_for_cursor(pos) {
            Some(run) => Some(self.layout.line_for_run(run)),
            None => Some(self.layout.line_for_offset(pos.offset())),
        }
    }

    /// Visual run a cursor renders against, or `None` on an empty line.
    ///
    /// An offset strictly inside a run belongs to it. On a boundary
    /// between two runs the default affinity picks: the start of the next
    /// run at a line end; the end of the current run going from
    /// left-to-right into right-to-left; the start of the next run going
    /// from right-to-left into left-to-right or within one direction.
    /// `Opposite` affinity picks the other run.
    pub fn run_for_cursor(&self, pos: CursorPosition) -> Option<usize> {
        if !pos.is_valid() {
            return None;
        }
        let offset = pos.offset();
        let runs = &self.layout.runs;
        if let Some(inside) = runs
            .iter()
            .position(|run| run.char_start < offset && offset < run.char_end)
        {
            return Some(inside);
        }
        let ending = runs.iter().position(|run| run.char_end == offset);
        let starting = runs.iter().position(|run| run.char_start == offset);
        match (ending, starting) {
            (Some(prev), Some(next)) => {
                let prev_run = &runs[prev];
                let next_run = &runs[next];
                let line_end = self.layout.line_for_run(prev) != self.layout.line_for_run(next);
                let default = if !line_end && !prev_run.right_to_left && next_run.right_to_left {
                    prev
                } else {
                    next
                };
                let other = if default == prev { next } else { prev };
                Some(match pos.affinity() {
                    CursorAffinity::Default => default,
                    CursorAffinity::Opposite => other,
                })
            }
            (Some(run), None) | (None, Some(run)) => {
                // A paragraph's first or last run is unambiguous unless an
                // empty line sits at the same offset.
                let line = self.layout.line_for_offset(offset);
                let run_line = self.layout.line_for_run(run);
                if line != run_line && self.layout.line_runs(line).is_empty() {
                    None
                } else {
                    Some(run)
                }
            }
            (None, None) => None,
        }
    }

    /// Caret geometry for `pos`.
    pub fn caret(&self, pos: CursorPosition) -> Option<Caret> {
        if !pos.is_valid() || pos.offset() > self.text.len() || self.layout.lines.is_empty() {
            return None;
        }
        let (line, x) = match self.run_for_cursor(pos) {
            Some(run) => (self.layout.line_for_run(run), self.x_for_offset(run, pos.offset())),
            None => {
                let line = self.layout.line_for_offset(pos.offset());
                (line, self.layout.lines[line].x)
            }
        };
        Some(Caret {
            x,
            top: self.layout.text_start_y + self.layout.line_top(line),
            height: self.layout.line_height(line),
            line,
        })
    }

    /// Closest cursor position to `x` on `line`.
    pub fn closest_in_line(&self, line: usize, x: f32) -> CursorPosition {
        let Some(info) = self.layout.lines.get(line) else {
            return CursorPosition::INVALID;
        };
        let runs = self.layout.line_runs(line);
        if runs.is_empty() {
            return CursorPosition::at(info.char_start);
        }

        // Run under x, clamped to the line's first and last runs.
        let run = runs
            .clone()
            .find(|&run| x < self.layout.run_end_position(run).0)
            .unwrap_or(runs.end - 1);

        let mut stops = self.stops(run);
        stops.sort_by(|a, b| a.x.total_cmp(&b.x));
        let after = stops.partition_point(|stop| stop.x < x);
        let closest = match (after.checked_sub(1).map(|i| stops[i]), stops.get(after)) {
            (Some(before), Some(next)) => {
                if x - before.x <= next.x - x { before } else { *next }
            }
            (Some(before), None) => before,
            (None, Some(next)) => *next,
            (None, None) => return CursorPosition::at(self.layout.runs[run].char_start),
        };

        let offset = snap_to_grapheme(self.text, closest.offset);
        let pos = CursorPosition::at(offset);
        if self.run_for_cursor(pos) == Some(run) {
            pos
        } else {
            pos.with_affinity(CursorAffinity::Opposite)
        }
    }

    /// Closest cursor position to a point; `y` picks the line.
    pub fn closest_to_position(&self, x: f32, y: f32) -> CursorPosition {
        if self.layout.lines.is_empty() {
            return CursorPosition::INVALID;
        }
        let line = self.layout.line_at_y(y - self.layout.text_start_y);
        self.closest_in_line(line, x)
    }

    /// x of the caret at `offset` within `run`.
    fn x_for_offset(&self, run: usize, offset: usize) -> f32 {
        let stops = self.stops(run);
        let index = stops.partition_point(|stop| stop.offset <= offset);
        stops
            .get(index.saturating_sub(1))
            .map_or_else(|| self.layout.run_start_x(run), |stop| stop.x)
    }

    /// Caret stops of `run` in ascending offset order, including the
    /// run's logical end.
    fn stops(&self, run: usize) -> Vec<Stop> {
        let layout = self.layout;
        let info = &layout.runs[run];
        let glyphs = layout.run_glyph_range(run);
        let start_x = layout.run_start_x(run);
        let end_x = layout.run_end_position(run).0;

        // Cluster extents in visual order.
        let mut clusters: Vec<(usize, f32, f32)> = Vec::new();
        for glyph in glyphs {
            let cluster = layout.char_indices[glyph];
            let x = layout.glyph_position(run, glyph).0;
            match clusters.last_mut() {
                Some((open, _, _)) if *open == cluster => {}
                Some(last) => {
                    last.2 = x;
                    clusters.push((cluster, x, end_x));
                }
                None => clusters.push((cluster, x, end_x)),
            }
        }

        let mut stops: Vec<Stop> = clusters
            .into_iter()
            .map(|(offset, left, right)| Stop {
                offset,
                x: if info.right_to_left { right } else { left },
            })
            .collect();
        if stops.first().is_none_or(|stop| stop.offset != info.char_start) {
            let x = if info.right_to_left { end_x } else { start_x };
            stops.push(Stop {
                offset: info.char_start,
                x,
            });
        }
        stops.push(Stop {
            offset: info.char_end,
            x: if info.right_to_left { start_x } else { end_x },
        });
        stops.sort_by_key(|stop| stop.offset);
        stops.dedup_by_key(|stop| stop.offset);
        stops
    }
}
