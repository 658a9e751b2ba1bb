use core::ops::Range;

use unicode_bidi::{BidiClass, BidiInfo, LTR_LEVEL, Level, RTL_LEVEL, bidi_class};

/// Base direction hint for paragraph analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseDirection {
    /// Detect paragraph base direction from text (first strong char).
    Auto,
    /// Force overall left-to-right base direction.
    Ltr,
    /// Force overall right-to-left base direction.
    Rtl,
}

impl BaseDirection {
    pub fn to_level(self) -> Option<Level> {
        match self {
            BaseDirection::Auto => None,
            BaseDirection::Ltr => Some(LTR_LEVEL),
            BaseDirection::Rtl => Some(RTL_LEVEL),
        }
    }

    pub fn from_rtl(rtl: bool) -> Self {
        if rtl { BaseDirection::Rtl } else { BaseDirection::Ltr }
    }
}

/// Paragraph level implied by the first strong character (UAX-9 P2/P3),
/// or `None` when the text has no strong character.
pub fn first_strong_level(text: &str) -> Option<Level> {
    text.chars().find_map(|ch| match bidi_class(ch) {
        BidiClass::L => Some(LTR_LEVEL),
        BidiClass::R | BidiClass::AL => Some(RTL_LEVEL),
        _ => None,
    })
}

/// Embedding levels for one paragraph of text.
///
/// Offsets are byte offsets into the paragraph text. The text must not
/// contain the paragraph's terminating separator.
pub struct ParagraphBidi<'t> {
    pub(crate) info: BidiInfo<'t>,
    level: Level,
}

impl<'t> ParagraphBidi<'t> {
    /// Resolve levels with the given base direction. `Auto` detects it
    /// from the first strong character and defaults to LTR.
    pub fn new(text: &'t str, base: BaseDirection) -> Self {
        let level = base
            .to_level()
            .or_else(|| first_strong_level(text))
            .unwrap_or(LTR_LEVEL);
        let info = BidiInfo::new(text, Some(level));
        Self { info, level }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn is_rtl(&self) -> bool {
        self.level.is_rtl()
    }

    pub fn text(&self) -> &'t str {
        self.info.text
    }

    /// Resolved level of the character starting at byte `offset`.
    pub fn level_at(&self, offset: usize) -> Level {
        self.info.levels.get(offset).copied().unwrap_or(self.level)
    }

    /// Logical ranges of uniform embedding level.
    pub fn level_runs(&self) -> Vec<(Range<usize>, Level)> {
        let text = self.info.text;
        let mut runs = Vec::new();
        let mut start = 0;
        let mut current: Option<Level> = None;
        for (offset, _) in text.char_indices() {
            let level = self.info.levels[offset];
            match current {
                Some(open) if open == level => {}
                Some(open) => {
                    runs.push((start..offset, open));
                    start = offset;
                    current = Some(level);
                }
                None => current = Some(level),
            }
        }
        if let Some(open) = current {
            runs.push((start..text.len(), open));
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_paragraph_direction_auto() {
        let bidi = ParagraphBidi::new("אבג abc", BaseDirection::Auto);
        assert!(bidi.is_rtl());
        let bidi = ParagraphBidi::new("abc אבג", BaseDirection::Auto);
        assert!(!bidi.is_rtl());
    }

    #[test]
    fn base_direction_override_ltr() {
        let bidi = ParagraphBidi::new("אבג abc", BaseDirection::Ltr);
        assert!(!bidi.is_rtl());
    }

    #[test]
    fn weak_only_text_has_no_strong_level() {
        assert_eq!(first_strong_level("123 - ()"), None);
        assert_eq!(first_strong_level("12 ب"), Some(RTL_LEVEL));
    }

    #[test]
    fn mixed_text_splits_into_level_runs() {
        let text = "abc אבג def";
        let bidi = ParagraphBidi::new(text, BaseDirection::Auto);
        let runs = bidi.level_runs();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].0.start, 0);
        assert_eq!(runs[2].0.end, text.len());
        assert!(runs[1].1.is_rtl());
        assert_eq!(&text[runs[1].0.clone()], "אבג");
    }
}
