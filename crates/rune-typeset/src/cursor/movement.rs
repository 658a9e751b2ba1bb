use crate::unicode::{is_hard_break, next_grapheme_boundary, prev_grapheme_boundary};

/// Logical cursor motion over text, in byte offsets.
///
/// Offsets at the ends of the text stay put; nothing wraps around.
pub struct CursorMovement;

impl CursorMovement {
    /// Offset after the grapheme cluster at `offset`.
    pub fn next_character(text: &str, offset: usize) -> usize {
        next_grapheme_boundary(text, offset).unwrap_or_else(|| offset.min(text.len()))
    }

    /// Offset of the grapheme cluster before `offset`.
    pub fn prev_character(text: &str, offset: usize) -> usize {
        prev_grapheme_boundary(text, offset).unwrap_or(0)
    }

    /// Start of the next word: scans forward cluster by cluster and stops
    /// where whitespace gives way to non-whitespace.
    pub fn next_word(text: &str, offset: usize) -> usize {
        let mut pos = offset.min(text.len());
        let mut seen_space = false;
        while let Some(next) = next_grapheme_boundary(text, pos) {
            let space = is_space(&text[pos..next]);
            if seen_space && !space {
                return pos;
            }
            seen_space |= space;
            pos = next;
        }
        pos
    }

    /// Start of the current or previous word: scans backward and stops
    /// where non-whitespace gives way to whitespace.
    ///
    /// A line break ends the scan at its own position: right before it
    /// when it is the first cluster examined, right after it otherwise.
    pub fn prev_word(text: &str, offset: usize) -> usize {
        let mut pos = offset.min(text.len());
        let mut seen_word = false;
        let mut first = true;
        while let Some(prev) = prev_grapheme_boundary(text, pos) {
            let cluster = &text[prev..pos];
            if cluster.chars().next().is_some_and(is_hard_break) {
                return if first { prev } else { pos };
            }
            let space = is_space(cluster);
            if seen_word && space {
                return pos;
            }
            seen_word |= !space;
            first = false;
            pos = prev;
        }
        pos
    }
}

fn is_space(cluster: &str) -> bool {
    cluster.chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_motion_respects_clusters() {
        let text = "Hello 世界";
        assert_eq!(CursorMovement::prev_character(text, 5), 4);
        assert_eq!(CursorMovement::prev_character(text, 0), 0);
        assert_eq!(CursorMovement::prev_character(text, 9), 6);
        assert_eq!(CursorMovement::next_character(text, 6), 9);
        assert_eq!(CursorMovement::next_character(text, text.len()), text.len());
    }

    #[test]
    fn zwj_emoji_moves_as_one() {
        let text = "Hi \u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467} there";
        let start = 3;
        let end = text.find(" there").unwrap();
        assert_eq!(CursorMovement::next_character(text, start), end);
        assert_eq!(CursorMovement::prev_character(text, end), start);
    }

    #[test]
    fn next_word_stops_after_whitespace() {
        let text = "hello  world end";
        assert_eq!(CursorMovement::next_word(text, 0), 7);
        assert_eq!(CursorMovement::next_word(text, 2), 7);
        assert_eq!(CursorMovement::next_word(text, 7), 13);
        assert_eq!(CursorMovement::next_word(text, 13), text.len());
        assert_eq!(CursorMovement::next_word(text, text.len()), text.len());
    }

    #[test]
    fn prev_word_stops_at_word_start() {
        let text = "hello  world end";
        assert_eq!(CursorMovement::prev_word(text, text.len()), 13);
        assert_eq!(CursorMovement::prev_word(text, 13), 7);
        assert_eq!(CursorMovement::prev_word(text, 9), 7);
        assert_eq!(CursorMovement::prev_word(text, 7), 0);
        assert_eq!(CursorMovement::prev_word(text, 0), 0);
    }

    #[test]
    fn prev_word_never_skips_a_line_break() {
        let text = "one\ntwo";
        // Scanning back from inside "two" stops after the break.
        assert_eq!(CursorMovement::prev_word(text, 6), 4);
        assert_eq!(CursorMovement::prev_word(text, 4), 3);
        assert_eq!(CursorMovement::prev_word(text, 3), 0);

        let text = "one \r\n  two";
        assert_eq!(CursorMovement::prev_word(text, 8), 6);
        assert_eq!(CursorMovement::prev_word(text, 6), 4);
    }

    #[test]
    fn next_word_crosses_line_breaks() {
        let text = "one\ntwo";
        assert_eq!(CursorMovement::next_word(text, 0), 4);
    }
}
