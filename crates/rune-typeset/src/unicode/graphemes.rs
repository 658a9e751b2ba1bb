use unicode_segmentation::GraphemeCursor;

/// Largest char boundary at or before `offset`, clamped to the text.
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Returns `true` if `offset` is at an extended grapheme cluster boundary.
///
/// `offset` is clamped to `0..=text.len()`.
pub fn is_grapheme_boundary(text: &str, offset: usize) -> bool {
    let offset = offset.min(text.len());
    if offset == 0 || offset == text.len() {
        return true;
    }
    if !text.is_char_boundary(offset) {
        return false;
    }
    GraphemeCursor::new(offset, text.len(), true)
        .is_boundary(text, 0)
        .unwrap_or(true)
}

/// Start of the cluster before `offset`.
///
/// Inside a cluster this is the start of that cluster. Returns `None` at
/// the start of the text.
pub fn prev_grapheme_boundary(text: &str, offset: usize) -> Option<usize> {
    let offset = floor_char_boundary(text, offset);
    if offset == 0 {
        return None;
    }
    GraphemeCursor::new(offset, text.len(), true)
        .prev_boundary(text, 0)
        .ok()
        .flatten()
}

/// End of the cluster at or after `offset`.
///
/// Inside a cluster this is the end of that cluster. Returns `None` at
/// the end of the text.
pub fn next_grapheme_boundary(text: &str, offset: usize) -> Option<usize> {
    let offset = floor_char_boundary(text, offset);
    if offset >= text.len() {
        return None;
    }
    GraphemeCursor::new(offset, text.len(), true)
        .next_boundary(text, 0)
        .ok()
        .flatten()
}

/// Nearest cluster boundary at or before `offset`.
pub fn snap_to_grapheme(text: &str, offset: usize) -> usize {
    let offset = floor_char_boundary(text, offset);
    if is_grapheme_boundary(text, offset) {
        offset
    } else {
        prev_grapheme_boundary(text, offset).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_boundaries() {
        let text = "abc";
        assert_eq!(next_grapheme_boundary(text, 0), Some(1));
        assert_eq!(next_grapheme_boundary(text, 2), Some(3));
        assert_eq!(next_grapheme_boundary(text, 3), None);
        assert_eq!(prev_grapheme_boundary(text, 3), Some(2));
        assert_eq!(prev_grapheme_boundary(text, 0), None);
    }

    #[test]
    fn combining_mark_stays_with_base() {
        let text = "a\u{0301}b";
        assert!(!is_grapheme_boundary(text, 1));
        assert_eq!(next_grapheme_boundary(text, 0), Some(3));
        assert_eq!(prev_grapheme_boundary(text, 3), Some(0));
        assert_eq!(snap_to_grapheme(text, 1), 0);
        assert_eq!(snap_to_grapheme(text, 2), 0);
    }

    #[test]
    fn zwj_sequence_is_single_cluster() {
        let text = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";
        assert_eq!(next_grapheme_boundary(text, 0), Some(text.len()));
        assert_eq!(prev_grapheme_boundary(text, text.len()), Some(0));
    }

    #[test]
    fn crlf_is_one_cluster() {
        let text = "a\r\nb";
        assert_eq!(next_grapheme_boundary(text, 1), Some(3));
        assert!(!is_grapheme_boundary(text, 2));
    }

    #[test]
    fn floors_inside_multibyte_chars() {
        let text = "é";
        assert_eq!(floor_char_boundary(text, 1), 0);
        assert_eq!(floor_char_boundary(text, 10), 2);
    }
}
