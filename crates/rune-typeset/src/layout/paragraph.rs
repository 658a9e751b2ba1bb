use core::ops::Range;

use crate::unicode::is_hard_break;

/// One paragraph: its content and the separator that ends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Byte range of the content, excluding the separator.
    pub range: Range<usize>,
    /// End of the separator sequence; equals `range.end` for the last
    /// paragraph.
    pub separator_end: usize,
}

impl Paragraph {
    pub fn separator_len(&self) -> usize {
        self.separator_end - self.range.end
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Split on LF, CR, CRLF, U+2028 and U+2029.
///
/// Always yields at least one paragraph; text ending in a separator
/// yields a trailing empty paragraph.
pub fn split_paragraphs(text: &str) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        if !is_hard_break(ch) {
            continue;
        }
        let mut separator_end = offset + ch.len_utf8();
        if ch == '\r' && chars.peek().is_some_and(|&(_, next)| next == '\n') {
            chars.next();
            separator_end += 1;
        }
        paragraphs.push(Paragraph {
            range: start..offset,
            separator_end,
        });
        start = separator_end;
    }
    paragraphs.push(Paragraph {
        range: start..text.len(),
        separator_end: text.len(),
    });
    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_paragraph_without_breaks() {
        assert_eq!(
            split_paragraphs("Hello World"),
            vec![Paragraph {
                range: 0..11,
                separator_end: 11
            }]
        );
    }

    #[test]
    fn crlf_is_one_separator() {
        let paragraphs = split_paragraphs("a\r\n\r\nb");
        let ranges: Vec<_> = paragraphs.iter().map(|p| p.range.clone()).collect();
        assert_eq!(ranges, vec![0..1, 3..3, 5..6]);
        assert_eq!(paragraphs[0].separator_len(), 2);
        assert!(paragraphs[1].is_empty());
        assert_eq!(paragraphs[2].separator_len(), 0);
    }

    #[test]
    fn lone_cr_and_unicode_separators_break() {
        let text = "a\rb\u{2028}c\u{2029}";
        let paragraphs = split_paragraphs(text);
        assert_eq!(paragraphs.len(), 4);
        assert_eq!(paragraphs[1].range, 2..3);
        assert_eq!(paragraphs[1].separator_len(), 3);
        assert!(paragraphs[3].is_empty());
        assert_eq!(paragraphs[3].range.start, text.len());
    }

    #[test]
    fn empty_text_is_one_empty_paragraph() {
        let paragraphs = split_paragraphs("");
        assert_eq!(paragraphs.len(), 1);
        assert!(paragraphs[0].is_empty());
    }
}
