//! Inline style markup.
//!
//! [`TagMarkupParser`] understands a small tag language:
//!
//! | tag | effect |
//! |-----|--------|
//! | `<b>` `<i>` | bold weight, italic style |
//! | `<u>` `<s>` | underline, strikethrough |
//! | `<sc>` `<sub>` `<sup>` | small caps, subscript, superscript |
//! | `<size=N>` | em size in pixels |
//! | `<color=#rrggbb[aa]>` | fill color |
//! | `<stroke=#rrggbb[aa],W>` | outline color and width |
//!
//! Every tag closes with `</name>` in nesting order and `<<` stands for a
//! literal `<`. Malformed input of any kind yields the whole input as
//! plain text under the base style.

use log::debug;

use super::{Color, FormattingRuns, StrokeState, TextStyle};
use crate::font::{Font, FontStyle, FontVariant, FontWeight};
use crate::runs::{BoolRuns, ValueRunBuilder};

/// Text with markup removed plus the styles it described.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedText {
    pub text: String,
    pub runs: FormattingRuns,
}

impl ParsedText {
    /// `text` verbatim under `style`.
    pub fn plain(text: &str, style: &TextStyle) -> Self {
        Self {
            text: text.to_owned(),
            runs: FormattingRuns::plain(text.len(), style),
        }
    }
}

/// Turns styled input into plain text and formatting runs. Run indices
/// are byte offsets into the returned text.
pub trait MarkupParser {
    fn parse(&self, input: &str, style: &TextStyle) -> ParsedText;
}

/// Takes input literally.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl MarkupParser for PlainText {
    fn parse(&self, input: &str, style: &TextStyle) -> ParsedText {
        ParsedText::plain(input, style)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TagMarkupParser;

impl MarkupParser for TagMarkupParser {
    fn parse(&self, input: &str, style: &TextStyle) -> ParsedText {
        match parse_tags(input, style) {
            Ok(parsed) => parsed,
            Err(reason) => {
                debug!("markup rejected ({reason}); using plain text");
                ParsedText::plain(input, style)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    SmallCaps,
    Subscript,
    Superscript,
    Size,
    Color,
    Stroke,
}

impl Tag {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "b" => Tag::Bold,
            "i" => Tag::Italic,
            "u" => Tag::Underline,
            "s" => Tag::Strikethrough,
            "sc" => Tag::SmallCaps,
            "sub" => Tag::Subscript,
            "sup" => Tag::Superscript,
            "size" => Tag::Size,
            "color" => Tag::Color,
            "stroke" => Tag::Stroke,
            _ => return None,
        })
    }

    fn takes_argument(self) -> bool {
        matches!(self, Tag::Size | Tag::Color | Tag::Stroke)
    }
}

/// One builder per style axis.
struct Builders {
    font: ValueRunBuilder<Font>,
    color: ValueRunBuilder<Color>,
    stroke: ValueRunBuilder<StrokeState>,
    strikethrough: ValueRunBuilder<bool>,
    underline: ValueRunBuilder<bool>,
}

impl Builders {
    fn new(style: &TextStyle) -> Self {
        Self {
            font: ValueRunBuilder::new(style.font),
            color: ValueRunBuilder::new(style.color),
            stroke: ValueRunBuilder::new(style.stroke),
            strikethrough: ValueRunBuilder::new(false),
            underline: ValueRunBuilder::new(false),
        }
    }

    fn open(&mut self, tag: Tag, argument: Option<&str>, at: usize) -> Result<(), String> {
        let font = *self.font.current();
        match (tag, argument) {
            (Tag::Bold, None) => self.font.push(at, font.with_weight(FontWeight::Bold)),
            (Tag::Italic, None) => self.font.push(at, font.with_style(FontStyle::Italic)),
            (Tag::Underline, None) => self.underline.push(at, true),
            (Tag::Strikethrough, None) => self.strikethrough.push(at, true),
            (Tag::SmallCaps, None) => {
                self.font.push(at, font.with_variant(font.variant | FontVariant::SMALL_CAPS))
            }
            (Tag::Subscript, None) => {
                let variant = (font.variant - FontVariant::SUPERSCRIPT) | FontVariant::SUBSCRIPT;
                self.font.push(at, font.with_variant(variant))
            }
            (Tag::Superscript, None) => {
                let variant = (font.variant - FontVariant::SUBSCRIPT) | FontVariant::SUPERSCRIPT;
                self.font.push(at, font.with_variant(variant))
            }
            (Tag::Size, Some(value)) => {
                let size = value
                    .trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|size| size.is_finite() && *size > 0.0)
                    .ok_or_else(|| format!("bad size `{value}`"))?;
                self.font.push(at, font.with_size(size));
            }
            (Tag::Color, Some(value)) => {
                let color = Color::parse(value).ok_or_else(|| format!("bad color `{value}`"))?;
                self.color.push(at, color);
            }
            (Tag::Stroke, Some(value)) => {
                let stroke = parse_stroke(value).ok_or_else(|| format!("bad stroke `{value}`"))?;
                self.stroke.push(at, stroke);
            }
            (tag, Some(_)) => return Err(format!("{tag:?} takes no argument")),
            (tag, None) => return Err(format!("{tag:?} needs an argument")),
        }
        Ok(())
    }

    fn close(&mut self, tag: Tag, at: usize) {
        match tag {
            Tag::Bold
            | Tag::Italic
            | Tag::SmallCaps
            | Tag::Subscript
            | Tag::Superscript
            | Tag::Size => self.font.pop(at),
            Tag::Underline => self.underline.pop(at),
            Tag::Strikethrough => self.strikethrough.pop(at),
            Tag::Color => self.color.pop(at),
            Tag::Stroke => self.stroke.pop(at),
        };
    }

    fn finish(self, length: usize) -> FormattingRuns {
        FormattingRuns {
            font: self.font.finish(length),
            color: self.color.finish(length),
            stroke: self.stroke.finish(length),
            strikethrough: BoolRuns::from(self.strikethrough.finish(length)),
            underline: BoolRuns::from(self.underline.finish(length)),
        }
    }
}

fn parse_stroke(value: &str) -> Option<StrokeState> {
    let (color, width) = value.split_once(',')?;
    let width = width.trim().parse::<f32>().ok()?;
    (width.is_finite() && width >= 0.0).then_some(StrokeState::new(Color::parse(color)?, width))
}

fn parse_tags(input: &str, style: &TextStyle) -> Result<ParsedText, String> {
    let mut text = String::with_capacity(input.len());
    let mut open: Vec<Tag> = Vec::new();
    let mut builders = Builders::new(style);
    let mut rest = input;

    while let Some(lt) = rest.find('<') {
        text.push_str(&rest[..lt]);
        rest = &rest[lt + 1..];
        if let Some(after) = rest.strip_prefix('<') {
            text.push('<');
            rest = after;
            continue;
        }
        let gt = rest.find('>').ok_or("unterminated tag")?;
        let body = &rest[..gt];
        rest = &rest[gt + 1..];

        if let Some(name) = body.strip_prefix('/') {
            let tag = Tag::from_name(name).ok_or_else(|| format!("unknown tag `{name}`"))?;
            if open.pop() != Some(tag) {
                return Err(format!("mismatched `</{name}>`"));
            }
            builders.close(tag, text.len());
        } else {
            let (name, argument) = match body.split_once('=') {
                Some((name, argument)) => (name, Some(argument)),
                None => (body, None),
            };
            let tag = Tag::from_name(name).ok_or_else(|| format!("unknown tag `{name}`"))?;
            if tag.takes_argument() != argument.is_some() {
                return Err(format!("bad arguments for `<{name}>`"));
            }
            builders.open(tag, argument, text.len())?;
            open.push(tag);
        }
    }
    text.push_str(rest);

    if let Some(tag) = open.last() {
        return Err(format!("unclosed {tag:?}"));
    }
    let runs = builders.finish(text.len());
    Ok(ParsedText { text, runs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontFamily;

    fn style() -> TextStyle {
        TextStyle::new(Font::new(FontFamily::INVALID, 16.0))
    }

    #[test]
    fn strips_tags_and_records_runs() {
        let parsed = TagMarkupParser.parse("a<b>bc</b><u>d</u>e", &style());
        assert_eq!(parsed.text, "abcde");
        let runs = &parsed.runs;
        assert_eq!(runs.font.limits(), &[1, 3, 5]);
        assert_eq!(runs.font.values()[1].weight, FontWeight::Bold);
        assert_eq!(runs.font.values()[2].weight, FontWeight::Regular);
        assert_eq!(runs.underline.get_value(3), Some(true));
        assert_eq!(runs.underline.get_value(4), Some(false));
        assert_eq!(runs.color.len(), 5);
    }

    #[test]
    fn nested_styles_compose() {
        let input = "<color=#ff000080><i>x<size=24>y</size></i></color>z";
        let parsed = TagMarkupParser.parse(input, &style());
        assert_eq!(parsed.text, "xyz");
        let fonts = parsed.runs.font.values();
        assert_eq!(fonts[0].style, FontStyle::Italic);
        assert_eq!(fonts[1].size, 24.0);
        assert_eq!(fonts[1].style, FontStyle::Italic);
        assert_eq!(fonts[2], style().font);
        assert_eq!(parsed.runs.color.get_value(1), Some(&Color::rgba(255, 0, 0, 0x80)));
        assert_eq!(parsed.runs.color.get_value(2), Some(&Color::BLACK));
    }

    #[test]
    fn stroke_and_variants() {
        let parsed = TagMarkupParser.parse("<stroke=#00ff00,1.5>H<sup>2</sup></stroke>", &style());
        assert_eq!(parsed.text, "H2");
        assert_eq!(
            parsed.runs.stroke.get_value(0),
            Some(&StrokeState::new(Color::rgb(0, 255, 0), 1.5))
        );
        let sup = parsed.runs.font.get_value(1).unwrap();
        assert!(sup.variant.contains(FontVariant::SUPERSCRIPT));
    }

    #[test]
    fn double_angle_is_a_literal() {
        let parsed = TagMarkupParser.parse("a << b <s>c</s>", &style());
        assert_eq!(parsed.text, "a < b c");
        assert_eq!(parsed.runs.strikethrough.get_value(6), Some(true));
    }

    #[test]
    fn malformed_markup_fails_closed() {
        for input in [
            "<b>unclosed",
            "<b>x</i>",
            "<blink>x</blink>",
            "<size=big>x</size>",
            "<color>x</color>",
            "<b=1>x</b>",
            "dangling <b",
        ] {
            let parsed = TagMarkupParser.parse(input, &style());
            assert_eq!(parsed.text, input, "{input}");
            assert_eq!(parsed.runs, FormattingRuns::plain(input.len(), &style()));
        }
    }

    #[test]
    fn empty_scope_keeps_base_style() {
        let parsed = TagMarkupParser.parse("ab<u></u>cd", &style());
        assert_eq!(parsed.text, "abcd");
        assert!((0..4).all(|i| parsed.runs.underline.get_value(i) == Some(false)));
    }

    #[test]
    fn plain_text_parser_is_identity() {
        let parsed = PlainText.parse("<b>", &style());
        assert_eq!(parsed.text, "<b>");
        assert_eq!(parsed.runs.len(), 3);
    }
}
