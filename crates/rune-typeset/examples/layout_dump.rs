//! Lay out a string and print its lines, runs and glyphs.
//!
//! Run with: cargo run -p rune-typeset --example layout_dump -- "Hello <b>bold</b> world"
//!
//! Families come from `rune-typeset.toml` when present; a default family
//! that is not configured is backed by the system sans-serif faces.

use anyhow::{Result, bail};
use rune_config::TypesetConfig;
use rune_typeset::{
    CursorModel, CursorPosition, FaceInfo, FamilyInfo, Font, FontRegistry, FontStyle, FontWeight,
    FormattingEvents, FormattingIterator, LayoutBuilder, LayoutParams, MarkupParser,
    SystemFontSource, TagMarkupParser, TextStyle,
};

fn system_sans(name: &str) -> FamilyInfo {
    let face = |name: &str, query: &str, weight, style| FaceInfo {
        name: name.into(),
        uri: format!("system:sans-serif{query}"),
        index: 0,
        weight,
        style,
    };
    FamilyInfo {
        name: name.into(),
        faces: vec![
            face("Regular", "", FontWeight::Regular, FontStyle::Normal),
            face("Bold", "?weight=700", FontWeight::Bold, FontStyle::Normal),
            face("Italic", "?style=italic", FontWeight::Regular, FontStyle::Italic),
        ],
        ..FamilyInfo::default()
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let input = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let input = if input.is_empty() {
        "Hello <u>World</u>\n<color=#cc2200>שלום</color> <i>עולם</i>".to_string()
    } else {
        input
    };

    let config = TypesetConfig::load();
    let registry =
        FontRegistry::new(SystemFontSource::new()).with_synthesis((&config.text).into());
    for error in registry.register_config(&config) {
        log::warn!("{error}");
    }
    let family_name = config.text.default_family.clone().unwrap_or_else(|| "sans".into());
    let mut family = registry.get_family(&family_name);
    if !family.is_valid() {
        family = registry.register_family(system_sans(&family_name))?;
    }
    if !registry.is_initialized(family) {
        bail!("font family `{family_name}` is not available");
    }

    let style = TextStyle::new(Font::new(family, config.text.default_size));
    let parsed = TagMarkupParser.parse(&input, &style);
    let params = LayoutParams::from(&config.layout);
    let layout = LayoutBuilder::new(&registry, params).build(&parsed.text, &parsed.runs.font);

    println!("Text: {:?}", parsed.text);
    println!(
        "{} lines, {} runs, {} glyphs, text height {:.2}, start y {:.2}",
        layout.line_count(),
        layout.run_count(),
        layout.glyph_count(),
        layout.text_height(),
        layout.text_start_y
    );

    let mut formatting = FormattingIterator::new(&parsed.runs);
    for (index, line) in layout.lines.iter().enumerate() {
        println!(
            "line {index}: chars {}..{} x={:.2} width={:.2} ascent={:.2} bottom={:.2}{}",
            line.char_start,
            line.char_end,
            line.x,
            line.width,
            line.ascent,
            line.total_descent,
            if line.right_to_left { " rtl" } else { "" }
        );
        for run in layout.line_runs(index) {
            let info = &layout.runs[run];
            let name = registry.family_name(info.font.family).unwrap_or_default();
            println!(
                "  run {run}: chars {}..{} (+{}) {name} {:?} {:.1}px{}",
                info.char_start,
                info.char_end,
                info.char_end_offset,
                info.font.weight,
                info.font.size,
                if info.right_to_left { " rtl" } else { "" }
            );
            for glyph in layout.run_glyph_range(run) {
                let (x, y) = layout.glyph_position(run, glyph);
                let char_index = layout.char_indices[glyph];
                let events = formatting.advance_to(char_index);
                let mut notes = Vec::new();
                if events.contains(FormattingEvents::UNDERLINE_BEGIN) {
                    notes.push("underline begins");
                }
                if events.contains(FormattingEvents::UNDERLINE_END) {
                    notes.push("underline ends");
                }
                println!(
                    "    glyph {:5} char {:3} at ({x:7.2}, {y:7.2}) color {:?} {}",
                    layout.glyphs[glyph],
                    char_index,
                    formatting.color(),
                    notes.join(", ")
                );
            }
        }
    }
    if formatting.finish().contains(FormattingEvents::UNDERLINE_END) {
        println!("underline ends");
    }

    let model = CursorModel::new(&layout, &parsed.text);
    let end = CursorPosition::at(parsed.text.len());
    if let Some(caret) = model.caret(end) {
        println!(
            "caret at end: x={:.2} top={:.2} height={:.2} line {}",
            caret.x, caret.top, caret.height, caret.line
        );
    }
    Ok(())
}
