#![allow(dead_code)]

use rune_typeset::font::FontInstance;
use rune_typeset::{
    FaceInfo, FamilyInfo, Font, FontFamily, FontRegistry, FontStyle, FontWeight, SystemFontSource,
    ValueRuns,
};

pub const SIZE: f32 = 16.0;

/// Installed single-face font files, upright regular faces only, with
/// sans families first.
pub fn face_paths(source: &SystemFontSource) -> Vec<String> {
    let mut candidates: Vec<(bool, String)> = source
        .database()
        .faces()
        .filter_map(|face| {
            let fontdb::Source::File(path) = &face.source else {
                return None;
            };
            let single = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf")
                });
            let upright =
                face.style == fontdb::Style::Normal && face.weight == fontdb::Weight::NORMAL;
            let sans = face.families.iter().any(|(name, _)| name.contains("Sans"));
            (single && upright && face.index == 0)
                .then(|| (!sans, path.to_string_lossy().into_owned()))
        })
        .collect();
    candidates.sort();
    candidates.dedup();
    candidates.into_iter().map(|(_, path)| path).collect()
}

/// Family descriptor with one regular face loaded from `path`.
pub fn file_family(name: &str, path: &str) -> FamilyInfo {
    FamilyInfo {
        name: name.into(),
        faces: vec![FaceInfo {
            name: "Regular".into(),
            uri: path.into(),
            index: 0,
            weight: FontWeight::Regular,
            style: FontStyle::Normal,
        }],
        ..FamilyInfo::default()
    }
}

/// Registry with a family backed by an installed upright face that covers
/// basic Latin. `None` when the host has no such font.
pub fn system_registry() -> Option<(FontRegistry, FontFamily)> {
    let source = SystemFontSource::new();
    let candidates = face_paths(&source);
    let registry = FontRegistry::new(source);
    for (index, path) in candidates.iter().take(16).enumerate() {
        let Ok(family) = registry.register_family(file_family(&format!("Test Sans {index}"), path))
        else {
            continue;
        };
        let covers_latin = {
            let adapter = registry.adapter(font(family));
            "Hello World".chars().all(|ch| adapter.map_char_to_glyph(ch) != 0)
        };
        if covers_latin {
            return Some((registry, family));
        }
    }
    None
}

pub fn font(family: FontFamily) -> Font {
    Font::new(family, SIZE)
}

pub fn fonts(family: FontFamily, text: &str) -> ValueRuns<Font> {
    ValueRuns::single(text.len(), font(family))
}
