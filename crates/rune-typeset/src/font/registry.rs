//! Family and face registry with per-thread resolved font caching.
//!
//! Families are registered once, up front, and read under a shared lock
//! afterwards. Resolved [`FontData`] is cached per thread: the shaping and
//! measurement handles are resized in place and are never shared between
//! threads.

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use log::{debug, trace, warn};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use rune_config::{TextConfig, TypesetConfig};
use unicode_script::UnicodeScript;

use crate::error::RegistrationError;
use crate::font::data::{FontData, SynthesisParams};
use crate::font::script::{Script, ScriptSet};
use crate::font::source::{FontSource, MappedFont};
use crate::font::{
    FaceDataHandle, Font, FontFamily, FontStyle, FontVariant, FontWeight, SYNTHETIC_SCALE,
    SingleScriptFont, Synthesis,
};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    /// Resolved faces keyed by (registry id, face id). Failures are cached
    /// as `None` so a broken face is only reported once per thread.
    static FONT_DATA_CACHE: RefCell<HashMap<(u64, u32), Option<FontData>>> =
        RefCell::new(HashMap::new());
}

/// One face descriptor handed to [`FontRegistry::register_family`].
#[derive(Debug, Clone, PartialEq)]
pub struct FaceInfo {
    pub name: String,
    pub uri: String,
    /// Face index within a collection file; 0 defers to the source.
    pub index: u32,
    pub weight: FontWeight,
    pub style: FontStyle,
}

/// In-memory family descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilyInfo {
    pub name: String,
    /// Declared scripts; empty supports every script.
    pub scripts: ScriptSet,
    /// Families consulted, in order, for scripts this family does not declare.
    pub linked: Vec<String>,
    /// Families consulted, in order, for codepoints no declared face covers.
    pub fallbacks: Vec<String>,
    pub faces: Vec<FaceInfo>,
}

/// Which synthetic variants are emulated. All default to on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisOptions {
    pub small_caps: bool,
    pub subscript: bool,
    pub superscript: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            small_caps: true,
            subscript: true,
            superscript: true,
        }
    }
}

impl From<&TextConfig> for SynthesisOptions {
    fn from(config: &TextConfig) -> Self {
        Self {
            small_caps: config.synthesize_small_caps,
            subscript: config.synthesize_subscript,
            superscript: config.synthesize_superscript,
        }
    }
}

struct FaceRecord {
    name: String,
    uri: String,
    index: u32,
    /// Populated on first use from the font source.
    data: OnceCell<Option<MappedFont>>,
}

struct FamilyData {
    name: String,
    initialized: bool,
    lookup: [[FaceDataHandle; 2]; 9],
    scripts: ScriptSet,
    linked: Vec<FontFamily>,
    fallbacks: Vec<FontFamily>,
}

impl FamilyData {
    fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            initialized: false,
            lookup: [[FaceDataHandle::INVALID; 2]; 9],
            scripts: ScriptSet::all(),
            linked: Vec::new(),
            fallbacks: Vec::new(),
        }
    }

    fn face(&self, weight: FontWeight, style: FontStyle) -> FaceDataHandle {
        self.lookup[weight.index()][style.index()]
    }
}

#[derive(Default)]
struct Tables {
    families: Vec<FamilyData>,
    by_name: HashMap<String, FontFamily>,
    faces: Vec<Arc<FaceRecord>>,
}

impl Tables {
    fn family(&self, family: FontFamily) -> Option<&FamilyData> {
        if !family.is_valid() {
            return None;
        }
        self.families.get(family.index())
    }

    fn initialized(&self, family: FontFamily) -> Option<&FamilyData> {
        self.family(family).filter(|data| data.initialized)
    }

    fn get_or_create(&mut self, name: &str) -> FontFamily {
        if let Some(&family) = self.by_name.get(name) {
            return family;
        }
        let family = FontFamily::from_index(self.families.len());
        self.families.push(FamilyData::placeholder(name));
        self.by_name.insert(name.to_string(), family);
        family
    }

    fn face_record(&self, face: FaceDataHandle) -> Option<Arc<FaceRecord>> {
        if !face.is_valid() {
            return None;
        }
        self.faces.get(face.id() as usize - 1).cloned()
    }
}

/// Process-scoped font service: family/face tables plus the byte source
/// faces are loaded through.
pub struct FontRegistry {
    id: u64,
    source: Box<dyn FontSource>,
    options: SynthesisOptions,
    tables: RwLock<Tables>,
}

impl FontRegistry {
    pub fn new(source: impl FontSource + 'static) -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            source: Box::new(source),
            options: SynthesisOptions::default(),
            tables: RwLock::new(Tables::default()),
        }
    }

    pub fn with_synthesis(mut self, options: SynthesisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn synthesis_options(&self) -> SynthesisOptions {
        self.options
    }

    /// Handle for a registered family, or [`FontFamily::INVALID`].
    pub fn get_family(&self, name: &str) -> FontFamily {
        let tables = self.tables.read();
        match tables.by_name.get(name) {
            Some(&family) if tables.families[family.index()].initialized => family,
            _ => FontFamily::INVALID,
        }
    }

    pub fn family_name(&self, family: FontFamily) -> Option<String> {
        self.tables.read().family(family).map(|data| data.name.clone())
    }

    pub fn is_initialized(&self, family: FontFamily) -> bool {
        self.tables.read().initialized(family).is_some()
    }

    /// Whether `family` declares support for `script`.
    pub fn supports_script(&self, family: FontFamily, script: Script) -> bool {
        self.tables
            .read()
            .initialized(family)
            .is_some_and(|data| data.scripts.contains(script))
    }

    /// Face registered for `weight`/`style` in `family`.
    pub fn face_for(&self, family: FontFamily, weight: FontWeight, style: FontStyle) -> FaceDataHandle {
        self.tables
            .read()
            .initialized(family)
            .map_or(FaceDataHandle::INVALID, |data| data.face(weight, style))
    }

    /// Register a family.
    ///
    /// Linked and fallback families may be registered later; until then
    /// they are skipped during resolution. On failure the family record
    /// stays present but uninitialized, so a corrected call can retry.
    pub fn register_family(&self, info: FamilyInfo) -> Result<FontFamily, RegistrationError> {
        let mut tables = self.tables.write();
        let family = tables.get_or_create(&info.name);
        if tables.families[family.index()].initialized {
            return Err(RegistrationError::AlreadyLoaded(info.name));
        }
        if info.faces.is_empty() {
            return Err(RegistrationError::NoFaces(info.name));
        }

        let linked: Vec<FontFamily> = info.linked.iter().map(|name| tables.get_or_create(name)).collect();
        let fallbacks: Vec<FontFamily> = info
            .fallbacks
            .iter()
            .map(|name| tables.get_or_create(name))
            .collect();

        let mut lookup = [[FaceDataHandle::INVALID; 2]; 9];
        let mut default_face = FaceDataHandle::INVALID;
        for face in &info.faces {
            tables.faces.push(Arc::new(FaceRecord {
                name: face.name.clone(),
                uri: face.uri.clone(),
                index: face.index,
                data: OnceCell::new(),
            }));
            let handle = FaceDataHandle::new(tables.faces.len() as u32, face.weight, face.style);
            let cell = &mut lookup[face.weight.index()][face.style.index()];
            if !cell.is_valid() {
                *cell = handle;
            }
            let preferred = face.weight == FontWeight::Regular && face.style == FontStyle::Normal;
            if !default_face.is_valid() || (preferred && !is_regular(default_face)) {
                default_face = handle;
            }
        }
        for cell in lookup.iter_mut().flatten() {
            if !cell.is_valid() {
                *cell = default_face;
            }
        }

        let data = &mut tables.families[family.index()];
        data.lookup = lookup;
        data.scripts = info.scripts;
        data.linked = linked;
        data.fallbacks = fallbacks;
        data.initialized = true;
        debug!(
            "registered font family `{}` with {} faces",
            info.name,
            info.faces.len()
        );
        Ok(family)
    }

    /// Register every family in `config`, returning the failures.
    pub fn register_config(&self, config: &TypesetConfig) -> Vec<RegistrationError> {
        let mut errors = Vec::new();
        for family in &config.families {
            let result = FamilyInfo::try_from(family).and_then(|info| self.register_family(info));
            if let Err(err) = result {
                warn!("font family registration failed: {err}");
                errors.push(err);
            }
        }
        errors
    }

    /// Resolve a logical font through its own family's face matrix.
    pub fn get_font_data(&self, font: &Font) -> Option<FontData> {
        let face = self.face_for(font.family, font.weight, font.style);
        self.get_face_data(face, font.size, font.weight, font.style, font.variant)
    }

    /// Resolve the face a script run was assigned.
    pub fn get_sub_font_data(&self, font: &SingleScriptFont) -> Option<FontData> {
        let params = SynthesisParams {
            source_weight: font.face.weight(),
            source_style: font.face.style(),
            target_weight: font.weight,
            target_style: font.style,
            flags: font.synthesis,
        };
        self.cached_face_data(font.face, font.raster_size(), params)
    }

    /// Resolve an explicit face at `size` for a target style.
    ///
    /// Small-caps and sub/superscript variants (when enabled) reduce the
    /// effective size by [`SYNTHETIC_SCALE`].
    pub fn get_face_data(
        &self,
        face: FaceDataHandle,
        size: f32,
        weight: FontWeight,
        style: FontStyle,
        variant: FontVariant,
    ) -> Option<FontData> {
        let flags = Synthesis::between(face.weight(), face.style(), weight, style)
            | self.variant_synthesis(variant);
        let size = if flags.is_scaled() { size * SYNTHETIC_SCALE } else { size };
        let params = SynthesisParams {
            source_weight: face.weight(),
            source_style: face.style(),
            target_weight: weight,
            target_style: style,
            flags,
        };
        self.cached_face_data(face, size, params)
    }

    fn variant_synthesis(&self, variant: FontVariant) -> Synthesis {
        let mut flags = Synthesis::empty();
        if variant.contains(FontVariant::SMALL_CAPS) && self.options.small_caps {
            flags |= Synthesis::SMALL_CAPS;
        }
        if variant.contains(FontVariant::SUBSCRIPT) && self.options.subscript {
            flags |= Synthesis::SUBSCRIPT;
        } else if variant.contains(FontVariant::SUPERSCRIPT) && self.options.superscript {
            flags |= Synthesis::SUPERSCRIPT;
        }
        flags
    }

    fn cached_face_data(
        &self,
        face: FaceDataHandle,
        size: f32,
        params: SynthesisParams,
    ) -> Option<FontData> {
        if !face.is_valid() {
            return None;
        }
        let key = (self.id, face.id());
        let cached = FONT_DATA_CACHE.with(|cache| {
            cache.borrow_mut().get_mut(&key).map(|entry| {
                entry.as_mut().map(|data| {
                    data.set_size(size);
                    data.set_synthesis(params);
                    data.clone()
                })
            })
        });
        if let Some(entry) = cached {
            return entry;
        }

        let resolved = self.face_bytes(face).and_then(|mapped| {
            match FontData::new(face, mapped, size, params) {
                Ok(data) => Some(data),
                Err(err) => {
                    warn!("face {} rejected: {err}", face.id());
                    None
                }
            }
        });
        FONT_DATA_CACHE.with(|cache| {
            cache.borrow_mut().insert(key, resolved.clone());
        });
        resolved
    }

    fn face_bytes(&self, face: FaceDataHandle) -> Option<MappedFont> {
        let record = self.tables.read().face_record(face)?;
        record
            .data
            .get_or_init(|| match self.source.map(&record.uri) {
                Ok(mut mapped) => {
                    if record.index != 0 {
                        mapped.index = record.index;
                    }
                    trace!("mapped face `{}` from {}", record.name, record.uri);
                    Some(mapped)
                }
                Err(err) => {
                    warn!("failed to map face `{}` ({}): {err}", record.name, record.uri);
                    None
                }
            })
            .clone()
    }

    /// Resolve the concrete font for the script run starting at `offset`.
    ///
    /// Returns the font and the end of the maximal prefix of
    /// `text[offset..limit]` it should be shaped with; callers continue
    /// from there. Resolution order: the family itself when it declares
    /// `script`, else the first initialized linked family declaring it,
    /// else the family anyway; codepoints that face lacks are tried
    /// against the fallback families in order. A codepoint nothing covers
    /// stays with the base face so it renders as notdef. An empty range or
    /// one not on character boundaries resolves to the family's own face
    /// and `limit`.
    pub fn get_sub_font(
        &self,
        font: &Font,
        text: &str,
        offset: usize,
        limit: usize,
        script: Script,
    ) -> (SingleScriptFont, usize) {
        let mut limit = limit.min(text.len());
        let mut variant_flags = self.variant_synthesis(font.variant);
        if offset >= limit || !text.is_char_boundary(offset) || !text.is_char_boundary(limit) {
            let face = self.face_for(font.family, font.weight, font.style);
            let synthesis =
                Synthesis::between(face.weight(), face.style(), font.weight, font.style) | variant_flags;
            let resolved = SingleScriptFont {
                family: font.family,
                face,
                weight: font.weight,
                style: font.style,
                size: font.size,
                synthesis,
            };
            return (resolved, limit);
        }
        if variant_flags.contains(Synthesis::SMALL_CAPS) {
            let (end, lowercase) = casing_run(text, offset, limit);
            limit = end;
            if !lowercase {
                variant_flags.remove(Synthesis::SMALL_CAPS);
            }
        }

        let make = |family: FontFamily, face: FaceDataHandle| SingleScriptFont {
            family,
            face,
            weight: font.weight,
            style: font.style,
            size: font.size,
            synthesis: Synthesis::between(face.weight(), face.style(), font.weight, font.style)
                | variant_flags,
        };

        let (base, fallbacks) = {
            let tables = self.tables.read();
            let Some(family) = tables.initialized(font.family) else {
                return (make(font.family, FaceDataHandle::INVALID), limit);
            };
            let linked = family.linked.iter().copied().find(|&linked| {
                tables
                    .initialized(linked)
                    .is_some_and(|data| data.scripts.contains(script))
            });
            let base = match linked {
                Some(linked) if !family.scripts.contains(script) => {
                    let face = tables.families[linked.index()].face(font.weight, font.style);
                    (linked, face)
                }
                _ => (font.family, family.face(font.weight, font.style)),
            };
            let fallbacks: Vec<(FontFamily, FaceDataHandle)> = family
                .fallbacks
                .iter()
                .filter_map(|&fallback| {
                    tables
                        .initialized(fallback)
                        .map(|data| (fallback, data.face(font.weight, font.style)))
                })
                .collect();
            (base, fallbacks)
        };

        let size = if variant_flags.is_scaled() {
            font.size * SYNTHETIC_SCALE
        } else {
            font.size
        };
        let probe = |face: FaceDataHandle| {
            self.get_face_data(face, size, font.weight, font.style, FontVariant::empty())
        };

        let mut chars = text[offset..limit].char_indices();
        let Some((_, first)) = chars.next() else {
            return (make(base.0, base.1), limit);
        };

        let covering = probe(base.1)
            .filter(|data| data.covers(first))
            .map(|data| (base, data))
            .or_else(|| {
                fallbacks.iter().find_map(|&(family, face)| {
                    probe(face)
                        .filter(|data| data.covers(first))
                        .map(|data| ((family, face), data))
                })
            });
        let Some(((family, face), data)) = covering else {
            trace!("no face covers U+{:04X}; keeping base face", first as u32);
            return (make(base.0, base.1), limit);
        };

        let end = chars
            .find(|&(_, ch)| !data.covers(ch))
            .map_or(limit, |(idx, _)| offset + idx);
        trace!(
            "resolved {:?} run {}..{} to face {}",
            script,
            offset,
            end,
            face.id()
        );
        (make(family, face), end)
    }
}

fn is_regular(face: FaceDataHandle) -> bool {
    face.weight() == FontWeight::Regular && face.style() == FontStyle::Normal
}

/// End of the run starting at `offset` with uniform letter case, and
/// whether that run is lowercase. Marks and uncased characters never
/// break a run.
fn casing_run(text: &str, offset: usize, limit: usize) -> (usize, bool) {
    let mut lowercase: Option<bool> = None;
    for (idx, ch) in text[offset..limit].char_indices() {
        if ch.script() == Script::Inherited || !(ch.is_lowercase() || ch.is_uppercase()) {
            continue;
        }
        let is_lower = ch.is_lowercase();
        match lowercase {
            None => lowercase = Some(is_lower),
            Some(open) if open != is_lower => return (offset + idx, open),
            Some(_) => {}
        }
    }
    (limit, lowercase.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::source::{FontBytes, MemorySource};

    /// Registry whose "Sans" family maps to an installed font program.
    /// `None` when the host has no usable font file.
    fn loaded_registry() -> Option<(FontRegistry, FontFamily)> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        let bytes = db.faces().find_map(|face| {
            let fontdb::Source::File(path) = &face.source else {
                return None;
            };
            let bytes = std::fs::read(path).ok()?;
            let parses = swash::FontRef::from_index(&bytes, 0).is_some()
                && harfrust::FontRef::from_index(&bytes, 0).is_ok();
            parses.then_some(bytes)
        })?;
        let source = MemorySource::new();
        source.insert("mem:sans", FontBytes::from_vec(bytes));
        let registry = FontRegistry::new(source);
        let mut sans = family("Sans", vec![face(FontWeight::Regular, FontStyle::Normal)]);
        sans.faces[0].uri = "mem:sans".into();
        let family = registry.register_family(sans).ok()?;
        Some((registry, family))
    }

    fn cached_on_this_thread(registry: &FontRegistry, face: FaceDataHandle) -> bool {
        FONT_DATA_CACHE.with(|cache| cache.borrow().contains_key(&(registry.id, face.id())))
    }

    fn face(weight: FontWeight, style: FontStyle) -> FaceInfo {
        FaceInfo {
            name: format!("{weight:?} {style:?}"),
            uri: format!("mem:{}-{:?}", weight.value(), style),
            index: 0,
            weight,
            style,
        }
    }

    fn family(name: &str, faces: Vec<FaceInfo>) -> FamilyInfo {
        FamilyInfo {
            name: name.to_string(),
            faces,
            ..FamilyInfo::default()
        }
    }

    #[test]
    fn unregistered_family_is_invalid() {
        let registry = FontRegistry::new(MemorySource::new());
        assert!(!registry.get_family("Nope").is_valid());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = FontRegistry::new(MemorySource::new());
        let first = registry
            .register_family(family("Sans", vec![face(FontWeight::Regular, FontStyle::Normal)]))
            .unwrap();
        let before = registry.face_for(first, FontWeight::Regular, FontStyle::Normal);

        let err = registry
            .register_family(family("Sans", vec![face(FontWeight::Bold, FontStyle::Italic)]))
            .unwrap_err();
        assert_eq!(err, RegistrationError::AlreadyLoaded("Sans".into()));
        assert_eq!(registry.get_family("Sans"), first);
        assert_eq!(registry.face_for(first, FontWeight::Regular, FontStyle::Normal), before);
        assert_eq!(
            registry.face_for(first, FontWeight::Bold, FontStyle::Italic),
            before
        );
    }

    #[test]
    fn empty_face_list_leaves_family_retryable() {
        let registry = FontRegistry::new(MemorySource::new());
        let err = registry.register_family(family("Serif", Vec::new())).unwrap_err();
        assert_eq!(err, RegistrationError::NoFaces("Serif".into()));
        assert!(!registry.get_family("Serif").is_valid());

        let retried = registry
            .register_family(family("Serif", vec![face(FontWeight::Regular, FontStyle::Normal)]))
            .unwrap();
        assert!(retried.is_valid());
        assert_eq!(registry.get_family("Serif"), retried);
    }

    #[test]
    fn unset_cells_prefer_regular_normal_face() {
        let registry = FontRegistry::new(MemorySource::new());
        let sans = registry
            .register_family(family(
                "Sans",
                vec![
                    face(FontWeight::Bold, FontStyle::Normal),
                    face(FontWeight::Regular, FontStyle::Normal),
                    face(FontWeight::Regular, FontStyle::Italic),
                ],
            ))
            .unwrap();

        let bold = registry.face_for(sans, FontWeight::Bold, FontStyle::Normal);
        assert_eq!(bold.weight(), FontWeight::Bold);
        let italic = registry.face_for(sans, FontWeight::Regular, FontStyle::Italic);
        assert_eq!(italic.style(), FontStyle::Italic);

        let filler = registry.face_for(sans, FontWeight::Black, FontStyle::Italic);
        assert_eq!(filler.weight(), FontWeight::Regular);
        assert_eq!(filler.style(), FontStyle::Normal);
    }

    #[test]
    fn default_face_falls_back_to_first_declared() {
        let registry = FontRegistry::new(MemorySource::new());
        let mono = registry
            .register_family(family(
                "Mono",
                vec![
                    face(FontWeight::Light, FontStyle::Italic),
                    face(FontWeight::Bold, FontStyle::Normal),
                ],
            ))
            .unwrap();
        let filler = registry.face_for(mono, FontWeight::Regular, FontStyle::Normal);
        assert_eq!(filler.weight(), FontWeight::Light);
        assert_eq!(filler.style(), FontStyle::Italic);
    }

    #[test]
    fn declared_scripts_limit_support() {
        let registry = FontRegistry::new(MemorySource::new());
        let universal = registry
            .register_family(family("Any", vec![face(FontWeight::Regular, FontStyle::Normal)]))
            .unwrap();
        let mut latin_only = family("Latin", vec![face(FontWeight::Regular, FontStyle::Normal)]);
        latin_only.scripts = ScriptSet::from_scripts([Script::Latin]);
        let latin = registry.register_family(latin_only).unwrap();

        assert!(registry.supports_script(universal, Script::Cyrillic));
        assert!(registry.supports_script(latin, Script::Latin));
        assert!(!registry.supports_script(latin, Script::Cyrillic));
    }

    #[test]
    fn referenced_families_are_placeholders_until_registered() {
        let registry = FontRegistry::new(MemorySource::new());
        let mut sans = family("Sans", vec![face(FontWeight::Regular, FontStyle::Normal)]);
        sans.fallbacks = vec!["Symbols".into()];
        registry.register_family(sans).unwrap();
        assert!(!registry.get_family("Symbols").is_valid());

        let symbols = registry
            .register_family(family("Symbols", vec![face(FontWeight::Regular, FontStyle::Normal)]))
            .unwrap();
        assert!(registry.is_initialized(symbols));
    }

    #[test]
    fn unmappable_face_resolves_to_none() {
        let registry = FontRegistry::new(MemorySource::new());
        let sans = registry
            .register_family(family("Sans", vec![face(FontWeight::Regular, FontStyle::Normal)]))
            .unwrap();
        let font = Font::new(sans, 16.0);
        assert!(registry.get_font_data(&font).is_none());
        // Cached failure is stable.
        assert!(registry.get_font_data(&font).is_none());
    }

    #[test]
    fn uncovered_text_keeps_base_face_and_consumes_run() {
        let registry = FontRegistry::new(MemorySource::new());
        let sans = registry
            .register_family(family("Sans", vec![face(FontWeight::Regular, FontStyle::Normal)]))
            .unwrap();
        let font = Font::new(sans, 16.0);
        let text = "abc";
        let (resolved, end) = registry.get_sub_font(&font, text, 0, text.len(), Script::Latin);
        assert_eq!(end, 3);
        assert_eq!(resolved.family, sans);
        assert_eq!(resolved.face, registry.face_for(sans, FontWeight::Regular, FontStyle::Normal));
    }

    #[test]
    fn linked_family_is_base_for_undeclared_script() {
        let registry = FontRegistry::new(MemorySource::new());
        let mut cyr = family("Cyr", vec![face(FontWeight::Regular, FontStyle::Normal)]);
        cyr.scripts = ScriptSet::from_scripts([Script::Cyrillic]);
        let cyr = registry.register_family(cyr).unwrap();

        let mut latin = family("Lat", vec![face(FontWeight::Regular, FontStyle::Normal)]);
        latin.scripts = ScriptSet::from_scripts([Script::Latin]);
        latin.linked = vec!["Cyr".into()];
        let latin = registry.register_family(latin).unwrap();

        let font = Font::new(latin, 16.0);
        let text = "мир";
        let (resolved, end) = registry.get_sub_font(&font, text, 0, text.len(), Script::Cyrillic);
        assert_eq!(resolved.family, cyr);
        assert_eq!(end, text.len());

        let (resolved, _) = registry.get_sub_font(&font, "abc", 0, 3, Script::Latin);
        assert_eq!(resolved.family, latin);
    }

    #[test]
    fn linked_family_without_declared_scripts_supports_everything() {
        let registry = FontRegistry::new(MemorySource::new());
        let any = registry
            .register_family(family("Any", vec![face(FontWeight::Regular, FontStyle::Normal)]))
            .unwrap();
        let mut latin = family("Lat", vec![face(FontWeight::Regular, FontStyle::Normal)]);
        latin.scripts = ScriptSet::from_scripts([Script::Latin]);
        latin.linked = vec!["Any".into()];
        let latin = registry.register_family(latin).unwrap();

        let font = Font::new(latin, 16.0);
        let (resolved, end) = registry.get_sub_font(&font, "мир", 0, "мир".len(), Script::Cyrillic);
        assert_eq!(resolved.family, any);
        assert_eq!(resolved.face, registry.face_for(any, FontWeight::Regular, FontStyle::Normal));
        assert_eq!(end, "мир".len());
    }

    #[test]
    fn degenerate_ranges_resolve_to_family_face() {
        let registry = FontRegistry::new(MemorySource::new());
        let sans = registry
            .register_family(family("Sans", vec![face(FontWeight::Regular, FontStyle::Normal)]))
            .unwrap();
        let font = Font::new(sans, 16.0);
        let regular = registry.face_for(sans, FontWeight::Regular, FontStyle::Normal);
        let text = "aмb";

        let (resolved, end) = registry.get_sub_font(&font, text, 3, 1, Script::Latin);
        assert_eq!((resolved.family, resolved.face, end), (sans, regular, 1));

        let (resolved, end) = registry.get_sub_font(&font, text, 2, text.len(), Script::Cyrillic);
        assert_eq!((resolved.face, end), (regular, text.len()));

        let (_, end) = registry.get_sub_font(&font, text, 4, 99, Script::Latin);
        assert_eq!(end, text.len());
        let (_, end) = registry.get_sub_font(&font, text, text.len(), text.len(), Script::Latin);
        assert_eq!(end, text.len());
    }

    #[test]
    fn cache_hit_at_new_size_rescales_in_place() {
        let Some((registry, sans)) = loaded_registry() else {
            return;
        };
        let small = registry.get_font_data(&Font::new(sans, 16.0)).unwrap();
        let large = registry.get_font_data(&Font::new(sans, 32.0)).unwrap();
        assert_eq!(small.size(), 16.0);
        assert_eq!(large.size(), 32.0);
        let ratio = large.scaled_metrics().ascent / small.scaled_metrics().ascent;
        assert!((ratio - 2.0).abs() < 1e-4);
        // Both sizes share one parsed face.
        assert!(Arc::ptr_eq(small.shaping(), large.shaping()));
    }

    #[test]
    fn resolved_faces_are_cached_per_thread() {
        let Some((registry, sans)) = loaded_registry() else {
            return;
        };
        let face = registry.face_for(sans, FontWeight::Regular, FontStyle::Normal);
        let here = registry.get_font_data(&Font::new(sans, 16.0)).unwrap();
        assert!(cached_on_this_thread(&registry, face));

        let (was_cached, ascent) = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let was_cached = cached_on_this_thread(&registry, face);
                    let data = registry.get_font_data(&Font::new(sans, 48.0));
                    (was_cached, data.map(|data| data.scaled_metrics().ascent))
                })
                .join()
                .unwrap()
        });
        assert!(!was_cached);
        let ascent = ascent.unwrap();
        assert!((ascent / here.scaled_metrics().ascent - 3.0).abs() < 1e-4);

        // The other thread's resize did not touch this thread's entry.
        let again = registry.get_face_data(
            face,
            16.0,
            FontWeight::Regular,
            FontStyle::Normal,
            FontVariant::empty(),
        );
        assert_eq!(again.unwrap().scaled_metrics(), here.scaled_metrics());
    }

    #[test]
    fn sub_font_resolution_is_deterministic() {
        let registry = FontRegistry::new(MemorySource::new());
        let sans = registry
            .register_family(family("Sans", vec![face(FontWeight::Regular, FontStyle::Normal)]))
            .unwrap();
        let font = Font::new(sans, 12.0).with_weight(FontWeight::Bold);
        let a = registry.get_sub_font(&font, "hello", 1, 5, Script::Latin);
        let b = registry.get_sub_font(&font, "hello", 1, 5, Script::Latin);
        assert_eq!(a, b);
        assert!(a.0.synthesis.contains(Synthesis::BOLD));
    }

    #[test]
    fn small_caps_splits_on_case() {
        assert_eq!(casing_run("abcDEF", 0, 6), (3, true));
        assert_eq!(casing_run("DEF ghi", 0, 7), (4, false));
        assert_eq!(casing_run("e\u{0301}e", 0, 4), (4, true));
        assert_eq!(casing_run("12 ab", 0, 5), (5, true));

        let registry = FontRegistry::new(MemorySource::new());
        let sans = registry
            .register_family(family("Sans", vec![face(FontWeight::Regular, FontStyle::Normal)]))
            .unwrap();
        let font = Font::new(sans, 20.0).with_variant(FontVariant::SMALL_CAPS);
        let (lower, end) = registry.get_sub_font(&font, "abcDEF", 0, 6, Script::Latin);
        assert_eq!(end, 3);
        assert!(lower.synthesis.contains(Synthesis::SMALL_CAPS));
        let (upper, end) = registry.get_sub_font(&font, "abcDEF", 3, 6, Script::Latin);
        assert_eq!(end, 6);
        assert!(!upper.synthesis.contains(Synthesis::SMALL_CAPS));
    }

    #[test]
    fn disabled_synthesis_ignores_variants() {
        let registry = FontRegistry::new(MemorySource::new()).with_synthesis(SynthesisOptions {
            small_caps: false,
            subscript: false,
            superscript: false,
        });
        let sans = registry
            .register_family(family("Sans", vec![face(FontWeight::Regular, FontStyle::Normal)]))
            .unwrap();
        let font = Font::new(sans, 20.0).with_variant(FontVariant::SMALL_CAPS | FontVariant::SUBSCRIPT);
        let (resolved, end) = registry.get_sub_font(&font, "abcDEF", 0, 6, Script::Latin);
        assert_eq!(end, 6);
        assert!(!resolved.synthesis.is_scaled());
    }
}
