//! Script classification on top of `unicode-script`.

pub use unicode_script::Script;
use unicode_script::{ScriptExtension, UnicodeScript};

use crate::runs::ValueRuns;

/// Scripts that take on the script of surrounding text.
pub fn is_neutral(script: Script) -> bool {
    matches!(script, Script::Common | Script::Inherited | Script::Unknown)
}

/// Parse an ISO-15924 code (`Cyrl`) or a script name (`Cyrillic`),
/// ignoring ASCII case.
pub fn parse_script(name: &str) -> Option<Script> {
    let name = name.trim();
    Script::from_short_name(name)
        .or_else(|| Script::from_full_name(name))
        .or_else(|| {
            let normalized = title_case(name);
            Script::from_short_name(&normalized).or_else(|| Script::from_full_name(&normalized))
        })
}

fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for ch in name.chars() {
        if upper_next {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch.to_ascii_lowercase());
        }
        upper_next = ch == '_' || ch == ' ';
    }
    out.replace(' ', "_")
}

/// Scripts a family declares support for. Empty means every script.
///
/// Backed by the `Script_Extension` bitset, so membership is a mask test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSet {
    bits: ScriptExtension,
}

impl Default for ScriptSet {
    fn default() -> Self {
        Self {
            bits: ScriptExtension::from(Script::Unknown),
        }
    }
}

impl ScriptSet {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn from_scripts(scripts: impl IntoIterator<Item = Script>) -> Self {
        let mut set = Self::default();
        for script in scripts {
            set.insert(script);
        }
        set
    }

    /// Neutral scripts are implied by every set and are not stored.
    pub fn insert(&mut self, script: Script) {
        if !is_neutral(script) {
            self.bits = self.bits.union(script.into());
        }
    }

    /// Whether the set covers every script.
    pub fn is_universal(&self) -> bool {
        self.bits.is_empty()
    }

    /// Neutral scripts are supported by every set.
    pub fn contains(&self, script: Script) -> bool {
        self.bits.is_empty() || is_neutral(script) || self.bits.contains_script(script)
    }

    pub fn len(&self) -> usize {
        if self.bits.is_empty() { 0 } else { self.bits.len() }
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Script> {
        self.bits.iter()
    }
}

/// Split `text` into script runs over byte offsets.
///
/// Common and inherited characters join the preceding run; leading ones
/// join the first specific script. Text with no specific script is one
/// `Common` run.
pub fn script_runs(text: &str) -> ValueRuns<Script> {
    let mut runs = ValueRuns::new();
    let mut current: Option<Script> = None;
    for (idx, ch) in text.char_indices() {
        let script = ch.script();
        if is_neutral(script) {
            continue;
        }
        match current {
            Some(open) if open == script => {}
            Some(open) => {
                runs.add(idx, open);
                current = Some(script);
            }
            None => current = Some(script),
        }
    }
    if !text.is_empty() {
        runs.add(text.len(), current.unwrap_or(Script::Common));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_names() {
        assert_eq!(parse_script("Latn"), Some(Script::Latin));
        assert_eq!(parse_script("Cyrillic"), Some(Script::Cyrillic));
        assert_eq!(parse_script("arab"), Some(Script::Arabic));
        assert_eq!(parse_script("hebrew"), Some(Script::Hebrew));
        assert_eq!(parse_script("Klingon"), None);
    }

    #[test]
    fn empty_set_supports_everything() {
        let all = ScriptSet::all();
        assert!(all.contains(Script::Cyrillic));
        assert!(all.is_universal());

        let latin = ScriptSet::from_scripts([Script::Latin]);
        assert!(latin.contains(Script::Latin));
        assert!(latin.contains(Script::Common));
        assert!(!latin.contains(Script::Cyrillic));
    }

    #[test]
    fn set_stores_specific_scripts_only() {
        let mut set = ScriptSet::from_scripts([Script::Hebrew, Script::Latin, Script::Hebrew]);
        set.insert(Script::Common);
        assert_eq!(set.len(), 2);
        assert!(!set.is_universal());
        assert!(set.contains(Script::Hebrew));
        assert!(set.contains(Script::Inherited));
        assert!(!set.contains(Script::Arabic));
        let mut listed: Vec<Script> = set.iter().collect();
        listed.sort_by_key(|script| script.short_name());
        assert_eq!(listed, vec![Script::Hebrew, Script::Latin]);

        let neutral_only = ScriptSet::from_scripts([Script::Common]);
        assert!(neutral_only.is_universal());
    }

    #[test]
    fn neutrals_join_neighbouring_runs() {
        let text = "Hi, мир!";
        let runs = script_runs(text);
        let split = text.find('м').unwrap();
        assert_eq!(runs.limits(), &[split, text.len()]);
        assert_eq!(runs.values(), &[Script::Latin, Script::Cyrillic]);
    }

    #[test]
    fn leading_neutrals_join_first_script() {
        let runs = script_runs("123 שלום");
        assert_eq!(runs.run_count(), 1);
        assert_eq!(runs.values(), &[Script::Hebrew]);
    }

    #[test]
    fn digits_only_is_common() {
        let runs = script_runs("42");
        assert_eq!(runs.values(), &[Script::Common]);
        assert!(script_runs("").is_empty());
    }
}
