//! Font program byte sources.
//!
//! The registry never touches the filesystem itself: each face carries a
//! URI that a [`FontSource`] maps to bytes the first time the face is used.
//! Dropping the returned [`FontBytes`] releases the mapping.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::error::{FontError, Result};

/// Shared, immutable font program bytes.
#[derive(Clone)]
pub struct FontBytes(Backing);

#[derive(Clone)]
enum Backing {
    Owned(Arc<[u8]>),
    #[cfg(feature = "mmap")]
    Mapped(Arc<memmap2::Mmap>),
}

impl FontBytes {
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self(Backing::Owned(Arc::from(data)))
    }

    pub fn from_arc(data: Arc<[u8]>) -> Self {
        Self(Backing::Owned(data))
    }

    pub fn as_slice(&self) -> &[u8] {
        match &self.0 {
            Backing::Owned(data) => &data[..],
            #[cfg(feature = "mmap")]
            Backing::Mapped(map) => &map[..],
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl AsRef<[u8]> for FontBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for FontBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontBytes").field("len", &self.len()).finish()
    }
}

/// Bytes for one font program plus its index within a collection file.
#[derive(Debug, Clone)]
pub struct MappedFont {
    pub bytes: FontBytes,
    pub index: u32,
}

impl MappedFont {
    pub fn new(bytes: FontBytes) -> Self {
        Self { bytes, index: 0 }
    }
}

/// Maps a face URI to font program bytes.
pub trait FontSource: Send + Sync {
    fn map(&self, uri: &str) -> Result<MappedFont>;
}

/// Reads font files fully into memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

impl FontSource for FileSource {
    fn map(&self, uri: &str) -> Result<MappedFont> {
        read_file(Path::new(uri))
    }
}

fn read_file(path: &Path) -> Result<MappedFont> {
    let data = std::fs::read(path)?;
    Ok(MappedFont::new(FontBytes::from_vec(data)))
}

/// Memory-maps font files.
#[cfg(feature = "mmap")]
#[derive(Debug, Default, Clone, Copy)]
pub struct MappedFileSource;

#[cfg(feature = "mmap")]
impl FontSource for MappedFileSource {
    fn map(&self, uri: &str) -> Result<MappedFont> {
        let file = std::fs::File::open(uri)?;
        // SAFETY: font files are treated as read-only for the process lifetime.
        let map = unsafe { memmap2::Mmap::map(&file)? };
        Ok(MappedFont::new(FontBytes(Backing::Mapped(Arc::new(map)))))
    }
}

/// In-memory table of font programs keyed by URI.
#[derive(Debug, Default)]
pub struct MemorySource {
    fonts: RwLock<HashMap<String, MappedFont>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, uri: impl Into<String>, bytes: FontBytes) {
        self.fonts.write().insert(uri.into(), MappedFont::new(bytes));
    }
}

impl FontSource for MemorySource {
    fn map(&self, uri: &str) -> Result<MappedFont> {
        self.fonts
            .read()
            .get(uri)
            .cloned()
            .ok_or_else(|| FontError::NotFound(uri.to_string()))
    }
}

/// Resolves `system:<family>[?weight=700&style=italic]` URIs against the
/// installed fonts via `fontdb`; any other URI is read as a file path.
///
/// Generic names `sans-serif`, `serif` and `monospace` are understood.
pub struct SystemFontSource {
    db: Database,
}

impl SystemFontSource {
    /// Scan the system font directories.
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("system font source indexed {} faces", db.len());
        Self { db }
    }

    pub fn with_database(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn query(&self, request: &str) -> Result<MappedFont> {
        let (name, params) = request.split_once('?').unwrap_or((request, ""));
        let mut weight = Weight::NORMAL;
        let mut style = Style::Normal;
        for pair in params.split('&').filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some(("weight", value)) => {
                    if let Ok(value) = value.parse::<u16>() {
                        weight = Weight(value);
                    }
                }
                Some(("style", "italic")) => style = Style::Italic,
                Some(("style", "oblique")) => style = Style::Oblique,
                _ => log::warn!("ignoring system font parameter `{pair}`"),
            }
        }

        let family = match name {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            other => Family::Name(other),
        };
        let id = self
            .db
            .query(&Query {
                families: &[family],
                weight,
                stretch: Stretch::Normal,
                style,
                ..Query::default()
            })
            .ok_or_else(|| FontError::NotFound(request.to_string()))?;
        let face = self
            .db
            .face(id)
            .ok_or_else(|| FontError::NotFound(request.to_string()))?;

        let bytes = match &face.source {
            Source::File(path) => FontBytes::from_vec(std::fs::read(path)?),
            Source::Binary(data) => FontBytes::from_vec(data.as_ref().as_ref().to_vec()),
            Source::SharedFile(_, data) => FontBytes::from_vec(data.as_ref().as_ref().to_vec()),
        };
        Ok(MappedFont {
            bytes,
            index: face.index,
        })
    }
}

impl Default for SystemFontSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FontSource for SystemFontSource {
    fn map(&self, uri: &str) -> Result<MappedFont> {
        match uri.strip_prefix("system:") {
            Some(request) => self.query(request),
            None => read_file(Path::new(uri)),
        }
    }
}
