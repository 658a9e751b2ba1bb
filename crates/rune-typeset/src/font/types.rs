use bitflags::bitflags;

/// Scale applied to the em size of small-caps, subscript and superscript
/// runs, which are shaped and rasterized smaller than the requested size.
pub const SYNTHETIC_SCALE: f32 = 0.7;

/// Baseline drop of synthetic subscript, as a fraction of the requested size.
pub const SUBSCRIPT_SHIFT: f32 = 0.2;

/// Baseline rise of synthetic superscript, as a fraction of the requested size.
pub const SUPERSCRIPT_SHIFT: f32 = 0.35;

/// Handle to a registered font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontFamily(u32);

impl FontFamily {
    pub const INVALID: Self = Self(u32::MAX);

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for FontFamily {
    fn default() -> Self {
        Self::INVALID
    }
}

/// CSS-style font weight, 100 through 900.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u16)]
pub enum FontWeight {
    Thin = 100,
    ExtraLight = 200,
    Light = 300,
    #[default]
    Regular = 400,
    Medium = 500,
    SemiBold = 600,
    Bold = 700,
    ExtraBold = 800,
    Black = 900,
}

impl FontWeight {
    pub const ALL: [FontWeight; 9] = [
        FontWeight::Thin,
        FontWeight::ExtraLight,
        FontWeight::Light,
        FontWeight::Regular,
        FontWeight::Medium,
        FontWeight::SemiBold,
        FontWeight::Bold,
        FontWeight::ExtraBold,
        FontWeight::Black,
    ];

    pub fn value(self) -> u16 {
        self as u16
    }

    /// Weight for an exact multiple of 100 between 100 and 900.
    pub fn from_value(value: u16) -> Option<Self> {
        if value % 100 != 0 {
            return None;
        }
        Self::ALL.get((value / 100).checked_sub(1)? as usize).copied()
    }

    pub(crate) fn index(self) -> usize {
        (self.value() / 100 - 1) as usize
    }
}

/// Upright or slanted face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "normal" | "regular" | "upright" => Some(FontStyle::Normal),
            "italic" | "oblique" => Some(FontStyle::Italic),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            FontStyle::Normal => 0,
            FontStyle::Italic => 1,
        }
    }
}

/// Handle to one registered face, carrying the weight and style the font
/// program was authored for. Id 0 is never valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceDataHandle {
    id: u32,
    weight: FontWeight,
    style: FontStyle,
}

impl FaceDataHandle {
    pub const INVALID: Self = Self {
        id: 0,
        weight: FontWeight::Regular,
        style: FontStyle::Normal,
    };

    pub(crate) fn new(id: u32, weight: FontWeight, style: FontStyle) -> Self {
        Self { id, weight, style }
    }

    pub fn id(self) -> u32 {
        self.id
    }

    /// Weight of the underlying font program.
    pub fn weight(self) -> FontWeight {
        self.weight
    }

    /// Style of the underlying font program.
    pub fn style(self) -> FontStyle {
        self.style
    }

    pub fn is_valid(self) -> bool {
        self.id != 0
    }
}

impl Default for FaceDataHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

bitflags! {
    /// Variants requested on a logical font.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FontVariant: u8 {
        const SMALL_CAPS = 1 << 0;
        const SUBSCRIPT = 1 << 1;
        const SUPERSCRIPT = 1 << 2;
    }
}

bitflags! {
    /// Styles emulated by transforming a face that lacks them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Synthesis: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const SMALL_CAPS = 1 << 2;
        const SUBSCRIPT = 1 << 3;
        const SUPERSCRIPT = 1 << 4;
    }
}

impl Synthesis {
    /// Bold and italic deltas between a face's source style and a target.
    pub fn between(
        source_weight: FontWeight,
        source_style: FontStyle,
        target_weight: FontWeight,
        target_style: FontStyle,
    ) -> Self {
        let mut synthesis = Synthesis::empty();
        if target_weight >= FontWeight::SemiBold && source_weight < FontWeight::SemiBold {
            synthesis |= Synthesis::BOLD;
        }
        if target_style == FontStyle::Italic && source_style == FontStyle::Normal {
            synthesis |= Synthesis::ITALIC;
        }
        synthesis
    }

    /// Whether runs with these flags are rendered at a reduced em size.
    pub fn is_scaled(self) -> bool {
        self.intersects(Synthesis::SMALL_CAPS | Synthesis::SUBSCRIPT | Synthesis::SUPERSCRIPT)
    }
}

/// A logical, multi-script font request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub family: FontFamily,
    pub weight: FontWeight,
    pub style: FontStyle,
    /// Em size in pixels.
    pub size: f32,
    pub variant: FontVariant,
}

/// Alias naming the role a [`Font`] plays during script resolution.
pub type MultiScriptFont = Font;

impl Font {
    pub fn new(family: FontFamily, size: f32) -> Self {
        Self {
            family,
            weight: FontWeight::Regular,
            style: FontStyle::Normal,
            size,
            variant: FontVariant::empty(),
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_variant(mut self, variant: FontVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// A concrete font resolved for one script run: the face actually shaped
/// with plus the synthesis needed to reach the requested style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleScriptFont {
    /// Family that owns `face`; may be a linked or fallback family.
    pub family: FontFamily,
    pub face: FaceDataHandle,
    /// Requested weight.
    pub weight: FontWeight,
    /// Requested style.
    pub style: FontStyle,
    /// Requested em size in pixels, before any synthetic reduction.
    pub size: f32,
    pub synthesis: Synthesis,
}

impl SingleScriptFont {
    pub fn is_valid(&self) -> bool {
        self.face.is_valid()
    }

    /// Em size the face is shaped and rasterized at.
    pub fn raster_size(&self) -> f32 {
        if self.synthesis.is_scaled() {
            self.size * SYNTHETIC_SCALE
        } else {
            self.size
        }
    }

    /// Vertical baseline offset in pixels (positive is down).
    pub fn baseline_shift(&self) -> f32 {
        if self.synthesis.contains(Synthesis::SUBSCRIPT) {
            self.size * SUBSCRIPT_SHIFT
        } else if self.synthesis.contains(Synthesis::SUPERSCRIPT) {
            -self.size * SUPERSCRIPT_SHIFT
        } else {
            0.0
        }
    }
}
