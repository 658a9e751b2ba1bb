/// Which side of an ambiguous boundary a cursor belongs to.
///
/// A cursor exactly on a line or bidi run boundary can render on either
/// side; `Default` follows the resolution policy of the cursor model and
/// `Opposite` takes the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorAffinity {
    #[default]
    Default,
    Opposite,
}

const AFFINITY_BIT: u32 = 1 << 31;
const OFFSET_MASK: u32 = !AFFINITY_BIT;

/// A character offset plus affinity packed into 32 bits.
///
/// The low 31 bits hold the offset and the high bit the affinity.
/// All-ones is the invalid sentinel, so the largest representable offset
/// is `2^31 - 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorPosition(u32);

impl CursorPosition {
    pub const INVALID: Self = Self(u32::MAX);

    /// Largest offset a valid position can carry.
    pub const MAX_OFFSET: usize = (OFFSET_MASK - 1) as usize;

    /// Position at `offset`; [`CursorPosition::INVALID`] when the offset
    /// does not fit.
    pub fn new(offset: usize, affinity: CursorAffinity) -> Self {
        if offset > Self::MAX_OFFSET {
            return Self::INVALID;
        }
        let bit = match affinity {
            CursorAffinity::Default => 0,
            CursorAffinity::Opposite => AFFINITY_BIT,
        };
        Self(offset as u32 | bit)
    }

    pub fn at(offset: usize) -> Self {
        Self::new(offset, CursorAffinity::Default)
    }

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    pub fn offset(self) -> usize {
        (self.0 & OFFSET_MASK) as usize
    }

    pub fn affinity(self) -> CursorAffinity {
        if self.0 & AFFINITY_BIT != 0 {
            CursorAffinity::Opposite
        } else {
            CursorAffinity::Default
        }
    }

    pub fn with_offset(self, offset: usize) -> Self {
        if !self.is_valid() {
            return self;
        }
        Self::new(offset, self.affinity())
    }

    pub fn with_affinity(self, affinity: CursorAffinity) -> Self {
        if !self.is_valid() {
            return self;
        }
        Self::new(self.offset(), affinity)
    }
}

impl Default for CursorPosition {
    fn default() -> Self {
        Self::at(0)
    }
}
