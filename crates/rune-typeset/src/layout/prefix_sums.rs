use core::ops::Range;

/// Prefix sum array over per-byte advances for O(1) width lookups.
///
/// Advances are attributed to the byte a glyph cluster starts at, so the
/// width of any range between cluster boundaries is exact.
#[derive(Debug, Clone, Default)]
pub struct PrefixSums {
    /// `sums[i]` is the total advance of bytes `[0, i)`.
    sums: Vec<f32>,
}

impl PrefixSums {
    pub fn new(advances: &[f32]) -> Self {
        let mut sums = Vec::with_capacity(advances.len() + 1);
        let mut total = 0.0f32;
        sums.push(total);
        for advance in advances {
            total += advance;
            sums.push(total);
        }
        Self { sums }
    }

    /// Number of covered bytes.
    pub fn len(&self) -> usize {
        self.sums.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance of `range`, clamped to the covered bytes.
    pub fn width(&self, range: Range<usize>) -> f32 {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        self.sums[end] - self.sums[start]
    }

    pub fn total(&self) -> f32 {
        self.sums.last().copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_of_ranges() {
        let sums = PrefixSums::new(&[5.0, 0.0, 3.0, 2.0]);
        assert_eq!(sums.len(), 4);
        assert_eq!(sums.width(0..4), 10.0);
        assert_eq!(sums.width(1..3), 3.0);
        assert_eq!(sums.width(2..2), 0.0);
        assert_eq!(sums.width(3..9), 2.0);
        assert_eq!(sums.total(), 10.0);
    }

    #[test]
    fn empty_sums() {
        let sums = PrefixSums::new(&[]);
        assert!(sums.is_empty());
        assert_eq!(sums.width(0..3), 0.0);
    }
}
