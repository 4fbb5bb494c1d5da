//! The set of colorant indices a panel accepts.

use std::fmt;

/// Bit set over the 4-bit index space (0-15).
///
/// Built from a [`Palette`](super::Palette) so the quantizer and the frame
/// packer agree on exactly which indices exist. Reserved slots (index 4 on
/// Spectra-6 panels) are simply absent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorantSet(u16);

impl ColorantSet {
    pub const EMPTY: Self = Self(0);

    /// Build a set from indices. Returns `None` if any index exceeds 15.
    pub fn from_indices(indices: impl IntoIterator<Item = u8>) -> Option<Self> {
        let mut bits = 0u16;
        for index in indices {
            if index > 15 {
                return None;
            }
            bits |= 1 << index;
        }
        Some(Self(bits))
    }

    #[inline]
    pub fn contains(self, index: u8) -> bool {
        index <= 15 && self.0 & (1 << index) != 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0u8..16).filter(move |&i| self.contains(i))
    }
}

impl fmt::Debug for ColorantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
