//! Read-only bit sequences cut from the entropy stream.

/// An immutable, ordered run of bits.
///
/// Bytes unpack most significant bit first, matching the order in which the
/// stream hands them out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitView {
    bits: Vec<bool>,
}

impl BitView {
    /// Unpack `bytes` (MSB first per byte) and keep the first `n` bits.
    pub fn from_bytes(bytes: &[u8], n: usize) -> Self {
        let mut bits = Vec::with_capacity(bytes.len() * 8);
        for &byte in bytes {
            for shift in (0..8).rev() {
                bits.push((byte >> shift) & 1 == 1);
            }
        }
        bits.truncate(n);
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Interpret `size` bits starting at `index` as an unsigned integer.
    ///
    /// The first bit of the window is the least significant (bit `i` of the
    /// window carries weight `2^i`). Returns `None` if the window runs past
    /// the end of the view or is wider than 64 bits.
    pub fn number_at(&self, index: usize, size: usize) -> Option<u64> {
        if size > 64 {
            return None;
        }
        let window = self.bits.get(index..index.checked_add(size)?)?;
        Some(
            window
                .iter()
                .enumerate()
                .filter(|&(_, &bit)| bit)
                .fold(0u64, |n, (i, _)| n | (1u64 << i)),
        )
    }
}

impl From<BitView> for Vec<bool> {
    fn from(view: BitView) -> Self {
        view.bits
    }
}
