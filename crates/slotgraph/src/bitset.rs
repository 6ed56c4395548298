//! Fixed-size byte-backed bit vector used as a traversal visited set.

/// A fixed-size set of bits indexed from `0` to `len - 1`.
///
/// Out-of-range indices are never set and always read as unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSet {
    bytes: Vec<u8>,
    len: usize,
}

impl BitSet {
    /// Create a bitset with `len` cleared bits.
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len.div_ceil(8)],
            len,
        }
    }

    /// Number of addressable bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the set addresses no bits at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Set bit `index`. Returns `false` if `index` is out of range.
    pub fn set(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.bytes[index / 8] |= 1 << (index % 8);
        true
    }

    /// Whether bit `index` is set.
    pub fn check(&self, index: usize) -> bool {
        index < self.len && self.bytes[index / 8] & (1 << (index % 8)) != 0
    }

    /// Clear bit `index`.
    pub fn clear(&mut self, index: usize) {
        if index < self.len {
            self.bytes[index / 8] &= !(1 << (index % 8));
        }
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_check_clear() {
        let mut bits = BitSet::new(20);
        assert!(!bits.check(9));
        assert!(bits.set(9));
        assert!(bits.check(9));
        assert!(!bits.check(8));
        assert!(!bits.check(10));
        bits.clear(9);
        assert!(!bits.check(9));
    }

    #[test]
    fn test_out_of_range() {
        let mut bits = BitSet::new(3);
        assert!(!bits.set(3));
        assert!(!bits.check(3));
        assert!(!bits.check(100));
        bits.clear(50);
        assert_eq!(bits.count_ones(), 0);
    }

    #[test]
    fn test_byte_boundaries() {
        let mut bits = BitSet::new(17);
        for i in [0, 7, 8, 15, 16] {
            bits.set(i);
        }
        assert_eq!(bits.count_ones(), 5);
        assert!(bits.check(16));
        assert!(!bits.check(1));
    }

    #[test]
    fn test_empty() {
        let bits = BitSet::new(0);
        assert!(bits.is_empty());
        assert!(!bits.check(0));
    }
}
