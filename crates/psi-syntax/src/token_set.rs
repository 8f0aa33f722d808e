use crate::SyntaxKind;

const SIZE: usize = 4;

/// A closed set of [`SyntaxKind`]s, usable in `const` position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TokenSet {
    bits: [u64; SIZE],
}

impl TokenSet {
    pub const EMPTY: Self = Self { bits: [0; SIZE] };
    const BITS_PER_SLOT: u16 = u64::BITS as u16;

    const fn from_kind(kind: SyntaxKind) -> Self {
        let kind = kind as u16;
        let slot_index = (kind / Self::BITS_PER_SLOT) as usize;

        debug_assert!(
            slot_index < SIZE,
            "Index out of bounds. Increase the size of the bitset array."
        );

        let mut bits = Self::EMPTY.bits;
        bits[slot_index] = 1 << (kind % Self::BITS_PER_SLOT);
        Self { bits }
    }

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut set = Self::EMPTY;
        let mut i = 0;
        while i < kinds.len() {
            set = set.union(Self::from_kind(kinds[i]));
            i += 1;
        }
        set
    }

    pub const fn union(mut self, other: Self) -> Self {
        let mut i = 0;
        while i < SIZE {
            self.bits[i] |= other.bits[i];
            i += 1;
        }
        self
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        let slot_index = (kind / Self::BITS_PER_SLOT) as usize;
        let mask = 1 << (kind % Self::BITS_PER_SLOT);
        self.bits[slot_index] & mask != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|slot| *slot == 0)
    }

    pub fn iter(self) -> impl Iterator<Item = SyntaxKind> {
        (0..SyntaxKind::__Last as u16)
            .map(SyntaxKind::from_raw)
            .filter(move |kind| self.contains(*kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_contains() {
        const A: TokenSet = TokenSet::new([SyntaxKind::Comma, SyntaxKind::Semicolon]);
        const B: TokenSet = TokenSet::new([SyntaxKind::ClassObjectAccessExpression]);
        const AB: TokenSet = A.union(B);

        assert!(AB.contains(SyntaxKind::Comma));
        assert!(AB.contains(SyntaxKind::ClassObjectAccessExpression));
        assert!(!AB.contains(SyntaxKind::Dot));
        assert_eq!(AB.iter().count(), 3);
        assert!(TokenSet::EMPTY.is_empty());
    }
}
