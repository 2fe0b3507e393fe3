use core::ops::{BitAnd, BitXor, BitXorAssign};

use rand::{CryptoRng, Rng};

/// A 128-bit value, the width of a wire label.
///
/// The low bit of a block (equivalently, the low bit of its last big-endian
/// byte) carries the point-and-permute tag when the block is used as a wire
/// label.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block(u128);

impl Block {
    /// Byte length of a block.
    pub const LEN: usize = 16;
    /// The all-zero block.
    pub const ZERO: Self = Self(0);

    /// Creates a new block.
    #[inline]
    pub const fn new(b: u128) -> Self {
        Self(b)
    }

    /// Returns the inner representation.
    #[inline]
    pub fn inner(&self) -> u128 {
        self.0
    }

    /// Samples a uniformly random block.
    #[inline]
    pub fn random<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen())
    }

    /// Returns the low bit of the block.
    #[inline]
    pub fn lsb(&self) -> usize {
        (self.0 & 1) as usize
    }

    /// Sets the low bit of the block.
    #[inline]
    pub fn set_lsb(&mut self) {
        self.0 |= 1;
    }

    /// Returns the big-endian byte representation.
    #[inline]
    pub fn to_bytes(self) -> [u8; 16] {
        self.0.to_be_bytes()
    }
}

impl From<[u8; 16]> for Block {
    #[inline]
    fn from(bytes: [u8; 16]) -> Self {
        Self(u128::from_be_bytes(bytes))
    }
}

impl TryFrom<&[u8]> for Block {
    type Error = core::array::TryFromSliceError;

    #[inline]
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; 16]>::try_from(bytes).map(Self::from)
    }
}

impl BitXor for Block {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Block {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl BitAnd for Block {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lsb() {
        assert_eq!(Block::new(0).lsb(), 0);
        assert_eq!(Block::new(1).lsb(), 1);
        assert_eq!(Block::new(2).lsb(), 0);
        assert_eq!(Block::new(3).lsb(), 1);
    }

    #[test]
    fn test_set_lsb() {
        let mut b = Block::new(2);
        b.set_lsb();
        assert_eq!(b, Block::new(3));

        let mut b = Block::new(1);
        b.set_lsb();
        assert_eq!(b, Block::new(1));
    }

    #[test]
    fn test_bytes_round_trip() {
        let b = Block::new(0x0123_4567_89ab_cdef_0011_2233_4455_6677);
        assert_eq!(Block::from(b.to_bytes()), b);
        assert_eq!(Block::try_from(b.to_bytes().as_slice()).unwrap(), b);
        assert!(Block::try_from([0u8; 15].as_slice()).is_err());
    }

    #[test]
    fn test_tag_is_last_byte() {
        // The permute tag convention is the low bit of the last byte on the
        // wire.
        let b = Block::new(1);
        assert_eq!(b.to_bytes()[15] & 1, 1);
        assert_eq!(b.to_bytes()[0], 0);
    }
}
