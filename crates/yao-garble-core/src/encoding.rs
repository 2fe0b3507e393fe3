//! Wire label encodings.

use core::ops::{BitXor, BitXorAssign};

use rand::{CryptoRng, Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

use yao_core::Block;

/// Global XOR offset.
///
/// Every wire's 1-label is its 0-label XOR delta, which is what makes XOR
/// gates free. The permute bit of delta is always 1, so the two labels of a
/// wire always carry opposite tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta(Block);

impl Delta {
    /// Samples a random delta.
    pub fn random<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut block = Block::random(rng);
        block.set_lsb();
        Self(block)
    }

    /// Returns the inner block.
    pub fn into_inner(self) -> Block {
        self.0
    }
}

/// A wire label.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label(Block);

impl Label {
    /// Byte length of a label.
    pub const LEN: usize = Block::LEN;

    /// Creates a new label.
    pub fn new(block: Block) -> Self {
        Self(block)
    }

    /// Samples a random label.
    pub fn random<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        Self(Block::random(rng))
    }

    /// Returns the inner block.
    pub fn to_inner(self) -> Block {
        self.0
    }

    /// Returns the permute (point-and-permute) bit of the label.
    pub fn pointer_bit(&self) -> usize {
        self.0.lsb()
    }

    /// Returns the big-endian byte representation.
    pub fn to_bytes(self) -> [u8; 16] {
        self.0.to_bytes()
    }
}

impl TryFrom<&[u8]> for Label {
    type Error = core::array::TryFromSliceError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Block::try_from(bytes).map(Self)
    }
}

impl BitXor for Label {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl BitXor<Delta> for Label {
    type Output = Self;

    fn bitxor(self, rhs: Delta) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl BitXorAssign<Delta> for Label {
    fn bitxor_assign(&mut self, rhs: Delta) {
        self.0 ^= rhs.0;
    }
}

/// Both labels of a wire, held by the garbler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPair {
    low: Label,
    high: Label,
}

impl LabelPair {
    /// Creates a pair from the 0-label and the global offset.
    pub fn new(low: Label, delta: Delta) -> Self {
        Self {
            low,
            high: low ^ delta,
        }
    }

    /// Returns the label encoding logical 0.
    pub fn low(&self) -> Label {
        self.low
    }

    /// Returns the label encoding logical 1.
    pub fn high(&self) -> Label {
        self.high
    }

    /// Returns the label encoding `bit`.
    pub fn select(&self, bit: bool) -> Label {
        if bit {
            self.high
        } else {
            self.low
        }
    }

    /// Decodes an active label back to its logical value.
    ///
    /// Returns `None` if the label is neither of the pair.
    pub fn decode(&self, label: &Label) -> Option<bool> {
        if *label == self.low {
            Some(false)
        } else if *label == self.high {
            Some(true)
        } else {
            None
        }
    }
}

/// Derives wire labels from a session key seed.
///
/// The same seed always produces the same delta and input labels, which keeps
/// garbling reproducible for tests. Fresh sessions must use fresh seeds.
#[derive(Debug, Clone)]
pub struct ChaChaEncoder {
    seed: [u8; 32],
    delta: Delta,
}

/// Stream id reserved for delta.
const DELTA_STREAM_ID: u64 = u64::MAX;

impl ChaChaEncoder {
    /// Creates a new encoder from a seed.
    pub fn new(seed: [u8; 32]) -> Self {
        let mut rng = ChaCha12Rng::from_seed(seed);
        rng.set_stream(DELTA_STREAM_ID);
        let delta = Delta::random(&mut rng);
        Self { seed, delta }
    }

    /// Returns the global offset.
    pub fn delta(&self) -> Delta {
        self.delta
    }

    /// Returns the 0-labels for the first `count` wires of the circuit.
    pub fn encode_inputs(&self, count: usize) -> Vec<Label> {
        let mut rng = ChaCha12Rng::from_seed(self.seed);
        rng.set_stream(0);
        (0..count).map(|_| Label::random(&mut rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case([0u8; 32])]
    #[case([1u8; 32])]
    #[case([0xffu8; 32])]
    fn test_delta_pointer_bit(#[case] seed: [u8; 32]) {
        let encoder = ChaChaEncoder::new(seed);
        assert_eq!(encoder.delta().into_inner().lsb(), 1);
    }

    #[rstest]
    #[case([0u8; 32])]
    #[case([42u8; 32])]
    fn test_pair_invariants(#[case] seed: [u8; 32]) {
        let encoder = ChaChaEncoder::new(seed);
        let delta = encoder.delta();

        for low in encoder.encode_inputs(64) {
            let pair = LabelPair::new(low, delta);
            assert_eq!(pair.high(), pair.low() ^ delta);
            assert_ne!(pair.low().pointer_bit(), pair.high().pointer_bit());
        }
    }

    #[test]
    fn test_encoder_deterministic() {
        let a = ChaChaEncoder::new([7u8; 32]);
        let b = ChaChaEncoder::new([7u8; 32]);
        assert_eq!(a.delta(), b.delta());
        assert_eq!(a.encode_inputs(16), b.encode_inputs(16));

        let c = ChaChaEncoder::new([8u8; 32]);
        assert_ne!(a.encode_inputs(16), c.encode_inputs(16));
    }

    #[test]
    fn test_pair_decode() {
        let mut rng = rand_chacha::ChaCha12Rng::from_seed([0u8; 32]);
        let delta = Delta::random(&mut rng);
        let pair = LabelPair::new(Label::random(&mut rng), delta);

        assert_eq!(pair.decode(&pair.low()), Some(false));
        assert_eq!(pair.decode(&pair.high()), Some(true));
        assert_eq!(pair.decode(&Label::random(&mut rng)), None);
    }
}
