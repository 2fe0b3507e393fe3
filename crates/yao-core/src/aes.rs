//! Fixed-key AES used to encrypt garbled gate rows.

use aes::Aes128;
use cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use once_cell::sync::Lazy;

use crate::Block;

/// The fixed key is public: correlation robustness of the construction does
/// not rely on key secrecy.
const FIXED_KEY: [u8; 16] = [
    0x5b, 0x3c, 0x91, 0xe2, 0x0f, 0xa8, 0x46, 0xd7, 0x28, 0xb9, 0x64, 0x15,
    0xc0, 0x7a, 0xd3, 0x8e,
];

/// Global instance of the fixed-key cipher.
pub static FIXED_KEY_AES: Lazy<FixedKeyAes> = Lazy::new(|| FixedKeyAes::new(FIXED_KEY));

/// AES-128 under a fixed, public key.
///
/// Provides tweakable circular correlation-robust hashing using the
/// construction from [GKWY20](https://eprint.iacr.org/2019/074) (Section 7.4):
/// `tccr(t, x) = E(E(x) ^ t) ^ E(x)`.
pub struct FixedKeyAes {
    aes: Aes128,
}

impl FixedKeyAes {
    fn new(key: [u8; 16]) -> Self {
        Self {
            aes: Aes128::new(&key.into()),
        }
    }

    /// Hashes `block` under `tweak`.
    #[inline]
    pub fn tccr(&self, tweak: Block, block: Block) -> Block {
        let mut buf = GenericArray::from(block.to_bytes());
        self.aes.encrypt_block(&mut buf);
        let h1 = Block::from(<[u8; 16]>::from(buf));

        let mut buf = GenericArray::from((h1 ^ tweak).to_bytes());
        self.aes.encrypt_block(&mut buf);
        let h2 = Block::from(<[u8; 16]>::from(buf));

        h1 ^ h2
    }

    /// Hashes `blocks` in place, each under the corresponding tweak.
    #[inline]
    pub fn tccr_many<const N: usize>(&self, tweaks: &[Block; N], blocks: &mut [Block; N]) {
        let mut bufs = blocks.map(|b| GenericArray::from(b.to_bytes()));
        self.aes.encrypt_blocks(&mut bufs);

        let h1 = bufs.map(|b| Block::from(<[u8; 16]>::from(b)));

        let mut bufs: [_; N] =
            core::array::from_fn(|i| GenericArray::from((h1[i] ^ tweaks[i]).to_bytes()));
        self.aes.encrypt_blocks(&mut bufs);

        for i in 0..N {
            blocks[i] = h1[i] ^ Block::from(<[u8; 16]>::from(bufs[i]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn test_tccr_deterministic() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let x = Block::random(&mut rng);
        let t = Block::random(&mut rng);

        assert_eq!(FIXED_KEY_AES.tccr(t, x), FIXED_KEY_AES.tccr(t, x));
        assert_ne!(FIXED_KEY_AES.tccr(t, x), FIXED_KEY_AES.tccr(x, t));
    }

    #[test]
    fn test_tccr_tweak_separates() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let x = Block::random(&mut rng);

        let h0 = FIXED_KEY_AES.tccr(Block::new(0), x);
        let h1 = FIXED_KEY_AES.tccr(Block::new(1), x);
        assert_ne!(h0, h1);
    }

    #[test]
    fn test_tccr_many_matches_single() {
        let mut rng = ChaCha12Rng::seed_from_u64(42);
        let tweaks = [Block::random(&mut rng), Block::random(&mut rng)];
        let inputs = [Block::random(&mut rng), Block::random(&mut rng)];

        let mut batched = inputs;
        FIXED_KEY_AES.tccr_many(&tweaks, &mut batched);

        assert_eq!(batched[0], FIXED_KEY_AES.tccr(tweaks[0], inputs[0]));
        assert_eq!(batched[1], FIXED_KEY_AES.tccr(tweaks[1], inputs[1]));
    }
}
