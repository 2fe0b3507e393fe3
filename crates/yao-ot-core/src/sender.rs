use num_bigint_dig::{BigUint, RandBigInt};
use num_traits::ToPrimitive;
use rand::{CryptoRng, Rng};
use rand_core::CryptoRngCore;
use rsa::{
    traits::{PrivateKeyParts, PublicKeyParts},
    RsaPrivateKey,
};

use yao_garble_core::Label;

use crate::mask_label;

/// Errors that can occur on the sender side of a transfer.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum SenderError {
    #[error("key generation failed: {0}")]
    Key(#[from] rsa::Error),
}

/// Public portion of the sender's session key.
#[derive(Debug, Clone)]
pub struct SenderPublicKey {
    /// The RSA modulus.
    pub n: BigUint,
    /// The public exponent.
    pub e: u32,
}

/// The sender side of the transfer: holds the session RSA keypair and both
/// labels of each wire.
pub struct Sender {
    key: RsaPrivateKey,
}

impl Sender {
    /// Generates a fresh session-scoped keypair.
    pub fn new<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        modulus_bits: usize,
    ) -> Result<Self, SenderError> {
        let key = RsaPrivateKey::new(rng, modulus_bits)?;
        Ok(Self { key })
    }

    /// Returns the public key to announce to the receiver.
    pub fn public_key(&self) -> SenderPublicKey {
        SenderPublicKey {
            n: self.key.n().clone(),
            e: self
                .key
                .e()
                .to_u32()
                .expect("generated public exponent fits in u32"),
        }
    }

    /// Starts a transfer round, sampling the two random values offered to the
    /// receiver.
    pub fn begin_transfer<R: Rng + CryptoRng + ?Sized>(&self, rng: &mut R) -> SenderTransfer {
        let n = self.key.n();
        SenderTransfer {
            x0: rng.gen_biguint_below(n),
            x1: rng.gen_biguint_below(n),
        }
    }

    /// Completes a transfer round, masking both labels.
    ///
    /// `v` is the receiver's blinded choice. The transfer state is consumed:
    /// each round uses fresh random values.
    pub fn complete_transfer(
        &self,
        transfer: SenderTransfer,
        v: &BigUint,
        m0: &Label,
        m1: &Label,
    ) -> ([u8; 16], [u8; 16]) {
        let n = self.key.n();
        let d = self.key.d();
        let v = v % n;

        let k0 = ((&v + n) - &transfer.x0).modpow(d, n);
        let k1 = ((&v + n) - &transfer.x1).modpow(d, n);

        (mask_label(m0, &k0), mask_label(m1, &k1))
    }
}

/// Per-round sender state.
#[derive(Debug)]
pub struct SenderTransfer {
    x0: BigUint,
    x1: BigUint,
}

impl SenderTransfer {
    /// Returns the random value offered for choice 0.
    pub fn x0(&self) -> &BigUint {
        &self.x0
    }

    /// Returns the random value offered for choice 1.
    pub fn x1(&self) -> &BigUint {
        &self.x1
    }
}
