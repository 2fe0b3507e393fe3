use num_bigint_dig::{BigUint, RandBigInt};
use rand::{CryptoRng, Rng};

use yao_garble_core::Label;

use crate::mask_bytes;

/// Errors that can occur on the receiver side of a transfer.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ReceiverError {
    #[error("degenerate public key")]
    InvalidKey,
}

/// The receiver side of the transfer: holds the sender's public key.
pub struct Receiver {
    n: BigUint,
    e: BigUint,
}

impl Receiver {
    /// Creates a receiver from the sender's announced public key.
    pub fn new(n: BigUint, e: u32) -> Result<Self, ReceiverError> {
        if n < BigUint::from(4u32) || e < 3 {
            return Err(ReceiverError::InvalidKey);
        }
        Ok(Self {
            n,
            e: BigUint::from(e),
        })
    }

    /// Blinds the chosen offer, producing the value sent back to the sender.
    pub fn choose<R: Rng + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        choice: bool,
        x0: &BigUint,
        x1: &BigUint,
    ) -> ReceiverTransfer {
        let k = rng.gen_biguint_below(&self.n);
        let x = if choice { x1 } else { x0 };
        let v = (x % &self.n + k.modpow(&self.e, &self.n)) % &self.n;

        ReceiverTransfer { choice, v, k }
    }
}

/// Per-round receiver state.
#[derive(Debug)]
pub struct ReceiverTransfer {
    choice: bool,
    v: BigUint,
    k: BigUint,
}

impl ReceiverTransfer {
    /// Returns the blinded choice to send to the sender.
    pub fn v(&self) -> &BigUint {
        &self.v
    }

    /// Unmasks the chosen label from the sender's masked pair.
    ///
    /// Consumes the round state: the blinding value must not be reused.
    pub fn receive(self, m0_masked: &[u8; 16], m1_masked: &[u8; 16]) -> Label {
        let masked = if self.choice { m1_masked } else { m0_masked };
        let mask = mask_bytes(&self.k);

        let mut bytes = *masked;
        for (byte, mask) in bytes.iter_mut().zip(mask) {
            *byte ^= mask;
        }

        Label::new(bytes.into())
    }
}
