//! Semi-honest 1-of-2 oblivious transfer based on RSA.
//!
//! Each round transfers exactly one of two wire labels: the receiver blinds
//! its choice with a random value raised to the public exponent, the sender
//! unblinds both candidates with its private exponent and masks the labels
//! with the results. Only the mask matching the receiver's choice is
//! removable.
//!
//! These are sans-I/O state machines; a protocol layer moves the values
//! between the parties. Security holds against semi-honest adversaries only.
//!
//! # ⚠️ Warning ⚠️
//!
//! Transfer values are strictly one-shot. Reusing blinding values across
//! rounds breaks the secrecy of the unchosen label.

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(clippy::all)]

mod receiver;
mod sender;

pub use receiver::{Receiver, ReceiverError, ReceiverTransfer};
pub use sender::{Sender, SenderError, SenderPublicKey, SenderTransfer};

pub use num_bigint_dig::BigUint;

use yao_garble_core::Label;

/// The low 16 bytes of a big integer, zero-padded.
///
/// Both parties derive label masks through this same truncation, so the
/// recovered mask cancels exactly.
pub(crate) fn mask_bytes(k: &BigUint) -> [u8; 16] {
    let bytes = k.to_bytes_le();
    let mut mask = [0u8; 16];
    let len = bytes.len().min(mask.len());
    mask[..len].copy_from_slice(&bytes[..len]);
    mask
}

/// Masks a label with a big-integer key.
pub(crate) fn mask_label(label: &Label, k: &BigUint) -> [u8; 16] {
    let mut bytes = label.to_bytes();
    for (byte, mask) in bytes.iter_mut().zip(mask_bytes(k)) {
        *byte ^= mask;
    }
    bytes
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    use super::*;

    #[test]
    fn test_transfer_round_trip() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let sender = Sender::new(&mut rng, 1024).unwrap();
        let public_key = sender.public_key();
        let receiver = Receiver::new(public_key.n.clone(), public_key.e).unwrap();

        for choice in [false, true] {
            let m0 = Label::random(&mut rng);
            let m1 = Label::random(&mut rng);

            let transfer = sender.begin_transfer(&mut rng);
            let x0 = transfer.x0().clone();
            let x1 = transfer.x1().clone();

            let chosen = receiver.choose(&mut rng, choice, &x0, &x1);
            let (m0_masked, m1_masked) =
                sender.complete_transfer(transfer, chosen.v(), &m0, &m1);

            let recovered = chosen.receive(&m0_masked, &m1_masked);
            assert_eq!(recovered, if choice { m1 } else { m0 });
        }
    }

    #[test]
    fn test_unchosen_mask_does_not_cancel() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let sender = Sender::new(&mut rng, 1024).unwrap();
        let public_key = sender.public_key();
        let receiver = Receiver::new(public_key.n.clone(), public_key.e).unwrap();

        let m0 = Label::random(&mut rng);
        let m1 = Label::random(&mut rng);

        let transfer = sender.begin_transfer(&mut rng);
        let x0 = transfer.x0().clone();
        let x1 = transfer.x1().clone();

        let chosen = receiver.choose(&mut rng, false, &x0, &x1);
        let v = chosen.v().clone();
        let (m0_masked, m1_masked) = sender.complete_transfer(transfer, &v, &m0, &m1);

        // Swapping the masked messages recovers neither label.
        let garbage = chosen.receive(&m1_masked, &m0_masked);
        assert_ne!(garbage, m0);
        assert_ne!(garbage, m1);
    }

    #[test]
    fn test_fresh_randomness_per_round() {
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let sender = Sender::new(&mut rng, 1024).unwrap();

        let a = sender.begin_transfer(&mut rng);
        let b = sender.begin_transfer(&mut rng);
        assert_ne!(a.x0(), b.x0());
        assert_ne!(a.x1(), b.x1());
        assert_ne!(a.x0(), a.x1());
    }

    #[test]
    fn test_mask_bytes_truncates_and_pads() {
        let small = BigUint::from(0x0102u32);
        let mask = mask_bytes(&small);
        assert_eq!(mask[0], 0x02);
        assert_eq!(mask[1], 0x01);
        assert!(mask[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_rejects_degenerate_key() {
        assert!(Receiver::new(BigUint::from(0u32), 65537).is_err());
        assert!(Receiver::new(BigUint::from(1u32) << 1024, 1).is_err());
    }
}
