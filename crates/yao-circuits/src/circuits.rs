//! Bundled reference circuits.

use crate::{
    builder::CircuitBuilder,
    circuit::Circuit,
    ops::{add, and_words, constant, not_word, rotr, shr, xor_words, Bit},
};

const H: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c,
    0x1f83d9ab, 0x5be0cd19,
];

const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1,
    0x923f82a4, 0xab1c5ed5, 0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3,
    0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174, 0xe49b69c1, 0xefbe4786,
    0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147,
    0x06ca6351, 0x14292967, 0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13,
    0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85, 0xa2bfe8a1, 0xa81a664b,
    0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a,
    0x5b9cca4f, 0x682e6ff3, 0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208,
    0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

fn xor3(builder: &mut CircuitBuilder, x: &[Bit], y: &[Bit], z: &[Bit]) -> Vec<Bit> {
    let t = xor_words(builder, x, y);
    xor_words(builder, &t, z)
}

/// SHA-256 compression over a single 512-bit message block with the standard
/// initial state.
///
/// The first 256 message bits belong to the garbler, the remaining 256 to the
/// evaluator. Input bits map to block bytes LSB-first in byte order; message
/// words are big-endian over those bytes as usual. The digest is returned as
/// eight 32-bit words `h0..h7`.
pub fn sha256_block() -> Circuit {
    let mut builder = CircuitBuilder::new();
    let lo = builder.add_garbler_input("m0", 256);
    let hi = builder.add_evaluator_input("m1", 256);
    let m: Vec<usize> = lo.into_iter().chain(hi).collect();

    let mut w: Vec<Vec<Bit>> = (0..16)
        .map(|t| {
            (0..32)
                .map(|j| Bit::Wire(m[(4 * t + 3 - j / 8) * 8 + j % 8]))
                .collect()
        })
        .collect();

    for t in 16..64 {
        let s0 = {
            let r7 = rotr(&w[t - 15], 7);
            let r18 = rotr(&w[t - 15], 18);
            let s3 = shr(&w[t - 15], 3);
            xor3(&mut builder, &r7, &r18, &s3)
        };
        let s1 = {
            let r17 = rotr(&w[t - 2], 17);
            let r19 = rotr(&w[t - 2], 19);
            let s10 = shr(&w[t - 2], 10);
            xor3(&mut builder, &r17, &r19, &s10)
        };
        let mut word = add(&mut builder, &w[t - 16], &s0);
        word = add(&mut builder, &word, &w[t - 7]);
        word = add(&mut builder, &word, &s1);
        w.push(word);
    }

    let mut regs: Vec<Vec<Bit>> = H.iter().map(|&h| constant(h as u64, 32)).collect();

    for t in 0..64 {
        let s1 = {
            let r6 = rotr(&regs[4], 6);
            let r11 = rotr(&regs[4], 11);
            let r25 = rotr(&regs[4], 25);
            xor3(&mut builder, &r6, &r11, &r25)
        };
        let ch = {
            let ef = and_words(&mut builder, &regs[4], &regs[5]);
            let ne = not_word(&mut builder, &regs[4]);
            let ng = and_words(&mut builder, &ne, &regs[6]);
            xor_words(&mut builder, &ef, &ng)
        };
        let mut t1 = add(&mut builder, &regs[7], &s1);
        t1 = add(&mut builder, &t1, &ch);
        t1 = add(&mut builder, &t1, &constant(K[t] as u64, 32));
        t1 = add(&mut builder, &t1, &w[t]);

        let s0 = {
            let r2 = rotr(&regs[0], 2);
            let r13 = rotr(&regs[0], 13);
            let r22 = rotr(&regs[0], 22);
            xor3(&mut builder, &r2, &r13, &r22)
        };
        let maj = {
            let ab = and_words(&mut builder, &regs[0], &regs[1]);
            let ac = and_words(&mut builder, &regs[0], &regs[2]);
            let bc = and_words(&mut builder, &regs[1], &regs[2]);
            xor3(&mut builder, &ab, &ac, &bc)
        };
        let t2 = add(&mut builder, &s0, &maj);

        let e = add(&mut builder, &regs[3], &t1);
        let new_a = add(&mut builder, &t1, &t2);

        regs = vec![
            new_a,
            regs[0].clone(),
            regs[1].clone(),
            regs[2].clone(),
            e,
            regs[4].clone(),
            regs[5].clone(),
            regs[6].clone(),
        ];
    }

    for (i, reg) in regs.into_iter().enumerate() {
        let word = add(&mut builder, &reg, &constant(H[i] as u64, 32));
        let out: Vec<usize> = word
            .into_iter()
            .map(|bit| bit.wire().expect("digest bits are wire-backed"))
            .collect();
        builder.add_output(&format!("h{i}"), &out);
    }

    builder
        .build()
        .expect("compression circuit layout is valid")
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use sha2::{compress256, digest::generic_array::GenericArray};

    use super::*;

    fn reference(block: &[u8; 64]) -> [u32; 8] {
        let mut state = H;
        compress256(&mut state, &[*GenericArray::from_slice(block)]);
        state
    }

    fn circuit_digest(circ: &Circuit, block: &[u8; 64]) -> Vec<BigUint> {
        let garbler = BigUint::from_bytes_le(&block[..32]);
        let evaluator = BigUint::from_bytes_le(&block[32..]);
        circ.evaluate(&[garbler], &[evaluator]).unwrap()
    }

    #[test]
    fn test_sha256_block_zero() {
        let circ = sha256_block();
        let out = circuit_digest(&circ, &[0u8; 64]);
        let expected = reference(&[0u8; 64]);

        for (word, expected) in out.iter().zip(expected) {
            assert_eq!(*word, BigUint::from(expected));
        }

        // Known digest of the all-zero block.
        assert_eq!(out[0], BigUint::from(0xda5698beu32));
        assert_eq!(out[7], BigUint::from(0x1837a9d8u32));
    }

    #[test]
    fn test_sha256_block_patterned() {
        let circ = sha256_block();
        let mut block = [0u8; 64];
        for (i, byte) in block.iter_mut().enumerate() {
            *byte = (i as u8).wrapping_mul(37).wrapping_add(11);
        }

        let out = circuit_digest(&circ, &block);
        let expected = reference(&block);

        for (word, expected) in out.iter().zip(expected) {
            assert_eq!(*word, BigUint::from(expected));
        }
    }
}
