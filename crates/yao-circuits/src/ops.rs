//! Word-level gadgets for composing circuits.
//!
//! Values are little-endian bit vectors. Constant bits fold into the gates
//! they touch, since the circuit model has no constant wires: XOR against
//! constant one becomes an inverter, AND against constant zero vanishes, and
//! so on.

use crate::builder::CircuitBuilder;

/// A single bit of a value under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bit {
    /// A known constant.
    Const(bool),
    /// A circuit wire.
    Wire(usize),
}

impl Bit {
    /// Returns the underlying wire, if the bit is wire-backed.
    pub fn wire(self) -> Option<usize> {
        match self {
            Bit::Wire(w) => Some(w),
            Bit::Const(_) => None,
        }
    }
}

/// Lifts wires into bits.
pub fn wires(ids: &[usize]) -> Vec<Bit> {
    ids.iter().copied().map(Bit::Wire).collect()
}

/// A constant word, little-endian.
pub fn constant(value: u64, width: usize) -> Vec<Bit> {
    (0..width).map(|i| Bit::Const(value >> i & 1 == 1)).collect()
}

/// XOR of two bits.
pub fn bxor(builder: &mut CircuitBuilder, x: Bit, y: Bit) -> Bit {
    match (x, y) {
        (Bit::Const(x), Bit::Const(y)) => Bit::Const(x ^ y),
        (Bit::Const(false), other) | (other, Bit::Const(false)) => other,
        (Bit::Const(true), Bit::Wire(w)) | (Bit::Wire(w), Bit::Const(true)) => {
            Bit::Wire(builder.inv(w))
        }
        (Bit::Wire(x), Bit::Wire(y)) => Bit::Wire(builder.xor(x, y)),
    }
}

/// AND of two bits.
pub fn band(builder: &mut CircuitBuilder, x: Bit, y: Bit) -> Bit {
    match (x, y) {
        (Bit::Const(x), Bit::Const(y)) => Bit::Const(x & y),
        (Bit::Const(false), _) | (_, Bit::Const(false)) => Bit::Const(false),
        (Bit::Const(true), other) | (other, Bit::Const(true)) => other,
        (Bit::Wire(x), Bit::Wire(y)) => Bit::Wire(builder.and(x, y)),
    }
}

/// OR of two bits.
pub fn bor(builder: &mut CircuitBuilder, x: Bit, y: Bit) -> Bit {
    match (x, y) {
        (Bit::Const(x), Bit::Const(y)) => Bit::Const(x | y),
        (Bit::Const(true), _) | (_, Bit::Const(true)) => Bit::Const(true),
        (Bit::Const(false), other) | (other, Bit::Const(false)) => other,
        (Bit::Wire(x), Bit::Wire(y)) => Bit::Wire(builder.or(x, y)),
    }
}

/// Negation of a bit.
pub fn bnot(builder: &mut CircuitBuilder, x: Bit) -> Bit {
    match x {
        Bit::Const(x) => Bit::Const(!x),
        Bit::Wire(w) => Bit::Wire(builder.inv(w)),
    }
}

/// Bitwise XOR of two equal-width words.
pub fn xor_words(builder: &mut CircuitBuilder, x: &[Bit], y: &[Bit]) -> Vec<Bit> {
    assert_eq!(x.len(), y.len());
    x.iter()
        .zip(y)
        .map(|(&x, &y)| bxor(builder, x, y))
        .collect()
}

/// Bitwise AND of two equal-width words.
pub fn and_words(builder: &mut CircuitBuilder, x: &[Bit], y: &[Bit]) -> Vec<Bit> {
    assert_eq!(x.len(), y.len());
    x.iter()
        .zip(y)
        .map(|(&x, &y)| band(builder, x, y))
        .collect()
}

/// Bitwise negation of a word.
pub fn not_word(builder: &mut CircuitBuilder, x: &[Bit]) -> Vec<Bit> {
    x.iter().map(|&x| bnot(builder, x)).collect()
}

fn full_add(builder: &mut CircuitBuilder, x: Bit, y: Bit, c: Bit) -> (Bit, Bit) {
    let t = bxor(builder, x, y);
    let sum = bxor(builder, t, c);
    let u = band(builder, x, y);
    let v = band(builder, c, t);
    let carry = bxor(builder, u, v);
    (sum, carry)
}

fn full_sub(builder: &mut CircuitBuilder, x: Bit, y: Bit, borrow: Bit) -> (Bit, Bit) {
    let t = bxor(builder, x, y);
    let diff = bxor(builder, t, borrow);
    let nx = bnot(builder, x);
    let u = band(builder, nx, y);
    let nt = bnot(builder, t);
    let v = band(builder, borrow, nt);
    let borrow_out = bor(builder, u, v);
    (diff, borrow_out)
}

/// Wrapping sum of two equal-width words.
pub fn add(builder: &mut CircuitBuilder, x: &[Bit], y: &[Bit]) -> Vec<Bit> {
    assert_eq!(x.len(), y.len());
    let mut carry = Bit::Const(false);
    let mut sum = Vec::with_capacity(x.len());
    for (&x, &y) in x.iter().zip(y) {
        let (s, c) = full_add(builder, x, y, carry);
        sum.push(s);
        carry = c;
    }
    sum
}

/// Wrapping difference of two equal-width words.
pub fn sub(builder: &mut CircuitBuilder, x: &[Bit], y: &[Bit]) -> Vec<Bit> {
    assert_eq!(x.len(), y.len());
    let mut borrow = Bit::Const(false);
    let mut diff = Vec::with_capacity(x.len());
    for (&x, &y) in x.iter().zip(y) {
        let (d, b) = full_sub(builder, x, y, borrow);
        diff.push(d);
        borrow = b;
    }
    diff
}

/// `x >= y` over equal-width unsigned words.
pub fn geq(builder: &mut CircuitBuilder, x: &[Bit], y: &[Bit]) -> Bit {
    assert_eq!(x.len(), y.len());
    let mut borrow = Bit::Const(false);
    for (&x, &y) in x.iter().zip(y) {
        let (_, b) = full_sub(builder, x, y, borrow);
        borrow = b;
    }
    bnot(builder, borrow)
}

/// `cond ? x : y` over equal-width words.
pub fn select(builder: &mut CircuitBuilder, cond: Bit, x: &[Bit], y: &[Bit]) -> Vec<Bit> {
    assert_eq!(x.len(), y.len());
    x.iter()
        .zip(y)
        .map(|(&x, &y)| {
            let t = bxor(builder, x, y);
            let u = band(builder, cond, t);
            bxor(builder, y, u)
        })
        .collect()
}

/// Maximum of two equal-width unsigned words.
pub fn max(builder: &mut CircuitBuilder, x: &[Bit], y: &[Bit]) -> Vec<Bit> {
    let cond = geq(builder, x, y);
    select(builder, cond, x, y)
}

/// Full product of two words, `x.len() + y.len()` bits wide.
pub fn mul(builder: &mut CircuitBuilder, x: &[Bit], y: &[Bit]) -> Vec<Bit> {
    let width = x.len() + y.len();
    let mut acc = vec![Bit::Const(false); width];
    for (j, &yj) in y.iter().enumerate() {
        let mut carry = Bit::Const(false);
        for i in 0..width - j {
            let partial = if i < x.len() {
                band(builder, x[i], yj)
            } else {
                Bit::Const(false)
            };
            let (s, c) = full_add(builder, acc[j + i], partial, carry);
            acc[j + i] = s;
            carry = c;
        }
    }
    acc
}

/// Rotates a word right by `n` bit positions.
pub fn rotr(x: &[Bit], n: usize) -> Vec<Bit> {
    let w = x.len();
    (0..w).map(|i| x[(i + n) % w]).collect()
}

/// Shifts a word right by `n` bit positions, filling with zeros.
pub fn shr(x: &[Bit], n: usize) -> Vec<Bit> {
    let w = x.len();
    (0..w)
        .map(|i| {
            if i + n < w {
                x[i + n]
            } else {
                Bit::Const(false)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;

    fn eval2(
        build: impl Fn(&mut CircuitBuilder, &[Bit], &[Bit]) -> Vec<Bit>,
        width: usize,
        a: u64,
        b: u64,
    ) -> u64 {
        let mut builder = CircuitBuilder::new();
        let x = builder.add_garbler_input("a", width);
        let y = builder.add_evaluator_input("b", width);
        let out = build(&mut builder, &wires(&x), &wires(&y));
        let out: Vec<usize> = out.into_iter().map(|bit| bit.wire().unwrap()).collect();
        builder.add_output("out", &out);
        let circ = builder.build().unwrap();

        let outputs = circ
            .evaluate(&[BigUint::from(a)], &[BigUint::from(b)])
            .unwrap();
        let digits = outputs[0].to_u64_digits();
        digits.first().copied().unwrap_or(0)
    }

    #[test]
    fn test_add() {
        for (a, b) in [(0, 0), (1, 2), (5, 6), (7, 7), (3, 4)] {
            assert_eq!(eval2(|c, x, y| add(c, x, y), 3, a, b), (a + b) % 8);
        }
    }

    #[test]
    fn test_sub() {
        assert_eq!(eval2(|c, x, y| sub(c, x, y), 8, 100, 37), 63);
        assert_eq!(eval2(|c, x, y| sub(c, x, y), 8, 5, 6), 255);
    }

    #[test]
    fn test_mul() {
        for (a, b) in [(0, 0), (3, 2), (3, 3), (2, 2), (1, 3)] {
            assert_eq!(eval2(|c, x, y| mul(c, x, y), 2, a, b), a * b);
        }
    }

    #[test]
    fn test_max() {
        assert_eq!(eval2(|c, x, y| max(c, x, y), 4, 5, 3), 5);
        assert_eq!(eval2(|c, x, y| max(c, x, y), 4, 3, 5), 5);
        assert_eq!(eval2(|c, x, y| max(c, x, y), 4, 9, 9), 9);
    }

    #[test]
    fn test_geq_select() {
        let ge = |c: &mut CircuitBuilder, x: &[Bit], y: &[Bit]| {
            let cond = geq(c, x, y);
            // A constant-folded mux: 1 if x >= y else 0.
            select(c, cond, &constant(1, 1), &constant(0, 1))
        };
        // The selected output is constant-backed only when both arms are
        // constants and cond folds; with a wire cond the mux emits gates.
        assert_eq!(eval2(ge, 4, 7, 3), 1);
        assert_eq!(eval2(ge, 4, 3, 7), 0);
        assert_eq!(eval2(ge, 4, 4, 4), 1);
    }

    #[test]
    fn test_constant_folding_emits_no_gates() {
        let mut builder = CircuitBuilder::new();
        let x = builder.add_garbler_input("a", 1);
        let zero = constant(0, 1);
        let folded = add(&mut builder, &wires(&x), &zero);
        // x + 0 is x itself, no gates needed.
        assert_eq!(folded[0], Bit::Wire(x[0]));
    }
}
