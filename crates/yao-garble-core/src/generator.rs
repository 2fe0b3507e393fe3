use core::fmt;

use yao_circuits::{Circuit, CircuitError, Gate, GateType};
use yao_core::{aes::FixedKeyAes, Block, FIXED_KEY_AES};

use crate::{
    circuit::{EncryptedGate, GarbledGate},
    encoding::{Delta, Label, LabelPair},
};

/// Errors that can occur during garbled circuit generation.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum GeneratorError {
    #[error(transparent)]
    CircuitError(#[from] CircuitError),
    #[error("generator not finished")]
    NotFinished,
}

/// Garbles a two-input non-free gate, returning the output 0-label and the
/// row-reduced table.
///
/// Rows are indexed by the permute tags of the presented labels; the key of
/// row `(i, j)` is `H(g, a_i) ^ H(g + 1, b_j)` where `a_i` is the a-label
/// carrying tag `i`. Row `(0, 0)` is implicitly zero, which pins the output
/// 0-label to that row's key (or its offset by delta).
#[inline]
pub(crate) fn encrypt_gate(
    cipher: &FixedKeyAes,
    op: GateType,
    x_0: &Label,
    y_0: &Label,
    delta: &Delta,
    gid: usize,
) -> (Label, EncryptedGate) {
    debug_assert!(matches!(op, GateType::And | GateType::Or));

    let delta = delta.into_inner();
    let x_0 = x_0.to_inner();
    let x_1 = x_0 ^ delta;
    let y_0 = y_0.to_inner();
    let y_1 = y_0 ^ delta;

    let p_a = x_0.lsb();
    let p_b = y_0.lsb();

    let j = Block::new(gid as u128);
    let k = Block::new((gid + 1) as u128);

    let mut h = [x_0, x_1, y_0, y_1];
    cipher.tccr_many(&[j, j, k, k], &mut h);
    let [hx_0, hx_1, hy_0, hy_1] = h;

    // Hashes of the a- and b-labels keyed by their permute tag.
    let ha = if p_a == 0 { [hx_0, hx_1] } else { [hx_1, hx_0] };
    let hb = if p_b == 0 { [hy_0, hy_1] } else { [hy_1, hy_0] };

    let logic = |va: usize, vb: usize| match op {
        GateType::And => va & vb,
        GateType::Or => va | vb,
        _ => unreachable!("free gates have no table"),
    };

    // The label presented with tag i on wire a encodes the logical value
    // i ^ p_a. Row (0, 0) fixes the output labels.
    let z_0 = if logic(p_a, p_b) == 1 {
        (ha[0] ^ hb[0]) ^ delta
    } else {
        ha[0] ^ hb[0]
    };

    let mut rows = [Block::ZERO; 3];
    for i in 0..2 {
        for j in 0..2 {
            if i == 0 && j == 0 {
                continue;
            }
            let z = if logic(i ^ p_a, j ^ p_b) == 1 {
                z_0 ^ delta
            } else {
                z_0
            };
            rows[i * 2 + j - 1] = z ^ ha[i] ^ hb[j];
        }
    }

    (Label::new(z_0), EncryptedGate::new(rows))
}

/// Output of the generator.
#[derive(Debug)]
pub struct GeneratorOutput {
    /// Label pairs of the circuit output wires.
    pub outputs: Vec<LabelPair>,
}

/// Garbled circuit generator.
#[derive(Debug, Default)]
pub struct Generator {
    /// Buffer for the 0-bit labels.
    buffer: Vec<Label>,
}

impl Generator {
    /// Returns an iterator over the garbled gates of a circuit.
    ///
    /// # Arguments
    ///
    /// * `circ` - The circuit to garble.
    /// * `delta` - The global offset.
    /// * `inputs` - 0-labels of the input wires, garbler inputs first.
    pub fn generate<'a>(
        &'a mut self,
        circ: &'a Circuit,
        delta: Delta,
        inputs: Vec<Label>,
    ) -> Result<GarbledGateIter<'a, std::slice::Iter<'a, Gate>>, GeneratorError> {
        if inputs.len() != circ.input_count() {
            return Err(CircuitError::InvalidInputCount {
                expected: circ.input_count(),
                actual: inputs.len(),
            })?;
        }

        // Expand the buffer to fit the circuit.
        if circ.wire_count() > self.buffer.len() {
            self.buffer.resize(circ.wire_count(), Default::default());
        }

        self.buffer[..inputs.len()].copy_from_slice(&inputs);

        Ok(GarbledGateIter::new(
            delta,
            circ.gates().iter(),
            circ.gates().len(),
            circ.wire_count() - circ.output_count(),
            circ.output_count(),
            &mut self.buffer,
        ))
    }
}

/// Iterator over the garbled gates of a circuit, one item per gate in
/// circuit order.
///
/// Streaming the items to the evaluator as they are produced keeps the
/// garbler from materializing all tables at once.
pub struct GarbledGateIter<'a, I> {
    /// Cipher used to encrypt the gates.
    cipher: &'static FixedKeyAes,
    /// Global offset.
    delta: Delta,
    /// Buffer for the 0-bit labels.
    labels: &'a mut [Label],
    /// Iterator over the gates.
    gates: I,
    /// Gates not yet garbled.
    remaining: usize,
    /// First output wire.
    output_start: usize,
    /// Number of output wires.
    output_count: usize,
    /// Index of the next gate.
    id: usize,
    /// Tweak counter, stepped by 2 per non-free gate.
    gid: usize,
}

impl<'a, I> fmt::Debug for GarbledGateIter<'a, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GarbledGateIter {{ .. }}")
    }
}

impl<'a, I> GarbledGateIter<'a, I>
where
    I: Iterator<Item = &'a Gate>,
{
    fn new(
        delta: Delta,
        gates: I,
        gate_count: usize,
        output_start: usize,
        output_count: usize,
        labels: &'a mut [Label],
    ) -> Self {
        Self {
            cipher: &FIXED_KEY_AES,
            delta,
            labels,
            gates,
            remaining: gate_count,
            output_start,
            output_count,
            id: 0,
            gid: 1,
        }
    }

    /// Returns the label pairs of the output wires.
    ///
    /// Fails unless the iterator has been driven to completion.
    pub fn finish(self) -> Result<GeneratorOutput, GeneratorError> {
        if self.remaining != 0 {
            return Err(GeneratorError::NotFinished);
        }

        let outputs = self.labels[self.output_start..self.output_start + self.output_count]
            .iter()
            .map(|low| LabelPair::new(*low, self.delta))
            .collect();

        Ok(GeneratorOutput { outputs })
    }
}

impl<'a, I> Iterator for GarbledGateIter<'a, I>
where
    I: Iterator<Item = &'a Gate>,
{
    type Item = GarbledGate;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let gate = self.gates.next()?;

        let table = match *gate {
            Gate::Xor { x, y, z } => {
                self.labels[z] = self.labels[x] ^ self.labels[y];
                None
            }
            Gate::Inv { x, z } => {
                // Swapping the two labels of the wire: the evaluator's active
                // label passes through unchanged, its meaning flips.
                self.labels[z] = self.labels[x] ^ self.delta;
                None
            }
            Gate::And { x, y, z } | Gate::Or { x, y, z } => {
                let (z_0, encrypted) = encrypt_gate(
                    self.cipher,
                    gate.gate_type(),
                    &self.labels[x],
                    &self.labels[y],
                    &self.delta,
                    self.gid,
                );
                self.labels[z] = z_0;
                self.gid += 2;
                Some(encrypted)
            }
        };

        let id = self.id;
        self.id += 1;
        self.remaining -= 1;

        Some(GarbledGate { id, table })
    }
}
