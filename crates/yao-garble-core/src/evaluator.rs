use yao_circuits::{Circuit, CircuitError, Gate};
use yao_core::{aes::FixedKeyAes, Block, FIXED_KEY_AES};

use crate::{circuit::EncryptedGate, encoding::Label};

/// Errors that can occur during garbled circuit evaluation.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum EvaluatorError {
    #[error(transparent)]
    CircuitError(#[from] CircuitError),
    #[error("invalid number of gate tables: expected {expected}, got {actual}")]
    InvalidTableCount { expected: usize, actual: usize },
    #[error("missing ciphertext table for gate {0}")]
    MissingTable(usize),
    #[error("unexpected ciphertext table for free gate {0}")]
    UnexpectedTable(usize),
}

/// Decrypts one row of a garbled gate.
///
/// The permute tags of the presented labels select the row; the row with
/// tags `(0, 0)` is implicitly the all-zero ciphertext.
#[inline]
pub(crate) fn decrypt_gate(
    cipher: &FixedKeyAes,
    x: &Label,
    y: &Label,
    encrypted: &EncryptedGate,
    gid: usize,
) -> Label {
    let x = x.to_inner();
    let y = y.to_inner();

    let row = x.lsb() * 2 + y.lsb();

    let j = Block::new(gid as u128);
    let k = Block::new((gid + 1) as u128);

    let mut h = [x, y];
    cipher.tccr_many(&[j, k], &mut h);
    let key = h[0] ^ h[1];

    if row == 0 {
        Label::new(key)
    } else {
        Label::new(encrypted[row - 1] ^ key)
    }
}

/// Output of the evaluator.
#[derive(Debug)]
pub struct EvaluatorOutput {
    /// Active labels of the circuit output wires.
    pub outputs: Vec<Label>,
}

/// Garbled circuit evaluator.
#[derive(Debug, Default)]
pub struct Evaluator {
    /// Buffer for the active labels.
    buffer: Vec<Label>,
}

impl Evaluator {
    /// Evaluates a garbled circuit.
    ///
    /// # Arguments
    ///
    /// * `circ` - The circuit to evaluate.
    /// * `inputs` - Active labels of the input wires, garbler inputs first.
    /// * `tables` - Ciphertext tables, one slot per gate in circuit order.
    pub fn evaluate(
        &mut self,
        circ: &Circuit,
        inputs: Vec<Label>,
        tables: &[Option<EncryptedGate>],
    ) -> Result<EvaluatorOutput, EvaluatorError> {
        if inputs.len() != circ.input_count() {
            return Err(CircuitError::InvalidInputCount {
                expected: circ.input_count(),
                actual: inputs.len(),
            })?;
        }
        if tables.len() != circ.gates().len() {
            return Err(EvaluatorError::InvalidTableCount {
                expected: circ.gates().len(),
                actual: tables.len(),
            });
        }

        // Expand the buffer to fit the circuit.
        if circ.wire_count() > self.buffer.len() {
            self.buffer.resize(circ.wire_count(), Default::default());
        }

        let labels = &mut self.buffer;
        labels[..inputs.len()].copy_from_slice(&inputs);

        let cipher: &FixedKeyAes = &FIXED_KEY_AES;
        let mut gid = 1;

        for (id, gate) in circ.gates().iter().enumerate() {
            match *gate {
                Gate::Xor { x, y, z } => {
                    if tables[id].is_some() {
                        return Err(EvaluatorError::UnexpectedTable(id));
                    }
                    labels[z] = labels[x] ^ labels[y];
                }
                Gate::Inv { x, z } => {
                    if tables[id].is_some() {
                        return Err(EvaluatorError::UnexpectedTable(id));
                    }
                    labels[z] = labels[x];
                }
                Gate::And { x, y, z } | Gate::Or { x, y, z } => {
                    let encrypted = tables[id]
                        .as_ref()
                        .ok_or(EvaluatorError::MissingTable(id))?;
                    labels[z] = decrypt_gate(cipher, &labels[x], &labels[y], encrypted, gid);
                    gid += 2;
                }
            }
        }

        let output_start = circ.wire_count() - circ.output_count();
        let outputs = labels[output_start..output_start + circ.output_count()].to_vec();

        Ok(EvaluatorOutput { outputs })
    }
}
