use core::ops::Index;

use yao_core::Block;

use crate::encoding::{Delta, LabelPair};

/// Ciphertext rows of a garbled non-free gate.
///
/// Tables are row-reduced (GRR3, [NPS99]): the row selected by permute tags
/// `(0, 0)` is defined to be all zeros and is never stored or transmitted.
/// The remaining rows are indexed by `πa·2 + πb − 1`.
///
/// [NPS99]: https://dl.acm.org/doi/10.1145/336992.337028
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncryptedGate([Block; 3]);

impl EncryptedGate {
    /// Number of transmitted rows.
    pub const ROWS: usize = 3;

    /// Creates a new encrypted gate from its transmitted rows.
    pub fn new(rows: [Block; 3]) -> Self {
        Self(rows)
    }

    /// Returns the transmitted rows.
    pub fn rows(&self) -> &[Block; 3] {
        &self.0
    }
}

impl Index<usize> for EncryptedGate {
    type Output = Block;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// A garbled gate as streamed to the evaluator.
///
/// `table` is `None` for free gates (XOR, INV).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GarbledGate {
    /// Index of the gate in circuit order.
    pub id: usize,
    /// Ciphertext rows, absent for free gates.
    pub table: Option<EncryptedGate>,
}

/// A fully garbled circuit.
///
/// This is the garbler-side object: the input and output label pairs encode
/// both logical values of every I/O wire and must never leave the garbler.
/// Only the tables (and one label per input wire) are shared with the
/// evaluator.
#[derive(Debug, Clone)]
pub struct GarbledCircuit {
    /// Global XOR offset.
    pub delta: Delta,
    /// Label pairs of the input wires, garbler inputs first.
    pub inputs: Vec<LabelPair>,
    /// Label pairs of the output wires.
    pub outputs: Vec<LabelPair>,
    /// Ciphertext tables, one slot per gate in circuit order.
    pub tables: Vec<Option<EncryptedGate>>,
}
