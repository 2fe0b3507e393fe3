/// A binary logic gate.
///
/// Wires are dense indices into the circuit's wire space. Every gate output
/// wire is assigned exactly once, and gate inputs always refer to circuit
/// inputs or outputs of earlier gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Gate {
    /// XOR gate.
    Xor { x: usize, y: usize, z: usize },
    /// AND gate.
    And { x: usize, y: usize, z: usize },
    /// OR gate.
    Or { x: usize, y: usize, z: usize },
    /// Inverter gate.
    Inv { x: usize, z: usize },
}

impl Gate {
    /// Returns the type of the gate.
    pub fn gate_type(&self) -> GateType {
        match self {
            Gate::Xor { .. } => GateType::Xor,
            Gate::And { .. } => GateType::And,
            Gate::Or { .. } => GateType::Or,
            Gate::Inv { .. } => GateType::Inv,
        }
    }

    /// Returns the x input of the gate.
    pub fn x(&self) -> usize {
        match *self {
            Gate::Xor { x, .. } => x,
            Gate::And { x, .. } => x,
            Gate::Or { x, .. } => x,
            Gate::Inv { x, .. } => x,
        }
    }

    /// Returns the y input of the gate, if it has one.
    pub fn y(&self) -> Option<usize> {
        match *self {
            Gate::Xor { y, .. } => Some(y),
            Gate::And { y, .. } => Some(y),
            Gate::Or { y, .. } => Some(y),
            Gate::Inv { .. } => None,
        }
    }

    /// Returns the output wire of the gate.
    pub fn z(&self) -> usize {
        match *self {
            Gate::Xor { z, .. } => z,
            Gate::And { z, .. } => z,
            Gate::Or { z, .. } => z,
            Gate::Inv { z, .. } => z,
        }
    }

    /// Returns `true` if the gate is garbled without a ciphertext table.
    ///
    /// XOR is free under Free-XOR; INV is a label swap.
    pub fn is_free(&self) -> bool {
        matches!(self, Gate::Xor { .. } | Gate::Inv { .. })
    }
}

/// The type of a binary gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateType {
    /// XOR gate.
    Xor,
    /// AND gate.
    And,
    /// OR gate.
    Or,
    /// Inverter gate.
    Inv,
}
