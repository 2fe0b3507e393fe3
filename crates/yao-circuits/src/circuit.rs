use num_bigint::BigUint;

use crate::components::Gate;

/// An error that can occur when constructing or evaluating a circuit.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum CircuitError {
    #[error("wire {0} referenced out of range ({1} wires)")]
    WireOutOfRange(usize, usize),
    #[error("wire {0} used before it is assigned")]
    UndefinedWire(usize),
    #[error("wire {0} assigned more than once")]
    RedefinedWire(usize),
    #[error("output wire {0} is never assigned")]
    UnassignedOutput(usize),
    #[error("{0} wires cannot hold {1} input and {2} output bits")]
    InsufficientWires(usize, usize, usize),
    #[error("invalid number of input values: expected {expected}, got {actual}")]
    InvalidInputCount { expected: usize, actual: usize },
    #[error("input value {index} does not fit into {width} bits")]
    InputTooWide { index: usize, width: usize },
}

/// A typed I/O group: a named value spanning a contiguous range of wires.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    name: String,
    width: usize,
}

impl Group {
    /// Creates a new group with the given bit width.
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }

    /// Returns the name of the group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bit width of the group.
    pub fn width(&self) -> usize {
        self.width
    }
}

/// A boolean circuit.
///
/// Immutable after construction. Wire indices `[0, n1)` are garbler inputs,
/// `[n1, n1 + n2)` are evaluator inputs, and the final output wires occupy
/// the tail of the wire space. Gates are stored in topological order, which
/// is also the evaluation order.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circuit {
    wire_count: usize,
    gates: Vec<Gate>,
    garbler_inputs: Vec<Group>,
    evaluator_inputs: Vec<Group>,
    outputs: Vec<Group>,
    nonfree_count: usize,
}

impl Circuit {
    /// Creates a new circuit, validating its topology.
    ///
    /// # Arguments
    ///
    /// * `wire_count` - Total number of distinct wires.
    /// * `gates` - Gates in evaluation order.
    /// * `garbler_inputs` - The garbler's input groups.
    /// * `evaluator_inputs` - The evaluator's input groups.
    /// * `outputs` - The output groups.
    pub fn new(
        wire_count: usize,
        gates: Vec<Gate>,
        garbler_inputs: Vec<Group>,
        evaluator_inputs: Vec<Group>,
        outputs: Vec<Group>,
    ) -> Result<Self, CircuitError> {
        let input_count: usize = garbler_inputs
            .iter()
            .chain(&evaluator_inputs)
            .map(Group::width)
            .sum();
        let output_count: usize = outputs.iter().map(Group::width).sum();

        if wire_count < input_count || wire_count < output_count {
            return Err(CircuitError::InsufficientWires(
                wire_count,
                input_count,
                output_count,
            ));
        }

        let mut assigned = vec![false; wire_count];
        for slot in assigned.iter_mut().take(input_count) {
            *slot = true;
        }

        for gate in &gates {
            for wire in [Some(gate.x()), gate.y()].into_iter().flatten() {
                if wire >= wire_count {
                    return Err(CircuitError::WireOutOfRange(wire, wire_count));
                }
                if !assigned[wire] {
                    return Err(CircuitError::UndefinedWire(wire));
                }
            }

            let z = gate.z();
            if z >= wire_count {
                return Err(CircuitError::WireOutOfRange(z, wire_count));
            }
            if assigned[z] {
                return Err(CircuitError::RedefinedWire(z));
            }
            assigned[z] = true;
        }

        for (wire, is_assigned) in assigned.iter().enumerate().skip(wire_count - output_count) {
            if !is_assigned {
                return Err(CircuitError::UnassignedOutput(wire));
            }
        }

        let nonfree_count = gates.iter().filter(|gate| !gate.is_free()).count();

        Ok(Self {
            wire_count,
            gates,
            garbler_inputs,
            evaluator_inputs,
            outputs,
            nonfree_count,
        })
    }

    /// Returns the total number of wires.
    pub fn wire_count(&self) -> usize {
        self.wire_count
    }

    /// Returns the gates of the circuit in evaluation order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Returns the garbler's input groups.
    pub fn garbler_inputs(&self) -> &[Group] {
        &self.garbler_inputs
    }

    /// Returns the evaluator's input groups.
    pub fn evaluator_inputs(&self) -> &[Group] {
        &self.evaluator_inputs
    }

    /// Returns the output groups.
    pub fn outputs(&self) -> &[Group] {
        &self.outputs
    }

    /// Returns the number of garbler input wires.
    pub fn garbler_input_count(&self) -> usize {
        self.garbler_inputs.iter().map(Group::width).sum()
    }

    /// Returns the number of evaluator input wires.
    pub fn evaluator_input_count(&self) -> usize {
        self.evaluator_inputs.iter().map(Group::width).sum()
    }

    /// Returns the total number of input wires.
    pub fn input_count(&self) -> usize {
        self.garbler_input_count() + self.evaluator_input_count()
    }

    /// Returns the number of output wires.
    pub fn output_count(&self) -> usize {
        self.outputs.iter().map(Group::width).sum()
    }

    /// Returns the number of gates that require a ciphertext table.
    pub fn nonfree_count(&self) -> usize {
        self.nonfree_count
    }

    /// Evaluates the circuit in plaintext.
    ///
    /// Reference implementation of the function the garbled protocol
    /// computes; useful for testing and for deriving expected outputs.
    pub fn evaluate(
        &self,
        garbler_values: &[BigUint],
        evaluator_values: &[BigUint],
    ) -> Result<Vec<BigUint>, CircuitError> {
        let mut bits = input_bits(&self.garbler_inputs, garbler_values)?;
        bits.extend(input_bits(&self.evaluator_inputs, evaluator_values)?);

        let mut registers = vec![false; self.wire_count];
        registers[..bits.len()].copy_from_slice(&bits);

        for gate in &self.gates {
            match *gate {
                Gate::Xor { x, y, z } => registers[z] = registers[x] ^ registers[y],
                Gate::And { x, y, z } => registers[z] = registers[x] & registers[y],
                Gate::Or { x, y, z } => registers[z] = registers[x] | registers[y],
                Gate::Inv { x, z } => registers[z] = !registers[x],
            }
        }

        let packed = pack_bits(&registers[self.wire_count - self.output_count()..]);
        Ok(self.split(&packed))
    }

    /// Splits a packed little-endian output integer into one value per
    /// declared output group.
    pub fn split(&self, value: &BigUint) -> Vec<BigUint> {
        let mut values = Vec::with_capacity(self.outputs.len());
        let mut cursor = 0u64;
        for group in &self.outputs {
            let mut v = BigUint::default();
            for i in 0..group.width() as u64 {
                if value.bit(cursor + i) {
                    v.set_bit(i, true);
                }
            }
            values.push(v);
            cursor += group.width() as u64;
        }
        values
    }
}

/// Unpacks input values into bits, little-endian within each group.
///
/// Fails if the value count does not match the group count, or a value does
/// not fit its declared width.
pub fn input_bits(groups: &[Group], values: &[BigUint]) -> Result<Vec<bool>, CircuitError> {
    if groups.len() != values.len() {
        return Err(CircuitError::InvalidInputCount {
            expected: groups.len(),
            actual: values.len(),
        });
    }

    let mut bits = Vec::with_capacity(groups.iter().map(Group::width).sum());
    for (index, (group, value)) in groups.iter().zip(values).enumerate() {
        if value.bits() > group.width() as u64 {
            return Err(CircuitError::InputTooWide {
                index,
                width: group.width(),
            });
        }
        bits.extend((0..group.width() as u64).map(|i| value.bit(i)));
    }
    Ok(bits)
}

/// Packs bits into an integer, little-endian.
pub fn pack_bits(bits: &[bool]) -> BigUint {
    let mut value = BigUint::default();
    for (i, bit) in bits.iter().enumerate() {
        if *bit {
            value.set_bit(i as u64, true);
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adder_1bit() -> Circuit {
        // Sum and carry of two single-bit inputs.
        Circuit::new(
            4,
            vec![Gate::Xor { x: 0, y: 1, z: 2 }, Gate::And { x: 0, y: 1, z: 3 }],
            vec![Group::new("a", 1)],
            vec![Group::new("b", 1)],
            vec![Group::new("sum", 1), Group::new("carry", 1)],
        )
        .unwrap()
    }

    #[test]
    fn test_evaluate() {
        let circ = adder_1bit();
        for a in 0u8..2 {
            for b in 0u8..2 {
                let out = circ
                    .evaluate(&[BigUint::from(a)], &[BigUint::from(b)])
                    .unwrap();
                assert_eq!(out[0], BigUint::from(a ^ b));
                assert_eq!(out[1], BigUint::from(a & b));
            }
        }
    }

    #[test]
    fn test_identity_circuit() {
        // A zero-gate circuit whose single input wire is also the output.
        let circ = Circuit::new(
            1,
            vec![],
            vec![Group::new("a", 1)],
            vec![],
            vec![Group::new("out", 1)],
        )
        .unwrap();

        let out = circ.evaluate(&[BigUint::from(1u8)], &[]).unwrap();
        assert_eq!(out, vec![BigUint::from(1u8)]);
    }

    #[test]
    fn test_rejects_use_before_assignment() {
        let err = Circuit::new(
            3,
            vec![Gate::Xor { x: 0, y: 2, z: 1 }],
            vec![Group::new("a", 1)],
            vec![],
            vec![Group::new("out", 1)],
        )
        .unwrap_err();
        assert_eq!(err, CircuitError::UndefinedWire(2));
    }

    #[test]
    fn test_rejects_double_assignment() {
        let err = Circuit::new(
            3,
            vec![
                Gate::Xor { x: 0, y: 1, z: 2 },
                Gate::And { x: 0, y: 1, z: 2 },
            ],
            vec![Group::new("a", 2)],
            vec![],
            vec![Group::new("out", 1)],
        )
        .unwrap_err();
        assert_eq!(err, CircuitError::RedefinedWire(2));
    }

    #[test]
    fn test_rejects_out_of_range_wire() {
        let err = Circuit::new(
            3,
            vec![Gate::Xor { x: 0, y: 3, z: 2 }],
            vec![Group::new("a", 2)],
            vec![],
            vec![Group::new("out", 1)],
        )
        .unwrap_err();
        assert_eq!(err, CircuitError::WireOutOfRange(3, 3));
    }

    #[test]
    fn test_rejects_unassigned_output() {
        let err = Circuit::new(
            3,
            vec![],
            vec![Group::new("a", 2)],
            vec![],
            vec![Group::new("out", 1)],
        )
        .unwrap_err();
        assert_eq!(err, CircuitError::UnassignedOutput(2));
    }

    #[test]
    fn test_split_widths() {
        let circ = Circuit::new(
            10,
            vec![],
            vec![Group::new("a", 10)],
            vec![],
            vec![Group::new("x", 3), Group::new("y", 7)],
        )
        .unwrap();

        // 0b1010110101 packed over (x: 3 bits, y: 7 bits).
        let packed = BigUint::from(0b10_1011_0101u32);
        let out = circ.split(&packed);
        assert_eq!(out[0], BigUint::from(0b101u32));
        assert_eq!(out[1], BigUint::from(0b1010110u32));
    }

    #[test]
    fn test_input_too_wide() {
        let err = input_bits(&[Group::new("a", 2)], &[BigUint::from(4u8)]).unwrap_err();
        assert_eq!(err, CircuitError::InputTooWide { index: 0, width: 2 });
    }

    #[test]
    fn test_pack_round_trip() {
        let bits = [true, false, true, true, false, false, true];
        assert_eq!(pack_bits(&bits), BigUint::from(0b100_1101u32));
    }
}
