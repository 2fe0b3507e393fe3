use crate::{
    circuit::{Circuit, CircuitError, Group},
    components::Gate,
};

/// An error that can occur while building a circuit.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BuilderError {
    #[error("garbler inputs must be declared before evaluator inputs")]
    GarblerInputAfterEvaluator,
    #[error("inputs must be declared before any gate")]
    InputAfterGate,
    #[error("wire {0} does not exist")]
    UnknownWire(usize),
    #[error("output wire {0} is a circuit input")]
    OutputIsInput(usize),
    #[error("wire {0} appears in more than one output position")]
    DuplicateOutput(usize),
    #[error(transparent)]
    Circuit(#[from] CircuitError),
}

/// Builds a [`Circuit`] gate by gate.
///
/// Gates are appended in evaluation order. At build time wires are relaid so
/// that the declared outputs occupy the tail of the wire space, as the wire
/// layout requires.
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    garbler_inputs: Vec<Group>,
    evaluator_inputs: Vec<Group>,
    outputs: Vec<Group>,
    output_wires: Vec<usize>,
    gates: Vec<Gate>,
    next_wire: usize,
    errors: Vec<BuilderError>,
}

impl CircuitBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a garbler input group, returning its wires.
    ///
    /// All garbler inputs must be declared before evaluator inputs and gates.
    pub fn add_garbler_input(&mut self, name: &str, width: usize) -> Vec<usize> {
        if !self.evaluator_inputs.is_empty() {
            self.errors.push(BuilderError::GarblerInputAfterEvaluator);
        } else if !self.gates.is_empty() {
            self.errors.push(BuilderError::InputAfterGate);
        }
        self.garbler_inputs.push(Group::new(name, width));
        self.alloc(width)
    }

    /// Declares an evaluator input group, returning its wires.
    pub fn add_evaluator_input(&mut self, name: &str, width: usize) -> Vec<usize> {
        if !self.gates.is_empty() {
            self.errors.push(BuilderError::InputAfterGate);
        }
        self.evaluator_inputs.push(Group::new(name, width));
        self.alloc(width)
    }

    /// Appends an XOR gate, returning its output wire.
    pub fn xor(&mut self, x: usize, y: usize) -> usize {
        let z = self.fresh_wire();
        self.gates.push(Gate::Xor { x, y, z });
        z
    }

    /// Appends an AND gate, returning its output wire.
    pub fn and(&mut self, x: usize, y: usize) -> usize {
        let z = self.fresh_wire();
        self.gates.push(Gate::And { x, y, z });
        z
    }

    /// Appends an OR gate, returning its output wire.
    pub fn or(&mut self, x: usize, y: usize) -> usize {
        let z = self.fresh_wire();
        self.gates.push(Gate::Or { x, y, z });
        z
    }

    /// Appends an inverter gate, returning its output wire.
    pub fn inv(&mut self, x: usize) -> usize {
        let z = self.fresh_wire();
        self.gates.push(Gate::Inv { x, z });
        z
    }

    /// Declares an output group over existing wires, little-endian.
    pub fn add_output(&mut self, name: &str, wires: &[usize]) {
        self.outputs.push(Group::new(name, wires.len()));
        self.output_wires.extend_from_slice(wires);
    }

    /// Finalizes the circuit.
    pub fn build(mut self) -> Result<Circuit, BuilderError> {
        if let Some(err) = self.errors.drain(..).next() {
            return Err(err);
        }

        let input_count: usize = self
            .garbler_inputs
            .iter()
            .chain(&self.evaluator_inputs)
            .map(Group::width)
            .sum();
        let wire_count = self.next_wire;

        let mut is_output = vec![false; wire_count];
        for &wire in &self.output_wires {
            if wire >= wire_count {
                return Err(BuilderError::UnknownWire(wire));
            }
            if wire < input_count {
                return Err(BuilderError::OutputIsInput(wire));
            }
            if is_output[wire] {
                return Err(BuilderError::DuplicateOutput(wire));
            }
            is_output[wire] = true;
        }

        // Relay wires: inputs stay put, outputs move to the tail, the rest
        // fill the space in between in first-assignment order.
        let output_base = wire_count - self.output_wires.len();
        let mut map = vec![usize::MAX; wire_count];
        for (wire, slot) in map.iter_mut().enumerate().take(input_count) {
            *slot = wire;
        }
        for (position, &wire) in self.output_wires.iter().enumerate() {
            map[wire] = output_base + position;
        }
        let mut next = input_count;
        for slot in map.iter_mut().skip(input_count) {
            if *slot == usize::MAX {
                *slot = next;
                next += 1;
            }
        }

        let remap = |wire: usize| {
            map.get(wire)
                .copied()
                .ok_or(BuilderError::UnknownWire(wire))
        };
        let gates = self
            .gates
            .into_iter()
            .map(|gate| {
                Ok(match gate {
                    Gate::Xor { x, y, z } => Gate::Xor {
                        x: remap(x)?,
                        y: remap(y)?,
                        z: remap(z)?,
                    },
                    Gate::And { x, y, z } => Gate::And {
                        x: remap(x)?,
                        y: remap(y)?,
                        z: remap(z)?,
                    },
                    Gate::Or { x, y, z } => Gate::Or {
                        x: remap(x)?,
                        y: remap(y)?,
                        z: remap(z)?,
                    },
                    Gate::Inv { x, z } => Gate::Inv {
                        x: remap(x)?,
                        z: remap(z)?,
                    },
                })
            })
            .collect::<Result<Vec<_>, BuilderError>>()?;

        Ok(Circuit::new(
            wire_count,
            gates,
            self.garbler_inputs,
            self.evaluator_inputs,
            self.outputs,
        )?)
    }

    fn alloc(&mut self, width: usize) -> Vec<usize> {
        let wires = (self.next_wire..self.next_wire + width).collect();
        self.next_wire += width;
        wires
    }

    fn fresh_wire(&mut self) -> usize {
        let z = self.next_wire;
        self.next_wire += 1;
        z
    }
}
