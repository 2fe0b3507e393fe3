//! Core components for garbling and evaluating boolean circuits.
//!
//! The scheme combines Free-XOR \[[KS08](https://www.iacr.org/archive/icalp2008/51250487/51250487.pdf)\],
//! point-and-permute and three-row reduction (GRR3): XOR gates cost nothing,
//! INV gates are label swaps, and every AND/OR gate ships three ciphertexts
//! selected by the permute tags of the evaluator's labels.
//!
//! # Example
//!
//! ```
//! use yao_circuits::CircuitBuilder;
//! use yao_garble_core::{garble, Evaluator};
//!
//! // (a, b) -> a & b
//! let mut builder = CircuitBuilder::new();
//! let a = builder.add_garbler_input("a", 1);
//! let b = builder.add_evaluator_input("b", 1);
//! let z = builder.and(a[0], b[0]);
//! builder.add_output("out", &[z]);
//! let circ = builder.build().unwrap();
//!
//! let garbled = garble(&circ, [0u8; 32]).unwrap();
//!
//! // The evaluator holds one label per input wire, plus the tables.
//! let inputs = vec![
//!     garbled.inputs[0].select(true),
//!     garbled.inputs[1].select(true),
//! ];
//! let output = Evaluator::default()
//!     .evaluate(&circ, inputs, &garbled.tables)
//!     .unwrap();
//!
//! assert_eq!(garbled.outputs[0].decode(&output.outputs[0]), Some(true));
//! ```

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(clippy::all)]

mod circuit;
mod encoding;
mod evaluator;
mod generator;

pub use circuit::{EncryptedGate, GarbledCircuit, GarbledGate};
pub use encoding::{ChaChaEncoder, Delta, Label, LabelPair};
pub use evaluator::{Evaluator, EvaluatorError, EvaluatorOutput};
pub use generator::{GarbledGateIter, Generator, GeneratorError, GeneratorOutput};

use yao_circuits::Circuit;

/// Garbles a circuit under a session key seed.
///
/// Off-line entry point: produces all tables at once. The protocol layer
/// drives [`Generator`] directly so tables can stream out gate by gate.
pub fn garble(circ: &Circuit, seed: [u8; 32]) -> Result<GarbledCircuit, GeneratorError> {
    let encoder = ChaChaEncoder::new(seed);
    let delta = encoder.delta();
    let input_labels = encoder.encode_inputs(circ.input_count());

    let mut generator = Generator::default();
    let mut gates = generator.generate(circ, delta, input_labels.clone())?;

    let mut tables = vec![None; circ.gates().len()];
    for gate in gates.by_ref() {
        tables[gate.id] = gate.table;
    }
    let GeneratorOutput { outputs } = gates.finish()?;

    let inputs = input_labels
        .into_iter()
        .map(|low| LabelPair::new(low, delta))
        .collect();

    Ok(GarbledCircuit {
        delta,
        inputs,
        outputs,
        tables,
    })
}
