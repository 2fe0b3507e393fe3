//! Types for representing two-party computations as boolean circuits.
//!
//! A [`Circuit`] is an immutable gate list in topological order, with wires
//! referenced by dense indices. Garbler input wires come first, then
//! evaluator input wires; the final wires are the circuit outputs. Circuits
//! are usually produced by an external compiler; [`CircuitBuilder`] and the
//! [`ops`] module are provided for composing them in-process.

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(clippy::all)]

mod builder;
mod circuit;
pub mod circuits;
mod components;
pub mod ops;

pub use builder::{BuilderError, CircuitBuilder};
pub use circuit::{input_bits, pack_bits, Circuit, CircuitError, Group};
pub use components::{Gate, GateType};

pub use num_bigint::BigUint;
