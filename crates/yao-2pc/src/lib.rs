//! Semi-honest two-party computation over garbled circuits.
//!
//! Two mutually distrusting parties jointly evaluate a boolean circuit over
//! their private inputs; both learn only the agreed output. The garbler
//! garbles the circuit and streams the tables, the evaluator picks up its
//! input labels through per-bit RSA oblivious transfer, evaluates, and the
//! parties exchange output labels for the decoded result.
//!
//! The wire protocol runs over a single full-duplex byte stream with
//! length-prefixed framing; see [`Channel`]. Each party is a single blocking
//! task — give each side a thread (or a process, or a socket peer):
//!
//! ```
//! use std::io::{BufReader, BufWriter};
//! use std::os::unix::net::UnixStream;
//!
//! use num_bigint::BigUint;
//! use yao_2pc::{run_evaluator, run_garbler, Channel};
//! use yao_circuits::CircuitBuilder;
//!
//! // (a, b) -> a & b
//! let mut builder = CircuitBuilder::new();
//! let a = builder.add_garbler_input("a", 1);
//! let b = builder.add_evaluator_input("b", 1);
//! let z = builder.and(a[0], b[0]);
//! builder.add_output("out", &[z]);
//! let circ = builder.build().unwrap();
//!
//! let (left, right) = UnixStream::pair().unwrap();
//! let garbler_circ = circ.clone();
//!
//! let garbler = std::thread::spawn(move || {
//!     let reader = BufReader::new(left.try_clone().unwrap());
//!     let mut channel = Channel::new(reader, BufWriter::new(left));
//!     run_garbler(&mut channel, &garbler_circ, &[BigUint::from(1u8)], rand::random()).unwrap()
//! });
//!
//! let reader = BufReader::new(right.try_clone().unwrap());
//! let mut channel = Channel::new(reader, BufWriter::new(right));
//! let outputs = run_evaluator(&mut channel, &circ, &[BigUint::from(1u8)]).unwrap();
//!
//! assert_eq!(outputs, garbler.join().unwrap());
//! assert_eq!(outputs, vec![BigUint::from(1u8)]);
//! ```

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(clippy::all)]

mod error;
mod evaluator;
mod garbler;
mod msgs;
mod transport;

pub use error::{PartyError, ProtocolError};
pub use evaluator::run_evaluator;
pub use garbler::run_garbler;
pub use transport::{Channel, TransportError};
