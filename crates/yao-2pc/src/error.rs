use yao_circuits::CircuitError;
use yao_garble_core::{EvaluatorError, GeneratorError};
use yao_ot_core::{ReceiverError, SenderError};

use crate::transport::TransportError;

/// A malformed or out-of-order protocol message.
///
/// Every violation is fatal to the session; nothing is retried in-band.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ProtocolError {
    #[error("unexpected opcode {0}")]
    UnexpectedOpcode(u32),
    #[error("gate id {0} out of range ({1} gates)")]
    GateIdOutOfRange(usize, usize),
    #[error("duplicate table for gate {0}")]
    DuplicateTable(usize),
    #[error("gate {id} declares an impossible row count {rows}")]
    InvalidRowCount { id: usize, rows: u32 },
    #[error("label frame of {0} bytes, expected the fixed label width")]
    InvalidLabelLength(usize),
    #[error("transfer for bit {actual} requested, expected bit {expected}")]
    BitIndexMismatch { expected: u32, actual: u32 },
    #[error("transfer bit {0} out of range ({1} evaluator input bits)")]
    BitIndexOutOfRange(u32, usize),
    #[error("output label for wire {0} matches neither wire label")]
    OutputLabelMismatch(usize),
}

/// Top-level error of a protocol session.
///
/// Every variant tears the session down; no partial outputs are returned.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum PartyError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),
    #[error(transparent)]
    OtSender(#[from] SenderError),
    #[error(transparent)]
    OtReceiver(#[from] ReceiverError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
