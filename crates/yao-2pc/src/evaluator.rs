use std::io::{Read, Write};

use num_bigint::BigUint;
use rand::thread_rng;
use tracing::debug;

use yao_circuits::{input_bits, Circuit};
use yao_core::Block;
use yao_garble_core::{EncryptedGate, Evaluator};
use yao_ot_core::Receiver;

use crate::{
    error::{PartyError, ProtocolError},
    msgs::{recv_label, recv_masked, OP_OT, OP_RESULT},
    transport::Channel,
};

/// Runs the evaluator role to completion, returning the decoded outputs.
///
/// The evaluator reads the garbled tables and the garbler's input labels,
/// obtains its own input labels through one oblivious transfer round per
/// input bit, evaluates the circuit, and exchanges the output labels for the
/// decoded result. Both parties end up with the same outputs.
///
/// Any failure is fatal: the session is torn down and no partial outputs are
/// returned.
#[tracing::instrument(skip_all)]
pub fn run_evaluator<R: Read, W: Write>(
    channel: &mut Channel<R, W>,
    circ: &Circuit,
    inputs: &[BigUint],
) -> Result<Vec<BigUint>, PartyError> {
    let choice_bits = input_bits(circ.evaluator_inputs(), inputs)?;

    // All tables precede everything else, keyed by gate id.
    let gate_count = circ.gates().len();
    let mut tables: Vec<Option<EncryptedGate>> = vec![None; gate_count];
    let mut seen = vec![false; gate_count];
    for _ in 0..gate_count {
        let id = channel.recv_u32()? as usize;
        if id >= gate_count {
            return Err(ProtocolError::GateIdOutOfRange(id, gate_count))?;
        }
        if seen[id] {
            return Err(ProtocolError::DuplicateTable(id))?;
        }
        seen[id] = true;

        match channel.recv_u32()? {
            0 => {}
            rows if rows as usize == EncryptedGate::ROWS => {
                let mut table = [Block::ZERO; EncryptedGate::ROWS];
                for row in table.iter_mut() {
                    let bytes = channel.recv_bytes()?;
                    *row = Block::try_from(bytes.as_slice())
                        .map_err(|_| ProtocolError::InvalidLabelLength(bytes.len()))?;
                }
                tables[id] = Some(EncryptedGate::new(table));
            }
            rows => return Err(ProtocolError::InvalidRowCount { id, rows })?,
        }
    }
    debug!(tables = circ.nonfree_count(), "received garbled tables");

    // The garbler's input labels, in declared wire order.
    let mut labels = Vec::with_capacity(circ.input_count());
    for _ in 0..circ.garbler_input_count() {
        labels.push(recv_label(channel)?);
    }

    // The session public key.
    let n = yao_ot_core::BigUint::from_bytes_be(&channel.recv_bytes()?);
    let e = channel.recv_u32()?;
    let receiver = Receiver::new(n, e)?;
    debug!("received session public key");

    // One transfer round per own input bit, in declared order.
    let mut rng = thread_rng();
    for (index, bit) in choice_bits.iter().enumerate() {
        channel.send_u32(OP_OT)?;
        channel.send_u32(index as u32)?;
        channel.flush()?;

        let x0 = yao_ot_core::BigUint::from_bytes_be(&channel.recv_bytes()?);
        let x1 = yao_ot_core::BigUint::from_bytes_be(&channel.recv_bytes()?);

        let transfer = receiver.choose(&mut rng, *bit, &x0, &x1);
        channel.send_bytes(&transfer.v().to_bytes_be())?;
        channel.flush()?;

        let m0 = recv_masked(channel)?;
        let m1 = recv_masked(channel)?;
        labels.push(transfer.receive(&m0, &m1));
    }
    debug!(rounds = choice_bits.len(), "transfers complete");

    // Evaluate and trade output labels for the plaintext result.
    let output = Evaluator::default().evaluate(circ, labels, &tables)?;

    channel.send_u32(OP_RESULT)?;
    for label in &output.outputs {
        channel.send_bytes(&label.to_bytes())?;
    }
    channel.flush()?;

    let result = BigUint::from_bytes_be(&channel.recv_bytes()?);
    debug!("session complete");

    Ok(circ.split(&result))
}
