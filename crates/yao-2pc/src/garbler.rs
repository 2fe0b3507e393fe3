use std::io::{Read, Write};

use num_bigint::BigUint;
use rand::thread_rng;
use tracing::debug;

use yao_circuits::{input_bits, Circuit};
use yao_garble_core::{
    ChaChaEncoder, EncryptedGate, GarbledGate, Generator, GeneratorOutput, LabelPair,
};
use yao_ot_core::Sender;

use crate::{
    error::{PartyError, ProtocolError},
    msgs::{recv_label, MODULUS_BITS, OP_OT, OP_RESULT},
    transport::Channel,
};

/// Runs the garbler role to completion, returning the decoded outputs.
///
/// The garbler garbles the circuit under the session key seed, streams the
/// tables and its own input labels, announces a fresh RSA public key, serves
/// one oblivious transfer round per evaluator input bit, and finally decodes
/// the output labels the evaluator sends back. Both parties end up with the
/// same outputs.
///
/// Any failure is fatal: the session is torn down and no partial outputs are
/// returned.
#[tracing::instrument(skip_all)]
pub fn run_garbler<R: Read, W: Write>(
    channel: &mut Channel<R, W>,
    circ: &Circuit,
    inputs: &[BigUint],
    seed: [u8; 32],
) -> Result<Vec<BigUint>, PartyError> {
    let own_bits = input_bits(circ.garbler_inputs(), inputs)?;

    let encoder = ChaChaEncoder::new(seed);
    let delta = encoder.delta();
    let zero_labels = encoder.encode_inputs(circ.input_count());

    // Garble, streaming each gate's table as it is produced.
    let mut generator = Generator::default();
    let mut gates = generator.generate(circ, delta, zero_labels.clone())?;
    for GarbledGate { id, table } in gates.by_ref() {
        channel.send_u32(id as u32)?;
        match table {
            Some(encrypted) => {
                channel.send_u32(EncryptedGate::ROWS as u32)?;
                for row in encrypted.rows() {
                    channel.send_bytes(&row.to_bytes())?;
                }
            }
            None => channel.send_u32(0)?,
        }
    }
    let GeneratorOutput {
        outputs: output_pairs,
    } = gates.finish()?;
    debug!(tables = circ.nonfree_count(), "sent garbled tables");

    let input_pairs: Vec<LabelPair> = zero_labels
        .into_iter()
        .map(|low| LabelPair::new(low, delta))
        .collect();

    // Our own input labels, in declared wire order.
    for (bit, pair) in own_bits.iter().zip(&input_pairs) {
        channel.send_bytes(&pair.select(*bit).to_bytes())?;
    }

    // Announce the session public key.
    let mut rng = thread_rng();
    let sender = Sender::new(&mut rng, MODULUS_BITS)?;
    let public_key = sender.public_key();
    channel.send_bytes(&public_key.n.to_bytes_be())?;
    channel.send_u32(public_key.e)?;
    channel.flush()?;
    debug!("sent session public key");

    // Serve the message loop until the evaluator reveals the result.
    let evaluator_bits = circ.evaluator_input_count();
    let mut round: u32 = 0;
    loop {
        match channel.recv_u32()? {
            OP_OT => {
                let index = channel.recv_u32()?;
                if index as usize >= evaluator_bits {
                    return Err(ProtocolError::BitIndexOutOfRange(index, evaluator_bits))?;
                }
                // Rounds are positional; the index on the wire must agree.
                if index != round {
                    return Err(ProtocolError::BitIndexMismatch {
                        expected: round,
                        actual: index,
                    })?;
                }

                let pair = &input_pairs[circ.garbler_input_count() + index as usize];

                let transfer = sender.begin_transfer(&mut rng);
                channel.send_bytes(&transfer.x0().to_bytes_be())?;
                channel.send_bytes(&transfer.x1().to_bytes_be())?;
                channel.flush()?;

                let v = yao_ot_core::BigUint::from_bytes_be(&channel.recv_bytes()?);
                let (m0, m1) =
                    sender.complete_transfer(transfer, &v, &pair.low(), &pair.high());
                channel.send_bytes(&m0)?;
                channel.send_bytes(&m1)?;
                channel.flush()?;

                round += 1;
            }
            OP_RESULT => {
                let mut result = BigUint::default();
                for (i, pair) in output_pairs.iter().enumerate() {
                    let label = recv_label(channel)?;
                    let bit = pair
                        .decode(&label)
                        .ok_or(ProtocolError::OutputLabelMismatch(i))?;
                    if bit {
                        result.set_bit(i as u64, true);
                    }
                }

                channel.send_bytes(&result.to_bytes_be())?;
                channel.flush()?;
                debug!(rounds = round, "session complete");

                return Ok(circ.split(&result));
            }
            op => return Err(ProtocolError::UnexpectedOpcode(op))?,
        }
    }
}
